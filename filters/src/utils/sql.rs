//! SQL utility functions

/// Escape SQL LIKE metacharacters (%, _, \) so user text matches literally
///
/// Pair the pattern with `ESCAPE '\'` in the generated clause.
///
/// # Example
///
/// ```
/// use admin_filters::utils::sql::escape_like_pattern;
///
/// let pattern = format!("{}%", escape_like_pattern("team_lead"));
/// assert_eq!(pattern, "team\\_lead%");
/// ```
pub fn escape_like_pattern(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
