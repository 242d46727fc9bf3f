//! Identifier generation for conditions and groups

const CONDITION_PREFIX: &str = "cond";
const GROUP_PREFIX: &str = "group";

/// Collision-resistant id, unique across editing sessions
pub fn fresh_id(prefix: &str) -> String {
    format!("{}-{}", prefix, cuid2::create_id())
}

pub fn condition_id() -> String {
    fresh_id(CONDITION_PREFIX)
}

pub fn group_id() -> String {
    fresh_id(GROUP_PREFIX)
}
