//! Role names carried in the `role` claim of access tokens.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MEMBER: &str = "member";
