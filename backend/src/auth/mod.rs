//! Authentication module
//!
//! Validates Supabase-issued JWTs and exposes member/admin extractors.

pub mod jwt;
mod middleware;

pub use jwt::{Claims, JwtService};
pub use middleware::{AdminUser, AuthUser};
