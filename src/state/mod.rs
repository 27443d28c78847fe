pub mod auth;
pub mod sequence;
