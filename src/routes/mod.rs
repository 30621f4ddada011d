pub mod admin;
pub mod auth;
pub mod backup;
pub mod public;
