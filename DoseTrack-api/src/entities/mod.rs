// API entities
pub mod common;
