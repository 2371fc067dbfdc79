// Data storage models
pub mod injection;
pub mod medication;
