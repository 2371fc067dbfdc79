// Domain entities
pub mod injection;
pub mod medication;
pub mod conversions;
