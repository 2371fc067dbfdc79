// DoseTrack Domain
// This crate contains the business logic for the DoseTrack application

// Services that implement business logic, including the
// pharmacokinetic engine (decay model, aggregation, statistics)
pub mod services;

// Domain entities
pub mod entities;

// Health checks and system status
pub mod health;

// Re-export the database module from dose_track_data for convenience
pub use dose_track_data::database;
