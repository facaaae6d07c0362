//! Shared data model, configuration and HTTP client for the SWAPI film search.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod platform;

pub use client::{EntitySource, SwapiClient};
pub use error::SwapiError;
pub use model::{Entity, EntityKind, Film, SwapiPage};
