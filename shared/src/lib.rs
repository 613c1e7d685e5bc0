//! Shared types and calculations for the Prayer Times Platform
//!
//! This crate contains the solar ephemeris, the prayer time derivation and
//! the input state shared between the backend, the browser client (via WASM),
//! and other components of the system.

pub mod ephemeris;
pub mod input;
pub mod models;
pub mod types;
pub mod validation;

pub use ephemeris::*;
pub use input::*;
pub use models::*;
pub use types::*;
pub use validation::*;
