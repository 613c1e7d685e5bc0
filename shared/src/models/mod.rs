//! Domain models for the Prayer Times Platform

mod prayer;
mod solar;

pub use prayer::*;
pub use solar::*;
