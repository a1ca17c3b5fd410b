//! Utility modules
//!
//! This module contains common utilities used throughout the application,
//! including error handling, logging setup, and date normalization.

pub mod datetime;
pub mod errors;
pub mod logging;

pub use errors::{Result, TourneyHubError};
