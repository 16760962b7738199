//! Response models for the content server
//!
//! This module defines the DTOs serialized into JSON response bodies.

pub mod responses;

pub use responses::{ErrorResponse, SaveResponse, StatsResponse};
