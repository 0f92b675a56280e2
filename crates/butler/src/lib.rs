//! Client for the release butler, the service that tracks record releases.
//!
//! Provides the HTTP API wrapper, wire types, environment configuration and
//! a [`ReleaseSource`](metal_detector_core::traits::ReleaseSource)
//! implementation for the notification engine.

pub mod api;
pub mod config;
pub mod models;
pub mod source;

pub use api::{ButlerApi, ButlerApiError};
pub use config::ButlerConfig;
pub use source::ButlerReleaseSource;
