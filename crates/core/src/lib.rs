//! Domain types, collaborator traits and pure notification logic.
//!
//! This crate has zero internal deps so it can be shared by the database
//! layer, the butler client, the notification engine and the worker.

pub mod channels;
pub mod error;
pub mod filtering;
pub mod notification_config;
pub mod recipient;
pub mod release;
pub mod release_window;
pub mod traits;
pub mod types;
