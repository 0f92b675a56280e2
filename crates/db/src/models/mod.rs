//! Row structs and DTOs.
//!
//! Each submodule contains a `FromRow` entity struct matching the database
//! row and, where rows are created from this crate, a create DTO.

pub mod artist;
pub mod notification_config;
pub mod user;
