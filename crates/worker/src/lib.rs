//! Background worker that drives the notification engine on cron triggers.

pub mod config;
pub mod triggers;
