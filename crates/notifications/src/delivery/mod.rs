//! Concrete notification channels.
//!
//! Both channels render through [`crate::render`] and report failures as
//! [`CoreError::Delivery`](metal_detector_core::error::CoreError) tagged
//! with their [`ChannelKind`](metal_detector_core::channels::ChannelKind).

pub mod email;
pub mod telegram;
