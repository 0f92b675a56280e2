//! Release notification engine.
//!
//! This crate decides, for every user, whether and what to notify about
//! releases of the artists they follow, and delivers through the configured
//! channels:
//!
//! - [`ReleaseWindowCalculator`]: upcoming/recent release windows, fetched
//!   once per run for every supported frequency.
//! - [`FrequencyNotifier`]: periodic digests for users whose interval has
//!   elapsed.
//! - [`DateTriggeredNotifier`]: same-day alerts on release or announcement
//!   date.
//! - [`NotificationScheduler`]: the three entry points driven by the
//!   worker's triggers.
//! - [`ChannelDispatcher`] and [`delivery`]: fan-out to email and Telegram.
//! - [`NotificationSettings`]: reading and updating a user's preferences.

pub mod date_triggered;
pub mod delivery;
pub mod dispatch;
pub mod frequency;
pub mod render;
pub mod scheduler;
pub mod settings;
pub mod summary;
pub mod window;

mod subscriber;

pub use date_triggered::{DateTrigger, DateTriggeredNotifier};
pub use delivery::email::{EmailChannel, EmailConfig};
pub use delivery::telegram::{TelegramChannel, TelegramConfig};
pub use dispatch::{ChannelDispatcher, DispatchReport};
pub use frequency::FrequencyNotifier;
pub use scheduler::{Collaborators, NotificationScheduler};
pub use settings::NotificationSettings;
pub use summary::RunSummary;
pub use window::ReleaseWindowCalculator;

/// Default number of users processed concurrently within one run.
pub const DEFAULT_CONCURRENCY: usize = 4;
