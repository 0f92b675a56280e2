//! In-memory collaborators for the notification engine tests.
//!
//! Every fake records what it was asked for, so tests can assert on the
//! calls made as well as on the returned summaries.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use metal_detector_core::channels::ChannelKind;
use metal_detector_core::error::CoreError;
use metal_detector_core::notification_config::{Frequency, NotificationConfig};
use metal_detector_core::recipient::Recipient;
use metal_detector_core::release::{DateRange, Release};
use metal_detector_core::traits::{
    FollowGraph, NotificationChannel, NotificationConfigStore, NotificationEvent,
    RecipientDirectory, ReleaseSource,
};
use metal_detector_core::types::{Date, DbId};
use metal_detector_notifications::{
    ChannelDispatcher, Collaborators, NotificationScheduler, DEFAULT_CONCURRENCY,
};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

pub fn date(y: i32, m: u32, d: u32) -> Date {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn release(artist: &str, album: &str, release_date: Date) -> Release {
    Release {
        artist_name: artist.to_string(),
        album_title: album.to_string(),
        release_date,
        announcement_date: None,
    }
}

pub fn announced(artist: &str, album: &str, release_date: Date, announced_on: Date) -> Release {
    Release {
        announcement_date: Some(announced_on),
        ..release(artist, album, release_date)
    }
}

/// A config with the periodic digest on and both date alerts off.
pub fn digest_config(user_id: DbId, frequency: Frequency, last: Option<Date>) -> NotificationConfig {
    NotificationConfig {
        id: user_id,
        user_id,
        notify: true,
        frequency,
        notification_at_release_date: false,
        notification_at_announcement_date: false,
        last_notification_date: last,
        version: 0,
    }
}

/// A config with only the given date alerts on.
pub fn alert_config(user_id: DbId, at_release: bool, at_announcement: bool) -> NotificationConfig {
    NotificationConfig {
        notify: false,
        notification_at_release_date: at_release,
        notification_at_announcement_date: at_announcement,
        ..digest_config(user_id, Frequency::FourWeeks, None)
    }
}

pub fn recipient(user_id: DbId, telegram_chat_id: Option<i64>) -> Recipient {
    Recipient {
        user_id,
        public_id: Uuid::new_v4(),
        username: format!("user{user_id}"),
        email: format!("user{user_id}@example.com"),
        enabled: true,
        telegram_chat_id,
    }
}

// ---------------------------------------------------------------------------
// FakeReleaseSource
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeReleaseSource {
    releases: Vec<Release>,
    calls: Mutex<Vec<DateRange>>,
    fail: AtomicBool,
}

impl FakeReleaseSource {
    pub fn new(releases: Vec<Release>) -> Self {
        Self {
            releases,
            ..Self::default()
        }
    }

    pub fn fail(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<DateRange> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReleaseSource for FakeReleaseSource {
    async fn find_releases(
        &self,
        artists: &[String],
        range: DateRange,
    ) -> Result<Vec<Release>, CoreError> {
        self.calls.lock().unwrap().push(range);
        if self.fail.load(Ordering::SeqCst) {
            return Err(CoreError::external("butler", "connection refused"));
        }
        Ok(self
            .releases
            .iter()
            .filter(|r| range.contains(r.release_date))
            .filter(|r| artists.is_empty() || artists.contains(&r.artist_name))
            .cloned()
            .collect())
    }
}

// ---------------------------------------------------------------------------
// FakeFollowGraph
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeFollowGraph {
    follows: Mutex<HashMap<DbId, Vec<String>>>,
    failing: Mutex<HashSet<DbId>>,
}

impl FakeFollowGraph {
    pub fn set(&self, user_id: DbId, artists: &[&str]) {
        self.follows
            .lock()
            .unwrap()
            .insert(user_id, artists.iter().map(|a| a.to_string()).collect());
    }

    pub fn fail_for(&self, user_id: DbId) {
        self.failing.lock().unwrap().insert(user_id);
    }
}

#[async_trait]
impl FollowGraph for FakeFollowGraph {
    async fn followed_artist_names(&self, user_id: DbId) -> Result<Vec<String>, CoreError> {
        if self.failing.lock().unwrap().contains(&user_id) {
            return Err(CoreError::external("database", "follow lookup failed"));
        }
        Ok(self
            .follows
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// FakeConfigStore
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeConfigStore {
    configs: Mutex<HashMap<DbId, NotificationConfig>>,
    disabled_users: Mutex<HashSet<DbId>>,
    saves: Mutex<Vec<NotificationConfig>>,
    fail_listing: AtomicBool,
}

impl FakeConfigStore {
    pub fn insert(&self, config: NotificationConfig) {
        self.configs.lock().unwrap().insert(config.user_id, config);
    }

    pub fn get(&self, user_id: DbId) -> Option<NotificationConfig> {
        self.configs.lock().unwrap().get(&user_id).cloned()
    }

    pub fn disable_user(&self, user_id: DbId) {
        self.disabled_users.lock().unwrap().insert(user_id);
    }

    /// Simulate a settings save by another writer: apply `change` to the
    /// stored config and bump its version.
    pub fn concurrent_update(&self, user_id: DbId, change: impl FnOnce(&mut NotificationConfig)) {
        if let Some(config) = self.configs.lock().unwrap().get_mut(&user_id) {
            change(config);
            config.version += 1;
        }
    }

    pub fn fail_listing(&self) {
        self.fail_listing.store(true, Ordering::SeqCst);
    }

    /// Successful writes, `save` and `mark_notified` alike, in order.
    pub fn saves(&self) -> Vec<NotificationConfig> {
        self.saves.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationConfigStore for FakeConfigStore {
    async fn find_all_enabled_configs(&self) -> Result<Vec<NotificationConfig>, CoreError> {
        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(CoreError::external("database", "pool timed out"));
        }
        let disabled = self.disabled_users.lock().unwrap().clone();
        let mut configs: Vec<_> = self
            .configs
            .lock()
            .unwrap()
            .values()
            .filter(|c| !disabled.contains(&c.user_id))
            .cloned()
            .collect();
        configs.sort_by_key(|c| c.user_id);
        Ok(configs)
    }

    async fn find_by_user_id(
        &self,
        user_id: DbId,
    ) -> Result<Option<NotificationConfig>, CoreError> {
        Ok(self.get(user_id))
    }

    async fn save(&self, config: &NotificationConfig) -> Result<NotificationConfig, CoreError> {
        let mut configs = self.configs.lock().unwrap();
        let stored = configs.get_mut(&config.user_id).ok_or(CoreError::NotFound {
            entity: "NotificationConfig",
            id: config.user_id,
        })?;
        if stored.version != config.version {
            return Err(CoreError::Conflict(format!(
                "notification config {} was modified concurrently",
                config.id
            )));
        }
        let mut saved = config.clone();
        saved.version += 1;
        *stored = saved.clone();
        self.saves.lock().unwrap().push(saved.clone());
        Ok(saved)
    }

    async fn mark_notified(
        &self,
        config_id: DbId,
        date: Date,
    ) -> Result<NotificationConfig, CoreError> {
        let mut configs = self.configs.lock().unwrap();
        let stored = configs
            .values_mut()
            .find(|c| c.id == config_id)
            .ok_or(CoreError::NotFound {
                entity: "NotificationConfig",
                id: config_id,
            })?;
        stored.last_notification_date = Some(date);
        stored.version += 1;
        self.saves.lock().unwrap().push(stored.clone());
        Ok(stored.clone())
    }
}

// ---------------------------------------------------------------------------
// FakeRecipients
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeRecipients {
    recipients: Mutex<HashMap<DbId, Recipient>>,
}

impl FakeRecipients {
    pub fn insert(&self, recipient: Recipient) {
        self.recipients
            .lock()
            .unwrap()
            .insert(recipient.user_id, recipient);
    }
}

#[async_trait]
impl RecipientDirectory for FakeRecipients {
    async fn find_recipient(&self, user_id: DbId) -> Result<Option<Recipient>, CoreError> {
        Ok(self.recipients.lock().unwrap().get(&user_id).cloned())
    }
}

// ---------------------------------------------------------------------------
// RecordingChannel
// ---------------------------------------------------------------------------

pub struct RecordingChannel {
    kind: ChannelKind,
    sent: Mutex<Vec<NotificationEvent>>,
    failing_users: Mutex<HashSet<DbId>>,
    fail_all: AtomicBool,
}

impl RecordingChannel {
    pub fn new(kind: ChannelKind) -> Self {
        Self {
            kind,
            sent: Mutex::new(Vec::new()),
            failing_users: Mutex::new(HashSet::new()),
            fail_all: AtomicBool::new(false),
        }
    }

    pub fn fail_for(&self, user_id: DbId) {
        self.failing_users.lock().unwrap().insert(user_id);
    }

    pub fn fail_all(&self) {
        self.fail_all.store(true, Ordering::SeqCst);
    }

    /// Successfully sent events, in order.
    pub fn sent(&self) -> Vec<NotificationEvent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, user_id: DbId) -> Vec<NotificationEvent> {
        self.sent()
            .into_iter()
            .filter(|e| e.recipient.user_id == user_id)
            .collect()
    }
}

#[async_trait]
impl NotificationChannel for RecordingChannel {
    fn kind(&self) -> ChannelKind {
        self.kind
    }

    async fn send(&self, event: &NotificationEvent) -> Result<(), CoreError> {
        let user_id = event.recipient.user_id;
        if self.fail_all.load(Ordering::SeqCst)
            || self.failing_users.lock().unwrap().contains(&user_id)
        {
            return Err(CoreError::delivery(self.kind, "simulated outage"));
        }
        self.sent.lock().unwrap().push(event.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

/// All fakes wired together, with both channels registered.
pub struct Harness {
    pub releases: Arc<FakeReleaseSource>,
    pub follows: Arc<FakeFollowGraph>,
    pub configs: Arc<FakeConfigStore>,
    pub recipients: Arc<FakeRecipients>,
    pub email: Arc<RecordingChannel>,
    pub telegram: Arc<RecordingChannel>,
}

impl Harness {
    pub fn new(releases: Vec<Release>) -> Self {
        Self {
            releases: Arc::new(FakeReleaseSource::new(releases)),
            follows: Arc::new(FakeFollowGraph::default()),
            configs: Arc::new(FakeConfigStore::default()),
            recipients: Arc::new(FakeRecipients::default()),
            email: Arc::new(RecordingChannel::new(ChannelKind::Email)),
            telegram: Arc::new(RecordingChannel::new(ChannelKind::Telegram)),
        }
    }

    /// Register an email-only user following `artists` with `config`.
    pub fn add_user(&self, config: NotificationConfig, artists: &[&str]) {
        let user_id = config.user_id;
        self.recipients.insert(recipient(user_id, None));
        self.follows.set(user_id, artists);
        self.configs.insert(config);
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            releases: self.releases.clone(),
            follows: self.follows.clone(),
            configs: self.configs.clone(),
            recipients: self.recipients.clone(),
        }
    }

    pub fn dispatcher(&self) -> Arc<ChannelDispatcher> {
        Arc::new(
            ChannelDispatcher::new()
                .with_channel(self.email.clone())
                .with_channel(self.telegram.clone()),
        )
    }

    pub fn scheduler(&self) -> NotificationScheduler {
        NotificationScheduler::new(self.collaborators(), self.dispatcher(), DEFAULT_CONCURRENCY)
    }
}
