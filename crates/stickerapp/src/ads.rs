//! # Ad Sessions
//!
//! Ads are driven through an explicit state machine instead of nested SDK
//! callbacks:
//!
//! ```text
//!            load()            Loaded event           show()
//!   Idle ──────────► Loading ─────────────► Loaded ─────────► Showing
//!     ▲                 │                                       │
//!     │                 │ Error / timeout              Closed   │  Error / timeout
//!     │                 ▼                               event   ▼
//!     └──── load() ── Failed ◄──────────────────────── Closed ◄─┘
//! ```
//!
//! The SDK sits behind [`AdProvider`]: it starts work and reports
//! [`AdEvent`]s on a channel. [`AdSession::show_and_wait`] is the only call
//! screens need. It loads if necessary, shows, waits for the ad to close and
//! says whether a reward was earned.
//!
//! Ad failures never fail the caller's flow: a missing or broken ad is an
//! outcome with `shown == false`.

use crate::error::{Result, StickerError};
use serde::Serialize;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AdKind {
    Interstitial,
    Rewarded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdEvent {
    Loaded,
    EarnedReward,
    Closed,
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdState {
    Idle,
    Loading,
    Loaded,
    Showing,
    Closed,
    Failed(String),
}

/// Result of showing one ad.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AdOutcome {
    pub shown: bool,
    pub reward_granted: bool,
}

/// The ad SDK seam.
pub trait AdProvider {
    /// Start loading an ad. Progress is reported on `events`.
    fn load(&self, kind: AdKind, events: Sender<AdEvent>) -> Result<()>;

    /// Start showing a loaded ad. Progress is reported on `events`.
    fn show(&self, kind: AdKind, events: Sender<AdEvent>) -> Result<()>;
}

/// Provider for builds without an ad SDK. Nothing ever loads.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAds;

impl AdProvider for NoAds {
    fn load(&self, _kind: AdKind, _events: Sender<AdEvent>) -> Result<()> {
        Err(StickerError::Ad("ads are not available".to_string()))
    }

    fn show(&self, _kind: AdKind, _events: Sender<AdEvent>) -> Result<()> {
        Err(StickerError::Ad("ads are not available".to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdTimeouts {
    pub load: Duration,
    pub show: Duration,
}

impl Default for AdTimeouts {
    fn default() -> Self {
        Self {
            load: Duration::from_secs(5),
            show: Duration::from_secs(300),
        }
    }
}

pub struct AdSession<P: AdProvider> {
    provider: P,
    kind: AdKind,
    state: AdState,
    timeouts: AdTimeouts,
}

enum Waited {
    Event(AdEvent),
    TimedOut,
    Disconnected,
}

fn wait_for(events: &Receiver<AdEvent>, deadline: Instant) -> Waited {
    let left = deadline.saturating_duration_since(Instant::now());
    match events.recv_timeout(left) {
        Ok(event) => Waited::Event(event),
        Err(RecvTimeoutError::Timeout) => Waited::TimedOut,
        Err(RecvTimeoutError::Disconnected) => Waited::Disconnected,
    }
}

impl<P: AdProvider> AdSession<P> {
    pub fn new(provider: P, kind: AdKind) -> Self {
        Self {
            provider,
            kind,
            state: AdState::Idle,
            timeouts: AdTimeouts::default(),
        }
    }

    pub fn with_timeouts(mut self, timeouts: AdTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn kind(&self) -> AdKind {
        self.kind
    }

    pub fn state(&self) -> &AdState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == AdState::Loaded
    }

    fn fail(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        warn!(kind = ?self.kind, %reason, "ad failed");
        self.state = AdState::Failed(reason);
    }

    /// Load an ad, waiting up to the load timeout. Returns whether one is ready.
    pub fn load(&mut self) -> bool {
        match self.state {
            AdState::Loaded => return true,
            AdState::Loading | AdState::Showing => return false,
            _ => {}
        }

        self.state = AdState::Loading;
        let (tx, rx) = mpsc::channel();
        if let Err(e) = self.provider.load(self.kind, tx) {
            self.fail(e.to_string());
            return false;
        }

        let deadline = Instant::now() + self.timeouts.load;
        loop {
            match wait_for(&rx, deadline) {
                Waited::Event(AdEvent::Loaded) => {
                    debug!(kind = ?self.kind, "ad loaded");
                    self.state = AdState::Loaded;
                    return true;
                }
                Waited::Event(AdEvent::Error(msg)) => {
                    self.fail(msg);
                    return false;
                }
                Waited::Event(other) => {
                    debug!(kind = ?self.kind, event = ?other, "ignoring event while loading");
                }
                Waited::TimedOut => {
                    self.fail("timed out waiting for ad to load");
                    return false;
                }
                Waited::Disconnected => {
                    self.fail("ad provider went away while loading");
                    return false;
                }
            }
        }
    }

    /// Show an ad (loading one first if needed) and wait until it closes.
    ///
    /// A reward counts only for rewarded ads, and only if the provider
    /// reported it before the ad closed.
    pub fn show_and_wait(&mut self) -> AdOutcome {
        if !self.is_ready() && !self.load() {
            return AdOutcome::default();
        }

        self.state = AdState::Showing;
        let (tx, rx) = mpsc::channel();
        if let Err(e) = self.provider.show(self.kind, tx) {
            self.fail(e.to_string());
            return AdOutcome::default();
        }

        let deadline = Instant::now() + self.timeouts.show;
        let mut earned = false;
        loop {
            match wait_for(&rx, deadline) {
                Waited::Event(AdEvent::EarnedReward) => earned = true,
                Waited::Event(AdEvent::Closed) => {
                    self.state = AdState::Closed;
                    let outcome = AdOutcome {
                        shown: true,
                        reward_granted: earned && self.kind == AdKind::Rewarded,
                    };
                    debug!(kind = ?self.kind, ?outcome, "ad closed");
                    return outcome;
                }
                Waited::Event(AdEvent::Error(msg)) => {
                    self.fail(msg);
                    return AdOutcome::default();
                }
                Waited::Event(AdEvent::Loaded) => {}
                Waited::TimedOut => {
                    self.fail("timed out waiting for ad to close");
                    return AdOutcome::default();
                }
                Waited::Disconnected => {
                    self.fail("ad provider went away while showing");
                    return AdOutcome::default();
                }
            }
        }
    }
}
