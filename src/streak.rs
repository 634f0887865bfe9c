//! Consecutive-day streak tracking
//!
//! The tracker is driven by one input per call, today's date key. It loads
//! the persisted state, applies the transition and writes the full state
//! back every time, even when nothing changed.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::store::{KeyValueStore, STREAK_KEY};
use crate::verse::day_diff;
use crate::{Error, Result};

/// Persisted streak counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakState {
    #[serde(default = "one")]
    pub current_streak: u32,
    #[serde(default = "one")]
    pub longest_streak: u32,
    #[serde(default)]
    pub last_opened_date: Option<String>,
}

fn one() -> u32 {
    1
}

impl Default for StreakState {
    fn default() -> Self {
        Self {
            current_streak: 1,
            longest_streak: 1,
            last_opened_date: None,
        }
    }
}

impl StreakState {
    /// Apply one open on `today_key`.
    ///
    /// A gap of exactly one day extends the streak, a longer gap resets it, and
    /// a same-day or backwards step leaves the counter alone.
    pub fn advance(&mut self, today_key: &str) {
        self.current_streak = self.current_streak.max(1);

        match self.last_opened_date.as_deref() {
            None => self.current_streak = 1,
            Some(last) => match day_diff(last, today_key) {
                Ok(1) => self.current_streak = self.current_streak.saturating_add(1),
                Ok(diff) if diff > 1 => self.current_streak = 1,
                Ok(0) => {}
                Ok(diff) => {
                    warn!(
                        "Clock moved backwards ({} -> {}, {} days); keeping streak",
                        last, today_key, diff
                    );
                }
                Err(e) => {
                    debug!("Unreadable last-opened date '{}': {}", last, e);
                    self.current_streak = 1;
                }
            },
        }

        self.last_opened_date = Some(today_key.to_string());
        self.longest_streak = self.longest_streak.max(1).max(self.current_streak);
    }
}

/// Celebratory message for an exact streak-day count
pub fn milestone_message(streak_days: u32) -> Option<&'static str> {
    match streak_days {
        7 => Some("Day 7 Milestone: One full week of steady sadhana."),
        21 => Some("Day 21 Milestone: Your practice is becoming a way of life."),
        108 => Some("Day 108 Milestone: Sacred consistency achieved. Keep walking the path."),
        _ => None,
    }
}

/// Reads, advances and persists the streak in a key-value store
pub struct StreakTracker<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> StreakTracker<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Current persisted state without recording an open
    pub fn peek(&self) -> StreakState {
        match self.read() {
            Ok(state) => state,
            Err(e) => {
                debug!("Streak state reset to default: {}", e);
                StreakState::default()
            }
        }
    }

    /// Record an open on `today_key` and persist the result
    pub fn update(&self, today_key: &str) -> Result<StreakState> {
        let mut state = self.peek();
        state.advance(today_key);
        let json = serde_json::to_string(&state)
            .map_err(|e| Error::StorageError(format!("Failed to serialize streak: {}", e)))?;
        self.store.set(STREAK_KEY, &json)?;
        Ok(state)
    }

    fn read(&self) -> Result<StreakState> {
        let raw = match self.store.get(STREAK_KEY)? {
            Some(raw) => raw,
            None => return Ok(StreakState::default()),
        };
        serde_json::from_str(&raw).map_err(|e| Error::StorageReadError {
            key: STREAK_KEY.to_string(),
            reason: e.to_string(),
        })
    }
}
