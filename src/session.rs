//! One reading session: resolve today's verse, record the visit and offer a
//! share card.
//!
//! Only a dataset failure aborts a session. Streak persistence problems are
//! logged and the computed streak is still returned.

use chrono::NaiveDate;
use log::{info, warn};

use crate::dataset::DatasetLoader;
use crate::prefs::{Preferences, ProfileBadge};
use crate::rendering::{CardRenderer, CardRequest, ShareCard};
use crate::store::KeyValueStore;
use crate::streak::{milestone_message, StreakState, StreakTracker};
use crate::verse::{date_key, select_verse, Verse};
use crate::{AppConfig, Result};

pub const CARD_SAVED: &str = "Card saved.";
pub const CARD_FAILED: &str = "Could not prepare share card right now.";

/// Everything shown for one day
#[derive(Debug, Clone, PartialEq)]
pub struct DailyView {
    pub date_key: String,
    pub verse: Verse,
    pub streak: StreakState,
    pub milestone: Option<&'static str>,
    pub preferences: Preferences,
}

impl DailyView {
    /// Share caption in the preferred language
    pub fn caption(&self) -> String {
        self.verse.share_caption(self.preferences.language)
    }
}

/// Result of a share card request with the status line to show
#[derive(Debug, Clone)]
pub struct CardOutcome {
    pub card: Option<ShareCard>,
}

impl CardOutcome {
    pub fn status(&self) -> &'static str {
        if self.card.is_some() {
            CARD_SAVED
        } else {
            CARD_FAILED
        }
    }
}

pub struct DailySession<S: KeyValueStore> {
    config: AppConfig,
    store: S,
}

impl<S: KeyValueStore> DailySession<S> {
    pub fn new(config: AppConfig, store: S) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load the dataset, pick the verse for `date` and record the visit
    pub async fn open(&self, date: NaiveDate) -> Result<DailyView> {
        let dataset = DatasetLoader::new(&self.config).load(&self.store).await?;
        let verse = select_verse(&dataset, date).clone();
        let key = date_key(date);

        let tracker = StreakTracker::new(&self.store);
        let streak = match tracker.update(&key) {
            Ok(state) => state,
            Err(e) => {
                warn!("Streak not saved: {}", e);
                let mut state = tracker.peek();
                state.advance(&key);
                state
            }
        };
        let milestone = milestone_message(streak.current_streak);
        if let Some(message) = milestone {
            info!("{}", message);
        }

        Ok(DailyView {
            date_key: key,
            verse,
            streak,
            milestone,
            preferences: Preferences::load(&self.store),
        })
    }

    /// Render a card for `verse` with the stored profile badge
    pub async fn build_card(
        &self,
        renderer: &mut CardRenderer,
        verse: &Verse,
        preferences: Preferences,
        reflection_override: Option<&str>,
    ) -> CardOutcome {
        let profile = ProfileBadge::load(&self.store);
        let mut request = CardRequest::new(verse, preferences.language, preferences.theme).with_profile(&profile);
        request.reflection_override = reflection_override;
        CardOutcome {
            card: renderer.render(&request).await,
        }
    }
}
