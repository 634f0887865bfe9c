//! GitaPath daily verse core
//!
//! Picks one Bhagavad Gita verse per calendar day, tracks the reader's daily
//! streak and renders a 1080x1080 PNG share card for the verse.
//!
//! # Features
//!
//! - **Deterministic selection**: the same date always yields the same verse
//! - **Streaks**: consecutive-day tracking with milestone messages
//! - **Share cards**: bilingual text fitted to the card, themed art and an
//!   optional profile badge
//! - **remote** (default): load the verse dataset over HTTP(S)
//!
//! # Example
//!
//! ```no_run
//! use gitapath::{AppConfig, DailySession, MemoryStore};
//!
//! # async fn run() -> gitapath::Result<()> {
//! let store = MemoryStore::new();
//! let session = DailySession::new(AppConfig::default(), &store);
//! let view = session.open(gitapath::verse::today()).await?;
//! println!("{} ({} day streak)", view.verse.citation(view.preferences.language), view.streak.current_streak);
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

pub mod error;
pub use error::{Error, Result};

pub mod dataset;
pub mod prefs;
pub mod rendering;
pub mod session;
pub mod store;
pub mod streak;
pub mod verse;

pub use dataset::{DatasetLoader, VerseDataset, VerseSource};
pub use prefs::{Language, Preferences, ProfileBadge, Theme};
pub use rendering::{CardRenderer, CardRequest, ShareCard};
pub use session::{DailySession, DailyView};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use streak::{milestone_message, StreakState, StreakTracker};
pub use verse::{date_key, day_index, select_verse, Verse};

/// Runtime configuration
///
/// The defaults expect the dataset and art next to the working directory and
/// keep persisted state in the platform data directory:
/// - `dataset` is `data/verses.json`
/// - `asset_dir` is `assets`, fonts are read from `assets/fonts`
/// - `store_path` is `<data dir>/gitapath/store.json`
///
/// # Examples
///
/// ```
/// let cfg = gitapath::AppConfig::default();
/// assert_eq!(cfg.timeout_ms, 30000);
/// ```
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Verse dataset location
    pub dataset: VerseSource,
    /// Directory holding the card backgrounds and texture
    pub asset_dir: PathBuf,
    /// Extra font directories searched before system fonts
    pub font_dirs: Vec<PathBuf>,
    /// JSON file backing persisted state
    pub store_path: PathBuf,
    /// Timeout for remote dataset requests in milliseconds
    pub timeout_ms: u64,
    /// User agent for remote dataset requests
    pub user_agent: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let asset_dir = PathBuf::from("assets");
        Self {
            dataset: VerseSource::default(),
            font_dirs: vec![asset_dir.join("fonts")],
            asset_dir,
            store_path: default_store_path(),
            timeout_ms: 30000,
            user_agent: format!("GitaPath/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("gitapath")
        .join("store.json")
}
