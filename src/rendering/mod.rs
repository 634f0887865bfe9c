//! Share card rendering
//!
//! Layout is computed by pure functions over an injected text measurer, turned
//! into a display list of paint commands, then rasterized and PNG-encoded.

pub mod assets;
pub mod layout;
pub mod paint;
pub mod raster;
pub mod text;

use std::path::PathBuf;

use log::{debug, warn};

use crate::prefs::{Language, ProfileBadge, Theme};
use crate::verse::{normalize_text, Verse};
use crate::AppConfig;

use self::assets::{load_card_images, CardImages};
use self::layout::{layout_badge, plan_layout, CardContent, LayoutBounds};
use self::paint::{build_display_list, Palette};
use self::text::CosmicText;

pub const CARD_WIDTH: u32 = 1080;
pub const CARD_HEIGHT: u32 = 1080;

pub const CARD_TITLE: &str = "GitaPath";

/// An encoded share card
#[derive(Debug, Clone)]
pub struct ShareCard {
    pub width: u32,
    pub height: u32,
    pub png_data: Vec<u8>,
    pub file_name: String,
}

/// What to put on a card
#[derive(Debug, Clone, Copy)]
pub struct CardRequest<'a> {
    pub verse: &'a Verse,
    pub language: Language,
    pub theme: Theme,
    pub profile: Option<&'a ProfileBadge>,
    /// Replaces the verse's own reflection when non-blank
    pub reflection_override: Option<&'a str>,
}

impl<'a> CardRequest<'a> {
    pub fn new(verse: &'a Verse, language: Language, theme: Theme) -> Self {
        Self {
            verse,
            language,
            theme,
            profile: None,
            reflection_override: None,
        }
    }

    pub fn with_profile(mut self, profile: &'a ProfileBadge) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn with_reflection(mut self, reflection: &'a str) -> Self {
        self.reflection_override = Some(reflection);
        self
    }

    fn badge(&self) -> Option<&'a ProfileBadge> {
        self.profile.filter(|p| !p.is_empty())
    }

    /// Localized text for every block
    pub fn content(&self) -> CardContent {
        let (meaning_label, reflection_label) = match self.language {
            Language::En => ("Meaning", "Reflection"),
            Language::Hi => ("अर्थ", "चिंतन"),
        };
        let reflection = self
            .reflection_override
            .map(normalize_text)
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| self.verse.reflection_for(self.language));

        CardContent {
            title: CARD_TITLE.to_string(),
            citation: self.verse.citation(self.language),
            sanskrit: normalize_text(&self.verse.sanskrit),
            transliteration: normalize_text(&self.verse.transliteration),
            meaning_label: meaning_label.to_string(),
            meaning: self.verse.meaning(self.language),
            reflection_label: reflection_label.to_string(),
            reflection,
        }
    }
}

/// Renders share cards with fonts and art from the configured directories
pub struct CardRenderer {
    asset_dir: PathBuf,
    text: CosmicText,
}

impl CardRenderer {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            asset_dir: config.asset_dir.clone(),
            text: CosmicText::new(&config.font_dirs),
        }
    }

    /// Load art for the request, then compose and encode the card.
    ///
    /// Returns `None` when the card could not be produced.
    pub async fn render(&mut self, request: &CardRequest<'_>) -> Option<ShareCard> {
        let photo = request.badge().and_then(|p| p.photo_data.as_deref());
        let images = load_card_images(&self.asset_dir, request.theme, photo).await;
        self.compose(request, &images)
    }

    /// Compose the card from already decoded images
    pub fn compose(&mut self, request: &CardRequest<'_>, images: &CardImages) -> Option<ShareCard> {
        let mut bounds = LayoutBounds::card();
        let badge = request
            .badge()
            .map(|p| layout_badge(p.display_name(), &bounds, &mut self.text));
        if let Some(badge) = &badge {
            bounds.reserved_right = badge.reserved_width();
        }

        let plan = plan_layout(&request.content(), &bounds, &mut self.text);
        debug!(
            "Card layout for {} at scale {:.2}, bottom {:.0}",
            request.verse.card_file_name(),
            plan.scale,
            plan.bottom()
        );

        let palette = Palette::for_theme(request.theme);
        let commands = build_display_list(&plan, badge.as_ref(), &palette, images.availability());

        let encoded = raster::rasterize(CARD_WIDTH, CARD_HEIGHT, &commands, images, &mut self.text)
            .and_then(|pixmap| raster::encode_png(&pixmap));
        match encoded {
            Ok(png_data) => Some(ShareCard {
                width: CARD_WIDTH,
                height: CARD_HEIGHT,
                png_data,
                file_name: request.verse.card_file_name(),
            }),
            Err(e) => {
                warn!("Share card not produced: {}", e);
                None
            }
        }
    }
}
