//! Share-card layout: word wrapping, ellipsis fitting and scale search
//!
//! Everything here is pure with respect to the drawing surface. Text widths
//! come from an injected `TextMeasure`, so plans can be computed and checked
//! without fonts or pixels.

use crate::rendering::text::{FontSpec, TextMeasure};
use crate::rendering::{CARD_HEIGHT, CARD_WIDTH};

pub const ELLIPSIS: &str = "...";

/// Scale decrement per fitting step
pub const SCALE_STEP: f32 = 0.05;
/// Smallest scale the fitting loop will try
pub const MIN_SCALE: f32 = 0.5;

const BADGE_TOP: f32 = 80.0;
const BADGE_HEIGHT: f32 = 88.0;
const BADGE_PADDING: f32 = 12.0;
const AVATAR_SIZE: f32 = 64.0;
const AVATAR_GAP: f32 = 14.0;
/// Pixel budget for the profile name on the badge
pub const BADGE_NAME_BUDGET: f32 = 220.0;
const BADGE_SPACING: f32 = 24.0;
const BADGE_NAME_FONT: FontSpec = FontSpec::new(26.0, 34.0).weight(600);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Where text may go on the card
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutBounds {
    pub left: f32,
    pub top: f32,
    pub max_width: f32,
    /// Lowest y the content may reach
    pub bottom: f32,
    /// Width kept free at the right of the header rows (profile badge)
    pub reserved_right: f32,
}

impl LayoutBounds {
    /// Bounds for the standard 1080x1080 card
    pub fn card() -> Self {
        Self {
            left: 96.0,
            top: 96.0,
            max_width: CARD_WIDTH as f32 - 192.0,
            bottom: 944.0,
            reserved_right: 0.0,
        }
    }

    fn width_for(&self, kind: BlockKind) -> f32 {
        if kind.is_header() {
            (self.max_width - self.reserved_right).max(1.0)
        } else {
            self.max_width
        }
    }
}

/// Translucent backdrop behind the text
pub fn panel_rect() -> Rect {
    Rect::new(48.0, 48.0, CARD_WIDTH as f32 - 96.0, CARD_HEIGHT as f32 - 96.0)
}

/// Tagline position, below the content bound
pub const FOOTER_TOP: f32 = 972.0;
pub const FOOTER_FONT: FontSpec = FontSpec::new(24.0, 32.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Title,
    Citation,
    Sanskrit,
    Transliteration,
    Divider,
    MeaningLabel,
    Meaning,
    ReflectionLabel,
    Reflection,
}

impl BlockKind {
    fn is_header(self) -> bool {
        matches!(self, BlockKind::Title | BlockKind::Citation)
    }
}

/// Palette role of a block, resolved to a color when painting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Primary,
    Secondary,
    Body,
    Accent,
    Rule,
}

struct BlockStyle {
    font: FontSpec,
    tone: Tone,
    max_lines: Option<usize>,
    gap_after: f32,
}

fn style_for(kind: BlockKind) -> BlockStyle {
    let (font, tone, max_lines, gap_after) = match kind {
        BlockKind::Title => (FontSpec::new(42.0, 52.0).weight(600), Tone::Primary, Some(1), 6.0),
        BlockKind::Citation => (FontSpec::new(28.0, 36.0).weight(500), Tone::Secondary, Some(1), 30.0),
        BlockKind::Sanskrit => (FontSpec::new(36.0, 54.0).weight(500), Tone::Primary, Some(8), 18.0),
        BlockKind::Transliteration => (FontSpec::new(26.0, 36.0).italic(), Tone::Secondary, Some(4), 24.0),
        BlockKind::Divider => (FontSpec::new(2.0, 2.0), Tone::Rule, None, 24.0),
        BlockKind::MeaningLabel => (FontSpec::new(22.0, 30.0).weight(600), Tone::Accent, Some(1), 6.0),
        BlockKind::Meaning => (FontSpec::new(30.0, 42.0), Tone::Body, Some(7), 24.0),
        BlockKind::ReflectionLabel => (FontSpec::new(22.0, 30.0).weight(600), Tone::Accent, Some(1), 6.0),
        BlockKind::Reflection => (FontSpec::new(26.0, 38.0), Tone::Body, Some(6), 0.0),
    };
    BlockStyle { font, tone, max_lines, gap_after }
}

/// Text going onto the card, already localized
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardContent {
    pub title: String,
    pub citation: String,
    pub sanskrit: String,
    pub transliteration: String,
    pub meaning_label: String,
    pub meaning: String,
    pub reflection_label: String,
    pub reflection: String,
}

impl CardContent {
    /// Blocks in drawing order. Labels and the divider only appear when the
    /// text they introduce is present.
    fn segments(&self) -> Vec<(BlockKind, &str)> {
        let has_meaning = !self.meaning.trim().is_empty();
        let has_reflection = !self.reflection.trim().is_empty();
        let mut out = vec![
            (BlockKind::Title, self.title.as_str()),
            (BlockKind::Citation, self.citation.as_str()),
            (BlockKind::Sanskrit, self.sanskrit.as_str()),
            (BlockKind::Transliteration, self.transliteration.as_str()),
        ];
        if has_meaning || has_reflection {
            out.push((BlockKind::Divider, ""));
        }
        if has_meaning {
            out.push((BlockKind::MeaningLabel, self.meaning_label.as_str()));
            out.push((BlockKind::Meaning, self.meaning.as_str()));
        }
        if has_reflection {
            out.push((BlockKind::ReflectionLabel, self.reflection_label.as_str()));
            out.push((BlockKind::Reflection, self.reflection.as_str()));
        }
        out
    }
}

/// One block positioned on the card
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedBlock {
    pub kind: BlockKind,
    pub tone: Tone,
    pub font: FontSpec,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub lines: Vec<String>,
}

impl PlacedBlock {
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Result of laying out the card at one scale
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPlan {
    pub scale: f32,
    pub top: f32,
    pub blocks: Vec<PlacedBlock>,
}

impl LayoutPlan {
    /// Lowest y reached by any block
    pub fn bottom(&self) -> f32 {
        self.blocks
            .iter()
            .map(PlacedBlock::bottom)
            .fold(self.top, f32::max)
    }

    /// Vertical extent from the top bound to the last block
    pub fn height(&self) -> f32 {
        self.bottom() - self.top
    }

    pub fn fits(&self, bounds: &LayoutBounds) -> bool {
        self.bottom() <= bounds.bottom
    }

    pub fn block(&self, kind: BlockKind) -> Option<&PlacedBlock> {
        self.blocks.iter().find(|b| b.kind == kind)
    }
}

/// Lay the content out at a single `scale`
pub fn fit_layout(
    content: &CardContent,
    bounds: &LayoutBounds,
    scale: f32,
    measure: &mut dyn TextMeasure,
) -> LayoutPlan {
    let mut y = bounds.top;
    let mut blocks = Vec::new();

    for (kind, text) in content.segments() {
        let style = style_for(kind);
        let font = style.font.scaled(scale);
        let width = bounds.width_for(kind);

        let (lines, height) = if kind == BlockKind::Divider {
            (Vec::new(), font.line_height.max(1.0))
        } else {
            let lines = wrap_text(text, width, style.max_lines, &font, measure);
            if lines.is_empty() {
                continue;
            }
            let height = lines.len() as f32 * font.line_height;
            (lines, height)
        };

        blocks.push(PlacedBlock {
            kind,
            tone: style.tone,
            font,
            x: bounds.left,
            y,
            width,
            height,
            lines,
        });
        y += height + style.gap_after * scale;
    }

    LayoutPlan {
        scale,
        top: bounds.top,
        blocks,
    }
}

/// Largest scale in `SCALE_STEP` decrements (down to `MIN_SCALE`) whose
/// layout fits the bounds.
///
/// Line caps keep the floor layout inside the standard card; for other bounds
/// the floor plan is trimmed from the bottom until it fits.
pub fn plan_layout(
    content: &CardContent,
    bounds: &LayoutBounds,
    measure: &mut dyn TextMeasure,
) -> LayoutPlan {
    let steps = ((1.0 - MIN_SCALE) / SCALE_STEP).round() as u32;
    let mut plan = fit_layout(content, bounds, 1.0, measure);
    for step in 1..=steps {
        if plan.fits(bounds) {
            return plan;
        }
        let scale = 1.0 - step as f32 * SCALE_STEP;
        plan = fit_layout(content, bounds, scale, measure);
    }
    if !plan.fits(bounds) {
        trim_to_bounds(&mut plan, bounds, measure);
    }
    plan
}

fn trim_to_bounds(plan: &mut LayoutPlan, bounds: &LayoutBounds, measure: &mut dyn TextMeasure) {
    while !plan.fits(bounds) {
        let Some(last) = plan.blocks.last_mut() else {
            return;
        };
        if last.lines.len() > 1 {
            last.lines.pop();
            last.height = last.lines.len() as f32 * last.font.line_height;
            if let Some(tail) = last.lines.last_mut() {
                *tail = truncate_with_ellipsis(tail, last.width, &last.font, measure);
            }
        } else {
            plan.blocks.pop();
        }
    }
}

/// Greedy word wrap.
///
/// Words are packed while the measured line stays within `max_width`. When
/// `max_lines` is exceeded, the last permitted line is cut with an ellipsis.
/// A single word wider than `max_width` is cut with an ellipsis and gets a
/// line of its own.
pub fn wrap_text(
    text: &str,
    max_width: f32,
    max_lines: Option<usize>,
    font: &FontSpec,
    measure: &mut dyn TextMeasure,
) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let cap = max_lines.unwrap_or(usize::MAX).max(1);
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in words {
        let word = fit_with_ellipsis(word, max_width, font, measure);
        let candidate = if line.is_empty() {
            word.clone()
        } else {
            format!("{} {}", line, word)
        };
        if !line.is_empty() && measure.measure(&candidate, font) > max_width {
            if lines.len() + 1 == cap {
                lines.push(truncate_with_ellipsis(&line, max_width, font, measure));
                return lines;
            }
            lines.push(std::mem::replace(&mut line, word));
        } else {
            line = candidate;
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// `text` unchanged when it fits, otherwise cut with an ellipsis.
///
/// Applying this to its own output returns the same string.
pub fn fit_with_ellipsis(
    text: &str,
    max_width: f32,
    font: &FontSpec,
    measure: &mut dyn TextMeasure,
) -> String {
    if measure.measure(text, font) <= max_width {
        return text.to_string();
    }
    truncate_with_ellipsis(text, max_width, font, measure)
}

/// Drop characters from the end until `"<text>..."` fits `max_width`.
///
/// Stops at the bare ellipsis when nothing fits.
pub fn truncate_with_ellipsis(
    text: &str,
    max_width: f32,
    font: &FontSpec,
    measure: &mut dyn TextMeasure,
) -> String {
    let mut chars: Vec<char> = text.trim_end().chars().collect();
    loop {
        let head: String = chars.iter().collect();
        let candidate = format!("{}{}", head.trim_end(), ELLIPSIS);
        if chars.is_empty() || measure.measure(&candidate, font) <= max_width {
            return candidate;
        }
        chars.pop();
    }
}

/// Profile badge geometry in the top-right corner
#[derive(Debug, Clone, PartialEq)]
pub struct BadgeLayout {
    pub rect: Rect,
    pub avatar_center: (f32, f32),
    pub avatar_radius: f32,
    pub name: String,
    pub name_x: f32,
    pub name_y: f32,
    pub name_font: FontSpec,
    /// First letter of the name, shown when there is no photo
    pub initial: String,
}

impl BadgeLayout {
    /// Square that the avatar image covers before circular clipping
    pub fn avatar_rect(&self) -> Rect {
        let (cx, cy) = self.avatar_center;
        let r = self.avatar_radius;
        Rect::new(cx - r, cy - r, r * 2.0, r * 2.0)
    }

    /// Space the header rows must leave free
    pub fn reserved_width(&self) -> f32 {
        self.rect.width + BADGE_SPACING
    }
}

/// Size the badge around a name cut to `BADGE_NAME_BUDGET` pixels
pub fn layout_badge(name: &str, bounds: &LayoutBounds, measure: &mut dyn TextMeasure) -> BadgeLayout {
    let font = BADGE_NAME_FONT;
    let name = fit_with_ellipsis(name.trim(), BADGE_NAME_BUDGET, &font, measure);
    let name_width = measure.measure(&name, &font).min(BADGE_NAME_BUDGET);

    let width = BADGE_PADDING + AVATAR_SIZE + AVATAR_GAP + name_width + BADGE_PADDING * 2.0;
    let right = bounds.left + bounds.max_width;
    let rect = Rect::new(right - width, BADGE_TOP, width, BADGE_HEIGHT);

    let radius = AVATAR_SIZE / 2.0;
    let avatar_center = (rect.x + BADGE_PADDING + radius, rect.y + BADGE_HEIGHT / 2.0);
    let initial = name
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default();

    BadgeLayout {
        rect,
        avatar_center,
        avatar_radius: radius,
        name_x: rect.x + BADGE_PADDING + AVATAR_SIZE + AVATAR_GAP,
        name_y: rect.y + (BADGE_HEIGHT - font.line_height) / 2.0,
        name,
        name_font: font,
        initial,
    }
}
