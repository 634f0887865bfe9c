//! Paint command list for the share card
//!
//! Every command carries its complete style, so nothing set while drawing one
//! block can leak into the next.

use crate::prefs::Theme;
use crate::rendering::layout::{
    panel_rect, BadgeLayout, BlockKind, LayoutPlan, Rect, Tone, FOOTER_FONT, FOOTER_TOP,
};
use crate::rendering::text::FontSpec;
use crate::rendering::{CARD_HEIGHT, CARD_WIDTH};

pub const TAGLINE: &str = "Daily verse. Daily reflection. Daily alignment.";

const TEXTURE_OPACITY: f32 = 0.2;
const PANEL_RADIUS: f32 = 40.0;
const BADGE_RADIUS: f32 = 44.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }
}

/// Colors for one theme
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub primary: Rgba,
    pub secondary: Rgba,
    pub body: Rgba,
    pub accent: Rgba,
    pub panel_fill: Rgba,
    pub border: Rgba,
    pub halo: Rgba,
    /// Vertical fallback gradient, used when the theme background is missing
    pub gradient: Vec<(f32, Rgba)>,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                primary: Rgba::opaque(244, 226, 186),
                secondary: Rgba::new(255, 255, 255, 235),
                body: Rgba::new(255, 255, 255, 242),
                accent: Rgba::new(214, 178, 94, 242),
                panel_fill: Rgba::new(7, 11, 26, 140),
                border: Rgba::new(214, 178, 94, 128),
                halo: Rgba::new(214, 178, 94, 51),
                gradient: vec![
                    (0.0, Rgba::opaque(7, 11, 26)),
                    (0.5, Rgba::opaque(18, 31, 78)),
                    (1.0, Rgba::opaque(9, 15, 38)),
                ],
            },
            Theme::Light => Self {
                primary: Rgba::opaque(31, 45, 68),
                secondary: Rgba::new(24, 32, 48, 230),
                body: Rgba::new(22, 30, 44, 242),
                accent: Rgba::new(146, 104, 28, 242),
                panel_fill: Rgba::new(255, 250, 240, 178),
                border: Rgba::new(146, 104, 28, 115),
                halo: Rgba::new(214, 178, 94, 51),
                gradient: vec![
                    (0.0, Rgba::opaque(251, 244, 228)),
                    (0.5, Rgba::opaque(243, 227, 195)),
                    (1.0, Rgba::opaque(233, 212, 168)),
                ],
            },
        }
    }

    pub fn tone(&self, tone: Tone) -> Rgba {
        match tone {
            Tone::Primary => self.primary,
            Tone::Secondary => self.secondary,
            Tone::Body => self.body,
            Tone::Accent => self.accent,
            Tone::Rule => self.border,
        }
    }

    fn panel_fill_opaque(&self) -> Rgba {
        Rgba { a: 255, ..self.panel_fill }
    }
}

/// Decoded images a command may refer to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSlot {
    Background,
    Texture,
    Avatar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clip {
    None,
    Circle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub rgba: Rgba,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    VerticalGradient {
        rect: Rect,
        stops: Vec<(f32, Rgba)>,
    },
    /// Image scaled to cover `rect`, centered, cropped by `clip`
    Image {
        slot: ImageSlot,
        rect: Rect,
        opacity: f32,
        clip: Clip,
    },
    Circle {
        cx: f32,
        cy: f32,
        radius: f32,
        rgba: Rgba,
    },
    RoundedRect {
        rect: Rect,
        radius: f32,
        fill: Option<Rgba>,
        stroke: Option<StrokeStyle>,
    },
    SolidRect {
        rect: Rect,
        rgba: Rgba,
    },
    /// One line of text, top-left anchored
    Text {
        x: f32,
        y: f32,
        text: String,
        font: FontSpec,
        rgba: Rgba,
    },
}

/// Which images decoded successfully
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArtAvailability {
    pub background: bool,
    pub texture: bool,
    pub avatar: bool,
}

/// Turn a layout plan into drawing order: backdrop, panel, text blocks,
/// badge, footer.
pub fn build_display_list(
    plan: &LayoutPlan,
    badge: Option<&BadgeLayout>,
    palette: &Palette,
    art: ArtAvailability,
) -> Vec<PaintCommand> {
    let canvas = Rect::new(0.0, 0.0, CARD_WIDTH as f32, CARD_HEIGHT as f32);
    let mut cmds = Vec::new();

    if art.background {
        cmds.push(PaintCommand::Image {
            slot: ImageSlot::Background,
            rect: canvas,
            opacity: 1.0,
            clip: Clip::None,
        });
    } else {
        cmds.push(PaintCommand::VerticalGradient {
            rect: canvas,
            stops: palette.gradient.clone(),
        });
    }
    if art.texture {
        cmds.push(PaintCommand::Image {
            slot: ImageSlot::Texture,
            rect: canvas,
            opacity: TEXTURE_OPACITY,
            clip: Clip::None,
        });
    }

    cmds.push(PaintCommand::Circle {
        cx: canvas.width * 0.8,
        cy: canvas.height * 0.2,
        radius: 140.0,
        rgba: palette.halo,
    });
    cmds.push(PaintCommand::RoundedRect {
        rect: panel_rect(),
        radius: PANEL_RADIUS,
        fill: Some(palette.panel_fill),
        stroke: Some(StrokeStyle {
            rgba: palette.border,
            width: 3.0,
        }),
    });

    for block in &plan.blocks {
        let rgba = palette.tone(block.tone);
        if block.kind == BlockKind::Divider {
            cmds.push(PaintCommand::SolidRect {
                rect: Rect::new(block.x, block.y, block.width, block.height),
                rgba,
            });
            continue;
        }
        for (i, line) in block.lines.iter().enumerate() {
            cmds.push(PaintCommand::Text {
                x: block.x,
                y: block.y + i as f32 * block.font.line_height,
                text: line.clone(),
                font: block.font,
                rgba,
            });
        }
    }

    if let Some(badge) = badge {
        push_badge(&mut cmds, badge, palette, art.avatar);
    }

    cmds.push(PaintCommand::Text {
        x: panel_rect().x + 48.0,
        y: FOOTER_TOP,
        text: TAGLINE.to_string(),
        font: FOOTER_FONT,
        rgba: palette.accent,
    });

    cmds
}

fn push_badge(cmds: &mut Vec<PaintCommand>, badge: &BadgeLayout, palette: &Palette, has_photo: bool) {
    cmds.push(PaintCommand::RoundedRect {
        rect: badge.rect,
        radius: BADGE_RADIUS,
        fill: Some(palette.panel_fill),
        stroke: Some(StrokeStyle {
            rgba: palette.border,
            width: 2.0,
        }),
    });

    let (cx, cy) = badge.avatar_center;
    if has_photo {
        cmds.push(PaintCommand::Image {
            slot: ImageSlot::Avatar,
            rect: badge.avatar_rect(),
            opacity: 1.0,
            clip: Clip::Circle,
        });
    } else {
        cmds.push(PaintCommand::Circle {
            cx,
            cy,
            radius: badge.avatar_radius,
            rgba: palette.accent,
        });
        let font = FontSpec::new(30.0, 36.0).weight(700);
        cmds.push(PaintCommand::Text {
            x: cx - font.size * 0.32,
            y: cy - font.line_height / 2.0,
            text: badge.initial.clone(),
            font,
            rgba: palette.panel_fill_opaque(),
        });
    }

    cmds.push(PaintCommand::Text {
        x: badge.name_x,
        y: badge.name_y,
        text: badge.name.clone(),
        font: badge.name_font,
        rgba: palette.primary,
    });
}
