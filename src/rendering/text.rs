//! Text measurement and glyph drawing

use std::path::PathBuf;

use cosmic_text::{Attrs, Buffer, Color, Family, FontSystem, Metrics, Shaping, Style, SwashCache, Weight};
use log::debug;
use tiny_skia::{Paint, Pixmap, Transform};

use crate::rendering::paint::Rgba;

/// Font size, line height and face selection for one block of text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    pub size: f32,
    pub line_height: f32,
    pub weight: u16,
    pub italic: bool,
}

impl FontSpec {
    pub const fn new(size: f32, line_height: f32) -> Self {
        Self {
            size,
            line_height,
            weight: 400,
            italic: false,
        }
    }

    pub const fn weight(mut self, weight: u16) -> Self {
        self.weight = weight;
        self
    }

    pub const fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Same face with size and line height multiplied by `scale`
    pub fn scaled(self, scale: f32) -> Self {
        Self {
            size: self.size * scale,
            line_height: self.line_height * scale,
            ..self
        }
    }
}

/// Measures the rendered pixel width of a single line of text
pub trait TextMeasure {
    fn measure(&mut self, text: &str, font: &FontSpec) -> f32;
}

impl<F> TextMeasure for F
where
    F: FnMut(&str, &FontSpec) -> f32,
{
    fn measure(&mut self, text: &str, font: &FontSpec) -> f32 {
        self(text, font)
    }
}

/// Every character advances by `em` times the font size.
///
/// Deterministic and font-free, useful for layout tests and benches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedAdvance {
    pub em: f32,
}

impl Default for FixedAdvance {
    fn default() -> Self {
        Self { em: 0.5 }
    }
}

impl TextMeasure for FixedAdvance {
    fn measure(&mut self, text: &str, font: &FontSpec) -> f32 {
        text.chars().count() as f32 * font.size * self.em
    }
}

/// Shapes and draws text with cosmic-text, including Devanagari
pub struct CosmicText {
    font_system: FontSystem,
    swash_cache: SwashCache,
}

impl CosmicText {
    /// System fonts plus every font file found in `font_dirs`
    pub fn new(font_dirs: &[PathBuf]) -> Self {
        let mut font_system = FontSystem::new();
        for dir in font_dirs {
            if dir.is_dir() {
                font_system.db_mut().load_fonts_dir(dir);
            } else {
                debug!("Font directory {} not found", dir.display());
            }
        }
        debug!("Font database holds {} faces", font_system.db().len());
        Self {
            font_system,
            swash_cache: SwashCache::new(),
        }
    }

    fn shaped(&mut self, text: &str, font: &FontSpec) -> Buffer {
        let metrics = Metrics::new(font.size.max(1.0), font.line_height.max(1.0));
        let mut buffer = Buffer::new(&mut self.font_system, metrics);
        buffer.set_size(&mut self.font_system, None, None);
        let style = if font.italic { Style::Italic } else { Style::Normal };
        let attrs = Attrs::new()
            .family(Family::Serif)
            .weight(Weight(font.weight))
            .style(style);
        buffer.set_text(&mut self.font_system, text, attrs, Shaping::Advanced);
        buffer.shape_until_scroll(&mut self.font_system, false);
        buffer
    }

    /// Draw one line with its top-left corner at (`x`, `y`)
    pub fn draw(&mut self, pixmap: &mut Pixmap, text: &str, x: f32, y: f32, font: &FontSpec, rgba: Rgba) {
        let buffer = self.shaped(text, font);
        let color = Color::rgba(rgba.r, rgba.g, rgba.b, rgba.a);
        buffer.draw(&mut self.font_system, &mut self.swash_cache, color, |gx, gy, w, h, c| {
            if c.a() == 0 {
                return;
            }
            let rect = tiny_skia::Rect::from_xywh(x + gx as f32, y + gy as f32, w as f32, h as f32);
            if let Some(rect) = rect {
                let mut paint = Paint::default();
                paint.set_color_rgba8(c.r(), c.g(), c.b(), c.a());
                pixmap.fill_rect(rect, &paint, Transform::identity(), None);
            }
        });
    }
}

impl TextMeasure for CosmicText {
    fn measure(&mut self, text: &str, font: &FontSpec) -> f32 {
        if text.is_empty() {
            return 0.0;
        }
        let buffer = self.shaped(text, font);
        buffer
            .layout_runs()
            .fold(0.0f32, |width, run| width.max(run.line_w))
    }
}
