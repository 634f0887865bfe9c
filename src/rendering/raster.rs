//! Rasterizer: executes paint commands on a tiny-skia pixmap

use tiny_skia::{
    Color, FillRule, FilterQuality, GradientStop, LinearGradient, Mask, Paint, Path, PathBuilder,
    Pixmap, PixmapPaint, Point, SpreadMode, Stroke, Transform,
};

use crate::rendering::assets::CardImages;
use crate::rendering::layout::Rect;
use crate::rendering::paint::{Clip, PaintCommand, Rgba};
use crate::rendering::text::CosmicText;
use crate::{Error, Result};

fn color(rgba: Rgba) -> Color {
    Color::from_rgba8(rgba.r, rgba.g, rgba.b, rgba.a)
}

fn solid(rgba: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color(rgba));
    paint.anti_alias = true;
    paint
}

fn to_skia(rect: Rect) -> Option<tiny_skia::Rect> {
    tiny_skia::Rect::from_xywh(rect.x, rect.y, rect.width, rect.height)
}

/// Rounded rectangle outline built from quadratic corners
pub fn rounded_rect_path(rect: Rect, radius: f32) -> Option<Path> {
    let r = radius.min(rect.width / 2.0).min(rect.height / 2.0).max(0.0);
    let (x, y, right, bottom) = (rect.x, rect.y, rect.right(), rect.bottom());
    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);
    pb.line_to(right - r, y);
    pb.quad_to(right, y, right, y + r);
    pb.line_to(right, bottom - r);
    pb.quad_to(right, bottom, right - r, bottom);
    pb.line_to(x + r, bottom);
    pb.quad_to(x, bottom, x, bottom - r);
    pb.line_to(x, y + r);
    pb.quad_to(x, y, x + r, y);
    pb.close();
    pb.finish()
}

/// Draw `image` scaled to cover `rect`, centered, optionally masked
fn draw_cover(pixmap: &mut Pixmap, image: &Pixmap, rect: Rect, opacity: f32, mask: Option<&Mask>) {
    let (iw, ih) = (image.width() as f32, image.height() as f32);
    if iw <= 0.0 || ih <= 0.0 {
        return;
    }
    let scale = (rect.width / iw).max(rect.height / ih);
    let tx = rect.x + (rect.width - iw * scale) / 2.0;
    let ty = rect.y + (rect.height - ih * scale) / 2.0;
    let paint = PixmapPaint {
        opacity: opacity.clamp(0.0, 1.0),
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    };
    let transform = Transform::from_row(scale, 0.0, 0.0, scale, tx, ty);
    pixmap.draw_pixmap(0, 0, image.as_ref(), &paint, transform, mask);
}

fn circle_mask(width: u32, height: u32, rect: Rect) -> Option<Mask> {
    let mut mask = Mask::new(width, height)?;
    let r = rect.width.min(rect.height) / 2.0;
    let path = PathBuilder::from_circle(rect.x + rect.width / 2.0, rect.y + rect.height / 2.0, r)?;
    mask.fill_path(&path, FillRule::Winding, true, Transform::identity());
    Some(mask)
}

/// Execute `commands` in order on a fresh `width` x `height` canvas.
///
/// Commands referring to an image that is not in `images` are skipped.
pub fn rasterize(
    width: u32,
    height: u32,
    commands: &[PaintCommand],
    images: &CardImages,
    text: &mut CosmicText,
) -> Result<Pixmap> {
    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| Error::EncodeFailure(format!("cannot allocate {}x{} canvas", width, height)))?;

    for cmd in commands {
        match cmd {
            PaintCommand::VerticalGradient { rect, stops } => {
                let stops: Vec<GradientStop> = stops
                    .iter()
                    .map(|(pos, rgba)| GradientStop::new(*pos, color(*rgba)))
                    .collect();
                let shader = LinearGradient::new(
                    Point::from_xy(rect.x, rect.y),
                    Point::from_xy(rect.x, rect.bottom()),
                    stops,
                    SpreadMode::Pad,
                    Transform::identity(),
                );
                if let (Some(shader), Some(area)) = (shader, to_skia(*rect)) {
                    let paint = Paint {
                        shader,
                        ..Paint::default()
                    };
                    pixmap.fill_rect(area, &paint, Transform::identity(), None);
                }
            }
            PaintCommand::Image { slot, rect, opacity, clip } => {
                let Some(image) = images.get(*slot) else {
                    continue;
                };
                match clip {
                    Clip::None => draw_cover(&mut pixmap, image, *rect, *opacity, None),
                    Clip::Circle => {
                        if let Some(mask) = circle_mask(width, height, *rect) {
                            draw_cover(&mut pixmap, image, *rect, *opacity, Some(&mask));
                        }
                    }
                }
            }
            PaintCommand::Circle { cx, cy, radius, rgba } => {
                if let Some(path) = PathBuilder::from_circle(*cx, *cy, *radius) {
                    pixmap.fill_path(&path, &solid(*rgba), FillRule::Winding, Transform::identity(), None);
                }
            }
            PaintCommand::RoundedRect { rect, radius, fill, stroke } => {
                let Some(path) = rounded_rect_path(*rect, *radius) else {
                    continue;
                };
                if let Some(fill) = fill {
                    pixmap.fill_path(&path, &solid(*fill), FillRule::Winding, Transform::identity(), None);
                }
                if let Some(style) = stroke {
                    let stroke = Stroke {
                        width: style.width,
                        ..Stroke::default()
                    };
                    pixmap.stroke_path(&path, &solid(style.rgba), &stroke, Transform::identity(), None);
                }
            }
            PaintCommand::SolidRect { rect, rgba } => {
                if let Some(area) = to_skia(*rect) {
                    pixmap.fill_rect(area, &solid(*rgba), Transform::identity(), None);
                }
            }
            PaintCommand::Text { x, y, text: line, font, rgba } => {
                text.draw(&mut pixmap, line, *x, *y, font, *rgba);
            }
        }
    }

    Ok(pixmap)
}

/// PNG bytes of the canvas
pub fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>> {
    pixmap
        .encode_png()
        .map_err(|e| Error::EncodeFailure(e.to_string()))
}
