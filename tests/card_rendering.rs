use std::fs;
use std::path::PathBuf;

use gitapath::rendering::assets::CardImages;
use gitapath::rendering::layout::{layout_badge, plan_layout, BlockKind, LayoutBounds, Rect};
use gitapath::rendering::paint::{build_display_list, ArtAvailability, PaintCommand, Palette, Rgba};
use gitapath::rendering::text::{FixedAdvance, FontSpec};
use gitapath::rendering::{CardRenderer, CardRequest, CARD_HEIGHT, CARD_WIDTH};
use gitapath::{AppConfig, Language, ProfileBadge, Theme, Verse, VerseDataset};

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

fn fixture() -> VerseDataset {
    let raw = fs::read_to_string("tests/fixtures/verses.json").expect("read fixture");
    VerseDataset::from_json(&raw).expect("valid fixture")
}

fn config() -> AppConfig {
    AppConfig {
        asset_dir: PathBuf::from("tests/fixtures/no-assets"),
        font_dirs: Vec::new(),
        ..AppConfig::default()
    }
}

fn long_verse() -> Verse {
    let mut v = fixture().verses()[1].clone();
    v.sanskrit = v.sanskrit.repeat(12);
    v.transliteration = v.transliteration.repeat(12);
    v.english_meaning = v.english_meaning.repeat(20);
    v.reflection = v.reflection.repeat(20);
    v
}

#[tokio::test]
async fn renders_png_without_any_art() {
    let dataset = fixture();
    let mut renderer = CardRenderer::new(&config());
    for theme in [Theme::Dark, Theme::Light] {
        for language in [Language::En, Language::Hi] {
            let req = CardRequest::new(&dataset.verses()[0], language, theme);
            let card = renderer.render(&req).await.expect("card");
            assert_eq!((card.width, card.height), (CARD_WIDTH, CARD_HEIGHT));
            assert!(card.png_data.starts_with(PNG_MAGIC));
            assert_eq!(card.file_name, "gitapath-2-14.png");
        }
    }
}

#[tokio::test]
async fn oversized_text_and_broken_photo_still_render() {
    let verse = long_verse();
    let profile = ProfileBadge::new(
        "A very long devotee name that will never fit inside the badge",
        Some("data:image/png;base64,not-a-real-image".into()),
    );
    let mut renderer = CardRenderer::new(&config());
    let reflection = "Stay with the breath. ".repeat(40);
    let req = CardRequest::new(&verse, Language::En, Theme::Dark)
        .with_profile(&profile)
        .with_reflection(&reflection);
    let card = renderer.render(&req).await.expect("card");
    assert!(card.png_data.starts_with(PNG_MAGIC));
}

#[test]
fn overflowing_content_is_fitted_inside_the_bound() {
    let verse = long_verse();
    let bounds = LayoutBounds::card();
    let content = CardRequest::new(&verse, Language::En, Theme::Dark).content();
    let plan = plan_layout(&content, &bounds, &mut FixedAdvance::default());
    assert!(plan.fits(&bounds));
    assert!(plan.scale < 1.0);
    assert!(plan.scale >= 0.5);
    let meaning = plan.block(BlockKind::Meaning).expect("meaning block");
    assert!(meaning.lines.last().unwrap().ends_with("..."));
}

fn color(rgba: &Rgba) -> String {
    format!("#{:02x}{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b, rgba.a)
}

fn rect(r: &Rect) -> String {
    format!("{:.2},{:.2} {:.2}x{:.2}", r.x, r.y, r.width, r.height)
}

fn font(f: &FontSpec) -> String {
    let italic = if f.italic { " italic" } else { "" };
    format!("{:.2}/{:.2} w{}{}", f.size, f.line_height, f.weight, italic)
}

/// One line per command; text is kept verbatim so a diff reads naturally
fn describe(cmd: &PaintCommand) -> String {
    match cmd {
        PaintCommand::VerticalGradient { rect: r, stops } => {
            let stops: Vec<String> = stops
                .iter()
                .map(|(pos, rgba)| format!("{:.2}:{}", pos, color(rgba)))
                .collect();
            format!("gradient {} {}", rect(r), stops.join(" "))
        }
        PaintCommand::Image { slot, rect: r, opacity, clip } => {
            format!("image {:?} {} {:.2} {:?}", slot, rect(r), opacity, clip)
        }
        PaintCommand::Circle { cx, cy, radius, rgba } => {
            format!("circle {:.2},{:.2} r{:.2} {}", cx, cy, radius, color(rgba))
        }
        PaintCommand::RoundedRect { rect: r, radius, fill, stroke } => {
            let mut line = format!("rounded {} r{:.2}", rect(r), radius);
            if let Some(fill) = fill {
                line.push_str(&format!(" fill {}", color(fill)));
            }
            if let Some(stroke) = stroke {
                line.push_str(&format!(" stroke {} {:.2}", color(&stroke.rgba), stroke.width));
            }
            line
        }
        PaintCommand::SolidRect { rect: r, rgba } => format!("rect {} {}", rect(r), color(rgba)),
        PaintCommand::Text { x, y, text, font: f, rgba } => {
            format!("text {:.2},{:.2} {} {} {}", x, y, font(f), color(rgba), text)
        }
    }
}

#[test]
fn display_list_matches_golden() {
    let verse = fixture().verses()[1].clone();
    let profile = ProfileBadge::new("Arjuna", None);
    let mut measure = FixedAdvance::default();

    let mut bounds = LayoutBounds::card();
    let badge = layout_badge(profile.display_name(), &bounds, &mut measure);
    bounds.reserved_right = badge.reserved_width();
    let content = CardRequest::new(&verse, Language::En, Theme::Light)
        .with_profile(&profile)
        .content();
    let plan = plan_layout(&content, &bounds, &mut measure);
    assert_eq!(plan.scale, 1.0);
    let cmds = build_display_list(
        &plan,
        Some(&badge),
        &Palette::for_theme(Theme::Light),
        ArtAvailability::default(),
    );

    let actual: Vec<String> = cmds.iter().map(describe).collect();
    let actual = actual.join("\n");
    let expected_path = PathBuf::from("tests/goldens/display_list_en_light.txt");
    if std::env::var("UPDATE_GOLDENS").is_ok() {
        fs::create_dir_all("tests/goldens").ok();
        fs::write(&expected_path, format!("{}\n", actual)).expect("write golden");
        println!("Updated golden: {:?}", expected_path);
        return;
    }
    let expected = fs::read_to_string(&expected_path)
        .unwrap_or_else(|e| panic!("unable to read golden {:?}: {}", expected_path, e));
    assert_eq!(actual, expected.trim_end());
}

#[test]
fn compose_uses_supplied_images() {
    let verse = fixture().verses()[3].clone();
    let mut background = tiny_skia::Pixmap::new(10, 10).unwrap();
    background.fill(tiny_skia::Color::from_rgba8(200, 0, 0, 255));
    let images = CardImages {
        background: Some(background),
        ..Default::default()
    };
    let mut renderer = CardRenderer::new(&config());
    let req = CardRequest::new(&verse, Language::En, Theme::Dark);
    let card = renderer.compose(&req, &images).expect("card");
    assert!(card.png_data.starts_with(PNG_MAGIC));
    assert_eq!(card.file_name, "gitapath-6-5.png");
}
