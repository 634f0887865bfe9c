use gitapath::rendering::{CardRenderer, CardRequest};
use gitapath::verse::today;
use gitapath::{select_verse, AppConfig, Language, ProfileBadge, Theme, VerseDataset};

// Render today's card from the bundled dataset. Run with:
//    cargo run --example share_card -- [en|hi] [dark|light]

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let language: Language = args.next().as_deref().unwrap_or("en").parse()?;
    let theme: Theme = args.next().as_deref().unwrap_or("dark").parse()?;

    let config = AppConfig::default();
    let raw = std::fs::read_to_string("data/verses.json")?;
    let dataset = VerseDataset::from_json(&raw)?;
    let verse = select_verse(&dataset, today());

    let profile = ProfileBadge::new("Seeker", None);
    let request = CardRequest::new(verse, language, theme).with_profile(&profile);
    let mut renderer = CardRenderer::new(&config);
    match renderer.render(&request).await {
        Some(card) => {
            std::fs::write(&card.file_name, &card.png_data)?;
            println!("wrote {} ({} bytes)", card.file_name, card.png_data.len());
            println!("{}", verse.share_caption(language));
        }
        None => eprintln!("could not build card"),
    }
    Ok(())
}
