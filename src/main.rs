use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::info;

use gitapath::rendering::assets::encode_profile_photo;
use gitapath::rendering::CardRenderer;
use gitapath::streak::StreakTracker;
use gitapath::verse::{parse_date_key, today};
use gitapath::{AppConfig, DailySession, FileStore, Language, Preferences, ProfileBadge, Theme, VerseSource};

#[derive(Parser)]
#[command(name = "gitapath")]
#[command(about = "Daily Bhagavad Gita verse, streak and share card")]
struct Cli {
    /// Verse dataset: a JSON file path or an http(s) URL
    #[arg(long, env = "GITAPATH_DATA")]
    data: Option<String>,

    /// Directory with card backgrounds and texture
    #[arg(long, env = "GITAPATH_ASSETS")]
    assets: Option<PathBuf>,

    /// JSON file holding streak, preferences and profile
    #[arg(long, env = "GITAPATH_STORE")]
    store: Option<PathBuf>,

    /// Extra font directory (repeatable)
    #[arg(long)]
    fonts: Vec<PathBuf>,

    /// More logging (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the verse for a day and record the visit
    Today {
        /// Day as YYYY-MM-DD, defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// Show the stored streak without recording a visit
    Streak,
    /// Render the share card for a day's verse
    Card {
        #[arg(long)]
        date: Option<String>,
        /// Output PNG path, defaults to gitapath-<chapter>-<verse>.png
        #[arg(long)]
        out: Option<PathBuf>,
        /// en or hi, defaults to the stored preference
        #[arg(long)]
        lang: Option<Language>,
        /// dark or light, defaults to the stored preference
        #[arg(long)]
        theme: Option<Theme>,
        /// Custom reflection text
        #[arg(long)]
        reflection: Option<String>,
    },
    /// Show or change language and theme
    Prefs {
        #[arg(long)]
        lang: Option<Language>,
        #[arg(long)]
        theme: Option<Theme>,
    },
    /// Show or change the profile badge
    Profile {
        #[arg(long)]
        name: Option<String>,
        /// PNG or JPEG photo for the avatar
        #[arg(long)]
        photo: Option<PathBuf>,
        /// Remove the stored profile
        #[arg(long, conflicts_with_all = ["name", "photo"])]
        clear: bool,
    },
}

impl Cli {
    fn config(&self) -> anyhow::Result<AppConfig> {
        let mut config = AppConfig::default();
        if let Some(data) = &self.data {
            config.dataset = VerseSource::parse(data)?;
        }
        if let Some(assets) = &self.assets {
            config.font_dirs = vec![assets.join("fonts")];
            config.asset_dir = assets.clone();
        }
        if let Some(store) = &self.store {
            config.store_path = store.clone();
        }
        config.font_dirs.extend(self.fonts.iter().cloned());
        Ok(config)
    }
}

fn day(date: Option<&str>) -> anyhow::Result<chrono::NaiveDate> {
    match date {
        Some(key) => Ok(parse_date_key(key)?),
        None => Ok(today()),
    }
}

fn photo_data_url(path: &Path) -> anyhow::Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(encode_profile_photo(&bytes)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp_millis()
        .init();

    let config = cli.config()?;
    info!("Store: {}", config.store_path.display());
    let store = FileStore::new(config.store_path.clone());

    match cli.command {
        Command::Today { date } => {
            let session = DailySession::new(config, &store);
            let view = session.open(day(date.as_deref())?).await?;
            let lang = view.preferences.language;
            println!("{}  ({})", view.verse.citation(lang), view.date_key);
            println!();
            println!("{}", view.verse.sanskrit);
            println!("{}", view.verse.transliteration);
            println!();
            println!("{}", view.verse.meaning(lang));
            println!();
            println!("{}", view.verse.reflection_for(lang));
            println!();
            println!(
                "Streak: {} (longest {})",
                view.streak.current_streak, view.streak.longest_streak
            );
            if let Some(message) = view.milestone {
                println!("{}", message);
            }
        }
        Command::Streak => {
            let state = StreakTracker::new(&store).peek();
            println!("Current streak: {}", state.current_streak);
            println!("Longest streak: {}", state.longest_streak);
            match state.last_opened_date {
                Some(last) => println!("Last opened: {}", last),
                None => println!("Last opened: never"),
            }
        }
        Command::Card { date, out, lang, theme, reflection } => {
            let mut renderer = CardRenderer::new(&config);
            let session = DailySession::new(config, &store);
            let view = session.open(day(date.as_deref())?).await?;
            let prefs = Preferences {
                language: lang.unwrap_or(view.preferences.language),
                theme: theme.unwrap_or(view.preferences.theme),
            };
            let outcome = session
                .build_card(&mut renderer, &view.verse, prefs, reflection.as_deref())
                .await;
            match &outcome.card {
                Some(card) => {
                    let path = out.unwrap_or_else(|| PathBuf::from(&card.file_name));
                    std::fs::write(&path, &card.png_data)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("{} {}", outcome.status(), path.display());
                    println!();
                    println!("{}", view.verse.share_caption(prefs.language));
                }
                None => anyhow::bail!(outcome.status()),
            }
        }
        Command::Prefs { lang, theme } => {
            let mut prefs = Preferences::load(&store);
            if lang.is_some() || theme.is_some() {
                prefs.language = lang.unwrap_or(prefs.language);
                prefs.theme = theme.unwrap_or(prefs.theme);
                prefs.save(&store)?;
            }
            println!("language: {}", prefs.language);
            println!("theme: {}", prefs.theme);
        }
        Command::Profile { name, photo, clear } => {
            if clear {
                ProfileBadge::clear(&store)?;
                println!("Profile cleared.");
                return Ok(());
            }
            let mut profile = ProfileBadge::load(&store);
            if name.is_some() || photo.is_some() {
                let photo = match photo {
                    Some(path) => Some(photo_data_url(&path)?),
                    None => profile.photo_data.take(),
                };
                let name = name.unwrap_or_else(|| profile.name.clone());
                profile = ProfileBadge::new(&name, photo);
                profile.save(&store)?;
            }
            if profile.is_empty() {
                println!("No profile set.");
            } else {
                println!("name: {}", profile.display_name());
                println!("photo: {}", if profile.photo_data.is_some() { "yes" } else { "no" });
            }
        }
    }

    Ok(())
}
