use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Confirm, Password, PasswordDisplayMode, Text};
use wardrobe_core::{
    Advisor, AdvisorError, Config, Coordinates, DescriberConfig, ProviderId, SaveTag,
    detect_location,
    location::NominatimResolver,
    store::{FavoriteLocations, FileStore, SavedOutfits},
};

use crate::display;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "wardrobe", version, about = "What to wear for today's weather")]
pub struct Cli {
    /// Log debug output to stderr (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials for a specific weather provider.
    Configure {
        /// Provider short name, e.g. "openweather" or "weatherapi".
        provider: String,
    },

    /// Configure the OpenAI key used to rewrite conditions in local dialect.
    ConfigureDescriber,

    /// Show the weather summary and outfit advice for a location.
    Show {
        /// Address or location name, e.g. "Edinburgh, UK".
        /// Defaults to the coordinates' location, then the configured default.
        address: Option<String>,

        /// Latitude to reverse-geocode when no address is given.
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude to reverse-geocode when no address is given.
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Bookmark the outfit, or remove the bookmark if already saved.
        #[arg(long)]
        save: bool,
    },

    /// List saved outfits.
    Saved {
        /// Only show one category: rainy, sunny, cold, warm, windy or other.
        #[arg(long)]
        category: Option<String>,
    },

    /// Remove a saved outfit by id.
    Unsave { id: String },

    /// Manage favourite locations.
    Favorites {
        #[command(subcommand)]
        action: Option<FavoritesAction>,
    },

    /// List cities with their own dialect phrases.
    Dialects,
}

#[derive(Debug, Subcommand)]
pub enum FavoritesAction {
    List,
    Add { location: String },
    Remove { location: String },
}

fn open_store() -> anyhow::Result<FileStore> {
    Ok(FileStore::new(Config::data_dir()?))
}

/// Non-fatal notice for data that could not be read.
fn report_recovered(err: Option<AdvisorError>) {
    if let Some(err) = err {
        eprintln!("{}", err.user_message());
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { provider } => configure_provider(&provider)?,
            Command::ConfigureDescriber => configure_describer()?,
            Command::Show { address, lat, lon, save } => {
                let coords = lat.zip(lon).map(|(latitude, longitude)| Coordinates {
                    latitude,
                    longitude,
                });
                show(address, coords, save).await?;
            }
            Command::Saved { category } => {
                let tag = category.as_deref().map(SaveTag::try_from).transpose()?;
                let store = open_store()?;
                let (saved, err) = SavedOutfits::load_or_default(&store);
                report_recovered(err);
                display::print_saved(&saved.by_tag(tag));
            }
            Command::Unsave { id } => {
                let store = open_store()?;
                let (mut saved, err) = SavedOutfits::load_or_default(&store);
                report_recovered(err);
                if saved.remove(&id)? {
                    println!("Removed saved outfit: {id}");
                } else {
                    println!("No saved outfit with id: {id}");
                }
            }
            Command::Favorites { action } => {
                let store = open_store()?;
                let (mut favorites, err) = FavoriteLocations::load_or_default(&store);
                report_recovered(err);
                match action.unwrap_or(FavoritesAction::List) {
                    FavoritesAction::List => {}
                    FavoritesAction::Add { location } => {
                        if !favorites.add(&location)? {
                            println!("{location} is already a favourite");
                        }
                    }
                    FavoritesAction::Remove { location } => {
                        if !favorites.remove(&location)? {
                            println!("{location} was not a favourite");
                        }
                    }
                }
                display::print_favorites(favorites.list());
            }
            Command::Dialects => {
                let bank = Config::load()?.phrase_bank()?;
                for city in bank.cities() {
                    println!("{city}");
                }
            }
        }

        Ok(())
    }
}

fn non_empty_key(raw: &str) -> anyhow::Result<String> {
    let key = raw.trim();
    if key.is_empty() {
        bail!("API key must not be empty");
    }
    Ok(key.to_string())
}

fn configure_provider(provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;
    let mut config = Config::load()?;

    let api_key = Password::new(&format!("API key for {id}:"))
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let api_key = non_empty_key(&api_key)?;

    config.upsert_provider_api_key(id, api_key);

    if config.default_provider_id().ok() != Some(id) {
        let make_default = Confirm::new(&format!("Make {id} the default provider?"))
            .with_default(false)
            .prompt()
            .context("Failed to read answer")?;
        if make_default {
            config.set_default_provider(id);
        }
    }

    config.save()?;
    println!("Provider {id} configured.");
    Ok(())
}

fn configure_describer() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenAI API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let api_key = non_empty_key(&api_key)?;

    let model = Text::new("Model:")
        .with_default(wardrobe_core::config::DEFAULT_DESCRIBER_MODEL)
        .prompt()
        .context("Failed to read model")?;

    config.describer = Some(DescriberConfig {
        api_key,
        model: Some(model),
    });
    config.save()?;
    println!("Condition describer configured.");
    Ok(())
}

async fn show(
    address: Option<String>,
    coords: Option<Coordinates>,
    save: bool,
) -> anyhow::Result<()> {
    let config = Config::load()?;

    let location = match (address, coords) {
        (Some(address), _) => address,
        (None, Some(coords)) => {
            let resolver = NominatimResolver::new()?;
            let detected =
                detect_location(&resolver, Some(coords), config.default_location()).await;
            if let Some(err) = detected.error {
                eprintln!("{} Using {}.", err.user_message(), detected.location);
            }
            detected.location
        }
        (None, None) => config.default_location().to_string(),
    };

    let advisor = Advisor::from_config(&config)?;
    let advice = match advisor.advise(&location).await {
        Ok(advice) => advice,
        Err(e) => {
            tracing::debug!(error = ?e, "Advice failed");
            bail!(e.user_message());
        }
    };

    let store = open_store()?;
    let (mut saved, err) = SavedOutfits::load_or_default(&store);
    report_recovered(err);
    let mut is_saved = saved.is_saved(&advice.location, &advice.weather.condition);

    if save {
        match saved.toggle(advice.to_saved_outfit()) {
            Ok(now_saved) => is_saved = now_saved,
            Err(e) => {
                tracing::warn!(error = %e, "Could not update saved outfits");
                eprintln!("{}", e.user_message());
            }
        }
    }

    display::print_advice(&advice, is_saved);
    Ok(())
}
