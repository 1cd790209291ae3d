use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use inquire::{Password, Select, Text};
use keather_core::{
    Config, FilePreferenceStore, MemoryPreferenceStore, PreferenceStore, Screen, Suggestion, Units,
    provider_from_config,
};
use std::sync::Arc;

use crate::view;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "keather",
    version,
    about = "Current weather and a short forecast for your city"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// OpenWeather API key; overrides the config file.
    #[arg(long, global = true, env = "KEATHER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Unit system: metric, imperial or standard.
    #[arg(long, global = true)]
    pub units: Option<String>,

    /// Do not remember the selected city.
    #[arg(long, global = true)]
    pub no_save: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively store the API key, units and default city.
    Configure,

    /// Show the weather for the saved city, or for CITY (which is then saved).
    Show {
        /// City name, e.g. "London".
        city: Option<String>,
    },

    /// Look up cities by partial name and show the one you pick.
    Search {
        /// Partial city name.
        query: String,

        /// Take the Nth suggestion (1-based) instead of prompting.
        #[arg(long)]
        pick: Option<usize>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city } => {
                let (mut screen, units) = open_screen(&self.global)?;
                match city {
                    Some(city) => screen.mount_with(&city).await,
                    None => screen.mount().await,
                }
                print!("{}", view::render(screen.state(), units));
                Ok(())
            }
            Command::Search { query, pick } => {
                let (mut screen, units) = open_screen(&self.global)?;
                screen.open_search().await;
                screen.search(&query).await;

                let suggestions = screen.state().search.suggestions.clone();
                if suggestions.is_empty() {
                    println!("No cities match \"{query}\".");
                    return Ok(());
                }

                let chosen = choose(suggestions, pick)?;
                screen.select(&chosen.name).await;
                print!("{}", view::render(screen.state(), units));
                Ok(())
            }
        }
    }
}

fn open_screen(global: &GlobalArgs) -> anyhow::Result<(Screen, Units)> {
    let units = global.units.as_deref().map(Units::try_from).transpose()?;
    let config = Config::load()?.with_overrides(global.api_key.clone(), units);
    tracing::debug!(units = %config.units, base_url = %config.base_url, "Loaded configuration");

    let provider = provider_from_config(&config)?;
    let store: Arc<dyn PreferenceStore> = if global.no_save {
        Arc::new(MemoryPreferenceStore::new())
    } else {
        Arc::new(FilePreferenceStore::default_location()?)
    };

    Ok((Screen::new(provider, store, &config.default_city), config.units))
}

fn choose(suggestions: Vec<Suggestion>, pick: Option<usize>) -> anyhow::Result<Suggestion> {
    match pick {
        Some(n) => pick_nth(suggestions, n),
        None => Select::new("Select a city:", suggestions)
            .prompt()
            .context("No city selected"),
    }
}

fn pick_nth(suggestions: Vec<Suggestion>, n: usize) -> anyhow::Result<Suggestion> {
    let count = suggestions.len();
    match n.checked_sub(1).and_then(|idx| suggestions.into_iter().nth(idx)) {
        Some(s) => Ok(s),
        None => bail!("--pick {n} is out of range; {count} suggestion(s) available"),
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        config.set_api_key(api_key.trim().to_string());
    }

    let start = Units::all().iter().position(|u| *u == config.units).unwrap_or(0);
    config.units = Select::new("Units:", Units::all().to_vec())
        .with_starting_cursor(start)
        .prompt()
        .context("Failed to read units")?;

    config.default_city = Text::new("Default city:")
        .with_default(&config.default_city)
        .prompt()
        .context("Failed to read default city")?;

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}
