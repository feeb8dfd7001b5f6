use anyhow::{Context, anyhow, bail};
use citywx_core::{
    Config, FileCityStore, LastCityStore, MemoryCityStore, WeatherApp, provider_from_config,
};
use clap::{Parser, Subcommand};

use crate::{render, repl};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "citywx", version, about = "Current weather for a city")]
pub struct Cli {
    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Do not read or write the remembered city.
    #[arg(long, global = true)]
    pub no_persist: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show current weather once.
    Show {
        /// City name; defaults to the last city searched.
        city: Option<String>,

        /// Display temperatures in Fahrenheit.
        #[arg(long)]
        imperial: bool,

        /// Print the derived view as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Search repeatedly from a prompt.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show {
                city,
                imperial,
                json,
            } => show(self.no_persist, city, imperial, json).await,
            Command::Interactive => {
                let app = build_app(self.no_persist)?;
                repl::run(app).await
            }
        }
    }
}

fn open_store(no_persist: bool) -> anyhow::Result<Box<dyn LastCityStore>> {
    if no_persist {
        return Ok(Box::new(MemoryCityStore::new()));
    }
    Ok(Box::new(FileCityStore::default_location()?))
}

fn build_app(no_persist: bool) -> anyhow::Result<WeatherApp<Box<dyn LastCityStore>>> {
    let config = Config::load()?;
    let provider = provider_from_config(&config)?;
    let store = open_store(no_persist)?;

    Ok(WeatherApp::new(provider, store, config.icon_host))
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = inquire::Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_display_mode(inquire::PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim().to_string();
    if api_key.is_empty() {
        bail!("API key must not be empty");
    }

    config.set_api_key(api_key);
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(
    no_persist: bool,
    city: Option<String>,
    imperial: bool,
    json: bool,
) -> anyhow::Result<()> {
    let mut app = build_app(no_persist)?;

    let city = match city {
        Some(city) => city,
        None => app.store().read_last_city()?.ok_or_else(|| {
            anyhow!("No city given and no previous search recorded.\nHint: run `citywx show <CITY>`.")
        })?,
    };

    if imperial {
        app.toggle_unit();
    }

    if app.lookup(&city).await.is_none() {
        bail!("City name must not be empty");
    }

    if let Some(err) = app.session().visible_error() {
        tracing::debug!(error = %err, "lookup failed");
        bail!("{}", err.user_message());
    }

    let view = app
        .view()
        .ok_or_else(|| anyhow!("No weather data available"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render::render_view(&view));
    }

    Ok(())
}
