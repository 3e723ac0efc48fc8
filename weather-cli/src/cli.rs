use anyhow::{Context, bail};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use weather_core::{
    Config, DisplayMode, View, ViewMachine, WeatherApp, WeatherKind, WeatherProvider,
    provider_from_config, state::Dispatch, validate::validate_location,
};

use crate::{interactive, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current, historical and marine weather")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the weatherstack access key and a default location.
    Configure,

    /// Show current weather.
    Current {
        /// Location name; defaults to the configured location.
        location: Option<String>,
    },

    /// Show weather for a past date.
    Historical {
        /// Location name; defaults to the configured location.
        location: Option<String>,

        /// Date as YYYY-MM-DD, today or earlier.
        #[arg(long)]
        date: String,
    },

    /// Show marine conditions at a coordinate pair.
    Marine {
        #[arg(long, allow_hyphen_values = true)]
        lat: String,

        #[arg(long, allow_hyphen_values = true)]
        lon: String,
    },

    /// Browse all three views from a menu.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let today = today();

        match self.command {
            Command::Configure => configure(),
            Command::Interactive => {
                let (provider, mut app) = session()?;
                interactive::run(&mut app, provider.as_ref()).await
            }
            Command::Current { location } => {
                let (provider, mut app) = session()?;
                let dispatch = match location {
                    Some(location) => app.commit_location(&location, today),
                    None => app.submit_current(today),
                };
                settle(app.current_mut(), dispatch, provider.as_ref()).await;
                finish(app.current().display(), render::current)
            }
            Command::Historical { location, date } => {
                let (provider, mut app) = session()?;
                // Off the current view, committing a location dispatches nothing.
                app.select_view(View::Historical, today);
                if let Some(location) = location {
                    let refresh = app.commit_location(&location, today);
                    settle(app.current_mut(), refresh, provider.as_ref()).await;
                }
                let dispatch = app.submit_historical(Some(&date), today);
                settle(app.historical_mut(), dispatch, provider.as_ref()).await;
                finish(app.historical().display(), render::historical)
            }
            Command::Marine { lat, lon } => {
                let (provider, mut app) = session()?;
                let dispatch = app.submit_marine(&lat, &lon, today);
                settle(app.marine_mut(), dispatch, provider.as_ref()).await;
                finish(app.marine().display(), render::marine)
            }
        }
    }
}

fn session() -> anyhow::Result<(Box<dyn WeatherProvider>, WeatherApp)> {
    let config = Config::load()?.with_env_overrides();
    tracing::debug!(?config, "loaded configuration");

    let provider = provider_from_config(&config)?;
    Ok((provider, WeatherApp::from_config(&config)))
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Runs a dispatched request, if any, and applies its outcome.
pub async fn settle<K: WeatherKind>(
    machine: &mut ViewMachine<K>,
    dispatch: Option<Dispatch<K>>,
    provider: &dyn WeatherProvider,
) {
    if let Some(dispatch) = dispatch {
        let completion = dispatch.run(provider).await;
        machine.complete(completion);
    }
}

/// One-shot commands print data to stdout and turn an error state into a failing exit.
fn finish<T>(
    mode: DisplayMode<'_, T>,
    render: impl FnOnce(DisplayMode<'_, T>) -> String,
) -> anyhow::Result<()> {
    if let DisplayMode::Error(message) = mode {
        bail!("{message}");
    }
    print!("{}", render(mode));
    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let key = Password::new("weatherstack access key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read access key")?;
    config.set_access_key(key);
    config.require_access_key()?;

    let location = Text::new("Default location:")
        .with_default(&config.default_location)
        .prompt()
        .context("Failed to read default location")?;
    config.default_location = validate_location(&location)?.to_string();

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}
