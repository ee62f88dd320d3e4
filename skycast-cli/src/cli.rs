use std::sync::Arc;

use anyhow::bail;
use chrono::{DateTime, FixedOffset};
use clap::{Parser, Subcommand};

use skycast_core::{
    Config, CurrentConditions, DailyForecastSummary, HttpTransport, SearchCoordinator, SearchState,
    WeatherClient,
};

use crate::messages::CliMessages;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "City weather lookup")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeatherMap API key.
    Configure,

    /// Show current conditions and the 5-day outlook for a city.
    Show {
        /// City name, e.g. "Madrid" or "Lima".
        city: String,

        /// Language hint forwarded to the provider, e.g. "en" or "es".
        #[arg(long)]
        lang: Option<String>,
    },

    /// Print geocoding suggestions for a partial city name.
    Suggest {
        /// Partial name, at least two characters.
        query: String,

        /// Maximum number of suggestions.
        #[arg(long, default_value_t = skycast_core::DEFAULT_SUGGESTION_LIMIT)]
        limit: usize,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, lang } => show(&city, lang).await,
            Command::Suggest { query, limit } => suggest(&query, limit).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = inquire::Password::new("OpenWeatherMap API key:")
        .without_confirmation()
        .prompt()?;

    config.api_key = api_key.trim().to_string();
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn build_client() -> anyhow::Result<WeatherClient> {
    let config = Config::load()?;
    if !config.has_api_key() {
        bail!(
            "No API key configured.\n\
             Hint: run `skycast configure` and enter your OpenWeatherMap API key."
        );
    }

    Ok(WeatherClient::new(config, Arc::new(HttpTransport::new())))
}

async fn show(city: &str, lang: Option<String>) -> anyhow::Result<()> {
    let client = build_client()?;

    let mut coordinator = SearchCoordinator::new(client, Arc::new(CliMessages));
    if let Some(lang) = lang {
        coordinator = coordinator.with_locale(lang);
    }

    coordinator.search(city).await;

    match coordinator.state() {
        SearchState::Success { current, forecast } => {
            print_current(&current);
            print_forecast(&forecast);
            Ok(())
        }
        SearchState::Error { message } => bail!(message),
        state => bail!("search ended in unexpected state: {state:?}"),
    }
}

async fn suggest(query: &str, limit: usize) -> anyhow::Result<()> {
    let client = build_client()?;

    let suggestions = client.fetch_suggestions(query, None, limit).await;
    if suggestions.is_empty() {
        println!("No matches.");
        return Ok(());
    }

    for suggestion in suggestions {
        let region = suggestion
            .state
            .map(|state| format!(", {state}"))
            .unwrap_or_default();
        println!(
            "{}{}, {} ({:.2}, {:.2})",
            suggestion.name, region, suggestion.country, suggestion.lat, suggestion.lon
        );
    }
    Ok(())
}

fn print_current(current: &CurrentConditions) {
    println!("{}, {}  {}", current.city, current.country, current.description);
    println!(
        "  Temperature: {}\u{b0}C (feels like {}\u{b0}C, min {}\u{b0}C / max {}\u{b0}C)",
        current.temperature, current.feels_like, current.temp_min, current.temp_max
    );
    println!(
        "  Humidity: {}%   Pressure: {} hPa   Clouds: {}%   Visibility: {} m",
        current.humidity, current.pressure, current.clouds, current.visibility
    );
    match current.wind_gust {
        Some(gust) => println!(
            "  Wind: {:.1} m/s at {}\u{b0} (gusts {:.1} m/s)",
            current.wind_speed, current.wind_deg, gust
        ),
        None => println!("  Wind: {:.1} m/s at {}\u{b0}", current.wind_speed, current.wind_deg),
    }
    println!(
        "  Sunrise: {}   Sunset: {}",
        format_local_time(current.sunrise, current.timezone),
        format_local_time(current.sunset, current.timezone)
    );
}

fn print_forecast(forecast: &[DailyForecastSummary]) {
    if forecast.is_empty() {
        println!("\nNo forecast available.");
        return;
    }

    println!("\nOutlook:");
    for day in forecast {
        println!(
            "  {} {}  {}\u{b0}/{}\u{b0} (day {}\u{b0})  {}  rain {}%  wind {:.1} m/s",
            weekday_name(day.day_of_week),
            day.date,
            day.temp_min,
            day.temp_max,
            day.temp_day,
            day.description,
            day.pop,
            day.wind_speed
        );
    }
}

fn weekday_name(day_of_week: u8) -> &'static str {
    match day_of_week {
        0 => "Sun",
        1 => "Mon",
        2 => "Tue",
        3 => "Wed",
        4 => "Thu",
        5 => "Fri",
        6 => "Sat",
        _ => "???",
    }
}

/// Render a UTC epoch as local wall-clock time at the city's UTC offset.
fn format_local_time(epoch: i64, offset_seconds: i32) -> String {
    match (DateTime::from_timestamp(epoch, 0), FixedOffset::east_opt(offset_seconds)) {
        (Some(utc), Some(offset)) => utc.with_timezone(&offset).format("%H:%M").to_string(),
        (Some(utc), None) => utc.format("%H:%M").to_string(),
        _ => "--:--".to_string(),
    }
}
