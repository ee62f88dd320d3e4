//! OpenWeatherMap wire structures and the adapters that normalize them.
//!
//! The adapters are pure and total: a syntactically valid response never
//! fails to adapt. Absent or empty sub-fields degrade to documented defaults
//! instead of erroring, so a provider-side shape drift stays contained here.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

use crate::model::{Coordinates, CurrentConditions, DailyForecastSummary};

/// Icon code used when the provider reports no weather-condition entries.
pub const FALLBACK_ICON: &str = "01d";

#[derive(Debug, Clone, Deserialize)]
pub struct MainSample {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: u8,
    pub pressure: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConditionEntry {
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WindSample {
    pub speed: f64,
    #[serde(default)]
    pub deg: u16,
    pub gust: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CloudsSample {
    pub all: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SysInfo {
    pub country: String,
    pub sunrise: i64,
    pub sunset: i64,
}

/// `GET /data/2.5/weather` response, reduced to the fields we consume.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentResponse {
    pub name: String,
    pub main: MainSample,
    #[serde(default)]
    pub weather: Vec<ConditionEntry>,
    pub wind: WindSample,
    pub clouds: CloudsSample,
    #[serde(default)]
    pub visibility: u32,
    pub sys: SysInfo,
    #[serde(default)]
    pub timezone: i32,
    pub coord: Coordinates,
}

/// One 3-hour sample from `GET /data/2.5/forecast`.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastSample {
    /// `"YYYY-MM-DD HH:MM:SS"`.
    pub dt_txt: String,
    pub main: MainSample,
    #[serde(default)]
    pub weather: Vec<ConditionEntry>,
    pub wind: WindSample,
    /// Precipitation probability, 0.0-1.0.
    #[serde(default)]
    pub pop: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastResponse {
    pub list: Vec<ForecastSample>,
}

/// Normalize a raw current-conditions response into the internal model.
pub fn adapt_current(raw: CurrentResponse) -> CurrentConditions {
    let (description, icon) = match raw.weather.first() {
        Some(entry) => (entry.description.clone(), entry.icon.clone()),
        None => (String::new(), FALLBACK_ICON.to_string()),
    };

    CurrentConditions {
        city: raw.name,
        country: raw.sys.country,
        temperature: raw.main.temp.round() as i32,
        feels_like: raw.main.feels_like.round() as i32,
        temp_min: raw.main.temp_min.round() as i32,
        temp_max: raw.main.temp_max.round() as i32,
        humidity: raw.main.humidity,
        pressure: raw.main.pressure,
        description,
        icon,
        wind_speed: raw.wind.speed,
        wind_deg: raw.wind.deg,
        wind_gust: raw.wind.gust,
        clouds: raw.clouds.all,
        visibility: raw.visibility,
        sunrise: raw.sys.sunrise,
        sunset: raw.sys.sunset,
        timezone: raw.timezone,
        coord: raw.coord,
    }
}

/// Collapse 3-hour forecast samples into one summary per calendar date.
///
/// Samples are grouped by the date portion of `dt_txt`; group order is the
/// order each date is first encountered, not sorted. Temperature min/max are
/// taken over the raw sample `temp` values, which yields a tighter daily
/// range than the provider's per-sample `temp_min`/`temp_max` (each of those
/// is already a 3-hour spread). The representative icon is the most frequent
/// one in the group, ties going to the first icon encountered.
pub fn adapt_forecast(samples: &[ForecastSample]) -> Vec<DailyForecastSummary> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<&ForecastSample>> = HashMap::new();

    for sample in samples {
        let date = sample.dt_txt.get(..10).unwrap_or(&sample.dt_txt);
        if !groups.contains_key(date) {
            order.push(date);
        }
        groups.entry(date).or_default().push(sample);
    }

    order
        .into_iter()
        .map(|date| summarize_day(date, &groups[date]))
        .collect()
}

fn summarize_day(date: &str, entries: &[&ForecastSample]) -> DailyForecastSummary {
    let count = entries.len() as f64;

    let mut temp_sum = 0.0;
    let mut temp_min = f64::INFINITY;
    let mut temp_max = f64::NEG_INFINITY;
    let mut humidity_sum = 0.0;
    let mut wind_sum = 0.0;
    let mut pop_max: f64 = 0.0;

    for entry in entries {
        temp_sum += entry.main.temp;
        temp_min = temp_min.min(entry.main.temp);
        temp_max = temp_max.max(entry.main.temp);
        humidity_sum += f64::from(entry.main.humidity);
        wind_sum += entry.wind.speed;
        pop_max = pop_max.max(entry.pop);
    }

    let (icon, description) = representative_condition(entries);

    DailyForecastSummary {
        date: date.to_string(),
        day_of_week: day_of_week(date),
        temp_day: (temp_sum / count).round() as i32,
        temp_min: temp_min.round() as i32,
        temp_max: temp_max.round() as i32,
        icon,
        description,
        humidity: (humidity_sum / count).round() as u8,
        wind_speed: (wind_sum / count * 10.0).round() / 10.0,
        pop: (pop_max * 100.0).round() as u8,
    }
}

/// Most frequent icon in the group, first-encountered icon winning ties, plus
/// the description of the first sample carrying that icon.
fn representative_condition(entries: &[&ForecastSample]) -> (String, String) {
    let mut icon_order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for entry in entries {
        let icon = sample_icon(entry);
        if !counts.contains_key(icon) {
            icon_order.push(icon);
        }
        *counts.entry(icon).or_default() += 1;
    }

    let mut best = FALLBACK_ICON;
    let mut best_count = 0;
    for icon in icon_order {
        let count = counts[icon];
        if count > best_count {
            best = icon;
            best_count = count;
        }
    }

    let description = entries
        .iter()
        .find(|entry| sample_icon(entry) == best)
        .and_then(|entry| entry.weather.first())
        .map(|condition| condition.description.clone())
        .unwrap_or_default();

    (best.to_string(), description)
}

fn sample_icon(entry: &ForecastSample) -> &str {
    entry
        .weather
        .first()
        .map_or(FALLBACK_ICON, |condition| condition.icon.as_str())
}

/// 0 = Sunday .. 6 = Saturday. Weekday derivation on a bare calendar date is
/// immune to timezone boundaries; a malformed date degrades to 0.
fn day_of_week(date: &str) -> u8 {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|d| d.weekday().num_days_from_sunday() as u8)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn current_fixture() -> CurrentResponse {
        serde_json::from_value(serde_json::json!({
            "name": "Madrid",
            "main": {
                "temp": 22.4, "feels_like": 21.5, "temp_min": 20.0,
                "temp_max": 25.0, "humidity": 55, "pressure": 1013
            },
            "weather": [{"id": 800, "main": "Clear", "description": "cielo claro", "icon": "01d"}],
            "wind": {"speed": 3.5, "deg": 180, "gust": 5.1},
            "clouds": {"all": 10},
            "visibility": 10000,
            "sys": {"country": "ES", "sunrise": 1_700_000_000, "sunset": 1_700_040_000},
            "coord": {"lat": 40.42, "lon": -3.7},
            "dt": 1_700_020_000,
            "timezone": 3600,
            "cod": 200
        }))
        .expect("fixture deserializes")
    }

    fn forecast_sample(dt_txt: &str, temp: f64, icon: &str, description: &str) -> ForecastSample {
        serde_json::from_value(serde_json::json!({
            "dt": 1_700_020_000_i64,
            "dt_txt": dt_txt,
            "main": {
                "temp": temp, "feels_like": temp - 2.0, "temp_min": temp - 3.0,
                "temp_max": temp + 3.0, "humidity": 55, "pressure": 1013
            },
            "weather": [{"id": 800, "main": "Clear", "description": description, "icon": icon}],
            "wind": {"speed": 3.0, "deg": 180},
            "pop": 0.2
        }))
        .expect("sample deserializes")
    }

    #[test]
    fn adapt_current_normalizes_full_response() {
        let conditions = adapt_current(current_fixture());

        assert_eq!(conditions.city, "Madrid");
        assert_eq!(conditions.country, "ES");
        assert_eq!(conditions.temperature, 22);
        assert_eq!(conditions.feels_like, 22);
        assert_eq!(conditions.temp_min, 20);
        assert_eq!(conditions.temp_max, 25);
        assert_eq!(conditions.humidity, 55);
        assert_eq!(conditions.pressure, 1013);
        assert_eq!(conditions.description, "cielo claro");
        assert_eq!(conditions.icon, "01d");
        assert_eq!(conditions.wind_gust, Some(5.1));
        assert_eq!(conditions.visibility, 10_000);
        assert_eq!(conditions.timezone, 3600);
        assert_eq!(conditions.coord, Coordinates { lat: 40.42, lon: -3.7 });
    }

    #[test]
    fn adapt_current_rounds_temperatures() {
        let mut raw = current_fixture();
        raw.main.temp = 22.6;
        raw.main.feels_like = 24.3;
        raw.main.temp_min = 20.1;
        raw.main.temp_max = 25.9;

        let conditions = adapt_current(raw);

        assert_eq!(conditions.temperature, 23);
        assert_eq!(conditions.feels_like, 24);
        assert_eq!(conditions.temp_min, 20);
        assert_eq!(conditions.temp_max, 26);
    }

    #[test]
    fn adapt_current_defaults_on_empty_weather_array() {
        let mut raw = current_fixture();
        raw.weather.clear();

        let conditions = adapt_current(raw);

        assert_eq!(conditions.description, "");
        assert_eq!(conditions.icon, FALLBACK_ICON);
    }

    #[test]
    fn adapt_forecast_empty_input_yields_empty_output() {
        assert!(adapt_forecast(&[]).is_empty());
    }

    #[test]
    fn adapt_forecast_aggregates_one_day() {
        let samples = vec![
            forecast_sample("2024-11-15 09:00:00", 18.0, "01d", "cielo claro"),
            forecast_sample("2024-11-15 12:00:00", 22.0, "01d", "cielo claro"),
            forecast_sample("2024-11-15 15:00:00", 24.0, "01d", "cielo claro"),
        ];

        let days = adapt_forecast(&samples);

        assert_eq!(days.len(), 1);
        assert_eq!(days[0].date, "2024-11-15");
        // 2024-11-15 is a Friday.
        assert_eq!(days[0].day_of_week, 5);
        assert_eq!(days[0].temp_min, 18);
        assert_eq!(days[0].temp_max, 24);
        assert_eq!(days[0].temp_day, 21);
    }

    #[test]
    fn adapt_forecast_groups_by_date_in_first_occurrence_order() {
        let samples = vec![
            forecast_sample("2024-11-16 12:00:00", 20.0, "01d", "cielo claro"),
            forecast_sample("2024-11-15 12:00:00", 20.0, "01d", "cielo claro"),
            forecast_sample("2024-11-16 15:00:00", 22.0, "01d", "cielo claro"),
        ];

        let days = adapt_forecast(&samples);

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, "2024-11-16");
        assert_eq!(days[1].date, "2024-11-15");
    }

    #[test]
    fn adapt_forecast_picks_most_frequent_icon() {
        let samples = vec![
            forecast_sample("2024-11-15 09:00:00", 20.0, "01d", "cielo claro"),
            forecast_sample("2024-11-15 12:00:00", 20.0, "03d", "nubes"),
            forecast_sample("2024-11-15 15:00:00", 20.0, "03d", "nubes"),
        ];

        let days = adapt_forecast(&samples);

        assert_eq!(days[0].icon, "03d");
        assert_eq!(days[0].description, "nubes");
    }

    #[test]
    fn adapt_forecast_breaks_icon_ties_by_first_encounter() {
        let samples = vec![
            forecast_sample("2024-11-15 09:00:00", 20.0, "10d", "lluvia ligera"),
            forecast_sample("2024-11-15 12:00:00", 20.0, "03d", "nubes"),
        ];

        let days = adapt_forecast(&samples);

        assert_eq!(days[0].icon, "10d");
        assert_eq!(days[0].description, "lluvia ligera");
    }

    #[test]
    fn adapt_forecast_takes_max_pop_as_percentage() {
        let mut first = forecast_sample("2024-11-15 09:00:00", 20.0, "01d", "cielo claro");
        first.pop = 0.1;
        let mut second = forecast_sample("2024-11-15 15:00:00", 20.0, "01d", "cielo claro");
        second.pop = 0.75;

        let days = adapt_forecast(&[first, second]);

        assert_eq!(days[0].pop, 75);
    }

    #[test]
    fn adapt_forecast_averages_humidity_and_wind() {
        let mut first = forecast_sample("2024-11-15 09:00:00", 20.0, "01d", "cielo claro");
        first.main.humidity = 50;
        first.wind.speed = 3.0;
        let mut second = forecast_sample("2024-11-15 15:00:00", 20.0, "01d", "cielo claro");
        second.main.humidity = 61;
        second.wind.speed = 4.5;

        let days = adapt_forecast(&[first, second]);

        assert_eq!(days[0].humidity, 56);
        assert_eq!(days[0].wind_speed, 3.8);
    }

    #[test]
    fn adapt_forecast_tolerates_samples_without_conditions() {
        let mut sample = forecast_sample("2024-11-15 09:00:00", 20.0, "01d", "cielo claro");
        sample.weather.clear();

        let days = adapt_forecast(&[sample]);

        assert_eq!(days[0].icon, FALLBACK_ICON);
        assert_eq!(days[0].description, "");
    }
}
