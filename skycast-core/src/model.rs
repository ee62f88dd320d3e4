use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Current conditions for one city, normalized from the provider wire format.
///
/// Temperature fields are integer degrees Celsius, rounded from the provider's
/// fractional values. `description` and `icon` fall back to `""` / `"01d"`
/// when the provider supplies no weather-condition entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub city: String,
    /// ISO 3166 country code.
    pub country: String,
    pub temperature: i32,
    pub feels_like: i32,
    pub temp_min: i32,
    pub temp_max: i32,
    /// Relative humidity, percent.
    pub humidity: u8,
    /// Atmospheric pressure, hPa.
    pub pressure: u32,
    pub description: String,
    pub icon: String,
    /// Wind speed, m/s.
    pub wind_speed: f64,
    /// Wind direction, degrees.
    pub wind_deg: u16,
    /// Wind gust, m/s, when reported.
    pub wind_gust: Option<f64>,
    /// Cloud cover, percent.
    pub clouds: u8,
    /// Visibility, meters.
    pub visibility: u32,
    /// UTC epoch seconds.
    pub sunrise: i64,
    /// UTC epoch seconds.
    pub sunset: i64,
    /// Offset from UTC, seconds.
    pub timezone: i32,
    pub coord: Coordinates,
}

/// One calendar day aggregated from the provider's 3-hour forecast samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecastSummary {
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// 0 = Sunday .. 6 = Saturday.
    pub day_of_week: u8,
    /// Mean temperature over the day's samples, rounded.
    pub temp_day: i32,
    pub temp_min: i32,
    pub temp_max: i32,
    /// Most frequent icon among the day's samples.
    pub icon: String,
    pub description: String,
    /// Mean humidity, percent, rounded.
    pub humidity: u8,
    /// Mean wind speed, m/s, rounded to one decimal.
    pub wind_speed: f64,
    /// Max precipitation probability over the day, 0-100.
    pub pop: u8,
}

/// One geocoding match for an autocomplete query. This mirrors the provider's
/// geocoding wire entries directly, so it is deserialized without an adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodingSuggestion {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub country: String,
    /// Administrative region, when the provider reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}
