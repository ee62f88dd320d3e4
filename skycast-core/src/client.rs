//! Remote fetch client: the three retrieval operations against the provider,
//! and the single place where transport failures become domain errors.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error::WeatherError;
use crate::model::{CurrentConditions, DailyForecastSummary, GeocodingSuggestion};
use crate::openweather::{self, CurrentResponse, ForecastResponse};
use crate::transport::{Transport, TransportError};

pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

/// Per-call options for the weather and forecast fetches.
///
/// An absent `cancel` token means the call is not cancelable; an absent
/// `locale` falls back to the configured language.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub locale: Option<String>,
    pub cancel: Option<CancellationToken>,
}

impl FetchOptions {
    pub fn with_cancel(cancel: CancellationToken) -> Self {
        FetchOptions { locale: None, cancel: Some(cancel) }
    }

    fn token(&self) -> CancellationToken {
        self.cancel.clone().unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct WeatherClient {
    config: Config,
    transport: Arc<dyn Transport>,
}

impl WeatherClient {
    pub fn new(config: Config, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Current conditions for a city name.
    ///
    /// Fails with [`WeatherError::EmptyQuery`] before any network call when
    /// the trimmed name is empty. Cancellation surfaces as
    /// [`WeatherError::Canceled`], untouched.
    pub async fn fetch_current_weather(
        &self,
        city: &str,
        options: &FetchOptions,
    ) -> Result<CurrentConditions, WeatherError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherError::EmptyQuery);
        }

        let params = vec![
            ("q".to_string(), city.to_string()),
            ("appid".to_string(), self.config.api_key.clone()),
            ("units".to_string(), "metric".to_string()),
            ("lang".to_string(), self.lang(options)),
        ];

        let token = options.token();
        let value = self
            .transport
            .get(&self.config.weather_url, &params, &token)
            .await
            .map_err(|err| classify_city_error(err, city))?;

        let raw: CurrentResponse = serde_json::from_value(value).map_err(|err| {
            tracing::debug!(error = %err, "current weather response failed to decode");
            WeatherError::NetworkFailure
        })?;

        Ok(openweather::adapt_current(raw))
    }

    /// Daily forecast summaries for a coordinate pair.
    ///
    /// Coordinates are always well-formed, so there is no input validation;
    /// everything but cancellation collapses to
    /// [`WeatherError::NetworkFailure`].
    pub async fn fetch_forecast(
        &self,
        lat: f64,
        lon: f64,
        options: &FetchOptions,
    ) -> Result<Vec<DailyForecastSummary>, WeatherError> {
        let params = vec![
            ("lat".to_string(), lat.to_string()),
            ("lon".to_string(), lon.to_string()),
            ("appid".to_string(), self.config.api_key.clone()),
            ("units".to_string(), "metric".to_string()),
            ("lang".to_string(), self.lang(options)),
        ];

        let token = options.token();
        let value = self
            .transport
            .get(&self.config.forecast_url, &params, &token)
            .await
            .map_err(classify_forecast_error)?;

        let raw: ForecastResponse = serde_json::from_value(value).map_err(|err| {
            tracing::debug!(error = %err, "forecast response failed to decode");
            WeatherError::NetworkFailure
        })?;

        Ok(openweather::adapt_forecast(&raw.list))
    }

    /// Geocoding matches for an autocomplete query. Advisory endpoint: fails
    /// open to an empty list for short queries and on any transport or
    /// decoding error, never to the caller.
    pub async fn fetch_suggestions(
        &self,
        query: &str,
        cancel: Option<CancellationToken>,
        limit: usize,
    ) -> Vec<GeocodingSuggestion> {
        let query = query.trim();
        if query.chars().count() < 2 {
            return Vec::new();
        }

        let params = vec![
            ("q".to_string(), query.to_string()),
            ("limit".to_string(), limit.to_string()),
            ("appid".to_string(), self.config.api_key.clone()),
        ];

        let token = cancel.unwrap_or_default();
        match self.transport.get(&self.config.geocoding_url, &params, &token).await {
            Ok(value) => serde_json::from_value(value).unwrap_or_else(|err| {
                tracing::debug!(error = %err, "geocoding response failed to decode");
                Vec::new()
            }),
            Err(err) => {
                tracing::debug!(error = %err, "suggestion fetch failed, returning empty");
                Vec::new()
            }
        }
    }

    fn lang(&self, options: &FetchOptions) -> String {
        options
            .locale
            .clone()
            .unwrap_or_else(|| self.config.language.clone())
    }
}

fn classify_city_error(err: TransportError, city: &str) -> WeatherError {
    match err {
        TransportError::Canceled => WeatherError::Canceled,
        TransportError::Status { status: 404, .. } => WeatherError::not_found(city),
        TransportError::Status { status: 401, .. } => WeatherError::Unauthorized,
        TransportError::Status { .. } | TransportError::Network(_) => WeatherError::NetworkFailure,
    }
}

fn classify_forecast_error(err: TransportError) -> WeatherError {
    match err {
        TransportError::Canceled => WeatherError::Canceled,
        TransportError::Status { .. } | TransportError::Network(_) => WeatherError::NetworkFailure,
    }
}
