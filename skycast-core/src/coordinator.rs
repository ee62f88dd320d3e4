//! Request lifecycle coordinator for a weather search.
//!
//! Owns the `Idle -> Loading -> Success | Error` state machine, sequences the
//! current-conditions fetch and its dependent forecast fetch under one shared
//! cancellation token, and retires the previous search's token before issuing
//! any new network call. Every state commit re-checks token liveness under
//! the same lock, so a superseded search can never overwrite a newer one.

use std::sync::{Arc, Mutex};

use tokio_util::sync::CancellationToken;

use crate::client::{FetchOptions, WeatherClient};
use crate::error::WeatherError;
use crate::model::{CurrentConditions, DailyForecastSummary};

/// Locale-aware display text for the error taxonomy, supplied by the caller.
///
/// `city_not_found` receives the name the user typed, not a server-echoed
/// value, so the rendered message matches the input even when the provider
/// normalizes casing.
pub trait MessageCatalog: Send + Sync {
    fn empty_query(&self) -> String;
    fn city_not_found(&self, city: &str) -> String;
    fn unauthorized(&self) -> String;
    fn network_failure(&self) -> String;
}

/// Observable search state. Forecast is filled only after current conditions
/// succeed; a forecast-only failure leaves `Success` with an empty forecast.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SearchState {
    #[default]
    Idle,
    Loading,
    Success {
        current: CurrentConditions,
        forecast: Vec<DailyForecastSummary>,
    },
    Error {
        message: String,
    },
}

#[derive(Debug)]
struct Inner {
    token: CancellationToken,
    state: SearchState,
}

pub struct SearchCoordinator {
    client: WeatherClient,
    messages: Arc<dyn MessageCatalog>,
    locale: Option<String>,
    inner: Mutex<Inner>,
}

impl SearchCoordinator {
    pub fn new(client: WeatherClient, messages: Arc<dyn MessageCatalog>) -> Self {
        Self {
            client,
            messages,
            locale: None,
            inner: Mutex::new(Inner {
                token: CancellationToken::new(),
                state: SearchState::Idle,
            }),
        }
    }

    /// Forward a language hint to the provider on every fetch.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Snapshot of the observable state.
    pub fn state(&self) -> SearchState {
        self.inner.lock().unwrap().state.clone()
    }

    /// Run a full search sequence: cancel whatever is in flight, fetch
    /// current conditions, then fetch the forecast under the same token.
    pub async fn search(&self, city: &str) {
        let token = {
            let mut inner = self.inner.lock().unwrap();
            inner.token.cancel();
            inner.token = CancellationToken::new();
            inner.state = SearchState::Loading;
            inner.token.clone()
        };

        let options = FetchOptions {
            locale: self.locale.clone(),
            cancel: Some(token.clone()),
        };

        let current = match self.client.fetch_current_weather(city, &options).await {
            Ok(current) => current,
            Err(err) => {
                let Some(message) = self.render_error(&err, city) else {
                    // Canceled: a newer search owns the state now.
                    return;
                };
                let mut inner = self.inner.lock().unwrap();
                if token.is_cancelled() {
                    return;
                }
                inner.state = SearchState::Error { message };
                return;
            }
        };

        let coord = current.coord;
        {
            let mut inner = self.inner.lock().unwrap();
            if token.is_cancelled() {
                tracing::debug!(city, "search superseded before commit");
                return;
            }
            inner.state = SearchState::Success {
                current,
                forecast: Vec::new(),
            };
        }

        if token.is_cancelled() {
            return;
        }

        match self.client.fetch_forecast(coord.lat, coord.lon, &options).await {
            Ok(forecast) => {
                let mut inner = self.inner.lock().unwrap();
                if token.is_cancelled() {
                    return;
                }
                if let SearchState::Success { forecast: slot, .. } = &mut inner.state {
                    *slot = forecast;
                }
            }
            Err(WeatherError::Canceled) => {}
            Err(err) => {
                // Partial-failure tolerance: current conditions stand on
                // their own, the outlook just stays empty.
                tracing::debug!(error = %err, "forecast fetch failed, keeping current conditions");
            }
        }
    }

    /// Cancel any outstanding sequence and return to `Idle`.
    pub fn reset(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.token.cancel();
        inner.state = SearchState::Idle;
    }

    /// `None` for `Canceled`: it is a control signal, never display text.
    fn render_error(&self, err: &WeatherError, city: &str) -> Option<String> {
        match err {
            WeatherError::EmptyQuery => Some(self.messages.empty_query()),
            WeatherError::NotFound { .. } => Some(self.messages.city_not_found(city)),
            WeatherError::Unauthorized => Some(self.messages.unauthorized()),
            WeatherError::NetworkFailure => Some(self.messages.network_failure()),
            WeatherError::Canceled => None,
        }
    }
}

impl Drop for SearchCoordinator {
    fn drop(&mut self) {
        // Tear-down obligation: nothing outlives the coordinator.
        if let Ok(inner) = self.inner.lock() {
            inner.token.cancel();
        }
    }
}
