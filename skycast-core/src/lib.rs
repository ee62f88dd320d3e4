//! Core library for the `skycast` weather lookup tool.
//!
//! This crate defines:
//! - Configuration (API key, endpoints) and its on-disk persistence
//! - The provider wire model and the adapters that normalize it
//! - The remote fetch client and its transport abstraction
//! - The search coordinator and suggestion debouncer that manage in-flight
//!   request lifecycles under rapid user input
//!
//! It is used by `skycast-cli`, but can also be reused by other binaries or
//! services.

pub mod client;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod model;
pub mod openweather;
pub mod suggest;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{DEFAULT_SUGGESTION_LIMIT, FetchOptions, WeatherClient};
pub use config::Config;
pub use coordinator::{MessageCatalog, SearchCoordinator, SearchState};
pub use error::WeatherError;
pub use model::{Coordinates, CurrentConditions, DailyForecastSummary, GeocodingSuggestion};
pub use suggest::{SuggestionDebouncer, SuggestionsSnapshot};
pub use transport::{HttpTransport, Transport, TransportError};
