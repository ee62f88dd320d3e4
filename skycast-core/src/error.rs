use thiserror::Error;

/// Domain errors for weather lookups.
///
/// This is a closed set: [`crate::client::WeatherClient`] is the only place
/// where transport failures are classified into it, and everything above the
/// client matches on it exhaustively. `Canceled` is a control signal consumed
/// by the coordinator and debouncer; it never reaches display code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeatherError {
    /// The requested city name was empty after trimming. No network call is
    /// made in this case.
    #[error("city name is empty")]
    EmptyQuery,

    /// The provider reported no match for the requested subject.
    #[error("no match found for '{subject}'")]
    NotFound { subject: String },

    /// The provider rejected the configured API key.
    #[error("provider rejected the API key")]
    Unauthorized,

    /// Any other transport-level failure, including malformed response bodies.
    #[error("network failure")]
    NetworkFailure,

    /// The request was superseded and its cancellation token fired.
    #[error("request canceled")]
    Canceled,
}

impl WeatherError {
    pub fn not_found(subject: impl Into<String>) -> Self {
        WeatherError::NotFound { subject: subject.into() }
    }
}
