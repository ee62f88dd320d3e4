//! Debounced autocomplete pipeline: query changes schedule a suggestions
//! fetch after a quiet window, and every new change retires both the pending
//! timer and any in-flight fetch before scheduling its own.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::client::{DEFAULT_SUGGESTION_LIMIT, WeatherClient};
use crate::model::GeocodingSuggestion;

/// Quiet period between the last keystroke and the network call.
pub const DEBOUNCE: Duration = Duration::from_millis(350);

/// Observable autocomplete state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SuggestionsSnapshot {
    pub suggestions: Vec<GeocodingSuggestion>,
    pub loading: bool,
}

#[derive(Debug)]
struct Shared {
    suggestions: Vec<GeocodingSuggestion>,
    loading: bool,
    token: CancellationToken,
    pending: Option<JoinHandle<()>>,
}

/// Time-windowed, cancelable query-to-suggestions pipeline.
///
/// At most one pending timer and one in-flight fetch exist at any instant:
/// [`SuggestionDebouncer::on_query_changed`] replaces and cancels both before
/// scheduling. Results of a superseded fetch never reach the snapshot; the
/// spawned task re-checks its token before committing. Must be used from
/// within a tokio runtime.
pub struct SuggestionDebouncer {
    client: WeatherClient,
    shared: Arc<Mutex<Shared>>,
    debounce: Duration,
}

impl SuggestionDebouncer {
    pub fn new(client: WeatherClient) -> Self {
        Self {
            client,
            shared: Arc::new(Mutex::new(Shared {
                suggestions: Vec::new(),
                loading: false,
                token: CancellationToken::new(),
                pending: None,
            })),
            debounce: DEBOUNCE,
        }
    }

    /// Override the quiet window, mainly for tests.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Snapshot of the observable state.
    pub fn snapshot(&self) -> SuggestionsSnapshot {
        let shared = self.shared.lock().unwrap();
        SuggestionsSnapshot {
            suggestions: shared.suggestions.clone(),
            loading: shared.loading,
        }
    }

    /// React to an edited query: retire the previous timer and fetch, then
    /// either clear (query too short) or mark loading and schedule a fetch
    /// for after the quiet window.
    pub fn on_query_changed(&self, query: &str) {
        let mut shared = self.shared.lock().unwrap();
        retire(&mut shared);

        let trimmed = query.trim();
        if trimmed.chars().count() < 2 {
            shared.suggestions.clear();
            shared.loading = false;
            return;
        }

        // Loading flips on synchronously so callers can show a busy state
        // before the quiet window elapses.
        shared.loading = true;

        let token = CancellationToken::new();
        shared.token = token.clone();

        let client = self.client.clone();
        let state = Arc::clone(&self.shared);
        let query = trimmed.to_string();
        let debounce = self.debounce;

        shared.pending = Some(tokio::spawn(async move {
            tokio::select! {
                () = token.cancelled() => return,
                () = tokio::time::sleep(debounce) => {}
            }

            let results = client
                .fetch_suggestions(&query, Some(token.clone()), DEFAULT_SUGGESTION_LIMIT)
                .await;

            let mut shared = state.lock().unwrap();
            if token.is_cancelled() {
                tracing::debug!(query = %query, "suggestion fetch superseded before commit");
                return;
            }
            shared.suggestions = results;
            shared.loading = false;
        }));
    }

    /// Cancel any pending timer or in-flight fetch and reset to empty.
    pub fn clear(&self) {
        let mut shared = self.shared.lock().unwrap();
        retire(&mut shared);
        shared.suggestions.clear();
        shared.loading = false;
    }
}

fn retire(shared: &mut Shared) {
    shared.token.cancel();
    if let Some(pending) = shared.pending.take() {
        pending.abort();
    }
}

impl Drop for SuggestionDebouncer {
    fn drop(&mut self) {
        // No orphaned task may mutate state after disposal.
        if let Ok(mut shared) = self.shared.lock() {
            retire(&mut shared);
        }
    }
}
