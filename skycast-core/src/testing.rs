//! Shared test scaffolding: a scriptable [`Transport`] and wire-shaped JSON
//! builders used by the client, coordinator, and debouncer tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::transport::{Transport, TransportError};

#[derive(Debug, Clone)]
pub(crate) struct RecordedCall {
    pub url: String,
    pub params: Vec<(String, String)>,
}

impl RecordedCall {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }
}

/// Scripted transport behavior, consumed in FIFO order, one per `get` call.
#[derive(Debug)]
pub(crate) enum MockReply {
    Json(serde_json::Value),
    Status(u16),
    NetworkError,
    /// Pend until the call's cancellation token fires, then report `Canceled`.
    WaitForCancel,
}

#[derive(Debug, Default)]
pub(crate) struct MockTransport {
    calls: Mutex<Vec<RecordedCall>>,
    replies: Mutex<VecDeque<MockReply>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&self, reply: MockReply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(
        &self,
        url: &str,
        params: &[(String, String)],
        cancel: &CancellationToken,
    ) -> Result<serde_json::Value, TransportError> {
        self.calls.lock().unwrap().push(RecordedCall {
            url: url.to_string(),
            params: params.to_vec(),
        });

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("transport called more times than scripted");

        match reply {
            MockReply::Json(value) => Ok(value),
            MockReply::Status(status) => Err(TransportError::Status { status, body: String::new() }),
            MockReply::NetworkError => Err(TransportError::Network("connection refused".to_string())),
            MockReply::WaitForCancel => {
                cancel.cancelled().await;
                Err(TransportError::Canceled)
            }
        }
    }
}

pub(crate) fn current_weather_json(city: &str, country: &str, lat: f64, lon: f64) -> serde_json::Value {
    serde_json::json!({
        "name": city,
        "main": {
            "temp": 22.4, "feels_like": 21.5, "temp_min": 20.0,
            "temp_max": 25.0, "humidity": 55, "pressure": 1013
        },
        "weather": [{"id": 800, "main": "Clear", "description": "cielo claro", "icon": "01d"}],
        "wind": {"speed": 3.5, "deg": 180, "gust": 5.1},
        "clouds": {"all": 10},
        "visibility": 10_000,
        "sys": {"country": country, "sunrise": 1_700_000_000_i64, "sunset": 1_700_040_000_i64},
        "coord": {"lat": lat, "lon": lon},
        "dt": 1_700_020_000_i64,
        "timezone": 3600,
        "cod": 200
    })
}

pub(crate) fn forecast_json(dates: &[&str]) -> serde_json::Value {
    let list: Vec<serde_json::Value> = dates
        .iter()
        .map(|date| {
            serde_json::json!({
                "dt": 1_700_020_000_i64,
                "dt_txt": format!("{date} 12:00:00"),
                "main": {
                    "temp": 20.0, "feels_like": 18.0, "temp_min": 17.0,
                    "temp_max": 23.0, "humidity": 55, "pressure": 1013
                },
                "weather": [
                    {"id": 800, "main": "Clear", "description": "cielo claro", "icon": "01d"}
                ],
                "wind": {"speed": 3.0, "deg": 180},
                "clouds": {"all": 10},
                "pop": 0.2
            })
        })
        .collect();

    serde_json::json!({"list": list, "cod": "200"})
}

pub(crate) fn suggestions_json() -> serde_json::Value {
    serde_json::json!([
        {"name": "London", "lat": 51.5, "lon": -0.12, "country": "GB", "state": "England"},
        {"name": "Londonderry", "lat": 55.0, "lon": -7.3, "country": "GB"}
    ])
}
