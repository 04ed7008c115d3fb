#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use std::time::Duration;

use axum::{extract::State, http::HeaderMap, http::StatusCode, routing::post, Router};
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use healthbridge_lib::{
    health::{RawSample, Unit},
    upload::{UploadClient, UploadConfig},
};

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap()
}

pub fn steps(value: f64, hours_ago: i64) -> RawSample {
    let end = now() - ChronoDuration::hours(hours_ago);
    RawSample::Quantity {
        value,
        unit: Unit::Count,
        start: end - ChronoDuration::hours(1),
        end,
    }
}

pub fn resting_bpm(value: f64, hours_ago: i64) -> RawSample {
    let end = now() - ChronoDuration::hours(hours_ago);
    RawSample::Quantity {
        value,
        unit: Unit::CountPerMinute,
        start: end,
        end,
    }
}

pub fn sleep(minutes: i64, hours_ago: i64) -> RawSample {
    let end = now() - ChronoDuration::hours(hours_ago);
    RawSample::Interval {
        start: end - ChronoDuration::minutes(minutes),
        end,
    }
}

#[derive(Clone, Default)]
pub struct MockEndpoint {
    pub url: String,
    hits: Arc<AtomicUsize>,
    last: Arc<Mutex<Option<(HeaderMap, String)>>>,
}

impl MockEndpoint {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<(HeaderMap, String)> {
        self.last.lock().unwrap().clone()
    }

    pub fn client(&self) -> UploadClient {
        client_for(&self.url)
    }
}

/// Local endpoint answering every POST with `status`.
pub async fn spawn_endpoint(status: StatusCode) -> MockEndpoint {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let endpoint = MockEndpoint {
        url: format!("http://{addr}/health-metrics"),
        ..MockEndpoint::default()
    };

    let app = Router::new()
        .route(
            "/health-metrics",
            post(
                move |State(mock): State<MockEndpoint>, headers: HeaderMap, body: String| async move {
                    mock.hits.fetch_add(1, Ordering::SeqCst);
                    *mock.last.lock().unwrap() = Some((headers, body));
                    status
                },
            ),
        )
        .with_state(endpoint.clone());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    endpoint
}

/// URL of a local port nothing listens on.
pub async fn closed_endpoint() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/health-metrics")
}

pub fn client_for(url: &str) -> UploadClient {
    UploadClient::new(&UploadConfig {
        endpoint: url.to_string(),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}
