//! Test doubles for the fetcher and notifier seams.

use crate::crawlers::PageFetcher;
use crate::error::{FetchError, SendError};
use crate::notify::Notifier;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone)]
enum FakeResponse {
    Page { body: String, delay: Option<Duration> },
    Status(u16),
}

/// Serves canned pages by URL; unknown URLs answer 404
#[derive(Clone, Default)]
pub struct FakeFetcher {
    responses: HashMap<String, FakeResponse>,
    calls: Arc<AtomicUsize>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, body: &str) -> Self {
        self.responses.insert(
            url.to_string(),
            FakeResponse::Page {
                body: body.to_string(),
                delay: None,
            },
        );
        self
    }

    pub fn with_page_delayed(mut self, url: &str, body: &str, delay: Duration) -> Self {
        self.responses.insert(
            url.to_string(),
            FakeResponse::Page {
                body: body.to_string(),
                delay: Some(delay),
            },
        );
        self
    }

    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.responses
            .insert(url.to_string(), FakeResponse::Status(status));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match self.responses.get(url).cloned() {
            Some(FakeResponse::Page { body, delay }) => {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                Ok(body)
            }
            Some(FakeResponse::Status(status)) => Err(FetchError::Status {
                url: url.to_string(),
                status,
            }),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

/// Records every snapshot it is asked to send
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<String>>>,
    attempts: Arc<AtomicUsize>,
    failing: Arc<AtomicBool>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent sends fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Snapshots that were delivered successfully
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    /// Number of send attempts, successful or not
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, snapshot: &str) -> Result<(), SendError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        if self.failing.load(Ordering::SeqCst) {
            return Err(SendError::Api {
                status: 503,
                message: "unavailable".to_string(),
            });
        }

        self.sent.lock().unwrap().push(snapshot.to_string());
        Ok(())
    }
}

/// Builds a grid-layout listing page with one card per `(name, sku)`
pub fn grid_page(vehicles: &[(&str, &str)]) -> String {
    let cards = vehicles
        .iter()
        .map(|(name, sku)| {
            format!(
                r#"<div class="vehicle-grid-cell">
                     <div class="vehicle-year-make-model-1"><span itemprop="model">{}</span></div>
                     <div class="vehicle-information-grid">{}</div>
                   </div>"#,
                name, sku
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!("<html><body>{}</body></html>", cards)
}
