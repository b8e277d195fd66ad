//! Scripted encoder used by the dispatch tests.

use super::{EncodeRequest, Encoder};
use crate::error::CompressError;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Succeeds by writing a placeholder output, fails for scripted file names
#[derive(Default)]
pub struct ScriptedEncoder {
    failing: HashSet<String>,
    delay: Duration,
    calls: Mutex<Vec<EncodeRequest>>,
    active: AtomicUsize,
    peak: AtomicUsize,
}

impl ScriptedEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every request whose source file name is `name`
    pub fn failing_on(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<EncodeRequest> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Highest number of encodes observed in flight at once
    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Encoder for ScriptedEncoder {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn encode(&self, request: &EncodeRequest) -> Result<(), CompressError> {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        if let Ok(mut calls) = self.calls.lock() {
            calls.push(request.clone());
        }

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let name = request
            .source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let result = if self.failing.contains(&name) {
            Err(CompressError::Encode(format!("scripted failure for {}", name)))
        } else {
            tokio::fs::write(&request.destination, b"encoded")
                .await
                .map_err(CompressError::from)
        };

        self.active.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
