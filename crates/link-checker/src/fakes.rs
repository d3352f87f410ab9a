//! In-memory prober for tests.
//!
//! `ScriptedProber` answers from per-URL scripts instead of the network and
//! records every call it receives.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::probe::{ProbeError, ProbeMethod, Prober};

type Response = Result<u16, ProbeError>;

/// Scripted [`Prober`].
///
/// Each URL answers with its scripted responses in order; the last one
/// repeats once the script runs out. Unscripted URLs get the default
/// response (200 unless changed).
pub struct ScriptedProber {
    scripts: Mutex<HashMap<String, VecDeque<Response>>>,
    default: Response,
    latency: Duration,
    calls: Mutex<Vec<(ProbeMethod, String)>>,
}

impl Default for ScriptedProber {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedProber {
    pub fn new() -> Self {
        ScriptedProber {
            scripts: Mutex::new(HashMap::new()),
            default: Ok(200),
            latency: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Responses for `url`, consumed one per probe.
    pub fn script(self, url: &str, responses: impl IntoIterator<Item = Response>) -> Self {
        self.scripts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.to_string(), responses.into_iter().collect());
        self
    }

    pub fn with_default(mut self, response: Response) -> Self {
        self.default = response;
        self
    }

    /// Simulated time each probe takes.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Every probe received, in order.
    pub fn calls(&self) -> Vec<(ProbeMethod, String)> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self, url: &str) -> usize {
        self.calls().iter().filter(|(_, u)| u == url).count()
    }

    fn next_response(&self, url: &str) -> Response {
        let mut scripts = self.scripts.lock().unwrap_or_else(PoisonError::into_inner);
        match scripts.get_mut(url) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or(Ok(200)),
            Some(queue) => queue.front().cloned().unwrap_or_else(|| self.default.clone()),
            None => self.default.clone(),
        }
    }
}

#[async_trait]
impl Prober for ScriptedProber {
    async fn probe(
        &self,
        method: ProbeMethod,
        url: &str,
        _timeout: Duration,
    ) -> Result<u16, ProbeError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((method, url.to_string()));
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.next_response(url)
    }
}
