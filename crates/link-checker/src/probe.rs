//! Network probe abstraction and its reqwest-backed implementation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use agentdir_core::netloc_of;
use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::config::LinkCheckConfig;
use crate::Result;

/// Redirect hops followed before a probe gives up.
const MAX_REDIRECTS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeMethod {
    Head,
    Get,
}

/// Why a single probe produced no status code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProbeError {
    #[error("Timeout")]
    Timeout,

    /// Connection, TLS, redirect or protocol failure.
    #[error("{0}")]
    Client(String),

    #[error("{0}")]
    Other(String),
}

/// One network attempt against a URL.
///
/// Implementations follow redirects and do not validate certificates;
/// only reachability is being tested.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(
        &self,
        method: ProbeMethod,
        url: &str,
        timeout: Duration,
    ) -> std::result::Result<u16, ProbeError>;
}

/// HTTP prober with global and per-host connection caps.
pub struct ReqwestProber {
    client: reqwest::Client,
    global: Arc<Semaphore>,
    per_host_limit: usize,
    hosts: Mutex<HashMap<String, Arc<Semaphore>>>,
}

impl ReqwestProber {
    pub fn new(config: &LinkCheckConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .danger_accept_invalid_certs(true)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .pool_max_idle_per_host(config.max_connections_per_host)
            .build()?;

        Ok(ReqwestProber {
            client,
            global: Arc::new(Semaphore::new(config.max_connections.max(1))),
            per_host_limit: config.max_connections_per_host.max(1),
            hosts: Mutex::new(HashMap::new()),
        })
    }

    fn host_semaphore(&self, url: &str) -> Arc<Semaphore> {
        let mut hosts = self.hosts.lock().unwrap_or_else(PoisonError::into_inner);
        hosts
            .entry(netloc_of(url))
            .or_insert_with(|| Arc::new(Semaphore::new(self.per_host_limit)))
            .clone()
    }
}

fn classify_error(err: &reqwest::Error) -> ProbeError {
    if err.is_timeout() {
        ProbeError::Timeout
    } else if err.is_builder() {
        ProbeError::Other(err.to_string())
    } else {
        ProbeError::Client(err.to_string())
    }
}

#[async_trait]
impl Prober for ReqwestProber {
    async fn probe(
        &self,
        method: ProbeMethod,
        url: &str,
        timeout: Duration,
    ) -> std::result::Result<u16, ProbeError> {
        let _global = self.global.clone().acquire_owned().await.ok();
        let _host = self.host_semaphore(url).acquire_owned().await.ok();

        let request = match method {
            ProbeMethod::Head => self.client.head(url),
            ProbeMethod::Get => self.client.get(url),
        };
        match request.timeout(timeout).send().await {
            Ok(response) => Ok(response.status().as_u16()),
            Err(err) => Err(classify_error(&err)),
        }
    }
}
