use async_trait::async_trait;
use reqwest::{Client, header};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::{config::AppConfig, models::VersionInfo};

/// Reloader
///
/// Invoked when a newer deployment is detected.
#[async_trait]
pub trait Reloader: Send + Sync {
    async fn reload(&self, from: &str, to: &str);
}

/// FlagReloader
///
/// Raises a flag the owner polls; the binary rebuilds its navigator when it is set.
#[derive(Clone, Default)]
pub struct FlagReloader {
    requested: Arc<AtomicBool>,
}

impl FlagReloader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether a reload was requested and clears the request.
    pub fn take(&self) -> bool {
        self.requested.swap(false, Ordering::SeqCst)
    }
}

#[async_trait]
impl Reloader for FlagReloader {
    async fn reload(&self, from: &str, to: &str) {
        tracing::info!(from, to, "reload requested");
        self.requested.store(true, Ordering::SeqCst);
    }
}

pub type ReloaderState = Arc<dyn Reloader>;

/// VersionCheck
///
/// Result of one poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionCheck {
    /// First successful poll; the version is now the baseline.
    Recorded(String),
    Unchanged,
    Changed { from: String, to: String },
    /// Fetch or decode failed; nothing changes.
    Failed,
}

/// VersionChecker
///
/// Polls the deployed `version.json` and requests a reload when it differs from the
/// version seen first.
#[derive(Clone)]
pub struct VersionChecker {
    http: Client,
    url: String,
    interval: Duration,
    current: Arc<Mutex<Option<String>>>,
    reloader: ReloaderState,
}

impl VersionChecker {
    pub fn new(config: &AppConfig, reloader: ReloaderState) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            http,
            url: config.version_url.clone(),
            interval: config.version_poll_interval,
            current: Arc::new(Mutex::new(None)),
            reloader,
        })
    }

    pub async fn current_version(&self) -> Option<String> {
        self.current.lock().await.clone()
    }

    async fn fetch(&self) -> Result<VersionInfo, reqwest::Error> {
        self.http
            .get(&self.url)
            .header(header::CACHE_CONTROL, "no-store")
            .header(header::PRAGMA, "no-cache")
            .send()
            .await?
            .error_for_status()?
            .json::<VersionInfo>()
            .await
    }

    pub async fn check_once(&self) -> VersionCheck {
        let remote = match self.fetch().await {
            Ok(info) => info.version,
            Err(e) => {
                tracing::error!(error = %e, url = %self.url, "version check failed");
                return VersionCheck::Failed;
            }
        };

        let mut current = self.current.lock().await;
        match current.clone() {
            None => {
                tracing::debug!(version = %remote, "recorded app version");
                *current = Some(remote.clone());
                VersionCheck::Recorded(remote)
            }
            Some(seen) if seen == remote => VersionCheck::Unchanged,
            Some(from) => {
                // Adopt the new version so one deployment triggers one reload.
                *current = Some(remote.clone());
                drop(current);
                tracing::info!(from = %from, to = %remote, "new version detected, reloading");
                self.reloader.reload(&from, &remote).await;
                VersionCheck::Changed { from, to: remote }
            }
        }
    }

    /// Checks immediately, then on every interval tick, until the handle is aborted.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval.max(Duration::from_secs(1)));
            loop {
                // The first tick completes immediately.
                ticker.tick().await;
                self.check_once().await;
            }
        })
    }
}
