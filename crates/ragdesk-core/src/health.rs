use std::fmt;
use std::sync::Mutex;

use crate::api::QueryBackend;

/// Backend readiness as it gates the send affordance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ApiStatus {
    #[default]
    Checking,
    Ready,
    Initializing,
    Error,
}

impl ApiStatus {
    pub fn can_send(self) -> bool {
        self == ApiStatus::Ready
    }

    /// Short indicator text for the session list footer.
    pub fn label(self) -> &'static str {
        if self.can_send() {
            "Online"
        } else {
            "Offline"
        }
    }
}

impl fmt::Display for ApiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ApiStatus::Checking => "checking",
            ApiStatus::Ready => "ready",
            ApiStatus::Initializing => "initializing",
            ApiStatus::Error => "error",
        };
        f.write_str(name)
    }
}

/// One-shot readiness probe.
///
/// Nothing here polls or retries: after a failed probe the status stays
/// `Error` until the host calls [`HealthMonitor::probe`] again.
#[derive(Debug, Default)]
pub struct HealthMonitor {
    status: Mutex<ApiStatus>,
}

impl HealthMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> ApiStatus {
        self.status.lock().map(|s| *s).unwrap_or(ApiStatus::Error)
    }

    pub fn can_send(&self) -> bool {
        self.status().can_send()
    }

    fn set(&self, status: ApiStatus) {
        if let Ok(mut current) = self.status.lock() {
            *current = status;
        }
    }

    pub async fn probe(&self, backend: &dyn QueryBackend) -> ApiStatus {
        self.set(ApiStatus::Checking);

        let status = match backend.health().await {
            Ok(report) if report.system_initialized => ApiStatus::Ready,
            Ok(_) => ApiStatus::Initializing,
            Err(e) => {
                tracing::warn!("Health probe failed: {}", e);
                ApiStatus::Error
            }
        };

        tracing::info!("Backend status: {}", status);
        self.set(status);
        status
    }
}
