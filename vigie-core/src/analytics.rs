//! Visitor analytics.
//!
//! Events are named, carry a flat property map, and are handed to an [`EventSink`]. The
//! process-wide [`Analytics`] instance is created once by [`init`] from the configured
//! Google Analytics measurement id and Plausible domain; each configured provider gets
//! a structured `tracing` record under the `vigie::analytics` target, which the
//! deployment's log shipper forwards to the provider.
//!
//! Tracking never fails the caller: sinks report errors, callers log and move on.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::{Arc, OnceLock};
use thiserror::Error;
use tracing::{debug, info};
use vigie_client::AnalysisType;

pub const ANALYSIS_STARTED: &str = "analysis_started";
pub const ANALYSIS_COMPLETED: &str = "analysis_completed";
pub const BOOKING_OPENED: &str = "booking_opened";
pub const APPOINTMENT_CONFIRMED: &str = "appointment_confirmed";
pub const PAGE_VIEW: &str = "page_view";

static ANALYTICS: OnceLock<Arc<Analytics>> = OnceLock::new();

#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Analytics transport unavailable: {0}")]
    Unavailable(String),

    #[error("Could not encode event: {0}")]
    Encoding(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsEvent {
    pub name: String,
    pub properties: Map<String, Value>,
    pub timestamp: DateTime<Utc>,
}

impl AnalyticsEvent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Map::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn with_property(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    pub fn analysis_started(url: &str, analysis_type: AnalysisType) -> Self {
        Self::new(ANALYSIS_STARTED)
            .with_property("url", url)
            .with_property("analysis_type", analysis_type.as_str())
    }

    pub fn analysis_completed(
        url: &str,
        analysis_type: AnalysisType,
        seo_score: Option<f64>,
        ia_score: Option<f64>,
    ) -> Self {
        Self::new(ANALYSIS_COMPLETED)
            .with_property("url", url)
            .with_property("analysis_type", analysis_type.as_str())
            .with_property("seo_score", seo_score)
            .with_property("ia_score", ia_score)
    }

    pub fn booking_opened() -> Self {
        Self::new(BOOKING_OPENED)
    }

    pub fn appointment_confirmed() -> Self {
        Self::new(APPOINTMENT_CONFIRMED)
    }

    pub fn page_view(path: &str) -> Self {
        Self::new(PAGE_VIEW).with_property("page_path", path)
    }
}

/// Destination of analytics events.
pub trait EventSink: Send + Sync {
    fn track(&self, event: &AnalyticsEvent) -> Result<(), TelemetryError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalyticsConfig {
    pub ga_measurement_id: Option<String>,
    pub plausible_domain: Option<String>,
}

impl AnalyticsConfig {
    pub fn new(ga_measurement_id: Option<String>, plausible_domain: Option<String>) -> Self {
        let non_empty = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        Self {
            ga_measurement_id: non_empty(ga_measurement_id),
            plausible_domain: non_empty(plausible_domain),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    GoogleAnalytics,
    Plausible,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::GoogleAnalytics => "google_analytics",
            Provider::Plausible => "plausible",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Analytics {
    config: AnalyticsConfig,
}

impl Analytics {
    pub fn new(config: AnalyticsConfig) -> Self {
        Self { config }
    }

    /// An instance with no provider; events are only logged at debug level.
    pub fn disabled() -> Self {
        Self::new(AnalyticsConfig::default())
    }

    pub fn providers(&self) -> Vec<Provider> {
        let mut providers = Vec::new();
        if self.config.ga_measurement_id.is_some() {
            providers.push(Provider::GoogleAnalytics);
        }
        if self.config.plausible_domain.is_some() {
            providers.push(Provider::Plausible);
        }
        providers
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }
}

impl EventSink for Analytics {
    fn track(&self, event: &AnalyticsEvent) -> Result<(), TelemetryError> {
        let properties = serde_json::to_string(&event.properties)?;

        for provider in self.providers() {
            let property_id = match provider {
                Provider::GoogleAnalytics => self.config.ga_measurement_id.as_deref(),
                Provider::Plausible => self.config.plausible_domain.as_deref(),
            }
            .unwrap_or_default();

            info!(
                target: "vigie::analytics",
                provider = provider.as_str(),
                property_id,
                event = %event.name,
                timestamp = %event.timestamp.to_rfc3339(),
                properties = %properties,
                "analytics event"
            );
        }

        debug!("[ANALYTICS] Event: {} {}", event.name, properties);
        Ok(())
    }
}

/// Initializes the process-wide analytics once. Later calls keep the first instance.
pub fn init(config: AnalyticsConfig) -> Arc<Analytics> {
    let mut created = false;
    let analytics = ANALYTICS.get_or_init(|| {
        created = true;
        Arc::new(Analytics::new(config.clone()))
    });

    if created {
        for provider in analytics.providers() {
            info!("[ANALYTICS] {} initialized", provider.as_str());
        }
    } else if analytics.config() != &config {
        debug!("[ANALYTICS] Already initialized, ignoring new configuration");
    }

    analytics.clone()
}

/// The process-wide analytics, if [`init`] ran.
pub fn global() -> Option<Arc<Analytics>> {
    ANALYTICS.get().cloned()
}

/// The sink components use by default: the global analytics, or a disabled one.
pub fn default_sink() -> Arc<dyn EventSink> {
    match global() {
        Some(analytics) => analytics as Arc<dyn EventSink>,
        None => Arc::new(Analytics::disabled()),
    }
}
