// Runtime configuration

use crate::analytics::AnalyticsConfig;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_BOOKING_URL: &str = "https://calendly.com/djerbi/audit-gratuite-pour-evaluer-vos-besoins";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_base_url: String,
    pub analytics: AnalyticsConfig,
    /// Scheduling page opened for the booking call-to-action.
    pub booking_url: String,
}

impl Config {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_analytics(mut self, analytics: AnalyticsConfig) -> Self {
        self.analytics = analytics;
        self
    }

    pub fn with_booking_url(mut self, booking_url: impl Into<String>) -> Self {
        self.booking_url = booking_url.into();
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            analytics: AnalyticsConfig::default(),
            booking_url: DEFAULT_BOOKING_URL.to_string(),
        }
    }
}
