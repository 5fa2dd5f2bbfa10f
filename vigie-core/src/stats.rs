// Analysis counter shown to visitors

use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use vigie_client::{ApiClient, Stats};

pub const STATS_REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Fetches the counter. Any failure yields zeros.
pub async fn fetch_stats(client: &ApiClient) -> Stats {
    match client.stats().await {
        Ok(stats) => {
            debug!("Stats: {} total, {} today", stats.total, stats.today);
            stats
        }
        Err(e) => {
            warn!("Failed to fetch stats: {}", e);
            Stats::default()
        }
    }
}

/// Compact display: `950`, `1.5k`, `2.3M`.
pub fn format_number(n: u64) -> String {
    if n < 1_000 {
        n.to_string()
    } else if n < 1_000_000 {
        format!("{:.1}k", n as f64 / 1_000.0)
    } else {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    }
}

/// Headline total: the backend's formatted value, or our own when it sent none.
pub fn display_total(stats: &Stats) -> String {
    if stats.formatted.total.trim().is_empty() {
        format_number(stats.total)
    } else {
        stats.formatted.total.clone()
    }
}

/// Fetches immediately, then once per `interval`, until the handle is aborted.
pub fn spawn_refresh<F>(client: ApiClient, interval: Duration, mut on_stats: F) -> JoinHandle<()>
where
    F: FnMut(Stats) + Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            on_stats(fetch_stats(&client).await);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_thresholds() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1_000), "1.0k");
        assert_eq!(format_number(1_500), "1.5k");
        assert_eq!(format_number(999_949), "999.9k");
        assert_eq!(format_number(1_000_000), "1.0M");
        assert_eq!(format_number(2_345_678), "2.3M");
    }

    #[test]
    fn test_display_total_prefers_backend_formatting() {
        let mut stats = Stats {
            total: 1520,
            ..Stats::default()
        };
        stats.formatted.total = "1 520".to_string();
        assert_eq!(display_total(&stats), "1 520");

        stats.formatted.total = String::new();
        assert_eq!(display_total(&stats), "1.5k");
    }
}
