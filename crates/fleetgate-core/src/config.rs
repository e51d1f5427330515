//! fleetgate.toml configuration parser.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default retention for tracked-instance records, in days.
pub const DEFAULT_TTL_DAYS: u32 = 3;

/// Default interval between scale-in checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FleetgateConfig {
    pub lifecycle: Option<LifecycleSection>,
    pub tracked_store: Option<TrackedStoreSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LifecycleSection {
    /// Name of the scale-in lifecycle hook. Empty or absent disables
    /// the scale-in check entirely.
    pub scale_in_hook: Option<String>,
    /// Interval between checks (e.g., "30s", "5m").
    pub poll_interval: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedStoreSection {
    /// Filesystem path of the tracked-instance database.
    pub path: String,
    /// Retention hint for tracked records, in days.
    pub ttl_days: Option<u32>,
}

impl FleetgateConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: FleetgateConfig = toml::from_str(content)?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// The configured hook name, or "" when the feature is disabled.
    pub fn hook_name(&self) -> &str {
        self.lifecycle
            .as_ref()
            .and_then(|l| l.scale_in_hook.as_deref())
            .unwrap_or("")
    }

    /// Whether a tracked-instance store is configured.
    ///
    /// An empty `path` counts as unconfigured, mirroring the empty-string
    /// convention used for the hook name.
    pub fn tracked_store_enabled(&self) -> bool {
        self.tracked_store
            .as_ref()
            .is_some_and(|s| !s.path.is_empty())
    }

    /// Retention for tracked records, in days.
    pub fn ttl_days(&self) -> u32 {
        self.tracked_store
            .as_ref()
            .and_then(|s| s.ttl_days)
            .unwrap_or(DEFAULT_TTL_DAYS)
    }

    /// Interval between scale-in checks.
    pub fn poll_interval(&self) -> Duration {
        self.lifecycle
            .as_ref()
            .and_then(|l| l.poll_interval.as_deref())
            .and_then(parse_duration)
            .unwrap_or(DEFAULT_POLL_INTERVAL)
    }
}

/// Parse a duration string like "30s", "500ms", "5m".
fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(ms) = s.strip_suffix("ms") {
        ms.parse::<u64>().ok().map(Duration::from_millis)
    } else if let Some(secs) = s.strip_suffix('s') {
        secs.parse::<u64>().ok().map(Duration::from_secs)
    } else if let Some(mins) = s.strip_suffix('m') {
        mins.parse::<u64>().ok().map(|m| Duration::from_secs(m * 60))
    } else {
        s.parse::<u64>().ok().map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
[lifecycle]
scale_in_hook = "scale-in-hook-name"
poll_interval = "10s"

[tracked_store]
path = "/var/lib/fleetgate/instances.redb"
ttl_days = 7
"#;
        let config = FleetgateConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.hook_name(), "scale-in-hook-name");
        assert_eq!(config.poll_interval(), Duration::from_secs(10));
        assert!(config.tracked_store_enabled());
        assert_eq!(config.ttl_days(), 7);
    }

    #[test]
    fn empty_config_disables_everything() {
        let config = FleetgateConfig::from_toml_str("").unwrap();
        assert_eq!(config.hook_name(), "");
        assert!(!config.tracked_store_enabled());
        assert_eq!(config.ttl_days(), DEFAULT_TTL_DAYS);
        assert_eq!(config.poll_interval(), DEFAULT_POLL_INTERVAL);
    }

    #[test]
    fn empty_hook_string_stays_empty() {
        let toml_str = r#"
[lifecycle]
scale_in_hook = ""
"#;
        let config = FleetgateConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.hook_name(), "");
    }

    #[test]
    fn empty_store_path_counts_as_unconfigured() {
        let toml_str = r#"
[tracked_store]
path = ""
"#;
        let config = FleetgateConfig::from_toml_str(toml_str).unwrap();
        assert!(!config.tracked_store_enabled());
    }

    #[test]
    fn bad_poll_interval_falls_back_to_default() {
        let toml_str = r#"
[lifecycle]
scale_in_hook = "hook"
poll_interval = "soon"
"#;
        let config = FleetgateConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.poll_interval(), DEFAULT_POLL_INTERVAL);
    }

    #[test]
    fn round_trips_through_toml() {
        let config = FleetgateConfig {
            lifecycle: Some(LifecycleSection {
                scale_in_hook: Some("hook".to_string()),
                poll_interval: Some("1m".to_string()),
            }),
            tracked_store: None,
        };
        let toml_str = config.to_toml_string().unwrap();
        let parsed = FleetgateConfig::from_toml_str(&toml_str).unwrap();
        assert_eq!(parsed.hook_name(), "hook");
        assert_eq!(parsed.poll_interval(), Duration::from_secs(60));
    }

    #[test]
    fn parse_duration_units() {
        assert_eq!(parse_duration("30s"), Some(Duration::from_secs(30)));
        assert_eq!(parse_duration("500ms"), Some(Duration::from_millis(500)));
        assert_eq!(parse_duration("5m"), Some(Duration::from_secs(300)));
        assert_eq!(parse_duration("10"), Some(Duration::from_secs(10)));
        assert_eq!(parse_duration("soon"), None);
    }
}
