//! Application Configuration
//!
//! Connection coordinates for the hosted store plus the optional page
//! features. Every field has a default so a partial JSON object is enough.

use serde::{Deserialize, Serialize};

use crate::error::{BingoError, BingoResult};

pub const DEFAULT_CARD_SIZE: usize = 16;
pub const DEFAULT_CARD_KEY: &str = "stanBingoCardIds";
pub const DEFAULT_RULES_KEY: &str = "hasSeenRules";

/// Optional behaviour toggles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    /// Reload the full item set when the window regains focus or the tab becomes visible
    pub refresh_on_focus: bool,
    /// Show the one-time rules modal before the board
    pub rules_modal: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            refresh_on_focus: true,
            rules_modal: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BingoConfig {
    /// Project base url, e.g. `https://abc.supabase.co`
    pub supabase_url: String,
    /// Public anon key, sent as `apikey` and bearer token
    pub supabase_anon_key: String,
    pub schema: String,
    pub table: String,
    pub card_size: usize,
    pub card_key: String,
    pub rules_key: String,
    pub board_channel: String,
    pub admin_channel: String,
    pub heartbeat_interval_ms: u32,
    /// First delay before resubscribing after the socket closed
    pub reconnect_initial_ms: u64,
    /// Ceiling for the doubling resubscribe delay
    pub reconnect_max_ms: u64,
    pub log_level: String,
    pub features: FeatureFlags,
}

impl Default for BingoConfig {
    fn default() -> Self {
        Self {
            supabase_url: String::new(),
            supabase_anon_key: String::new(),
            schema: "public".to_string(),
            table: "bingo_items".to_string(),
            card_size: DEFAULT_CARD_SIZE,
            card_key: DEFAULT_CARD_KEY.to_string(),
            rules_key: DEFAULT_RULES_KEY.to_string(),
            board_channel: "bingo-sync".to_string(),
            admin_channel: "admin-sync".to_string(),
            heartbeat_interval_ms: 25_000,
            reconnect_initial_ms: 1_000,
            reconnect_max_ms: 30_000,
            log_level: "info".to_string(),
            features: FeatureFlags::default(),
        }
    }
}

impl BingoConfig {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            supabase_url: url.into(),
            supabase_anon_key: anon_key.into(),
            ..Default::default()
        }
    }

    pub fn from_json(raw: &str) -> BingoResult<Self> {
        serde_json::from_str(raw).map_err(|e| BingoError::Config(e.to_string()))
    }

    /// Fill in connection coordinates that are still empty
    pub fn with_fallback_connection(mut self, url: Option<&str>, anon_key: Option<&str>) -> Self {
        if self.supabase_url.is_empty() {
            if let Some(url) = url {
                self.supabase_url = url.to_string();
            }
        }
        if self.supabase_anon_key.is_empty() {
            if let Some(key) = anon_key {
                self.supabase_anon_key = key.to_string();
            }
        }
        self
    }

    pub fn validate(&self) -> BingoResult<()> {
        if self.supabase_url.trim().is_empty() {
            return Err(BingoError::Config("supabase_url is not set".into()));
        }
        if !(self.supabase_url.starts_with("http://") || self.supabase_url.starts_with("https://")) {
            return Err(BingoError::Config(format!(
                "supabase_url must be http(s): {}",
                self.supabase_url
            )));
        }
        if self.supabase_anon_key.trim().is_empty() {
            return Err(BingoError::Config("supabase_anon_key is not set".into()));
        }
        if self.card_size == 0 {
            return Err(BingoError::Config("card_size must be at least 1".into()));
        }
        if self.table.is_empty() {
            return Err(BingoError::Config("table is not set".into()));
        }
        Ok(())
    }

    pub fn base_url(&self) -> &str {
        self.supabase_url.trim_end_matches('/')
    }

    /// PostgREST endpoint for the item table
    pub fn rest_endpoint(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url(), self.table)
    }

    pub fn log_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = BingoConfig::from_json(
            r#"{"supabase_url":"https://abc.supabase.co","supabase_anon_key":"k","features":{"rules_modal":false}}"#,
        )
        .unwrap();
        assert_eq!(config.table, "bingo_items");
        assert_eq!(config.card_size, 16);
        assert_eq!(config.reconnect_max_ms, 30_000);
        assert!(config.features.refresh_on_focus);
        assert!(!config.features.rules_modal);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_connection() {
        let config = BingoConfig::default();
        assert!(matches!(config.validate(), Err(BingoError::Config(_))));

        let config = BingoConfig::new("abc.supabase.co", "k");
        assert!(config.validate().is_err());

        let mut config = BingoConfig::new("https://abc.supabase.co", "k");
        config.card_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_fallback_only_fills_empty_fields() {
        let config = BingoConfig::new("https://set.example", "")
            .with_fallback_connection(Some("https://other.example"), Some("key"));
        assert_eq!(config.supabase_url, "https://set.example");
        assert_eq!(config.supabase_anon_key, "key");
    }

    #[test]
    fn test_rest_endpoint_trims_trailing_slash() {
        let config = BingoConfig::new("https://abc.supabase.co/", "k");
        assert_eq!(config.rest_endpoint(), "https://abc.supabase.co/rest/v1/bingo_items");
    }

    #[test]
    fn test_log_filter_falls_back_to_info() {
        let mut config = BingoConfig::default();
        config.log_level = "debug".into();
        assert_eq!(config.log_filter(), log::LevelFilter::Debug);
        config.log_level = "loud".into();
        assert_eq!(config.log_filter(), log::LevelFilter::Info);
    }
}
