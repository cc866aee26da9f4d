//! Load runtime configuration. Every section has defaults so the advisor
//! runs without a config file.

use anyhow::Context;
use serde::Deserialize;
use std::{fs, path::Path, path::PathBuf};
use tracing::info;

use crate::types::ReferencePrice;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct QuotesCfg {
    pub base_url: String,
    pub poll_interval_sec: u64,
    pub timeout_sec: u64,
}

impl Default for QuotesCfg {
    fn default() -> Self {
        Self {
            base_url: "https://finnhub.io/api/v1".to_string(),
            poll_interval_sec: 60,
            timeout_sec: 10,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ExportCfg {
    pub dir: Option<PathBuf>, // defaults to the user's download dir
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub quotes: QuotesCfg,
    pub watchlist: Vec<ReferencePrice>,
    pub export: ExportCfg,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            quotes: QuotesCfg::default(),
            watchlist: default_watchlist(),
            export: ExportCfg::default(),
        }
    }
}

fn default_watchlist() -> Vec<ReferencePrice> {
    [
        ("AAPL", "Apple"),
        ("MSFT", "Microsoft"),
        ("GOOGL", "Google"),
        ("AMZN", "Amazon"),
        ("META", "Meta"),
        ("NVDA", "NVIDIA"),
        ("TSLA", "Tesla"),
    ]
    .into_iter()
    .map(|(symbol, name)| ReferencePrice {
        symbol: symbol.to_string(),
        name: name.to_string(),
        price: 0.0,
    })
    .collect()
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let s = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::parse(&s).with_context(|| format!("parse config {}", path.display()))
    }

    /// Like `load`, but a missing file means defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!("No {} found, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn parse(s: &str) -> anyhow::Result<Self> {
        let mut cfg: Self = serde_yaml::from_str(s)?;
        for entry in cfg.watchlist.iter_mut() {
            entry.symbol = crate::utils::sanitize_symbol(&entry.symbol);
        }
        if cfg.quotes.poll_interval_sec == 0 {
            anyhow::bail!("quotes.poll_interval_sec must be > 0");
        }
        Ok(cfg)
    }
}

/// Quote API token from `FINNHUB_API_KEY`; blank counts as unset.
pub fn api_key() -> Option<String> {
    non_blank(std::env::var("FINNHUB_API_KEY").ok())
}

fn non_blank(v: Option<String>) -> Option<String> {
    v.map(|k| k.trim().to_string()).filter(|k| !k.is_empty())
}
