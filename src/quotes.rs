//! Thin async client for the Finnhub quote endpoint, plus the watch-list refresh.
//!
//! Failures never propagate: a symbol that cannot be quoted reads as `0.0`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::{error, info};

use crate::config::QuotesCfg;
use crate::types::ReferencePrice;

#[derive(Debug, Deserialize)]
struct QuoteBody {
    /// Current price.
    c: f64,
}

#[derive(Clone)]
pub struct QuoteClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl QuoteClient {
    pub fn new(cfg: &QuotesCfg, token: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_sec))
            .build()
            .context("build quote http client")?;
        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    // The token rides in the query string, so reqwest errors are stripped of
    // their URL before they can reach a log line.
    async fn try_fetch(&self, symbol: &str) -> Result<f64> {
        let url = format!("{}/quote", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[("symbol", symbol), ("token", self.token.as_str())])
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .context("quote request failed")?
            .error_for_status()
            .map_err(reqwest::Error::without_url)
            .context("quote request rejected")?;
        let body = resp
            .text()
            .await
            .map_err(reqwest::Error::without_url)
            .context("read quote body")?;
        parse_quote(&body)
    }

    /// Last price for `symbol`, or `0.0` on any error.
    pub async fn fetch_price(&self, symbol: &str) -> f64 {
        match self.try_fetch(symbol).await {
            Ok(p) => p,
            Err(e) => {
                error!("Error fetching price for {}: {:#}", symbol, e);
                0.0
            }
        }
    }

    /// Quote every watch-list symbol concurrently and build a fresh board,
    /// preserving watch-list order.
    pub async fn refresh(&self, watchlist: &[ReferencePrice]) -> Vec<ReferencePrice> {
        let handles: Vec<_> = watchlist
            .iter()
            .map(|entry| {
                let client = self.clone();
                let symbol = entry.symbol.clone();
                tokio::spawn(async move { client.fetch_price(&symbol).await })
            })
            .collect();

        let mut board = Vec::with_capacity(watchlist.len());
        for (entry, handle) in watchlist.iter().zip(handles) {
            let price = handle.await.unwrap_or_else(|e| {
                error!("quote task for {} failed: {}", entry.symbol, e);
                0.0
            });
            board.push(ReferencePrice {
                price: round_cents(price),
                ..entry.clone()
            });
        }
        info!("Refreshed {} reference prices", board.len());
        board
    }
}

pub fn parse_quote(body: &str) -> Result<f64> {
    let q: QuoteBody = serde_json::from_str(body).context("malformed quote body")?;
    Ok(q.c)
}

/// Two-decimal rounding applied to every refreshed price.
pub fn round_cents(p: f64) -> f64 {
    crate::utils::round_half_up(p * 100.0) / 100.0
}
