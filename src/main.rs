//! Entry point. Wires Console -> Parser -> Store/Analyzer, with a Quote feed ticker.

mod analyzer;
mod config;
mod console;
mod export;
mod parser;
mod quotes;
mod report;
mod state;
mod types;
mod utils;

use dotenvy::dotenv;
use tracing::{error, info, warn, Level};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::state::{PositionStore, PriceBoard};
use crate::types::{Command, ReferencePrice};
use chrono::Utc;
use std::{path::PathBuf, time::Duration};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    // Load config
    let cfg = AppConfig::load_or_default("config.yaml")?;
    let api_key = config::api_key();

    // Session state lives only in this loop
    let mut store = PositionStore::new();
    let mut board = PriceBoard::new(cfg.watchlist.clone());

    let feed = match api_key {
        Some(key) => Some(quotes::QuoteClient::new(&cfg.quotes, key)?),
        None => {
            warn!("FINNHUB_API_KEY not set; reference prices stay at configured values");
            None
        }
    };

    // Console -> internal MPSC
    let (tx, mut rx) = tokio::sync::mpsc::channel::<Command>(64);
    // Dedicated thread: a pending stdin read must not keep the runtime alive.
    std::thread::spawn(move || {
        if let Err(e) = console::run(tx) {
            error!("Console read error: {:#}", e);
        }
    });

    // Completed refreshes come back here; the latest one to finish wins.
    let (price_tx, mut price_rx) = tokio::sync::mpsc::channel::<Vec<ReferencePrice>>(8);

    info!(
        "Advisor started. Watchlist={}, PollEvery={}s, Feed={}",
        cfg.watchlist.len(),
        cfg.quotes.poll_interval_sec,
        if feed.is_some() { "on" } else { "off" }
    );
    println!("{}", parser::HELP);

    let mut refresh_ticker =
        tokio::time::interval(Duration::from_secs(cfg.quotes.poll_interval_sec));

    loop {
        tokio::select! {
            maybe = rx.recv() => {
                let Some(cmd) = maybe else { break; };
                if !handle_command(cmd, &mut store, &board, &cfg) {
                    break;
                }
            }

            Some(prices) = price_rx.recv() => {
                board.replace(prices);
            }

            // A new refresh starts every tick even if the previous one is still in flight.
            _ = refresh_ticker.tick(), if feed.is_some() => {
                if let Some(client) = feed.clone() {
                    let watchlist = cfg.watchlist.clone();
                    let price_tx = price_tx.clone();
                    tokio::spawn(async move {
                        let prices = client.refresh(&watchlist).await;
                        let _ = price_tx.send(prices).await;
                    });
                }
            }
        }
    }

    info!("Advisor stopped with {} positions", store.len());
    Ok(())
}

/// Apply one console command. Returns `false` when the session should end.
fn handle_command(
    cmd: Command,
    store: &mut PositionStore,
    board: &PriceBoard,
    cfg: &AppConfig,
) -> bool {
    let now = Utc::now();
    match cmd {
        Command::Add => {
            let idx = store.add();
            println!("Added position {}", idx + 1);
        }
        Command::Set { number, field, value } => {
            let Some(index) = number.checked_sub(1) else {
                error!("positions are numbered from 1");
                return true;
            };
            match store.update(index, field, &value, board) {
                Ok(p) => print!("{}", report::render_position(number, p, board, now)),
                Err(e) => error!("update rejected: {}", e),
            }
        }
        Command::Show(None) if store.is_empty() => println!("No positions yet (try `add`)"),
        Command::Show(None) => {
            println!("{}", report::render_positions(store.positions(), board, now))
        }
        Command::Show(Some(number)) => {
            match number.checked_sub(1).and_then(|i| store.get(i)) {
                Some(p) => print!("{}", report::render_position(number, p, board, now)),
                None => error!("no position {} (have {})", number, store.len()),
            }
        }
        Command::Prices => print!("{}", report::render_board(board)),
        Command::Export(dir) => {
            if !store.iter().any(|p| p.is_filled_in()) {
                warn!("Nothing to export: no position is filled in");
                return true;
            }
            let dir = dir
                .map(PathBuf::from)
                .or_else(|| cfg.export.dir.clone())
                .unwrap_or_else(export::default_dir);
            match export::write_export(&dir, store.positions(), board, now) {
                Ok((path, count)) => println!("Wrote {} rows to {}", count, path.display()),
                Err(e) => error!("export failed: {:#}", e),
            }
        }
        Command::Help => println!("{}", parser::HELP),
        Command::Quit => return false,
    }
    true
}
