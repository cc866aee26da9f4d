//! Stdin listener. Parses each line and forwards commands to the main loop.
//!
//! Runs on its own OS thread, outside the tokio runtime.

use std::io::BufRead;
use tokio::sync::mpsc::Sender;
use tracing::{info, warn};

use crate::parser::parse_command;
use crate::types::Command;

/// Read lines until EOF or the receiver goes away. EOF is forwarded as `Quit`.
/// Must not be called from inside the async runtime.
pub fn run_reader<R: BufRead>(reader: R, tx: Sender<Command>) -> anyhow::Result<()> {
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_command(&line) {
            Some(cmd) => {
                if tx.blocking_send(cmd).is_err() {
                    return Ok(());
                }
            }
            None => warn!("Unrecognized command: {} (try `help`)", line.trim()),
        }
    }
    info!("Console input closed");
    let _ = tx.blocking_send(Command::Quit);
    Ok(())
}

pub fn run(tx: Sender<Command>) -> anyhow::Result<()> {
    run_reader(std::io::stdin().lock(), tx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PositionField;

    #[test]
    fn forwards_parsed_lines_and_quits_on_eof() {
        let input: &[u8] = b"add\n\nnonsense here\nset 2 strike 100\n";
        let (tx, mut rx) = tokio::sync::mpsc::channel(8);
        run_reader(input, tx).unwrap();

        assert_eq!(rx.blocking_recv(), Some(Command::Add));
        assert_eq!(
            rx.blocking_recv(),
            Some(Command::Set {
                number: 2,
                field: PositionField::StrikePrice,
                value: "100".into()
            })
        );
        assert_eq!(rx.blocking_recv(), Some(Command::Quit));
        assert_eq!(rx.blocking_recv(), None);
    }

    #[test]
    fn stops_quietly_when_receiver_is_gone() {
        let input: &[u8] = b"add\nadd\n";
        let (tx, rx) = tokio::sync::mpsc::channel(1);
        drop(rx);
        assert!(run_reader(input, tx).is_ok());
    }
}
