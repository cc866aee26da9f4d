//! Parse console lines into advisor commands.
//! Keywords are case-insensitive; values are passed through untouched.

use crate::types::{Command, PositionField};
use regex::Regex;

pub fn parse_command(text: &str) -> Option<Command> {
    // Normalize whitespace
    let t = text.trim();

    // "set 2 strike 150" / "set 1 stock aapl" / "set 1 current" (clears)
    let re_set = Regex::new(r"(?i)^set\s+(\d+)\s+([a-z_]+)(?:\s+(.*))?$").unwrap();
    if let Some(c) = re_set.captures(t) {
        let number: usize = c[1].parse().ok()?;
        let field: PositionField = c[2].parse().ok()?;
        let value = c.get(3).map(|m| m.as_str().trim()).unwrap_or("").to_string();
        return Some(Command::Set {
            number,
            field,
            value,
        });
    }

    // "show" / "show 3" / "list"
    let re_show = Regex::new(r"(?i)^(?:show|list)(?:\s+(\d+))?$").unwrap();
    if let Some(c) = re_show.captures(t) {
        let number = match c.get(1) {
            Some(m) => Some(m.as_str().parse().ok()?),
            None => None,
        };
        return Some(Command::Show(number));
    }

    // "export" / "export ~/reports"
    let re_export = Regex::new(r"(?i)^export(?:\s+(.+))?$").unwrap();
    if let Some(c) = re_export.captures(t) {
        return Some(Command::Export(c.get(1).map(|m| m.as_str().trim().to_string())));
    }

    match t.to_ascii_lowercase().as_str() {
        "add" | "new" => Some(Command::Add),
        "prices" => Some(Command::Prices),
        "help" | "?" => Some(Command::Help),
        "quit" | "exit" => Some(Command::Quit),
        _ => None,
    }
}

pub const HELP: &str = "\
Commands:
  add                          add an empty position
  set <n> <field> [value]      edit position n; fields: stock, type, current,
                               strike, expiration (YYYY-MM-DD), strategy
  show [n]                     show one or all positions with analysis
  prices                       show the reference price board
  export [dir]                 write the CSV export
  help                         this text
  quit                         leave";
