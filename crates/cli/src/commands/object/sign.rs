//! sign command - build a share link for a file
//!
//! Without an expiration the link is unsigned and only works for public
//! objects. An expiration such as `1d2h`, `30m` or `90` (seconds) produces a
//! signed link valid for that long.

use clap::Args;
use oss_core::ObjectStore;
use serde::Serialize;

use crate::commands::{parse_path, report};
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Build a share link
#[derive(Args, Debug)]
pub struct SignArgs {
    /// Remote file
    pub path: String,

    /// Link lifetime as `?d?h?m?s`, or a bare number of seconds
    pub expiration: Option<String>,
}

#[derive(Debug, Serialize)]
struct SignOutput {
    path: String,
    url: String,
    expires_in: u64,
}

/// Units in the order they must appear, with their length in seconds
const UNITS: [(char, u64); 4] = [('d', 86_400), ('h', 3_600), ('m', 60), ('s', 1)];

/// Parse a `?d?h?m?s` expression into seconds
///
/// Each unit may appear at most once and in `d`, `h`, `m`, `s` order. A bare
/// number is taken as seconds.
pub fn parse_expiration(expr: &str) -> Result<u64, String> {
    let expr = expr.trim();
    if expr.is_empty() {
        return Err("empty expiration".to_string());
    }
    if let Ok(seconds) = expr.parse::<u64>() {
        return Ok(seconds);
    }

    let overflow = || format!("expiration too large: {expr}");
    let mut total: u64 = 0;
    let mut digits = String::new();
    let mut next_unit = 0;

    for c in expr.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }

        let offset = UNITS[next_unit..]
            .iter()
            .position(|(unit, _)| *unit == c.to_ascii_lowercase())
            .ok_or_else(|| format!("invalid expiration '{expr}': unexpected '{c}'"))?;
        if digits.is_empty() {
            return Err(format!("invalid expiration '{expr}': missing number before '{c}'"));
        }

        let (_, scale) = UNITS[next_unit + offset];
        let value: u64 = digits.parse().map_err(|_| overflow())?;
        total = value
            .checked_mul(scale)
            .and_then(|v| total.checked_add(v))
            .ok_or_else(overflow)?;
        digits.clear();
        next_unit += offset + 1;
    }

    if !digits.is_empty() {
        return Err(format!("invalid expiration '{expr}': trailing number without unit"));
    }
    Ok(total)
}

pub async fn run(args: SignArgs, store: &dyn ObjectStore, formatter: &Formatter) -> ExitCode {
    let path = match parse_path(&args.path, formatter) {
        Ok(path) => path,
        Err(code) => return code,
    };

    let expires_in = match args.expiration.as_deref().map(parse_expiration) {
        None => 0,
        Some(Ok(seconds)) => seconds,
        Some(Err(message)) => {
            formatter.error(&message);
            return ExitCode::UsageError;
        }
    };

    match store.make_share(&path, expires_in).await {
        Ok(url) => {
            if formatter.is_json() {
                formatter.json(&SignOutput {
                    path: path.to_string(),
                    url,
                    expires_in,
                });
            } else {
                formatter.println(&url);
            }
            ExitCode::Success
        }
        Err(e) => report(formatter, &format!("Failed to sign {path}"), &e),
    }
}
