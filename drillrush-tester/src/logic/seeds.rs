use anyhow::{Context, Result, bail};
use std::collections::HashSet;

/// Seed used when no seed argument is given.
pub const DEFAULT_SEED: u64 = 1337;

/// Widest range a single `a..b` token may expand to.
const MAX_RANGE_LEN: u64 = 10_000;

/// Resolve CLI seed arguments into a deduplicated list, keeping first-seen order.
///
/// Accepts decimal integers (negative values use their magnitude), `0x` hex,
/// and ranges written `a..b` (exclusive) or `a..=b` (inclusive).
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<u64>> {
    let mut pending: Vec<u64> = Vec::new();

    for token in tokens {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }

        if let Some((start, end)) = token.split_once("..") {
            let (end, inclusive) = match end.strip_prefix('=') {
                Some(end) => (end, true),
                None => (end, false),
            };
            let start = parse_single(start)?;
            let end = parse_single(end)?;
            let end = if inclusive { end.saturating_add(1) } else { end };
            if end <= start {
                bail!("Empty seed range: {token}");
            }
            if end - start > MAX_RANGE_LEN {
                bail!("Seed range {token} is wider than {MAX_RANGE_LEN}");
            }
            pending.extend(start..end);
            continue;
        }

        pending.push(parse_single(token)?);
    }

    let mut seen = HashSet::new();
    pending.retain(|seed| seen.insert(*seed));

    if pending.is_empty() {
        pending.push(DEFAULT_SEED);
    }
    Ok(pending)
}

fn parse_single(token: &str) -> Result<u64> {
    let token = token.trim();
    if let Some(hex) = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        return u64::from_str_radix(hex, 16)
            .with_context(|| format!("Unrecognized seed token: {token}"));
    }
    if let Ok(value) = token.parse::<u64>() {
        return Ok(value);
    }
    if let Ok(value) = token.parse::<i64>() {
        return Ok(value.unsigned_abs());
    }
    bail!("Unrecognized seed token: {token}")
}
