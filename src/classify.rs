use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::Bucket;

// Matches inch-looking sizes such as `10"`, `7 in`, `12in`
static INCH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(\d{1,2})\s*(?:"|in)"#).unwrap());

/// Infers the media bucket for one release from its lower-cased format
/// tokens (format names plus descriptions).
///
/// First match wins, in this order: a literal inch marker, an inch-looking
/// number that maps to a known size, `lp`, `cd`, `cassette`/`tape`, and
/// finally `Other`. The cascade is heuristic: format descriptors are free
/// text and may carry several cues at once, so the precedence order is part
/// of the contract.
pub fn detect_bucket(tokens: &[String]) -> Bucket {
    let joined = tokens.join(" ");

    for bucket in Bucket::INCHES {
        if joined.contains(bucket.label()) {
            return bucket;
        }
    }

    if let Some(caps) = INCH_RE.captures(&joined) {
        if let Ok(inches) = caps[1].parse::<u32>() {
            if let Some(bucket) = Bucket::from_inches(inches) {
                return bucket;
            }
        }
    }

    if joined.contains("lp") {
        return Bucket::Inch12;
    }
    if joined.contains("cd") {
        return Bucket::Cd;
    }
    if joined.contains("cassette") || joined.contains("tape") {
        return Bucket::Cassette;
    }
    Bucket::Other
}
