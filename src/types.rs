use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw collection release as returned from the Discogs API.
///
/// Loosely structured on purpose: no field may be assumed present.
pub type RawRelease = serde_json::Value;

/// Physical media category assigned to each collection item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bucket {
    Inch5,
    Inch7,
    Inch8,
    Inch9,
    Inch10,
    Inch11,
    Inch12,
    Cd,
    Cassette,
    Other,
}

impl Bucket {
    /// Display/priority order for rendering. `Other` is the fallback.
    pub const ALL: [Bucket; 10] = [
        Bucket::Inch5,
        Bucket::Inch7,
        Bucket::Inch8,
        Bucket::Inch9,
        Bucket::Inch10,
        Bucket::Inch11,
        Bucket::Inch12,
        Bucket::Cd,
        Bucket::Cassette,
        Bucket::Other,
    ];

    /// The vinyl-size buckets, in the order their markers are probed.
    pub const INCHES: [Bucket; 7] = [
        Bucket::Inch5,
        Bucket::Inch7,
        Bucket::Inch8,
        Bucket::Inch9,
        Bucket::Inch10,
        Bucket::Inch11,
        Bucket::Inch12,
    ];

    pub fn from_inches(inches: u32) -> Option<Bucket> {
        match inches {
            5 => Some(Bucket::Inch5),
            7 => Some(Bucket::Inch7),
            8 => Some(Bucket::Inch8),
            9 => Some(Bucket::Inch9),
            10 => Some(Bucket::Inch10),
            11 => Some(Bucket::Inch11),
            12 => Some(Bucket::Inch12),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Bucket::Inch5 => "5\"",
            Bucket::Inch7 => "7\"",
            Bucket::Inch8 => "8\"",
            Bucket::Inch9 => "9\"",
            Bucket::Inch10 => "10\"",
            Bucket::Inch11 => "11\"",
            Bucket::Inch12 => "12\"",
            Bucket::Cd => "CD",
            Bucket::Cassette => "Cassette",
            Bucket::Other => "Other",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Canonical, display-ready representation of one collection entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedItem {
    pub artist: String,
    pub title: String,
    pub year: Option<i64>,
    pub labels: Vec<String>,
    pub formats: Vec<String>,
    pub bucket: Bucket,
    pub detail_url: Option<String>,
}
