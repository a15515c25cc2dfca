use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::classify::detect_bucket;
use crate::constants::WEB_BASE;
use crate::types::{NormalizedItem, RawRelease};

// Discogs appends a disambiguation index to duplicate artist names, e.g. "Prince (2)"
static DISAMBIGUATION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+\(\d+\)$").unwrap());

static RESOURCE_URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"/(releases|masters)/(\d+)").unwrap());

fn normalize_artist_name(name: &str) -> String {
    DISAMBIGUATION_RE.replace(name, "").trim().to_string()
}

fn build_artist_string(artists: Option<&Vec<Value>>) -> String {
    let names: Vec<String> = artists
        .map(|entries| {
            entries
                .iter()
                .filter_map(|a| a["name"].as_str())
                .map(normalize_artist_name)
                .filter(|n| !n.is_empty())
                .collect()
        })
        .unwrap_or_default();

    if names.is_empty() {
        "Unknown Artist".to_string()
    } else {
        names.join(", ")
    }
}

/// Lower-cased classification tokens plus display phrases for the format rows.
///
/// A display phrase reads like `"2x Vinyl, Album"`: the quantity prefix is
/// skipped when the quantity is absent or `"1"`, and a row contributing no
/// name, quantity, or descriptions yields no phrase at all.
fn format_details(format_rows: &[Value]) -> (Vec<String>, Vec<String>) {
    let mut tokens = Vec::new();
    let mut formatted = Vec::new();

    for entry in format_rows {
        let name = entry["name"].as_str().unwrap_or("").trim();
        let qty = entry["qty"].as_str().unwrap_or("").trim();
        let descriptions: Vec<&str> = entry["descriptions"]
            .as_array()
            .map(|ds| {
                ds.iter()
                    .filter_map(|d| d.as_str())
                    .map(str::trim)
                    .filter(|d| !d.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        if !name.is_empty() {
            tokens.push(name.to_lowercase());
        }
        tokens.extend(descriptions.iter().map(|d| d.to_lowercase()));

        let mut parts = Vec::new();
        if !qty.is_empty() && qty != "1" {
            parts.push(format!("{qty}x"));
        }
        if !name.is_empty() {
            parts.push(name.to_string());
        }
        if !descriptions.is_empty() {
            parts.push(descriptions.join(", "));
        }
        if !parts.is_empty() {
            formatted.push(parts.join(" "));
        }
    }

    (tokens, formatted)
}

/// Resolves the canonical detail-page URL for a release.
///
/// Priority: an explicit `uri` (absolute kept as-is, rooted or relative paths
/// anchored to the Discogs web origin), then a `resource_url` rewritten from
/// its plural API path to the singular web path, then a bare numeric id.
fn build_detail_url(release: &Value, basic: &Value) -> Option<String> {
    let uri = [basic.get("uri"), release.get("uri")]
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|u| !u.is_empty());
    if let Some(uri) = uri {
        if uri.starts_with("http://") || uri.starts_with("https://") {
            return Some(uri.to_string());
        }
        if uri.starts_with('/') {
            return Some(format!("{WEB_BASE}{uri}"));
        }
        return Some(format!("{WEB_BASE}/{uri}"));
    }

    let resource_url = [basic.get("resource_url"), release.get("resource_url")]
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .find(|u| !u.is_empty());
    if let Some(resource_url) = resource_url {
        if let Some(caps) = RESOURCE_URL_RE.captures(resource_url) {
            let singular = if &caps[1] == "releases" { "release" } else { "master" };
            return Some(format!("{WEB_BASE}/{singular}/{}", &caps[2]));
        }
    }

    let id = [basic.get("id"), release.get("id")]
        .into_iter()
        .flatten()
        .find(|v| !v.is_null());
    match id {
        Some(Value::Number(n)) => n.as_i64().map(|n| format!("{WEB_BASE}/release/{n}")),
        Some(Value::String(s)) if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) => {
            Some(format!("{WEB_BASE}/release/{s}"))
        }
        _ => None,
    }
}

/// Converts one raw release into its canonical display item.
///
/// Total by construction: malformed or missing sub-fields degrade to the
/// documented defaults instead of failing, so one raw release always yields
/// exactly one item.
pub fn normalize_release(release: &RawRelease) -> NormalizedItem {
    let basic = &release["basic_information"];

    let artist = build_artist_string(basic["artists"].as_array());

    let title = match basic["title"].as_str().map(str::trim) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => "Untitled".to_string(),
    };

    let year = basic["year"].as_i64().filter(|y| *y > 0);

    let labels: Vec<String> = basic["labels"]
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .filter_map(|l| l["name"].as_str())
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let empty = Vec::new();
    let (tokens, formats) = format_details(basic["formats"].as_array().unwrap_or(&empty));
    let bucket = detect_bucket(&tokens);

    let detail_url = build_detail_url(release, basic);

    NormalizedItem {
        artist,
        title,
        year,
        labels,
        formats,
        bucket,
        detail_url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Bucket;
    use serde_json::json;

    #[test]
    fn strips_artist_disambiguation_suffix() {
        let release = json!({
            "basic_information": {
                "artists": [{"name": "Prince (2)"}],
                "title": "Purple Rain"
            }
        });
        assert_eq!(normalize_release(&release).artist, "Prince");
    }

    #[test]
    fn disambiguation_stripping_is_idempotent() {
        assert_eq!(normalize_artist_name("Prince (2)"), "Prince");
        assert_eq!(normalize_artist_name("Prince"), "Prince");
        // only a trailing "(digits)" group is a disambiguation index
        assert_eq!(normalize_artist_name("Blink (182)"), "Blink");
        assert_eq!(normalize_artist_name("Maroon (5) Band"), "Maroon (5) Band");
    }

    #[test]
    fn joins_multiple_artists_with_commas() {
        let release = json!({
            "basic_information": {
                "artists": [{"name": "Miles Davis"}, {"name": "John Coltrane (2)"}]
            }
        });
        assert_eq!(normalize_release(&release).artist, "Miles Davis, John Coltrane");
    }

    #[test]
    fn defaults_for_missing_artist_and_title() {
        let item = normalize_release(&json!({}));
        assert_eq!(item.artist, "Unknown Artist");
        assert_eq!(item.title, "Untitled");
        assert_eq!(item.year, None);
        assert!(item.labels.is_empty());
        assert!(item.formats.is_empty());
        assert_eq!(item.bucket, Bucket::Other);
        assert_eq!(item.detail_url, None);
    }

    #[test]
    fn whitespace_only_title_falls_back_to_untitled() {
        let release = json!({"basic_information": {"title": "   "}});
        assert_eq!(normalize_release(&release).title, "Untitled");
    }

    #[test]
    fn non_positive_years_are_dropped() {
        let keep = json!({"basic_information": {"year": 1977}});
        let zero = json!({"basic_information": {"year": 0}});
        let negative = json!({"basic_information": {"year": -5}});
        let text = json!({"basic_information": {"year": "1977"}});
        assert_eq!(normalize_release(&keep).year, Some(1977));
        assert_eq!(normalize_release(&zero).year, None);
        assert_eq!(normalize_release(&negative).year, None);
        assert_eq!(normalize_release(&text).year, None);
    }

    #[test]
    fn labels_keep_order_and_drop_empties() {
        let release = json!({
            "basic_information": {
                "labels": [
                    {"name": " Blue Note "},
                    {"name": ""},
                    {"catno": "BN-1234"},
                    {"name": "Impulse!"}
                ]
            }
        });
        assert_eq!(normalize_release(&release).labels, vec!["Blue Note", "Impulse!"]);
    }

    #[test]
    fn format_phrase_includes_quantity_prefix_above_one() {
        let release = json!({
            "basic_information": {
                "formats": [
                    {"name": "Vinyl", "qty": "2", "descriptions": ["LP", "Album"]}
                ]
            }
        });
        assert_eq!(normalize_release(&release).formats, vec!["2x Vinyl LP, Album"]);
    }

    #[test]
    fn quantity_of_one_has_no_prefix() {
        let release = json!({
            "basic_information": {
                "formats": [{"name": "Vinyl", "qty": "1", "descriptions": ["LP"]}]
            }
        });
        assert_eq!(normalize_release(&release).formats, vec!["Vinyl LP"]);
    }

    #[test]
    fn empty_format_rows_produce_no_phrase() {
        let release = json!({
            "basic_information": {
                "formats": [{"qty": "1"}, {"name": "CD"}]
            }
        });
        assert_eq!(normalize_release(&release).formats, vec!["CD"]);
    }

    #[test]
    fn format_tokens_drive_classification() {
        let lp = json!({
            "basic_information": {
                "formats": [{"name": "Vinyl", "qty": "1", "descriptions": ["LP"]}]
            }
        });
        let cd = json!({
            "basic_information": {
                "formats": [{"name": "CD", "qty": "1"}]
            }
        });
        assert_eq!(normalize_release(&lp).bucket, Bucket::Inch12);
        assert_eq!(normalize_release(&cd).bucket, Bucket::Cd);
    }

    #[test]
    fn absolute_uri_is_used_verbatim() {
        let release = json!({
            "basic_information": {"uri": "https://www.discogs.com/release/42-Some-Album"}
        });
        assert_eq!(
            normalize_release(&release).detail_url.as_deref(),
            Some("https://www.discogs.com/release/42-Some-Album")
        );
    }

    #[test]
    fn rooted_and_relative_uris_are_anchored_to_the_web_origin() {
        let rooted = json!({"basic_information": {"uri": "/release/42"}});
        let relative = json!({"uri": "release/42"});
        assert_eq!(
            normalize_release(&rooted).detail_url.as_deref(),
            Some("https://www.discogs.com/release/42")
        );
        assert_eq!(
            normalize_release(&relative).detail_url.as_deref(),
            Some("https://www.discogs.com/release/42")
        );
    }

    #[test]
    fn resource_url_is_rewritten_to_the_singular_web_path() {
        let release = json!({
            "basic_information": {
                "resource_url": "https://api.discogs.com/releases/249504"
            }
        });
        let master = json!({
            "resource_url": "https://api.discogs.com/masters/96559"
        });
        assert_eq!(
            normalize_release(&release).detail_url.as_deref(),
            Some("https://www.discogs.com/release/249504")
        );
        assert_eq!(
            normalize_release(&master).detail_url.as_deref(),
            Some("https://www.discogs.com/master/96559")
        );
    }

    #[test]
    fn bare_ids_build_the_release_url() {
        let numeric = json!({"basic_information": {"id": 123456}});
        let stringy = json!({"id": "123456"});
        assert_eq!(
            normalize_release(&numeric).detail_url.as_deref(),
            Some("https://www.discogs.com/release/123456")
        );
        assert_eq!(
            normalize_release(&stringy).detail_url.as_deref(),
            Some("https://www.discogs.com/release/123456")
        );
    }

    #[test]
    fn uri_outranks_resource_url_and_id() {
        let release = json!({
            "basic_information": {
                "uri": "/release/1",
                "resource_url": "https://api.discogs.com/releases/2",
                "id": 3
            }
        });
        assert_eq!(
            normalize_release(&release).detail_url.as_deref(),
            Some("https://www.discogs.com/release/1")
        );
    }

    #[test]
    fn non_numeric_id_yields_no_url() {
        let release = json!({"basic_information": {"id": "abc123"}});
        assert_eq!(normalize_release(&release).detail_url, None);
    }
}
