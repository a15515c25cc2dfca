use askama::Template;
use chrono::{DateTime, Local};
use tracing::debug;

use crate::aggregate::BucketGroup;
use crate::error::Result;
use crate::types::NormalizedItem;

#[derive(Template)]
#[template(path = "record_list.html")]
struct RecordListTemplate {
    username: String,
    synced: String,
    total: usize,
    sections: Vec<SectionView>,
}

struct SectionView {
    heading: String,
    count: usize,
    items: Vec<ItemView>,
}

struct ItemView {
    line: String,
    url: Option<String>,
}

/// Single display line: `artist / title [/ labels] [/ formats] [/ year]`.
///
/// Labels are comma-joined, formats semicolon-joined; absent parts drop
/// out of the line entirely.
fn list_line(item: &NormalizedItem) -> String {
    let mut parts = vec![item.artist.clone(), item.title.clone()];
    if !item.labels.is_empty() {
        parts.push(item.labels.join(", "));
    }
    if !item.formats.is_empty() {
        parts.push(item.formats.join("; "));
    }
    if let Some(year) = item.year {
        parts.push(year.to_string());
    }
    parts.join(" / ")
}

/// Renders the complete, self-contained record-list document.
///
/// The caller supplies the clock, so a render is a pure function of its
/// inputs: the same groups and timestamp produce byte-identical output.
pub fn render_html(
    username: &str,
    folder_id: u32,
    groups: &[BucketGroup],
    synced_at: DateTime<Local>,
) -> Result<String> {
    debug!(folder_id, "rendering record list");

    let total = groups.iter().map(|g| g.items.len()).sum();
    let sections = groups
        .iter()
        .map(|group| SectionView {
            heading: group.bucket.to_string(),
            count: group.items.len(),
            items: group
                .items
                .iter()
                .map(|item| ItemView {
                    line: list_line(item),
                    url: item.detail_url.clone(),
                })
                .collect(),
        })
        .collect();

    let template = RecordListTemplate {
        username: username.to_string(),
        synced: synced_at.format("%B %d, %Y %H:%M").to_string(),
        total,
        sections,
    };
    Ok(template.render()?)
}
