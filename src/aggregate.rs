use std::collections::HashMap;

use crate::types::{Bucket, NormalizedItem};

/// One non-empty bucket's worth of items, sorted for display.
#[derive(Debug, Clone)]
pub struct BucketGroup {
    pub bucket: Bucket,
    pub items: Vec<NormalizedItem>,
}

/// Groups items by bucket and sorts each group case-insensitively by
/// artist, then title; ties keep their original order.
///
/// Groups come out in fixed bucket display order with empty buckets
/// omitted. The accumulator is rebuilt on every call so repeated passes
/// never observe each other's state.
pub fn group_by_bucket(items: Vec<NormalizedItem>) -> Vec<BucketGroup> {
    let mut by_bucket: HashMap<Bucket, Vec<NormalizedItem>> = HashMap::new();
    for item in items {
        by_bucket.entry(item.bucket).or_default().push(item);
    }

    Bucket::ALL
        .into_iter()
        .filter_map(|bucket| {
            let mut items = by_bucket.remove(&bucket)?;
            items.sort_by_key(|item| (item.artist.to_lowercase(), item.title.to_lowercase()));
            Some(BucketGroup { bucket, items })
        })
        .collect()
}
