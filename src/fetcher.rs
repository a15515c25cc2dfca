use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::constants::{API_BASE, REQUEST_TIMEOUT_SECONDS};
use crate::error::{Result, SyncError};
use crate::types::RawRelease;

/// One page of a paginated Discogs collection listing.
#[async_trait]
pub trait CollectionPageSource: Send + Sync {
    async fn fetch_page(&self, page: u32) -> Result<Value>;
}

/// Reqwest-backed client for the Discogs collection-folder endpoint.
pub struct DiscogsClient {
    client: reqwest::Client,
    username: String,
    folder_id: u32,
    token: Option<String>,
    user_agent: String,
    per_page: u32,
}

impl DiscogsClient {
    pub fn new(
        username: String,
        folder_id: u32,
        token: Option<String>,
        user_agent: String,
        per_page: u32,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
            .build()?;
        Ok(Self {
            client,
            username,
            folder_id,
            token,
            user_agent,
            per_page,
        })
    }

    fn page_url(&self, page: u32) -> String {
        format!(
            "{API_BASE}/users/{}/collection/folders/{}/releases?per_page={}&page={}",
            urlencoding::encode(&self.username),
            self.folder_id,
            self.per_page,
            page
        )
    }
}

#[async_trait]
impl CollectionPageSource for DiscogsClient {
    #[instrument(skip(self))]
    async fn fetch_page(&self, page: u32) -> Result<Value> {
        let mut request = self
            .client
            .get(self.page_url(page))
            .header(reqwest::header::USER_AGENT, self.user_agent.as_str());
        if let Some(token) = &self.token {
            request = request.header(
                reqwest::header::AUTHORIZATION,
                format!("Discogs token={token}"),
            );
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status == reqwest::StatusCode::NOT_FOUND && body.contains("User does not exist") {
                return Err(SyncError::UserNotFound {
                    username: self.username.clone(),
                });
            }
            return Err(SyncError::Api {
                status: status.as_u16(),
                body,
            });
        }

        debug!(page, "fetched collection page");
        Ok(response.json().await?)
    }
}

// The API reports the count as a number, but tolerate a numeric string
fn page_count(payload: &Value) -> u32 {
    match &payload["pagination"]["pages"] {
        Value::Number(n) => n.as_u64().unwrap_or(1) as u32,
        Value::String(s) => s.parse().unwrap_or(1),
        _ => 1,
    }
}

/// Fetches every page of the requested folder, pacing requests by `delay`.
///
/// The total-page count is re-read from each response's pagination
/// metadata (absent metadata means a single page). The delay runs between
/// requests, never after the final page. Any page failure aborts the whole
/// fetch with no partial result.
pub async fn fetch_collection_releases(
    source: &dyn CollectionPageSource,
    delay: Duration,
) -> Result<Vec<RawRelease>> {
    let mut releases = Vec::new();
    let mut page = 1u32;
    let mut total_pages = 1u32;

    while page <= total_pages {
        let payload = source.fetch_page(page).await?;
        if let Some(page_releases) = payload["releases"].as_array() {
            releases.extend(page_releases.iter().cloned());
        }
        total_pages = page_count(&payload);
        page += 1;
        if page <= total_pages {
            tokio::time::sleep(delay).await;
        }
    }

    info!(
        releases = releases.len(),
        pages = total_pages,
        "collection fetch complete"
    );
    Ok(releases)
}
