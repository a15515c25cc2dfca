use tracing::info;

use crate::constants::DEFAULT_OUTPUT;
use crate::error::{Result, SyncError};

/// Pushes the rendered document to Supabase Storage and returns the object key.
///
/// Config via env:
/// - SUPABASE_URL (e.g., https://xyzcompany.supabase.co) OR SUPABASE_PROJECT_REF
/// - SUPABASE_SERVICE_ROLE_KEY (service role key)
/// - SUPABASE_BUCKET (bucket name)
/// - TARGET_OBJECT_KEY (optional, defaults to recordList.html)
/// - TARGET_CACHE_CONTROL (optional, defaults to max-age=300)
pub async fn upload_html(html: &str) -> Result<String> {
    // Allow either a full URL or a project ref
    let url = match std::env::var("SUPABASE_URL") {
        Ok(u) => u,
        Err(_) => {
            let project_ref = std::env::var("SUPABASE_PROJECT_REF")?;
            format!("https://{}.supabase.co", project_ref)
        }
    };

    let key = std::env::var("SUPABASE_SERVICE_ROLE_KEY")?;
    let bucket = std::env::var("SUPABASE_BUCKET")?;
    let object_key =
        std::env::var("TARGET_OBJECT_KEY").unwrap_or_else(|_| DEFAULT_OUTPUT.to_string());
    let cache_control =
        std::env::var("TARGET_CACHE_CONTROL").unwrap_or_else(|_| "max-age=300".to_string());

    // Upload with upsert=true (idempotent for same content)
    let endpoint = format!(
        "{}/storage/v1/object/{}/{}",
        url.trim_end_matches('/'),
        bucket,
        object_key
    );

    let client = reqwest::Client::new();
    let response = client
        .put(&endpoint)
        .header(reqwest::header::AUTHORIZATION, format!("Bearer {key}"))
        .header("apikey", key.clone())
        .header(reqwest::header::CONTENT_TYPE, "text/html; charset=utf-8")
        .header(reqwest::header::CACHE_CONTROL, cache_control)
        .query(&[("upsert", "true")])
        .body(html.to_owned())
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SyncError::Api {
            status: status.as_u16(),
            body,
        });
    }

    info!(%endpoint, "uploaded record list");
    Ok(object_key)
}
