use anyhow::Result;
use scraper::Html;
use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::{error, info};
use utoipa::ToSchema;

use crate::artifacts::{ArtifactWriter, S3Location};
use crate::browser::{BrowserSession, INTER_URL_DELAY, SETTLE_DELAY};
use crate::cookies::CookieStore;
use crate::error::BatchError;
use crate::extract;
use crate::insights::{self, BrandInsights};
use crate::platform::{self, Platform};
use crate::storage::SharedStore;
use crate::task::UrlTask;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UrlStatus {
    Success,
    Error,
}

/// Outcome for one URL. Success carries the insights inline plus where the
/// artifacts were written; error carries only the message.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UrlResult {
    pub url: String,
    pub status: UrlStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insights: Option<BrandInsights>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s3_location: Option<S3Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UrlResult {
    fn success(
        url: &str,
        platform: &str,
        insights: BrandInsights,
        s3_location: S3Location,
    ) -> Self {
        Self {
            url: url.to_string(),
            status: UrlStatus::Success,
            platform: Some(platform.to_string()),
            insights: Some(insights),
            s3_location: Some(s3_location),
            error: None,
        }
    }

    fn error(url: &str, message: String) -> Self {
        Self {
            url: url.to_string(),
            status: UrlStatus::Error,
            platform: None,
            insights: None,
            s3_location: None,
            error: Some(message),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BatchResult {
    pub results: Vec<UrlResult>,
    pub total_processed: usize,
    pub success_count: usize,
    pub error_count: usize,
}

impl BatchResult {
    fn from_results(results: Vec<UrlResult>) -> Self {
        let success_count = results
            .iter()
            .filter(|r| r.status == UrlStatus::Success)
            .count();
        Self {
            total_processed: results.len(),
            success_count,
            error_count: results.len() - success_count,
            results,
        }
    }
}

/// Processes a batch of URLs against one shared browser session, strictly
/// in order. Per-URL failures become error entries in the result list; only
/// an empty input or a failed browser launch aborts the whole batch.
pub async fn run_batch(urls: &[String], store: SharedStore) -> Result<BatchResult, BatchError> {
    if urls.is_empty() {
        return Err(BatchError::NoUrls);
    }

    let session = BrowserSession::launch().map_err(|e| BatchError::Launch(e.to_string()))?;
    let cookie_store = CookieStore::new(store.clone());
    let artifacts = ArtifactWriter::new(store);

    let mut results = Vec::with_capacity(urls.len());
    for url in urls {
        info!("processing {}", url);
        let result = match process_url(&session, &cookie_store, &artifacts, url).await {
            Ok(result) => result,
            Err(e) => {
                error!("failed to process {}: {}", url, e);
                UrlResult::error(url, e.to_string())
            }
        };
        results.push(result);
        // Fixed pause between targets to stay under rate limits.
        sleep(INTER_URL_DELAY).await;
    }

    drop(session);
    info!("batch finished, browser session closed");

    Ok(BatchResult::from_results(results))
}

async fn process_url(
    session: &BrowserSession,
    cookie_store: &CookieStore,
    artifacts: &ArtifactWriter,
    url: &str,
) -> Result<UrlResult> {
    let task = UrlTask::parse(url)?;

    cookie_store.load(&task.domain, session.tab()).await;

    session.navigate(&task.url)?;
    sleep(SETTLE_DELAY).await;

    let page = session.capture()?;
    let snapshot = {
        let document = Html::parse_document(&page.html);
        let profile = platform::extract_profile(&document, Platform::detect(&task.platform));
        extract::structural_snapshot(&document, &task.url, &page.title, &page.body_text, profile)
    };

    let insights = BrandInsights::new(insights::classify(&snapshot), &task.platform);
    let s3_location = artifacts.write(&snapshot, &insights, &task.url).await?;

    cookie_store.save(&task.domain, session.tab()).await;

    Ok(UrlResult::success(&task.url, &task.platform, insights, s3_location))
}
