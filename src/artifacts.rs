use anyhow::Result;
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::extract::StructuralSnapshot;
use crate::insights::BrandInsights;
use crate::storage::SharedStore;
use crate::task;

static UNSAFE_KEY_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w.\-]").unwrap());

/// Where one URL's artifacts landed. Field names match the persisted layout.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct S3Location {
    pub raw_data: String,
    pub insights: String,
    pub timestamp: String,
}

/// Key-safe rendering of the URL's authority. Unlike the cookie key this
/// keeps the port and the original casing, so artifacts from the same host
/// on different ports stay apart.
pub fn safe_domain(url: &str) -> String {
    let authority = task::raw_authority(url).unwrap_or("");
    let domain = authority.strip_prefix("www.").unwrap_or(authority);
    UNSAFE_KEY_CHARS.replace_all(domain, "_").into_owned()
}

pub struct ArtifactWriter {
    store: SharedStore,
}

impl ArtifactWriter {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Writes the raw snapshot and the insight summary under one shared
    /// timestamp. The writes are independent; a failure of either surfaces
    /// as this URL's error without rolling the other back.
    pub async fn write(
        &self,
        snapshot: &StructuralSnapshot,
        insights: &BrandInsights,
        url: &str,
    ) -> Result<S3Location> {
        let timestamp = Utc::now().format("%Y%m%d_%H%M%S").to_string();
        self.write_at(snapshot, insights, url, &timestamp).await
    }

    async fn write_at(
        &self,
        snapshot: &StructuralSnapshot,
        insights: &BrandInsights,
        url: &str,
        timestamp: &str,
    ) -> Result<S3Location> {
        let domain = safe_domain(url);
        let raw_key = format!("raw_data/{}/{}/scraped_data.json", domain, timestamp);
        let insights_key = format!("insights/{}/{}/brand_psychology.json", domain, timestamp);

        let body = serde_json::to_vec_pretty(snapshot)?;
        self.store.put(&raw_key, body, "application/json").await?;
        info!("wrote snapshot to {}", raw_key);

        let body = serde_json::to_vec_pretty(insights)?;
        self.store.put(&insights_key, body, "application/json").await?;
        info!("wrote insights to {}", insights_key);

        Ok(S3Location {
            raw_data: raw_key,
            insights: insights_key,
            timestamp: timestamp.to_string(),
        })
    }
}
