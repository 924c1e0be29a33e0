use headless_chrome::protocol::cdp::Network::{Cookie, CookieParam};
use headless_chrome::Tab;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::storage::SharedStore;

/// One cookie in CDP wire shape. Only `name` and `value` are required to
/// reinstall a cookie; everything else is carried through when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieRecord {
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub same_site: Option<String>,
}

// The protocol structs gain fields between Chrome revisions, so both
// directions go through serde rather than field-by-field construction:
// unknown attributes are dropped, missing optional ones default.
fn record_from_cookie(cookie: Cookie) -> Option<CookieRecord> {
    serde_json::to_value(cookie)
        .ok()
        .and_then(|v| serde_json::from_value(v).ok())
}

fn param_from_record(record: &CookieRecord) -> Option<CookieParam> {
    serde_json::to_value(record)
        .ok()
        .and_then(|v| serde_json::from_value(v).ok())
}

/// Persists cookie jars per domain so authenticated sessions survive across
/// invocations. All failures here are warnings: a batch never dies because
/// of a cookie.
pub struct CookieStore {
    store: SharedStore,
}

impl CookieStore {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    fn blob_key(domain_key: &str) -> String {
        format!("cookies/{}_cookies.json", domain_key)
    }

    /// Fetches the saved cookie set for a domain. `None` covers the normal
    /// first-visit case as well as any store or decode failure.
    pub async fn fetch(&self, domain_key: &str) -> Option<Vec<CookieRecord>> {
        let key = Self::blob_key(domain_key);
        let bytes = match self.store.get(&key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                info!("no saved cookies for {}", domain_key);
                return None;
            }
            Err(e) => {
                warn!("cookie fetch failed for {}: {}", domain_key, e);
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(records) => Some(records),
            Err(e) => {
                warn!("saved cookies for {} are unreadable: {}", domain_key, e);
                None
            }
        }
    }

    /// Overwrites the domain's cookie blob with `records`. An empty set is
    /// not persisted; the previous snapshot, if any, stays in place.
    pub async fn persist(&self, domain_key: &str, records: &[CookieRecord]) {
        if records.is_empty() {
            return;
        }
        let key = Self::blob_key(domain_key);
        let body = match serde_json::to_vec_pretty(records) {
            Ok(body) => body,
            Err(e) => {
                warn!("could not serialize cookies for {}: {}", domain_key, e);
                return;
            }
        };
        match self.store.put(&key, body, "application/json").await {
            Ok(()) => info!("saved {} cookies to {}", records.len(), key),
            Err(e) => warn!("cookie save failed for {}: {}", domain_key, e),
        }
    }

    /// Installs the saved cookie set for `domain_key` into the session.
    /// Returns whether anything was installed.
    pub async fn load(&self, domain_key: &str, tab: &Tab) -> bool {
        let Some(records) = self.fetch(domain_key).await else {
            return false;
        };
        let params: Vec<CookieParam> = records.iter().filter_map(param_from_record).collect();
        match tab.set_cookies(params) {
            Ok(()) => {
                info!("loaded {} cookies for {}", records.len(), domain_key);
                true
            }
            Err(e) => {
                warn!("could not install cookies for {}: {}", domain_key, e);
                false
            }
        }
    }

    /// Snapshots the session's cookies and persists them for `domain_key`.
    /// Returns the snapshot that was read, which may be empty.
    pub async fn save(&self, domain_key: &str, tab: &Tab) -> Vec<CookieRecord> {
        let records: Vec<CookieRecord> = match tab.get_cookies() {
            Ok(cookies) => cookies.into_iter().filter_map(record_from_cookie).collect(),
            Err(e) => {
                warn!("could not read session cookies for {}: {}", domain_key, e);
                return Vec::new();
            }
        };
        self.persist(domain_key, &records).await;
        records
    }
}
