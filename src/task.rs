use anyhow::{anyhow, Result};
use url::Url;

/// One URL taken from the batch request, with the two domain forms the
/// pipeline needs derived up front.
///
/// `domain` is the cookie-key form: lowercased host, leading `www.` stripped,
/// port stripped, so every URL of the same site shares one cookie blob.
/// `platform` is the raw authority as written in the URL (case and port
/// preserved) and is what platform dispatch and the result payloads report.
#[derive(Debug, Clone)]
pub struct UrlTask {
    pub url: String,
    pub domain: String,
    pub platform: String,
}

impl UrlTask {
    pub fn parse(url: &str) -> Result<Self> {
        let parsed = Url::parse(url).map_err(|e| anyhow!("invalid URL {url}: {e}"))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| anyhow!("invalid URL {url}: no host"))?;

        let domain = host.strip_prefix("www.").unwrap_or(host).to_string();
        // Url normalizes hosts to lowercase; artifact keys must keep the
        // caller's casing, so the authority is re-read from the raw string.
        let platform = raw_authority(url)
            .map(str::to_string)
            .unwrap_or_else(|| host.to_string());

        Ok(Self {
            url: url.to_string(),
            domain,
            platform,
        })
    }
}

/// Authority component of an absolute URL with the original casing, userinfo
/// dropped, port kept. Returns None when the input has no `://` part.
pub fn raw_authority(url: &str) -> Option<&str> {
    let rest = url.split_once("://")?.1;
    let end = rest
        .find(|c| c == '/' || c == '?' || c == '#')
        .unwrap_or(rest.len());
    let authority = &rest[..end];
    let authority = authority
        .rsplit_once('@')
        .map_or(authority, |(_, host)| host);
    if authority.is_empty() {
        None
    } else {
        Some(authority)
    }
}
