use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

use crate::platform::PlatformProfile;

// Capture bounds. These keep artifacts small and page evaluation cheap, so
// they are applied here as explicit slices rather than left to callers.
pub const MAX_HEADLINES_PER_TAG: usize = 10;
pub const MAX_IMAGES: usize = 20;
pub const MAX_ANCHORS_SCANNED: usize = 50;
pub const MAX_PAGE_TEXT_CHARS: usize = 10_000;

const SOCIAL_PATTERNS: [&str; 6] = [
    "facebook",
    "twitter",
    "instagram",
    "linkedin",
    "youtube",
    "tiktok",
];

/// One heading element, tagged with its level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Headline {
    #[serde(rename = "type")]
    pub tag: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub src: String,
    pub alt: String,
    pub width: Option<String>,
    pub height: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialLink {
    pub url: String,
}

/// Named meta tags. Absent tags serialize as null, not as empty strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    pub description: Option<String>,
    pub keywords: Option<String>,
    pub author: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Links {
    pub social: Vec<SocialLink>,
}

/// Bounded extraction result for one URL. Every sequence and string in here
/// is already capped at capture time; downstream consumers rely on that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuralSnapshot {
    pub url: String,
    pub title: String,
    pub headlines: Vec<Headline>,
    pub images: Vec<Image>,
    pub metadata: Metadata,
    pub links: Links,
    pub page_text: String,
    pub platform_specific: PlatformProfile,
}

pub fn structural_snapshot(
    document: &Html,
    url: &str,
    title: &str,
    body_text: &str,
    platform_specific: PlatformProfile,
) -> StructuralSnapshot {
    StructuralSnapshot {
        url: url.to_string(),
        title: title.to_string(),
        headlines: extract_headlines(document),
        images: extract_images(document),
        metadata: extract_metadata(document),
        links: Links {
            social: extract_social_links(document),
        },
        page_text: truncate_chars(body_text, MAX_PAGE_TEXT_CHARS),
        platform_specific,
    }
}

fn extract_headlines(document: &Html) -> Vec<Headline> {
    let mut headlines = Vec::new();
    for tag in ["h1", "h2", "h3"] {
        let selector = Selector::parse(tag).unwrap();
        for element in document.select(&selector).take(MAX_HEADLINES_PER_TAG) {
            let text = element.text().collect::<String>();
            let text = text.trim();
            // Huge blocks are noise, not headlines; drop rather than truncate.
            if !text.is_empty() && text.chars().count() < 200 {
                headlines.push(Headline {
                    tag: tag.to_string(),
                    text: truncate_chars(text, 100),
                });
            }
        }
    }
    headlines
}

fn extract_images(document: &Html) -> Vec<Image> {
    let img_selector = Selector::parse("img").unwrap();
    let mut images = Vec::new();
    for element in document.select(&img_selector).take(MAX_IMAGES) {
        let src = element.value().attr("src").unwrap_or("");
        if src.is_empty() || src.starts_with("data:") {
            continue;
        }
        images.push(Image {
            src: truncate_chars(src, 200),
            alt: truncate_chars(element.value().attr("alt").unwrap_or(""), 100),
            width: element.value().attr("width").map(|s| s.to_string()),
            height: element.value().attr("height").map(|s| s.to_string()),
        });
    }
    images
}

fn extract_metadata(document: &Html) -> Metadata {
    Metadata {
        description: meta_content(document, "description"),
        keywords: meta_content(document, "keywords"),
        author: meta_content(document, "author"),
    }
}

fn meta_content(document: &Html, name: &str) -> Option<String> {
    let selector = Selector::parse(&format!("meta[name='{}']", name)).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|e| e.value().attr("content").map(|s| s.to_string()))
}

fn extract_social_links(document: &Html) -> Vec<SocialLink> {
    let anchor_selector = Selector::parse("a").unwrap();
    let mut social = Vec::new();
    for element in document.select(&anchor_selector).take(MAX_ANCHORS_SCANNED) {
        let href = match element.value().attr("href") {
            Some(href) if !href.is_empty() => href,
            _ => continue,
        };
        let lowered = href.to_lowercase();
        if SOCIAL_PATTERNS.iter().any(|p| lowered.contains(p)) {
            social.push(SocialLink {
                url: truncate_chars(href, 200),
            });
        }
    }
    social
}

fn truncate_chars(s: &str, limit: usize) -> String {
    s.chars().take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_from(html: &str) -> StructuralSnapshot {
        let document = Html::parse_document(html);
        structural_snapshot(
            &document,
            "https://example.com",
            "Example",
            "plain visible text",
            PlatformProfile::Generic,
        )
    }

    #[test]
    fn headlines_kept_in_document_order() {
        let html = "<h1>First</h1><h1>Second</h1><h1>Third</h1>";
        let snapshot = snapshot_from(html);
        let texts: Vec<&str> = snapshot.headlines.iter().map(|h| h.text.as_str()).collect();
        assert_eq!(texts, vec!["First", "Second", "Third"]);
        assert!(snapshot.headlines.iter().all(|h| h.tag == "h1"));
    }

    #[test]
    fn headlines_capped_per_heading_type() {
        let mut html = String::new();
        for i in 0..12 {
            html.push_str(&format!("<h2>Heading {}</h2>", i));
        }
        html.push_str("<h3>Other</h3>");
        let snapshot = snapshot_from(&html);
        let h2_count = snapshot.headlines.iter().filter(|h| h.tag == "h2").count();
        assert_eq!(h2_count, MAX_HEADLINES_PER_TAG);
        assert_eq!(snapshot.headlines.iter().filter(|h| h.tag == "h3").count(), 1);
    }

    #[test]
    fn oversized_headline_candidates_are_dropped_not_truncated() {
        let noise = "x".repeat(250);
        let longish = "y".repeat(150);
        let html = format!("<h1>{}</h1><h1>{}</h1><h1></h1>", noise, longish);
        let snapshot = snapshot_from(&html);
        assert_eq!(snapshot.headlines.len(), 1);
        assert_eq!(snapshot.headlines[0].text.chars().count(), 100);
    }

    #[test]
    fn data_uri_images_are_skipped_but_consume_window_slots() {
        let mut html = String::new();
        for i in 0..5 {
            html.push_str(&format!("<img src=\"data:image/png;base64,AAA{}\">", i));
        }
        for i in 0..20 {
            html.push_str(&format!("<img src=\"/pic{}.png\" alt=\"pic\">", i));
        }
        let snapshot = snapshot_from(&html);
        // Window is the first 20 img elements: 5 data URIs plus 15 real ones.
        assert_eq!(snapshot.images.len(), 15);
        assert!(snapshot.images.iter().all(|img| !img.src.starts_with("data:")));
    }

    #[test]
    fn image_attributes_are_bounded_and_optional() {
        let long_src = format!("/{}", "s".repeat(300));
        let long_alt = "a".repeat(150);
        let html = format!(
            "<img src=\"{}\" alt=\"{}\" width=\"640\"><img src=\"/b.png\">",
            long_src, long_alt
        );
        let snapshot = snapshot_from(&html);
        assert_eq!(snapshot.images.len(), 2);
        assert_eq!(snapshot.images[0].src.chars().count(), 200);
        assert_eq!(snapshot.images[0].alt.chars().count(), 100);
        assert_eq!(snapshot.images[0].width.as_deref(), Some("640"));
        assert_eq!(snapshot.images[0].height, None);
        assert_eq!(snapshot.images[1].alt, "");
    }

    #[test]
    fn social_links_filtered_by_platform_substring() {
        let html = concat!(
            "<a href=\"https://www.FACEBOOK.com/brand\">fb</a>",
            "<a href=\"https://example.com/about\">about</a>",
            "<a href=\"https://www.youtube.com/@brand\">yt</a>",
            "<a>no href</a>",
        );
        let snapshot = snapshot_from(html);
        let urls: Vec<&str> = snapshot.links.social.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(
            urls,
            vec!["https://www.FACEBOOK.com/brand", "https://www.youtube.com/@brand"]
        );
    }

    #[test]
    fn anchor_scan_stops_after_fifty_elements() {
        let mut html = String::new();
        for i in 0..60 {
            html.push_str(&format!("<a href=\"https://tiktok.com/@u{}\">t</a>", i));
        }
        let snapshot = snapshot_from(&html);
        assert_eq!(snapshot.links.social.len(), MAX_ANCHORS_SCANNED);
    }

    #[test]
    fn page_text_capped_at_ten_thousand_chars() {
        let body_text = "a".repeat(12_000);
        let document = Html::parse_document("<p>hi</p>");
        let snapshot = structural_snapshot(
            &document,
            "https://example.com",
            "",
            &body_text,
            PlatformProfile::Generic,
        );
        assert_eq!(snapshot.page_text.chars().count(), MAX_PAGE_TEXT_CHARS);
    }

    #[test]
    fn meta_tags_absent_when_not_present() {
        let html = "<head><meta name=\"description\" content=\"A brand\"></head>";
        let snapshot = snapshot_from(html);
        assert_eq!(snapshot.metadata.description.as_deref(), Some("A brand"));
        assert_eq!(snapshot.metadata.keywords, None);
        assert_eq!(snapshot.metadata.author, None);
    }

    #[test]
    fn artifact_json_keeps_source_field_names() {
        let html = "<h1>Hi</h1><a href=\"https://instagram.com/b\">ig</a>";
        let snapshot = snapshot_from(html);
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["headlines"][0]["type"], "h1");
        assert_eq!(value["links"]["social"][0]["url"], "https://instagram.com/b");
        assert!(value["metadata"]["author"].is_null());
        assert_eq!(value["platform_specific"]["platform"], "generic");
    }
}
