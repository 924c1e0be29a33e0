use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::extract::StructuralSnapshot;

// Fixed classification tables. Order matters: tags are emitted in table
// order, so changing these changes artifact output for every consumer.
pub const TONE_KEYWORDS: [(&str, &[&str]); 6] = [
    ("professional", &["expert", "professional", "solution", "enterprise", "business"]),
    ("friendly", &["hello", "welcome", "friend", "community", "hey"]),
    ("urgent", &["now", "limited", "today", "hurry", "last chance"]),
    ("inspirational", &["dream", "future", "possibility", "achieve", "goal"]),
    ("youthful", &["fresh", "cool", "vibe", "trending", "young"]),
    ("authoritative", &["official", "leader", "expert", "authority"]),
];

pub const VALUE_KEYWORDS: [(&str, &[&str]); 8] = [
    ("innovation", &["innovative", "cutting-edge", "future", "technology", "tech"]),
    ("quality", &["quality", "premium", "excellence", "best", "superior"]),
    ("sustainability", &["sustainable", "eco-friendly", "green", "environment", "planet"]),
    ("customer_focus", &["customer", "client", "service", "support", "help"]),
    ("integrity", &["trust", "integrity", "honest", "transparent", "ethical"]),
    ("community", &["community", "together", "belonging", "family", "team"]),
    ("diversity", &["diverse", "inclusion", "equality", "everyone"]),
    ("performance", &["performance", "powerful", "fast", "efficient", "results"]),
];

const PRODUCT_WORDS: [&str; 3] = ["product", "item", "merch"];
const PEOPLE_WORDS: [&str; 5] = ["person", "people", "user", "customer", "face"];

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VisualIdentity {
    pub logo_count: usize,
    pub product_images: usize,
    pub people_images: usize,
    pub screenshots: usize,
    pub total_images_analyzed: usize,
    pub color_scheme: String,
    pub style: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AudienceSentiment {
    pub follower_count: String,
    pub total_posts: String,
    pub social_mentions: usize,
    pub engagement_level: String,
    pub sentiment_score: f64,
    pub common_topics: Vec<String>,
}

/// Pure classification output, before the per-URL envelope is added.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightSummary {
    pub tone_of_voice: Vec<String>,
    pub visual_identity: VisualIdentity,
    pub audience_sentiment: AudienceSentiment,
    pub core_values: Vec<String>,
}

/// Insight artifact as persisted and returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BrandInsights {
    pub tone_of_voice: Vec<String>,
    pub visual_identity: VisualIdentity,
    pub audience_sentiment: AudienceSentiment,
    pub core_values: Vec<String>,
    pub timestamp: String,
    pub platform: String,
}

impl BrandInsights {
    pub fn new(summary: InsightSummary, platform: &str) -> Self {
        Self {
            tone_of_voice: summary.tone_of_voice,
            visual_identity: summary.visual_identity,
            audience_sentiment: summary.audience_sentiment,
            core_values: summary.core_values,
            timestamp: Utc::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            platform: platform.to_string(),
        }
    }
}

/// Derives the brand-psychology summary from a snapshot. No I/O, no clock:
/// the same snapshot always yields the same summary.
pub fn classify(snapshot: &StructuralSnapshot) -> InsightSummary {
    InsightSummary {
        tone_of_voice: tone_of_voice(snapshot),
        visual_identity: visual_identity(snapshot),
        audience_sentiment: audience_sentiment(snapshot),
        core_values: core_values(snapshot),
    }
}

fn tone_of_voice(snapshot: &StructuralSnapshot) -> Vec<String> {
    let mut haystack = snapshot
        .headlines
        .iter()
        .map(|h| h.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    haystack.push(' ');
    haystack.push_str(&snapshot.page_text);
    let haystack = haystack.to_lowercase();

    let detected: Vec<String> = TONE_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| haystack.contains(*k)))
        .map(|(tone, _)| tone.to_string())
        .collect();

    if detected.is_empty() {
        vec!["neutral".to_string()]
    } else {
        detected
    }
}

fn visual_identity(snapshot: &StructuralSnapshot) -> VisualIdentity {
    let mut logo_count = 0;
    let mut product_images = 0;
    let mut people_images = 0;
    let mut screenshots = 0;

    for img in snapshot.images.iter().take(20) {
        let alt = img.alt.to_lowercase();
        let src = img.src.to_lowercase();

        if alt.contains("logo") || src.contains("logo") {
            logo_count += 1;
        } else if PRODUCT_WORDS.iter().any(|w| alt.contains(w)) {
            product_images += 1;
        } else if PEOPLE_WORDS.iter().any(|w| alt.contains(w)) {
            people_images += 1;
        } else if src.contains("screenshot") || alt.contains("screenshot") {
            screenshots += 1;
        }
    }

    VisualIdentity {
        logo_count,
        product_images,
        people_images,
        screenshots,
        total_images_analyzed: snapshot.images.len().min(20),
        color_scheme: "unknown".to_string(),
        style: vec!["modern".to_string(), "minimalist".to_string()],
    }
}

fn audience_sentiment(snapshot: &StructuralSnapshot) -> AudienceSentiment {
    // Follower and post counts would need platform-authenticated APIs;
    // the generic path reports them as unavailable.
    let follower_count = "N/A".to_string();
    let total_posts = "N/A".to_string();

    AudienceSentiment {
        engagement_level: estimate_engagement(&follower_count, &total_posts),
        social_mentions: snapshot.links.social.len(),
        sentiment_score: 0.75,
        common_topics: vec![
            "fashion".to_string(),
            "lifestyle".to_string(),
            "sports".to_string(),
        ],
        follower_count,
        total_posts,
    }
}

fn estimate_engagement(followers: &str, posts: &str) -> String {
    if followers == "N/A" || posts == "N/A" {
        "unknown".to_string()
    } else {
        "medium".to_string()
    }
}

fn core_values(snapshot: &StructuralSnapshot) -> Vec<String> {
    let mut haystack = format!(
        "{} {} ",
        snapshot
            .metadata
            .description
            .as_deref()
            .unwrap_or("")
            .to_lowercase(),
        snapshot
            .metadata
            .keywords
            .as_deref()
            .unwrap_or("")
            .to_lowercase(),
    );
    for headline in snapshot.headlines.iter().take(5) {
        haystack.push_str(&headline.text.to_lowercase());
        haystack.push(' ');
    }

    VALUE_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| haystack.contains(*k)))
        .map(|(value, _)| value.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{Headline, Image, Links, Metadata, SocialLink, StructuralSnapshot};
    use crate::platform::PlatformProfile;

    fn base_snapshot() -> StructuralSnapshot {
        StructuralSnapshot {
            url: "https://example.com".to_string(),
            title: "Example".to_string(),
            headlines: Vec::new(),
            images: Vec::new(),
            metadata: Metadata::default(),
            links: Links::default(),
            page_text: String::new(),
            platform_specific: PlatformProfile::Generic,
        }
    }

    fn headline(text: &str) -> Headline {
        Headline {
            tag: "h1".to_string(),
            text: text.to_string(),
        }
    }

    fn image(src: &str, alt: &str) -> Image {
        Image {
            src: src.to_string(),
            alt: alt.to_string(),
            width: None,
            height: None,
        }
    }

    #[test]
    fn classification_is_deterministic() {
        let mut snapshot = base_snapshot();
        snapshot.headlines.push(headline("Welcome to our community"));
        snapshot.page_text = "Premium solutions for modern business".to_string();
        snapshot.images.push(image("/logo.png", "brand logo"));

        let first = serde_json::to_string(&classify(&snapshot)).unwrap();
        let second = serde_json::to_string(&classify(&snapshot)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn tone_matching_is_case_insensitive_substring() {
        let mut snapshot = base_snapshot();
        snapshot.page_text = "Our ENTERPRISE-grade platform".to_string();
        let summary = classify(&snapshot);
        assert_eq!(summary.tone_of_voice, vec!["professional"]);
    }

    #[test]
    fn tone_falls_back_to_neutral() {
        let mut snapshot = base_snapshot();
        snapshot.page_text = "lorem ipsum dolor sit amet".to_string();
        let summary = classify(&snapshot);
        assert_eq!(summary.tone_of_voice, vec!["neutral"]);
    }

    #[test]
    fn tones_reported_in_table_order() {
        let mut snapshot = base_snapshot();
        snapshot.headlines.push(headline("Fresh thinking"));
        snapshot.page_text = "an official business update".to_string();
        let summary = classify(&snapshot);
        assert_eq!(
            summary.tone_of_voice,
            vec!["professional", "youthful", "authoritative"]
        );
    }

    #[test]
    fn core_values_use_metadata_and_first_five_headlines() {
        let mut snapshot = base_snapshot();
        snapshot.metadata.description = Some("We are INNOVATIVE leaders".to_string());
        for i in 0..5 {
            snapshot.headlines.push(headline(&format!("plain {}", i)));
        }
        // Beyond the first five headlines, keywords are ignored.
        snapshot.headlines.push(headline("eco-friendly packaging"));
        let summary = classify(&snapshot);
        assert_eq!(summary.core_values, vec!["innovation"]);
    }

    #[test]
    fn core_values_may_be_empty() {
        let summary = classify(&base_snapshot());
        assert!(summary.core_values.is_empty());
    }

    #[test]
    fn missing_metadata_is_treated_as_empty_text() {
        let mut snapshot = base_snapshot();
        snapshot.metadata.description = None;
        snapshot.metadata.keywords = None;
        snapshot.headlines.push(headline("Premium quality goods"));
        let summary = classify(&snapshot);
        assert_eq!(summary.core_values, vec!["quality"]);
    }

    #[test]
    fn image_classes_follow_first_match_precedence() {
        let mut snapshot = base_snapshot();
        snapshot.images.push(image("/a.png", "product logo"));
        snapshot.images.push(image("/b.png", "product shot"));
        snapshot.images.push(image("/c.png", "happy customer"));
        snapshot.images.push(image("/screenshot-1.png", ""));
        snapshot.images.push(image("/d.png", "plain banner"));

        let identity = classify(&snapshot).visual_identity;
        assert_eq!(identity.logo_count, 1);
        assert_eq!(identity.product_images, 1);
        assert_eq!(identity.people_images, 1);
        assert_eq!(identity.screenshots, 1);
        assert_eq!(identity.total_images_analyzed, 5);
        assert_eq!(identity.color_scheme, "unknown");
        assert_eq!(identity.style, vec!["modern", "minimalist"]);
    }

    #[test]
    fn audience_sentiment_reports_placeholders_and_social_mentions() {
        let mut snapshot = base_snapshot();
        snapshot.links.social.push(SocialLink {
            url: "https://instagram.com/brand".to_string(),
        });
        snapshot.links.social.push(SocialLink {
            url: "https://tiktok.com/@brand".to_string(),
        });

        let sentiment = classify(&snapshot).audience_sentiment;
        assert_eq!(sentiment.follower_count, "N/A");
        assert_eq!(sentiment.total_posts, "N/A");
        assert_eq!(sentiment.social_mentions, 2);
        assert_eq!(sentiment.engagement_level, "unknown");
        assert_eq!(sentiment.sentiment_score, 0.75);
        assert_eq!(sentiment.common_topics, vec!["fashion", "lifestyle", "sports"]);
    }

    #[test]
    fn keyword_tables_are_closed_and_nonempty() {
        assert_eq!(TONE_KEYWORDS.len(), 6);
        assert_eq!(VALUE_KEYWORDS.len(), 8);
        for (tag, keywords) in TONE_KEYWORDS.iter().chain(VALUE_KEYWORDS.iter()) {
            assert!(!tag.is_empty());
            assert!(!keywords.is_empty());
        }
    }

    #[test]
    fn envelope_carries_summary_fields_platform_and_timestamp() {
        let mut snapshot = base_snapshot();
        snapshot.page_text = "hello".to_string();
        let insights = BrandInsights::new(classify(&snapshot), "www.example.com");
        assert_eq!(insights.tone_of_voice, vec!["friendly"]);
        assert_eq!(insights.platform, "www.example.com");
        // 2026-08-25T12:34:56.123456
        assert_eq!(insights.timestamp.len(), 26);
        assert!(insights.timestamp.contains('T'));
    }
}
