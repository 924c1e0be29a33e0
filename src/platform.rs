use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

/// Detected site identity, used only to choose a selector strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Instagram,
    Tiktok,
    TwitterX,
    Generic,
}

impl Platform {
    /// Case-insensitive substring match against a fixed ordered list;
    /// the first hit wins.
    pub fn detect(host: &str) -> Self {
        let host = host.to_lowercase();
        if host.contains("instagram.com") {
            Platform::Instagram
        } else if host.contains("tiktok.com") {
            Platform::Tiktok
        } else if host.contains("twitter.com") || host.contains("x.com") {
            Platform::TwitterX
        } else {
            Platform::Generic
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstagramPost {
    pub index: usize,
    pub caption: Option<String>,
    pub likes: Option<String>,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TweetMetrics {
    pub replies: Option<String>,
    pub retweets: Option<String>,
    pub likes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tweet {
    pub index: usize,
    pub text: Option<String>,
    pub metrics: TweetMetrics,
}

/// Platform-specific profile data. Every field is best-effort: a selector
/// miss yields `None` for that field and never fails the profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "platform", rename_all = "snake_case")]
pub enum PlatformProfile {
    Instagram {
        bio: Option<String>,
        followers: Option<String>,
        following: Option<String>,
        posts_count: Option<String>,
        posts: Vec<InstagramPost>,
    },
    Tiktok {
        bio: Option<String>,
        followers: Option<String>,
        likes: Option<String>,
    },
    TwitterX {
        bio: Option<String>,
        followers: Option<String>,
        following: Option<String>,
        posts: Vec<Tweet>,
    },
    Generic,
}

pub fn extract_profile(document: &Html, platform: Platform) -> PlatformProfile {
    match platform {
        Platform::Instagram => instagram_profile(document),
        Platform::Tiktok => tiktok_profile(document),
        Platform::TwitterX => twitter_profile(document),
        Platform::Generic => PlatformProfile::Generic,
    }
}

fn instagram_profile(document: &Html) -> PlatformProfile {
    let article = Selector::parse("article").unwrap();
    let posts = document
        .select(&article)
        .take(3)
        .enumerate()
        .map(|(index, post)| InstagramPost {
            index,
            caption: child_text(post, r#"span[class*="caption"]"#),
            likes: child_text(post, "section span"),
            comments: child_text(post, "section a span"),
        })
        .collect();

    PlatformProfile::Instagram {
        bio: select_text(document, r#"span[class*="bio"]"#),
        followers: select_text(document, r#"span[class*="followers"]"#),
        following: select_text(document, r#"span[class*="following"]"#),
        posts_count: select_text(document, r#"span[class*="posts"]"#),
        posts,
    }
}

fn tiktok_profile(document: &Html) -> PlatformProfile {
    PlatformProfile::Tiktok {
        bio: select_text(document, "h2"),
        followers: select_text(document, r#"strong[data-e2e="followers-count"]"#),
        likes: select_text(document, r#"strong[data-e2e="likes-count"]"#),
    }
}

fn twitter_profile(document: &Html) -> PlatformProfile {
    let article = Selector::parse("article").unwrap();
    let posts = document
        .select(&article)
        .take(3)
        .enumerate()
        .map(|(index, tweet)| Tweet {
            index,
            text: child_text(tweet, r#"div[data-testid="tweetText"]"#),
            metrics: TweetMetrics {
                replies: child_text(tweet, r#"button[data-testid="reply"] span"#),
                retweets: child_text(tweet, r#"button[data-testid="retweet"] span"#),
                likes: child_text(tweet, r#"button[data-testid="like"] span"#),
            },
        })
        .collect();

    PlatformProfile::TwitterX {
        bio: select_text(document, r#"div[data-testid="UserDescription"]"#),
        followers: select_text(document, r#"a[href*="/followers"] span"#),
        following: select_text(document, r#"a[href*="/following"] span"#),
        posts,
    }
}

fn select_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()
        .map(|e| e.text().collect::<String>())
}

fn child_text(element: ElementRef<'_>, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    element
        .select(&selector)
        .next()
        .map(|e| e.text().collect::<String>())
}
