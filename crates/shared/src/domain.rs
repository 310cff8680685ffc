use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(CreatorId);

/// A persisted row of the `creators` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    pub id: CreatorId,
    pub name: String,
    pub url: String,
    pub description: String,
    #[serde(rename = "imageURL", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Creator {
    pub fn has_image(&self) -> bool {
        self.image_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty())
    }

    pub fn platform(&self) -> SocialPlatform {
        SocialPlatform::from_url(&self.url)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocialPlatform {
    YouTube,
    Twitter,
    Instagram,
    TikTok,
    Website,
}

impl SocialPlatform {
    /// Classifies by host: the domain itself or any subdomain of it.
    pub fn from_url(url: &str) -> Self {
        let Some(host) = Url::parse(url.trim())
            .ok()
            .and_then(|url| url.host_str().map(str::to_ascii_lowercase))
        else {
            return Self::Website;
        };
        let on = |domain: &str| {
            host == domain
                || host
                    .strip_suffix(domain)
                    .is_some_and(|prefix| prefix.ends_with('.'))
        };
        if on("youtube.com") || on("youtu.be") {
            Self::YouTube
        } else if on("twitter.com") || on("x.com") {
            Self::Twitter
        } else if on("instagram.com") {
            Self::Instagram
        } else if on("tiktok.com") {
            Self::TikTok
        } else {
            Self::Website
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::YouTube => "YouTube",
            Self::Twitter => "Twitter",
            Self::Instagram => "Instagram",
            Self::TikTok => "TikTok",
            Self::Website => "Website",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::YouTube => "📺",
            Self::Twitter => "🐦",
            Self::Instagram => "📷",
            Self::TikTok => "🎵",
            Self::Website => "🔗",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_known_platforms_from_profile_links() {
        assert_eq!(
            SocialPlatform::from_url("https://www.youtube.com/@veritasium"),
            SocialPlatform::YouTube
        );
        assert_eq!(SocialPlatform::from_url("https://youtu.be/abc"), SocialPlatform::YouTube);
        assert_eq!(SocialPlatform::from_url("https://x.com/ada"), SocialPlatform::Twitter);
        assert_eq!(
            SocialPlatform::from_url("https://www.netflix.com/ada"),
            SocialPlatform::Website
        );
        assert_eq!(
            SocialPlatform::from_url("https://dropbox.com/s/ada"),
            SocialPlatform::Website
        );
        assert_eq!(SocialPlatform::from_url("https://box.com/a"), SocialPlatform::Website);
        assert_eq!(
            SocialPlatform::from_url("https://mobile.twitter.com/ada"),
            SocialPlatform::Twitter
        );
        assert_eq!(SocialPlatform::from_url("not a url"), SocialPlatform::Website);
        assert_eq!(
            SocialPlatform::from_url("https://INSTAGRAM.com/someone"),
            SocialPlatform::Instagram
        );
        assert_eq!(
            SocialPlatform::from_url("https://www.tiktok.com/@dance"),
            SocialPlatform::TikTok
        );
        assert_eq!(
            SocialPlatform::from_url("https://example.org"),
            SocialPlatform::Website
        );
    }

    #[test]
    fn creator_row_uses_table_column_names() {
        let creator = Creator {
            id: CreatorId(3),
            name: "Ada".into(),
            url: "https://x.com/ada".into(),
            description: "Pioneer".into(),
            image_url: Some("https://img.example/ada.png".into()),
            created_at: None,
        };
        let json = serde_json::to_value(&creator).expect("json");
        assert_eq!(json["id"], 3);
        assert_eq!(json["imageURL"], "https://img.example/ada.png");
        assert!(json.get("created_at").is_none());

        let row: Creator = serde_json::from_value(serde_json::json!({
            "id": 4,
            "name": "Grace",
            "url": "https://grace.dev",
            "description": "Compilers",
            "imageURL": null,
            "created_at": "2024-01-01T00:00:00Z"
        }))
        .expect("row");
        assert_eq!(row.id, CreatorId(4));
        assert!(!row.has_image());
        assert!(row.created_at.is_some());
    }
}
