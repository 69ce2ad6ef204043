//! Platform definitions
//!
//! The limits below are static configuration and must be checked against
//! the platforms' current rules before being relied on.

use serde::{Deserialize, Serialize};

/// Supported social platforms
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PlatformId {
    /// X, formerly Twitter
    #[default]
    Twitter,
    /// LinkedIn
    #[serde(rename = "linkedin")]
    LinkedIn,
    /// Facebook
    Facebook,
    /// Instagram
    Instagram,
}

impl PlatformId {
    /// Get all supported platforms
    pub const fn all() -> &'static [Self] {
        &[Self::Twitter, Self::LinkedIn, Self::Facebook, Self::Instagram]
    }

    /// Get the display name
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Twitter => "X (Twitter)",
            Self::LinkedIn => "LinkedIn",
            Self::Facebook => "Facebook",
            Self::Instagram => "Instagram",
        }
    }

    /// Stable lowercase identifier
    pub const fn id(&self) -> &'static str {
        match self {
            Self::Twitter => "twitter",
            Self::LinkedIn => "linkedin",
            Self::Facebook => "facebook",
            Self::Instagram => "instagram",
        }
    }

    /// Get the emoji icon
    pub const fn emoji(&self) -> &'static str {
        match self {
            Self::Twitter => "🐦",
            Self::LinkedIn => "💼",
            Self::Facebook => "📘",
            Self::Instagram => "📸",
        }
    }

    /// Maximum caption length, in characters
    pub const fn max_caption_len(&self) -> usize {
        match self {
            Self::Twitter => 280,
            Self::LinkedIn => 3000,
            Self::Facebook => 63206,
            Self::Instagram => 2200,
        }
    }

    /// One-line description for the connections view
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Twitter => "Connect to publish posts directly to Twitter",
            Self::LinkedIn => "Share professional content on LinkedIn",
            Self::Facebook => "Post to your Facebook pages and profile",
            Self::Instagram => "Share visual content to your Instagram feed",
        }
    }

    /// OAuth authorization endpoint
    pub const fn authorize_endpoint(&self) -> &'static str {
        match self {
            Self::Twitter => "https://api.twitter.com/oauth/authorize",
            Self::LinkedIn => "https://www.linkedin.com/oauth/v2/authorization",
            Self::Facebook => "https://www.facebook.com/v18.0/dialog/oauth",
            Self::Instagram => "https://api.instagram.com/oauth/authorize",
        }
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "twitter" | "x" => Some(Self::Twitter),
            "linkedin" => Some(Self::LinkedIn),
            "facebook" | "fb" => Some(Self::Facebook),
            "instagram" | "ig" => Some(Self::Instagram),
            _ => None,
        }
    }

    /// Whether a caption fits this platform's limit
    pub fn fits(&self, caption: &str) -> bool {
        caption.chars().count() <= self.max_caption_len()
    }
}

impl std::fmt::Display for PlatformId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limits() {
        assert_eq!(PlatformId::Twitter.max_caption_len(), 280);
        assert_eq!(PlatformId::LinkedIn.max_caption_len(), 3000);
        assert_eq!(PlatformId::Facebook.max_caption_len(), 63206);
        assert_eq!(PlatformId::Instagram.max_caption_len(), 2200);
    }

    #[test]
    fn test_from_str_aliases() {
        assert_eq!(PlatformId::from_str("X"), Some(PlatformId::Twitter));
        assert_eq!(PlatformId::from_str(" ig "), Some(PlatformId::Instagram));
        assert_eq!(PlatformId::from_str("linkedin"), Some(PlatformId::LinkedIn));
        assert_eq!(PlatformId::from_str("myspace"), None);
    }

    #[test]
    fn test_serde_ids_match() {
        for platform in PlatformId::all() {
            let json = serde_json::to_string(platform).unwrap();
            assert_eq!(json, format!("\"{}\"", platform.id()));
        }
    }

    #[test]
    fn test_fits_counts_chars() {
        let caption = "é".repeat(280);
        assert!(PlatformId::Twitter.fits(&caption));
        assert!(!PlatformId::Twitter.fits(&format!("{caption}!")));
    }
}
