//! Draft model: one idea/image plus its per-platform captions

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PlatformId;
use crate::error::ValidationError;

/// Image attached to a draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceImage {
    /// Image supplied by the user
    Uploaded {
        /// Original file name
        file_name: String,
        /// MIME type guessed from the extension
        mime: String,
        /// Raw file contents
        #[serde(with = "base64_bytes")]
        bytes: Vec<u8>,
    },
    /// Placeholder produced by the generator
    Generated {
        /// `data:` URI of the image
        data_uri: String,
    },
}

impl SourceImage {
    /// Build an uploaded image, guessing the MIME type from the file name
    pub fn uploaded(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime = mime_for(&file_name).to_string();
        Self::Uploaded {
            file_name,
            mime,
            bytes,
        }
    }

    /// Short human-readable label
    pub fn label(&self) -> String {
        match self {
            Self::Uploaded {
                file_name, bytes, ..
            } => format!("{} ({} KB)", file_name, bytes.len().div_ceil(1024)),
            Self::Generated { .. } => "Generated image".to_string(),
        }
    }
}

fn mime_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

mod base64_bytes {
    use base64::{Engine, engine::general_purpose::STANDARD};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

/// The unit of work moving from creation to review.
///
/// Captions are keyed by exactly the draft's platforms; only caption values
/// change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    id: Uuid,
    idea: String,
    source_image: SourceImage,
    captions: BTreeMap<PlatformId, String>,
    created_at: DateTime<Utc>,
}

impl Draft {
    /// Create a draft; its platforms are the keys of `captions`
    pub fn new(
        idea: impl Into<String>,
        source_image: SourceImage,
        captions: BTreeMap<PlatformId, String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            idea: idea.into(),
            source_image,
            captions,
            created_at: Utc::now(),
        }
    }

    /// Unique identifier
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// The idea the draft was generated from (may be empty for uploads)
    pub fn idea(&self) -> &str {
        &self.idea
    }

    /// Attached image
    pub const fn source_image(&self) -> &SourceImage {
        &self.source_image
    }

    /// When the draft was generated
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether the image was supplied by the user
    pub const fn is_uploaded(&self) -> bool {
        matches!(self.source_image, SourceImage::Uploaded { .. })
    }

    /// Target platforms, in display order
    pub fn platforms(&self) -> BTreeSet<PlatformId> {
        self.captions.keys().copied().collect()
    }

    /// First platform in display order
    pub fn first_platform(&self) -> Option<PlatformId> {
        self.captions.keys().next().copied()
    }

    /// Whether the draft targets a platform
    pub fn targets(&self, platform: PlatformId) -> bool {
        self.captions.contains_key(&platform)
    }

    /// All captions
    pub const fn captions(&self) -> &BTreeMap<PlatformId, String> {
        &self.captions
    }

    /// Caption for a platform
    pub fn caption(&self, platform: PlatformId) -> Option<&str> {
        self.captions.get(&platform).map(String::as_str)
    }

    /// Replace the caption for one platform
    pub fn set_caption(
        &mut self,
        platform: PlatformId,
        text: impl Into<String>,
    ) -> Result<(), ValidationError> {
        let caption = self
            .captions
            .get_mut(&platform)
            .ok_or(ValidationError::UnknownPlatform(platform))?;
        *caption = text.into();
        Ok(())
    }

    /// Caption length in characters
    pub fn caption_len(&self, platform: PlatformId) -> usize {
        self.caption(platform).map_or(0, |c| c.chars().count())
    }

    /// Platforms whose caption exceeds the length limit
    pub fn over_limit(&self) -> Vec<PlatformId> {
        self.captions
            .iter()
            .filter(|(platform, caption)| !platform.fits(caption))
            .map(|(platform, _)| *platform)
            .collect()
    }

    /// Get a short preview of the idea (for list display)
    pub fn preview(&self, max_len: usize) -> String {
        let idea = self.idea.replace('\n', " ");
        if idea.chars().count() <= max_len {
            idea
        } else {
            let cut: String = idea.chars().take(max_len.saturating_sub(3)).collect();
            format!("{cut}...")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> Draft {
        let captions = BTreeMap::from([
            (PlatformId::Instagram, "insta".to_string()),
            (PlatformId::Twitter, "tweet".to_string()),
        ]);
        Draft::new(
            "idea",
            SourceImage::Generated {
                data_uri: "data:,".to_string(),
            },
            captions,
        )
    }

    #[test]
    fn test_platforms_follow_captions() {
        let draft = draft();
        let platforms: Vec<_> = draft.platforms().into_iter().collect();
        assert_eq!(platforms, vec![PlatformId::Twitter, PlatformId::Instagram]);
        assert_eq!(draft.first_platform(), Some(PlatformId::Twitter));
    }

    #[test]
    fn test_set_caption_rejects_foreign_platform() {
        let mut draft = draft();
        let err = draft.set_caption(PlatformId::Facebook, "x").unwrap_err();
        assert_eq!(err, ValidationError::UnknownPlatform(PlatformId::Facebook));
        assert!(!draft.targets(PlatformId::Facebook));
    }

    #[test]
    fn test_over_limit() {
        let mut draft = draft();
        draft.set_caption(PlatformId::Twitter, "a".repeat(281)).unwrap();
        assert_eq!(draft.over_limit(), vec![PlatformId::Twitter]);
    }

    #[test]
    fn test_uploaded_mime_and_json() {
        let image = SourceImage::uploaded("Photo.JPG", vec![1, 2, 3]);
        let SourceImage::Uploaded { mime, .. } = &image else {
            panic!("expected upload");
        };
        assert_eq!(mime, "image/jpeg");

        let json = serde_json::to_string(&image).unwrap();
        assert!(json.contains("\"bytes\":\"AQID\""));
        let back: SourceImage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, image);
    }

    #[test]
    fn test_preview_truncates_on_chars() {
        let mut draft = draft();
        draft.idea = "ééééééééé".to_string();
        assert_eq!(draft.preview(6), "ééé...");
    }
}
