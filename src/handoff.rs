//! Single-slot store carrying a draft from the create view to review

use crate::models::Draft;

/// Holds at most one draft; storing a new one replaces the old.
///
/// Lives for the application session only and is never written to disk.
#[derive(Debug, Default)]
pub struct DraftSlot {
    draft: Option<Draft>,
}

impl DraftSlot {
    /// Empty slot
    pub const fn new() -> Self {
        Self { draft: None }
    }

    /// Store a draft, returning the one it replaced
    pub fn store(&mut self, draft: Draft) -> Option<Draft> {
        if let Some(old) = &self.draft {
            tracing::debug!(old = %old.id(), new = %draft.id(), "Replacing draft in slot");
        }
        self.draft.replace(draft)
    }

    /// Current draft
    pub const fn current(&self) -> Option<&Draft> {
        self.draft.as_ref()
    }

    /// Current draft, for caption edits
    pub const fn current_mut(&mut self) -> Option<&mut Draft> {
        self.draft.as_mut()
    }

    /// Whether a draft is present
    pub const fn is_empty(&self) -> bool {
        self.draft.is_none()
    }

    /// Drop the current draft
    pub fn clear(&mut self) -> Option<Draft> {
        self.draft.take()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::models::{PlatformId, SourceImage};

    fn draft(idea: &str) -> Draft {
        Draft::new(
            idea,
            SourceImage::Generated {
                data_uri: String::new(),
            },
            BTreeMap::from([(PlatformId::Twitter, idea.to_string())]),
        )
    }

    #[test]
    fn test_store_overwrites() {
        let mut slot = DraftSlot::new();
        assert!(slot.store(draft("first")).is_none());
        let replaced = slot.store(draft("second")).unwrap();

        assert_eq!(replaced.idea(), "first");
        assert_eq!(slot.current().unwrap().idea(), "second");
    }

    #[test]
    fn test_clear() {
        let mut slot = DraftSlot::new();
        slot.store(draft("only"));
        assert!(slot.clear().is_some());
        assert!(slot.is_empty());
        assert!(slot.current().is_none());
    }
}
