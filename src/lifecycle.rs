//! Draft lifecycle controller
//!
//! ```text
//! Empty ──begin──▶ Generating ──complete──▶ Ready ──edit──▶ Editing
//!   ▲                  │                      │               │
//!   └──fail/cancel─────┘                      ├──schedule─────┼──▶ Scheduled
//!                                             └──publish──────┴──▶ Published
//! ```
//!
//! Failed or cancelled generations restore whatever phase was active before
//! the attempt. Scheduled and Published are final: the draft can only be
//! discarded afterwards.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::error::{ContentError, ValidationError};
use crate::handoff::DraftSlot;
use crate::models::{Draft, PlatformId, SourceImage};
use crate::services::GenerationRequest;

/// Where the current draft is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No draft; the create view is active
    #[default]
    Empty,
    /// A generation request is in flight
    Generating {
        /// Id of the in-flight request
        request_id: u64,
    },
    /// Draft loaded, untouched
    Ready,
    /// Draft loaded, at least one caption edited
    Editing,
    /// Handed to the scheduler
    Scheduled {
        /// When the post goes out
        at: DateTime<Utc>,
    },
    /// Published immediately
    Published {
        /// When it was published
        at: DateTime<Utc>,
    },
}

impl Phase {
    /// Short label for the status bar
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Generating { .. } => "generating",
            Self::Ready => "ready",
            Self::Editing => "editing",
            Self::Scheduled { .. } => "scheduled",
            Self::Published { .. } => "published",
        }
    }

    /// Whether the draft can no longer change
    pub const fn is_final(&self) -> bool {
        matches!(self, Self::Scheduled { .. } | Self::Published { .. })
    }
}

/// Input collected by the create view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreationForm {
    /// Free-text idea
    pub idea: String,
    /// Selected target platforms
    pub platforms: BTreeSet<PlatformId>,
    /// Attached image, if any
    pub upload: Option<SourceImage>,
}

impl CreationForm {
    /// Form with the given platforms preselected
    pub fn with_platforms(platforms: impl IntoIterator<Item = PlatformId>) -> Self {
        Self {
            platforms: platforms.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Toggle a platform
    pub fn toggle_platform(&mut self, platform: PlatformId) {
        if !self.platforms.remove(&platform) {
            self.platforms.insert(platform);
        }
    }

    /// Whether the generate action should be enabled
    pub fn can_submit(&self) -> bool {
        self.to_request().validate().is_ok()
    }

    /// Build the service request
    pub fn to_request(&self) -> GenerationRequest {
        GenerationRequest {
            idea: self.idea.clone(),
            platforms: self.platforms.clone(),
            upload: self.upload.clone(),
        }
    }
}

/// Result of entering the review view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewEntry {
    /// A draft is available; the platform tab to select first
    Loaded(PlatformId),
    /// Nothing to review; go back to creation
    RedirectToCreate,
}

/// Owns the draft slot and every transition of the draft
#[derive(Debug, Default)]
pub struct DraftLifecycle {
    phase: Phase,
    before_generation: Phase,
    before_finalize: Phase,
    slot: DraftSlot,
    next_request_id: u64,
}

impl DraftLifecycle {
    /// Fresh lifecycle in the Empty phase
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Draft currently in the slot
    pub const fn draft(&self) -> Option<&Draft> {
        self.slot.current()
    }

    /// Whether a generation is running
    pub const fn is_generating(&self) -> bool {
        matches!(self.phase, Phase::Generating { .. })
    }

    /// Validate the form and enter Generating.
    ///
    /// On error nothing changes.
    pub fn begin_generation(
        &mut self,
        form: &CreationForm,
    ) -> Result<(u64, GenerationRequest), ValidationError> {
        if self.is_generating() {
            return Err(ValidationError::GenerationInFlight);
        }
        let request = form.to_request();
        request.validate()?;

        self.next_request_id += 1;
        let request_id = self.next_request_id;
        self.before_generation = self.phase;
        self.phase = Phase::Generating { request_id };
        tracing::debug!(request_id, platforms = request.platforms.len(), "Generation started");
        Ok((request_id, request))
    }

    /// Accept a generated draft; stale results are dropped and return false
    pub fn complete_generation(&mut self, request_id: u64, draft: Draft) -> bool {
        if self.phase != (Phase::Generating { request_id }) {
            tracing::debug!(request_id, "Ignoring stale generation result");
            return false;
        }
        self.slot.store(draft);
        self.phase = Phase::Ready;
        true
    }

    /// Record a failed generation; stale failures return false
    pub fn fail_generation(&mut self, request_id: u64, error: &ContentError) -> bool {
        if self.phase != (Phase::Generating { request_id }) {
            return false;
        }
        tracing::warn!(request_id, %error, "Generation failed");
        self.phase = self.before_generation;
        true
    }

    /// Abandon the in-flight generation, returning its id
    pub fn cancel_generation(&mut self) -> Option<u64> {
        match self.phase {
            Phase::Generating { request_id } => {
                self.phase = self.before_generation;
                Some(request_id)
            }
            _ => None,
        }
    }

    /// Enter the review view
    pub fn open_review(&mut self) -> ReviewEntry {
        match self.slot.current().and_then(Draft::first_platform) {
            Some(platform) => {
                if self.phase == Phase::Empty {
                    self.phase = Phase::Ready;
                }
                ReviewEntry::Loaded(platform)
            }
            None => ReviewEntry::RedirectToCreate,
        }
    }

    const fn check_phase(&self) -> Result<(), ValidationError> {
        match self.phase {
            Phase::Scheduled { .. } => Err(ValidationError::DraftFinalized("scheduled")),
            Phase::Published { .. } => Err(ValidationError::DraftFinalized("published")),
            Phase::Generating { .. } => Err(ValidationError::GenerationInFlight),
            Phase::Empty | Phase::Ready | Phase::Editing => Ok(()),
        }
    }

    /// The draft, if it can still be changed
    pub fn editable(&self) -> Result<&Draft, ValidationError> {
        self.check_phase()?;
        self.slot.current().ok_or(ValidationError::NoDraft)
    }

    fn editable_draft(&mut self) -> Result<&mut Draft, ValidationError> {
        self.check_phase()?;
        self.slot.current_mut().ok_or(ValidationError::NoDraft)
    }

    /// Replace one platform's caption; other platforms are untouched
    pub fn edit_caption(
        &mut self,
        platform: PlatformId,
        text: impl Into<String>,
    ) -> Result<(), ValidationError> {
        self.editable_draft()?.set_caption(platform, text)?;
        self.phase = Phase::Editing;
        Ok(())
    }

    /// Append a hashtag line to one platform's caption
    pub fn append_hashtags(
        &mut self,
        platform: PlatformId,
        tags: &[String],
    ) -> Result<(), ValidationError> {
        let draft = self.editable_draft()?;
        let current = draft
            .caption(platform)
            .ok_or(ValidationError::UnknownPlatform(platform))?;
        let updated = format!("{}\n\n{}", current, tags.join(" "));
        self.edit_caption(platform, updated)
    }

    /// Schedule the draft; a missing date is rejected without a transition
    pub fn schedule(&mut self, at: Option<DateTime<Utc>>) -> Result<Draft, ValidationError> {
        let draft = self.editable_draft()?.clone();
        let at = at.ok_or(ValidationError::MissingScheduleDate)?;
        self.before_finalize = self.phase;
        self.phase = Phase::Scheduled { at };
        tracing::info!(draft = %draft.id(), %at, "Draft scheduled");
        Ok(draft)
    }

    /// Publish the draft now
    pub fn publish(&mut self) -> Result<Draft, ValidationError> {
        let draft = self.editable_draft()?.clone();
        self.before_finalize = self.phase;
        self.phase = Phase::Published { at: Utc::now() };
        tracing::info!(draft = %draft.id(), "Draft published");
        Ok(draft)
    }

    /// Undo schedule/publish after the publisher rejected it
    pub fn revert_finalize(&mut self) {
        if self.phase.is_final() {
            self.phase = self.before_finalize;
        }
    }

    /// Throw the draft away and start over
    pub fn discard(&mut self) -> Option<Draft> {
        let old = self.slot.clear();
        if self.is_generating() {
            self.before_generation = Phase::Empty;
        } else {
            self.phase = Phase::Empty;
        }
        old
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ContentGenerator;
    use crate::services::mock::MockStudio;

    fn form(idea: &str, platforms: &[PlatformId]) -> CreationForm {
        CreationForm {
            idea: idea.to_string(),
            platforms: platforms.iter().copied().collect(),
            upload: None,
        }
    }

    fn generated(lifecycle: &mut DraftLifecycle, idea: &str, platforms: &[PlatformId]) {
        let (id, request) = lifecycle.begin_generation(&form(idea, platforms)).unwrap();
        let draft = tokio_test::block_on(MockStudio::instant().generate(request)).unwrap();
        assert!(lifecycle.complete_generation(id, draft));
    }

    #[test]
    fn test_generation_to_ready() {
        let mut lifecycle = DraftLifecycle::new();
        generated(
            &mut lifecycle,
            "sunset over mountains",
            &[PlatformId::Twitter, PlatformId::Instagram],
        );

        assert_eq!(lifecycle.phase(), Phase::Ready);
        let draft = lifecycle.draft().unwrap();
        assert_eq!(draft.captions().len(), 2);
        assert!(draft.captions().values().all(|c| !c.is_empty()));
    }

    #[test]
    fn test_empty_idea_leaves_state_unchanged() {
        let mut lifecycle = DraftLifecycle::new();
        let err = lifecycle
            .begin_generation(&form("", &[PlatformId::Twitter]))
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingIdea);
        assert_eq!(lifecycle.phase(), Phase::Empty);
        assert!(lifecycle.draft().is_none());
    }

    #[test]
    fn test_resubmission_blocked_while_generating() {
        let mut lifecycle = DraftLifecycle::new();
        let f = form("idea", &[PlatformId::Twitter]);
        lifecycle.begin_generation(&f).unwrap();
        assert_eq!(
            lifecycle.begin_generation(&f).unwrap_err(),
            ValidationError::GenerationInFlight
        );
    }

    #[test]
    fn test_stale_result_ignored_after_cancel() {
        let mut lifecycle = DraftLifecycle::new();
        let (id, request) = lifecycle
            .begin_generation(&form("idea", &[PlatformId::Twitter]))
            .unwrap();
        assert_eq!(lifecycle.cancel_generation(), Some(id));
        assert_eq!(lifecycle.phase(), Phase::Empty);

        let draft = tokio_test::block_on(MockStudio::instant().generate(request)).unwrap();
        assert!(!lifecycle.complete_generation(id, draft));
        assert!(lifecycle.draft().is_none());
    }

    #[test]
    fn test_failure_restores_previous_phase() {
        let mut lifecycle = DraftLifecycle::new();
        generated(&mut lifecycle, "first", &[PlatformId::Twitter]);
        lifecycle.edit_caption(PlatformId::Twitter, "edited").unwrap();

        let (id, _) = lifecycle
            .begin_generation(&form("second", &[PlatformId::Twitter]))
            .unwrap();
        let failure = ContentError::OperationFailure("boom".into());
        assert!(lifecycle.fail_generation(id, &failure));
        assert_eq!(lifecycle.phase(), Phase::Editing);
        assert_eq!(lifecycle.draft().unwrap().idea(), "first");
    }

    #[test]
    fn test_new_draft_overwrites_old() {
        let mut lifecycle = DraftLifecycle::new();
        generated(&mut lifecycle, "first", &[PlatformId::Twitter]);
        generated(&mut lifecycle, "second", &[PlatformId::LinkedIn]);
        let draft = lifecycle.draft().unwrap();
        assert_eq!(draft.idea(), "second");
        assert!(!draft.targets(PlatformId::Twitter));
    }

    #[test]
    fn test_caption_edits_are_isolated() {
        let mut lifecycle = DraftLifecycle::new();
        generated(
            &mut lifecycle,
            "idea",
            &[PlatformId::Twitter, PlatformId::LinkedIn],
        );
        let linkedin_before = lifecycle
            .draft()
            .unwrap()
            .caption(PlatformId::LinkedIn)
            .unwrap()
            .to_string();

        lifecycle.edit_caption(PlatformId::Twitter, "short and sweet").unwrap();

        let draft = lifecycle.draft().unwrap();
        assert_eq!(draft.caption(PlatformId::Twitter), Some("short and sweet"));
        assert_eq!(draft.caption(PlatformId::LinkedIn), Some(linkedin_before.as_str()));
        assert_eq!(lifecycle.phase(), Phase::Editing);
    }

    #[test]
    fn test_append_hashtags() {
        let mut lifecycle = DraftLifecycle::new();
        generated(&mut lifecycle, "idea", &[PlatformId::Twitter]);
        lifecycle.edit_caption(PlatformId::Twitter, "hello").unwrap();
        lifecycle
            .append_hashtags(PlatformId::Twitter, &["#a".into(), "#b".into()])
            .unwrap();
        assert_eq!(
            lifecycle.draft().unwrap().caption(PlatformId::Twitter),
            Some("hello\n\n#a #b")
        );
    }

    #[test]
    fn test_schedule_requires_date() {
        let mut lifecycle = DraftLifecycle::new();
        generated(&mut lifecycle, "idea", &[PlatformId::Twitter]);
        lifecycle.edit_caption(PlatformId::Twitter, "x").unwrap();

        assert_eq!(
            lifecycle.schedule(None).unwrap_err(),
            ValidationError::MissingScheduleDate
        );
        assert_eq!(lifecycle.phase(), Phase::Editing);

        let at = Utc::now() + chrono::Duration::days(1);
        lifecycle.schedule(Some(at)).unwrap();
        assert_eq!(lifecycle.phase(), Phase::Scheduled { at });
    }

    #[test]
    fn test_final_drafts_reject_actions() {
        let mut lifecycle = DraftLifecycle::new();
        generated(&mut lifecycle, "idea", &[PlatformId::Twitter]);
        lifecycle.publish().unwrap();

        assert!(matches!(lifecycle.phase(), Phase::Published { .. }));
        assert_eq!(
            lifecycle.publish().unwrap_err(),
            ValidationError::DraftFinalized("published")
        );
        assert_eq!(
            lifecycle.schedule(Some(Utc::now())).unwrap_err(),
            ValidationError::DraftFinalized("published")
        );
        assert!(lifecycle.edit_caption(PlatformId::Twitter, "late").is_err());
    }

    #[test]
    fn test_revert_finalize() {
        let mut lifecycle = DraftLifecycle::new();
        generated(&mut lifecycle, "idea", &[PlatformId::Twitter]);
        lifecycle.publish().unwrap();
        lifecycle.revert_finalize();
        assert_eq!(lifecycle.phase(), Phase::Ready);
    }

    #[test]
    fn test_review_without_draft_redirects() {
        let mut lifecycle = DraftLifecycle::new();
        assert_eq!(lifecycle.open_review(), ReviewEntry::RedirectToCreate);
        assert_eq!(lifecycle.phase(), Phase::Empty);
    }

    #[test]
    fn test_review_selects_first_platform() {
        let mut lifecycle = DraftLifecycle::new();
        generated(
            &mut lifecycle,
            "idea",
            &[PlatformId::Instagram, PlatformId::LinkedIn],
        );
        assert_eq!(
            lifecycle.open_review(),
            ReviewEntry::Loaded(PlatformId::LinkedIn)
        );
    }

    #[test]
    fn test_discard_returns_to_empty() {
        let mut lifecycle = DraftLifecycle::new();
        generated(&mut lifecycle, "idea", &[PlatformId::Twitter]);
        assert!(lifecycle.discard().is_some());
        assert_eq!(lifecycle.phase(), Phase::Empty);
        assert_eq!(lifecycle.open_review(), ReviewEntry::RedirectToCreate);
    }

    #[test]
    fn test_form_toggle_and_submit() {
        let mut form = CreationForm::with_platforms([PlatformId::Twitter]);
        assert!(!form.can_submit());
        form.idea = "idea".into();
        assert!(form.can_submit());
        form.toggle_platform(PlatformId::Twitter);
        assert!(!form.can_submit());
        form.toggle_platform(PlatformId::Facebook);
        assert!(form.platforms.contains(&PlatformId::Facebook));
    }
}
