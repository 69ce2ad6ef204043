//! Service contracts for the external collaborators
//!
//! Generation, identity, social OAuth and publishing are all reached through
//! these traits. [`mock::MockStudio`] implements every one of them with fixed
//! delays and fabricated output; a real backend plugs in behind the same
//! contracts.

pub mod mock;
pub mod placeholder;

use std::collections::BTreeSet;
use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ContentError, ValidationError};
use crate::models::{Draft, PlatformId, SourceImage, User};

/// Input of a generation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Free-text idea (may be blank when an image is uploaded)
    pub idea: String,
    /// Target platforms
    pub platforms: BTreeSet<PlatformId>,
    /// Image supplied by the user instead of a generated one
    pub upload: Option<SourceImage>,
}

impl GenerationRequest {
    /// Create a request
    pub fn new(
        idea: impl Into<String>,
        platforms: impl IntoIterator<Item = PlatformId>,
        upload: Option<SourceImage>,
    ) -> Self {
        Self {
            idea: idea.into(),
            platforms: platforms.into_iter().collect(),
            upload,
        }
    }

    /// Check the preconditions shared by every generator
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.idea.trim().is_empty() && self.upload.is_none() {
            return Err(ValidationError::MissingIdea);
        }
        if self.platforms.is_empty() {
            return Err(ValidationError::NoPlatformSelected);
        }
        Ok(())
    }
}

/// An authenticated identity-service session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token for later calls
    pub token: String,
    /// The signed-in user
    pub user: User,
}

/// What happened to a draft handed to the publisher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptKind {
    /// Posted immediately
    Published,
    /// Queued for later
    Scheduled,
}

/// Publisher acknowledgement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Draft the receipt refers to
    pub draft_id: Uuid,
    /// Published or scheduled
    pub kind: ReceiptKind,
    /// Publish time, or the scheduled time
    pub at: DateTime<Utc>,
    /// Platforms the post went to
    pub platforms: Vec<PlatformId>,
}

/// AI text and image generation
pub trait ContentGenerator {
    /// Turn an idea (or upload) into a draft with one caption per platform
    fn generate(
        &self,
        request: GenerationRequest,
    ) -> impl Future<Output = Result<Draft, ContentError>> + Send;

    /// Rewrite a caption for engagement
    fn improve_writing(
        &self,
        text: String,
    ) -> impl Future<Output = Result<String, ContentError>> + Send;

    /// Suggest hashtags for a caption, in display order
    fn suggest_hashtags(
        &self,
        text: String,
    ) -> impl Future<Output = Result<Vec<String>, ContentError>> + Send;
}

/// Account login and registration
pub trait IdentityService {
    /// Sign in with email and password
    fn login(
        &self,
        email: String,
        password: String,
    ) -> impl Future<Output = Result<Session, ContentError>> + Send;

    /// Register a new account
    fn signup(
        &self,
        email: String,
        password: String,
        name: String,
    ) -> impl Future<Output = Result<Session, ContentError>> + Send;
}

/// Per-platform OAuth linking
pub trait SocialAuthorizer {
    /// URL the user visits to authorize the app
    fn authorize_url(&self, platform: PlatformId, state: &str) -> String;

    /// Complete the OAuth flow for a platform
    fn connect(
        &self,
        platform: PlatformId,
    ) -> impl Future<Output = Result<(), ContentError>> + Send;

    /// Revoke the platform's token
    fn disconnect(
        &self,
        platform: PlatformId,
    ) -> impl Future<Output = Result<(), ContentError>> + Send;
}

/// Publishing and scheduling
pub trait Publisher {
    /// Publish a draft now
    fn publish(&self, draft: Draft) -> impl Future<Output = Result<Receipt, ContentError>> + Send;

    /// Queue a draft for a later time
    fn schedule(
        &self,
        draft: Draft,
        at: DateTime<Utc>,
    ) -> impl Future<Output = Result<Receipt, ContentError>> + Send;
}

/// Everything the application needs from the outside world
pub trait Backend:
    ContentGenerator + IdentityService + SocialAuthorizer + Publisher + Send + Sync + 'static
{
}

impl<T> Backend for T where
    T: ContentGenerator + IdentityService + SocialAuthorizer + Publisher + Send + Sync + 'static
{
}
