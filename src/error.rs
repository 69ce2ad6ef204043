//! Error taxonomy
//!
//! Two kinds of failure exist: user-correctable validation problems, which
//! never change state, and operation failures from (mock) services, which
//! revert the operation to its pre-attempt state. Neither is fatal.

use std::time::Duration;

use thiserror::Error;

use crate::models::PlatformId;

/// A user-correctable problem with the input of an action
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Neither an idea nor an uploaded image was provided
    #[error("Please enter your content idea or attach an image first")]
    MissingIdea,

    /// No target platform selected
    #[error("Please select at least one platform")]
    NoPlatformSelected,

    /// Schedule requested without a date
    #[error("Please select a date to schedule this post")]
    MissingScheduleDate,

    /// Schedule text could not be parsed
    #[error("Could not understand schedule time '{0}'")]
    InvalidScheduleTime(String),

    /// Schedule time is not in the future
    #[error("Please pick a time in the future")]
    ScheduleInPast,

    /// Login/signup with a blank field
    #[error("Please fill in every field")]
    MissingCredentials,

    /// Saving an API key with no value
    #[error("Please enter an API key first")]
    MissingApiKey,

    /// A generation is already running
    #[error("Content is already being generated")]
    GenerationInFlight,

    /// The draft was already published or scheduled
    #[error("This draft is already {0}; create a new one")]
    DraftFinalized(&'static str),

    /// Caption edit for a platform the draft doesn't target
    #[error("{} is not part of this draft", .0.name())]
    UnknownPlatform(PlatformId),

    /// Action that needs a draft while none is loaded
    #[error("No draft loaded")]
    NoDraft,
}

/// Failure of an operation against a (mock) service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    /// Input rejected before the operation started
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Service-side failure; the user may retry manually
    #[error("Operation failed: {0}")]
    OperationFailure(String),

    /// The operation exceeded its deadline
    #[error("Operation timed out after {}s", .0.as_secs())]
    TimedOut(Duration),

    /// The operation was cancelled before completing
    #[error("Operation cancelled")]
    Cancelled,
}

impl ContentError {
    /// Whether the user can fix this by changing their input
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_converts() {
        let err: ContentError = ValidationError::NoPlatformSelected.into();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Please select at least one platform");
    }

    #[test]
    fn test_timeout_message() {
        let err = ContentError::TimedOut(Duration::from_secs(30));
        assert_eq!(err.to_string(), "Operation timed out after 30s");
        assert!(!err.is_validation());
    }

    #[test]
    fn test_unknown_platform_message() {
        let err = ValidationError::UnknownPlatform(PlatformId::LinkedIn);
        assert_eq!(err.to_string(), "LinkedIn is not part of this draft");
    }
}
