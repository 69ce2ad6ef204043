//! Mock implementation of every service contract
//!
//! Each call waits a fixed delay and returns fabricated output. The caption
//! templates are placeholders for a real generation call and carry no
//! meaning beyond the contract (idea + platforms in, image + captions out).

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::{Rng, SeedableRng, rngs::StdRng};
use uuid::Uuid;

use super::{
    ContentGenerator, GenerationRequest, IdentityService, Publisher, Receipt, ReceiptKind,
    Session, SocialAuthorizer, placeholder,
};
use crate::config::Config;
use crate::error::{ContentError, ValidationError};
use crate::models::{Draft, PlatformId, SourceImage, User};

/// Redirect target registered for the mock OAuth apps
const REDIRECT_URI: &str = "contentify://oauth/callback";

/// Candidate hashtag sets; one is picked per suggestion
const HASHTAG_SETS: [[&str; 5]; 5] = [
    [
        "#ContentCreation",
        "#SocialMedia",
        "#MarketingTips",
        "#DigitalMarketing",
        "#CreativeContent",
    ],
    [
        "#Innovation",
        "#Technology",
        "#AI",
        "#FutureOfWork",
        "#DigitalTransformation",
    ],
    [
        "#Inspiration",
        "#Motivation",
        "#Success",
        "#Entrepreneurship",
        "#BusinessTips",
    ],
    [
        "#Creative",
        "#Design",
        "#Visual",
        "#Branding",
        "#ContentStrategy",
    ],
    [
        "#Trending",
        "#Viral",
        "#Engagement",
        "#Community",
        "#SocialMediaTips",
    ],
];

const IMPROVEMENT_NOTES: [&str; 4] = [
    "Enhanced clarity and engagement with compelling storytelling elements.",
    "Improved flow with stronger emotional hooks and clear call-to-action.",
    "Optimized for social media with punchy phrases and visual breaks.",
    "Added power words and persuasive language for better conversion.",
];

/// Simulated latency of each mock call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockDelays {
    /// Content generation
    pub generate: Duration,
    /// Writing improvement
    pub improve: Duration,
    /// Hashtag suggestion
    pub hashtags: Duration,
    /// OAuth connect
    pub connect: Duration,
    /// Login / signup
    pub auth: Duration,
    /// Publish / schedule
    pub publish: Duration,
}

impl Default for MockDelays {
    fn default() -> Self {
        Self {
            generate: Duration::from_millis(3000),
            improve: Duration::from_millis(2000),
            hashtags: Duration::from_millis(1500),
            connect: Duration::from_millis(2000),
            auth: Duration::from_millis(300),
            publish: Duration::from_millis(500),
        }
    }
}

impl MockDelays {
    /// No latency at all
    pub const fn none() -> Self {
        Self {
            generate: Duration::ZERO,
            improve: Duration::ZERO,
            hashtags: Duration::ZERO,
            connect: Duration::ZERO,
            auth: Duration::ZERO,
            publish: Duration::ZERO,
        }
    }
}

/// Fabricates drafts, sessions, connections and receipts
pub struct MockStudio {
    delays: MockDelays,
    rng: Mutex<StdRng>,
}

impl MockStudio {
    /// Create a studio; a seed makes hashtag and note picks reproducible
    pub fn new(delays: MockDelays, seed: Option<u64>) -> Self {
        let rng = seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        Self {
            delays,
            rng: Mutex::new(rng),
        }
    }

    /// Studio configured from the user's settings
    pub fn from_config(config: &Config) -> Self {
        let delays = MockDelays {
            generate: Duration::from_millis(config.generation_delay_ms),
            improve: Duration::from_millis(config.improve_delay_ms),
            hashtags: Duration::from_millis(config.hashtag_delay_ms),
            connect: Duration::from_millis(config.connect_delay_ms),
            ..MockDelays::default()
        };
        Self::new(delays, config.hashtag_seed)
    }

    /// Zero-latency studio with a fixed seed
    pub fn instant() -> Self {
        Self::new(MockDelays::none(), Some(0))
    }

    fn pick(&self, len: usize) -> usize {
        self.rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .random_range(0..len)
    }
}

async fn simulate_latency(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

/// First `max` characters of `text`, with an ellipsis when cut
fn excerpt(text: &str, max: usize) -> String {
    let mut out: String = text.chars().take(max).collect();
    if text.chars().count() > max {
        out.push_str("...");
    }
    out
}

/// Fabricated caption for one platform
pub fn mock_caption(platform: PlatformId, idea: &str) -> String {
    match platform {
        PlatformId::Twitter => format!(
            "🚀 {}\n\nThis is where creativity meets innovation! ✨\n\n#ContentCreation #AI #SocialMedia #Innovation",
            excerpt(idea, 50)
        ),
        PlatformId::LinkedIn => format!(
            "Excited to share this incredible concept: {}\n\nThe future of content creation is here, and it's powered by AI. What do you think about this approach?\n\n#ProfessionalGrowth #Innovation #ContentStrategy #AI",
            excerpt(idea, 80)
        ),
        PlatformId::Facebook => format!(
            "Check out this amazing idea! 🌟\n\n{}\n\nLove seeing creativity come to life through technology. What are your thoughts? Share in the comments below! 👇\n\n#Creative #Technology #SocialMedia #Innovation",
            excerpt(idea, 100)
        ),
        PlatformId::Instagram => format!(
            "✨ Bringing ideas to life ✨\n\n{}\n\n📸 This is what happens when creativity meets AI\n💫 The future is bright\n\n#ContentCreator #AI #Creative #Innovation #Inspiration",
            excerpt(idea, 60)
        ),
    }
}

/// Decorate each sentence and append an improvement note
fn improve_text(text: &str, note: &str) -> String {
    let splitter = regex_lite::Regex::new(r"[.!?]+").ok();
    let sentences: Vec<&str> = match &splitter {
        Some(re) => re.split(text).collect(),
        None => vec![text],
    };

    let improved = sentences
        .iter()
        .enumerate()
        .map(|(index, sentence)| {
            let trimmed = sentence.trim();
            if trimmed.is_empty() {
                (*sentence).to_string()
            } else {
                let mark = if index % 2 == 0 { "✨" } else { "🚀" };
                format!("{trimmed} {mark}")
            }
        })
        .collect::<Vec<_>>()
        .join(". ");

    format!("{improved}\n\n💡 {note}")
}

/// Text the captions are templated from
fn caption_source(request: &GenerationRequest) -> String {
    if !request.idea.trim().is_empty() {
        return request.idea.trim().to_string();
    }
    match &request.upload {
        Some(SourceImage::Uploaded { file_name, .. }) => {
            let stem = file_name
                .rsplit_once('.')
                .map_or(file_name.as_str(), |(stem, _)| stem);
            stem.replace(['_', '-'], " ")
        }
        _ => String::new(),
    }
}

impl ContentGenerator for MockStudio {
    fn generate(
        &self,
        request: GenerationRequest,
    ) -> impl Future<Output = Result<Draft, ContentError>> + Send {
        async move {
            request.validate()?;
            simulate_latency(self.delays.generate).await;

            let source = caption_source(&request);
            let captions: BTreeMap<PlatformId, String> = request
                .platforms
                .iter()
                .map(|platform| (*platform, mock_caption(*platform, &source)))
                .collect();

            let image = request.upload.unwrap_or_else(|| SourceImage::Generated {
                data_uri: placeholder::placeholder_data_uri(&source),
            });

            let draft = Draft::new(request.idea, image, captions);
            tracing::info!(
                draft = %draft.id(),
                platforms = draft.captions().len(),
                uploaded = draft.is_uploaded(),
                "Generated draft"
            );
            Ok(draft)
        }
    }

    fn improve_writing(
        &self,
        text: String,
    ) -> impl Future<Output = Result<String, ContentError>> + Send {
        async move {
            let note = IMPROVEMENT_NOTES[self.pick(IMPROVEMENT_NOTES.len())];
            simulate_latency(self.delays.improve).await;
            Ok(improve_text(&text, note))
        }
    }

    fn suggest_hashtags(
        &self,
        _text: String,
    ) -> impl Future<Output = Result<Vec<String>, ContentError>> + Send {
        async move {
            let set = HASHTAG_SETS[self.pick(HASHTAG_SETS.len())];
            simulate_latency(self.delays.hashtags).await;
            Ok(set.iter().map(|tag| (*tag).to_string()).collect())
        }
    }
}

impl IdentityService for MockStudio {
    fn login(
        &self,
        email: String,
        password: String,
    ) -> impl Future<Output = Result<Session, ContentError>> + Send {
        async move {
            if email.trim().is_empty() || password.is_empty() {
                return Err(ValidationError::MissingCredentials.into());
            }
            simulate_latency(self.delays.auth).await;
            Ok(Session {
                token: Uuid::new_v4().to_string(),
                user: User::from_email(Uuid::new_v4().to_string(), email.trim()),
            })
        }
    }

    fn signup(
        &self,
        email: String,
        password: String,
        name: String,
    ) -> impl Future<Output = Result<Session, ContentError>> + Send {
        async move {
            if email.trim().is_empty() || password.is_empty() || name.trim().is_empty() {
                return Err(ValidationError::MissingCredentials.into());
            }
            simulate_latency(self.delays.auth).await;
            Ok(Session {
                token: Uuid::new_v4().to_string(),
                user: User {
                    id: Uuid::new_v4().to_string(),
                    email: email.trim().to_string(),
                    name: name.trim().to_string(),
                },
            })
        }
    }
}

impl SocialAuthorizer for MockStudio {
    fn authorize_url(&self, platform: PlatformId, state: &str) -> String {
        format!(
            "{}?client_id=contentify&redirect_uri={}&response_type=code&state={}",
            platform.authorize_endpoint(),
            urlencoding::encode(REDIRECT_URI),
            urlencoding::encode(state)
        )
    }

    fn connect(
        &self,
        platform: PlatformId,
    ) -> impl Future<Output = Result<(), ContentError>> + Send {
        async move {
            simulate_latency(self.delays.connect).await;
            tracing::debug!(platform = platform.id(), "Mock OAuth completed");
            Ok(())
        }
    }

    fn disconnect(
        &self,
        platform: PlatformId,
    ) -> impl Future<Output = Result<(), ContentError>> + Send {
        async move {
            tracing::debug!(platform = platform.id(), "Mock OAuth revoked");
            Ok(())
        }
    }
}

impl Publisher for MockStudio {
    fn publish(&self, draft: Draft) -> impl Future<Output = Result<Receipt, ContentError>> + Send {
        async move {
            simulate_latency(self.delays.publish).await;
            Ok(Receipt {
                draft_id: draft.id(),
                kind: ReceiptKind::Published,
                at: Utc::now(),
                platforms: draft.platforms().into_iter().collect(),
            })
        }
    }

    fn schedule(
        &self,
        draft: Draft,
        at: DateTime<Utc>,
    ) -> impl Future<Output = Result<Receipt, ContentError>> + Send {
        async move {
            simulate_latency(self.delays.publish).await;
            Ok(Receipt {
                draft_id: draft.id(),
                kind: ReceiptKind::Scheduled,
                at,
                platforms: draft.platforms().into_iter().collect(),
            })
        }
    }
}
