//! Data models for Contentify

mod api_key;
mod connection;
mod draft;
mod platform;
mod user;

pub use api_key::{ApiKeyRecord, ApiKeyVault, ApiService};
pub use connection::{ConnectionStatus, SocialConnections};
pub use draft::{Draft, SourceImage};
pub use platform::PlatformId;
pub use user::User;
