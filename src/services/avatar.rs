//! Best-effort Gravatar lookup used at signup.

use async_trait::async_trait;
use sha2::{Digest, Sha256};

/// Resolving an avatar is never allowed to fail signup; any problem is a
/// `None`.
#[async_trait]
pub trait AvatarLookup: Send + Sync {
    async fn lookup(&self, email: &str) -> Option<String>;
}

pub struct GravatarLookup {
    client: reqwest::Client,
}

impl GravatarLookup {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for GravatarLookup {
    fn default() -> Self {
        Self::new()
    }
}

/// Gravatar profile image URL for an email (SHA-256 of the trimmed,
/// lowercased address).
pub fn gravatar_url(email: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(email.trim().to_lowercase().as_bytes());
    let digest = hex::encode(hasher.finalize());
    format!("https://www.gravatar.com/avatar/{digest}")
}

#[async_trait]
impl AvatarLookup for GravatarLookup {
    async fn lookup(&self, email: &str) -> Option<String> {
        let url = gravatar_url(email);

        // `d=404` makes Gravatar answer 404 instead of a generated image when
        // no avatar is registered for the address.
        match self.client.get(format!("{url}?d=404")).send().await {
            Ok(response) if response.status().is_success() => Some(url),
            Ok(_) => None,
            Err(err) => {
                tracing::debug!("gravatar lookup failed: {err}");
                None
            }
        }
    }
}
