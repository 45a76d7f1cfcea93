//! The speech synthesis collaborator consulted on a full cache miss

use crate::cache::key::AudioKey;
use crate::cache::types::AudioBytes;
use crate::error::Result;
use async_trait::async_trait;

/// Produces audio for a request (typically a remote TTS service client)
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, key: &AudioKey) -> Result<AudioBytes>;
}
