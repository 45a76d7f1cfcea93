//! Cache key derivation for synthesized audio
//!
//! Every tier identifies audio by the same four request inputs. Two encodings
//! are derived from them:
//! - a SHA-256 content key (`text:voice:speed:format`) used by the disk and
//!   memory tiers; `\` and `:` inside a field are backslash-escaped so field
//!   boundaries stay unambiguous
//! - a readable hot key (`lower(text)_voice_speed_format`) used by the hot tier,
//!   so operators can see which curated message an entry belongs to

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Length of a content key in hex characters
pub const CONTENT_KEY_LEN: usize = 64;

/// The inputs a synthesized clip is identified by
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioKey {
    pub text: String,
    pub voice: String,
    pub speed: f64,
    pub format: String,
}

impl AudioKey {
    pub fn new(
        text: impl Into<String>,
        voice: impl Into<String>,
        speed: f64,
        format: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            voice: voice.into(),
            speed,
            format: format.into(),
        }
    }

    /// Fixed-length content hash identifying this request
    pub fn content_key(&self) -> String {
        build_content_key(&self.text, &self.voice, self.speed, &self.format)
    }

    /// Operator-readable key used by the hot tier
    pub fn hot_key(&self) -> String {
        build_hot_key(&self.text, &self.voice, self.speed, &self.format)
    }

    /// Lowercased text, the unit of hot-tier curation
    pub fn curated_text(&self) -> String {
        self.text.to_lowercase()
    }
}

impl fmt::Display for AudioKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} [{} @ {}x, {}]",
            self.text,
            self.voice,
            format_speed(self.speed),
            self.format
        )
    }
}

/// Render a speed the same way in both key encodings.
///
/// Whole numbers keep their decimal point (`1.0`, not `1`).
pub fn format_speed(speed: f64) -> String {
    format!("{:?}", speed)
}

/// Build the SHA-256 content key for a request.
///
/// Empty text is valid input; validation belongs to the caller.
pub fn build_content_key(text: &str, voice: &str, speed: f64, format: &str) -> String {
    let canonical = format!(
        "{}:{}:{}:{}",
        escape_field(text),
        escape_field(voice),
        format_speed(speed),
        escape_field(format)
    );
    let digest = Sha256::digest(canonical.as_bytes());
    hex::encode(digest)
}

/// Escape the field separator so `("a:b", "c")` and `("a", "b:c")` differ
fn escape_field(field: &str) -> String {
    let mut escaped = String::with_capacity(field.len());
    for c in field.chars() {
        if c == '\\' || c == ':' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Build the human-oriented hot key for a request (text is case-normalized)
pub fn build_hot_key(text: &str, voice: &str, speed: f64, format: &str) -> String {
    format!(
        "{}_{}_{}_{}",
        text.to_lowercase(),
        voice,
        format_speed(speed),
        format
    )
}
