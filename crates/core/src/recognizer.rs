use crate::labels::SignLabel;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::sync::Mutex;

/// Lower bound (inclusive) of the mock confidence score.
pub const CONFIDENCE_MIN: f64 = 0.85;
/// Upper bound (exclusive) of the mock confidence score.
pub const CONFIDENCE_MAX: f64 = 0.99;

/// A single recognition result. Produced per request and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Detection {
    pub label: SignLabel,
    pub confidence: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum RecognizerError {
    #[error("recognizer state is unavailable: {0}")]
    Unavailable(String),
    #[error("{0}")]
    Internal(String),
}

// The `Recognizer` trait is the seam between the HTTP layer and whatever
// produces sign labels. Today that is `RandomRecognizer`; a real model only has
// to return the same `Detection` shape for callers to be unaffected.
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// Classifies an opaque, client-encoded image. The payload is not decoded.
    async fn detect(&self, image: &str) -> Result<Detection, RecognizerError>;
}

/// Stand-in recognizer that ignores its input and picks a label at random.
pub struct RandomRecognizer {
    rng: Mutex<StdRng>,
}

impl RandomRecognizer {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Builds a recognizer whose sequence of results is reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Recognizer for RandomRecognizer {
    async fn detect(&self, image: &str) -> Result<Detection, RecognizerError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|e| RecognizerError::Unavailable(e.to_string()))?;

        let label = SignLabel::ALL[rng.gen_range(0..SignLabel::ALL.len())];
        let confidence = rng.gen_range(CONFIDENCE_MIN..CONFIDENCE_MAX);

        tracing::debug!(
            payload_len = image.len(),
            %label,
            confidence,
            "Mock recognizer produced a detection"
        );

        Ok(Detection { label, confidence })
    }
}
