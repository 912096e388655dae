//! Mapping raw provider output into [`GenerationResult`] shapes.

use crate::mode::Mode;
use crate::models::{
    CarouselSlide, DriftAssessment, GenerationResult, MultiFormatContent, StructuredOutput,
};
use crate::{Error, Result};
use serde::de::DeserializeOwned;

pub const NO_CONTENT: &str = "No content generated.";
pub const NO_SUMMARY: &str = "No summary generated.";
pub const MULTI_FORMAT_PLACEHOLDER: &str =
    "Multi-Format Content Generated. Please check the tabs below.";
pub const BATCH_PLACEHOLDER: &str = "Batch Generated.";
pub const CAROUSEL_PLACEHOLDER: &str = "Carousel Generated.";

/// Score recorded when persona drift is not evaluated.
pub const UNEVALUATED_SCORE: u8 = 100;
/// Score recorded for summaries, which derive directly from the source text.
pub const SUMMARY_SCORE: u8 = 95;

/// How malformed structured payloads are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonPolicy {
    /// Any malformed payload fails the run.
    #[default]
    Strict,
    /// Array and object payloads fall back to an empty shape. Drift results
    /// stay strict.
    Lenient,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    policy: JsonPolicy,
}

impl Normalizer {
    pub fn new(policy: JsonPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> JsonPolicy {
        self.policy
    }

    /// Free-text summaries carry the fixed summary score.
    pub fn summary(&self, raw: &str, mode: Mode) -> GenerationResult {
        let reasoning = if mode == Mode::SummarizerExam {
            "Exam mode active. Content structured for NEET-PG/USMLE retention."
        } else {
            "Summarizer mode active. Content derived directly from source text."
        };

        GenerationResult {
            content: non_empty_or(raw, NO_SUMMARY),
            distilled_insight: None,
            structured: None,
            drift_score: Some(SUMMARY_SCORE),
            drift_reasoning: Some(reasoning.to_string()),
        }
    }

    pub fn multi_format(&self, raw: &str) -> Result<GenerationResult> {
        let content: MultiFormatContent = self.parse(raw, "multi-format")?;
        Ok(unevaluated(
            MULTI_FORMAT_PLACEHOLDER,
            StructuredOutput::MultiFormat(content),
            "Drift detection bypassed for Multi-Format Exploder mode.",
        ))
    }

    /// Blank posts are dropped and anything beyond `limit` is cut. Short
    /// batches are kept as delivered.
    pub fn batch(&self, raw: &str, limit: u8) -> Result<GenerationResult> {
        let posts: Vec<String> = self.parse(raw, "batch")?;
        let delivered = posts.len();
        let posts: Vec<String> = posts
            .into_iter()
            .filter(|post| !post.trim().is_empty())
            .take(limit as usize)
            .collect();

        if posts.len() != delivered {
            tracing::warn!(
                "Batch response had {} items, kept {} (limit {})",
                delivered,
                posts.len(),
                limit
            );
        }

        Ok(unevaluated(
            BATCH_PLACEHOLDER,
            StructuredOutput::Batch(posts),
            "Batch mode enabled. Diversity prioritized.",
        ))
    }

    /// Slide numbers are kept exactly as returned.
    pub fn carousel(&self, raw: &str) -> Result<GenerationResult> {
        let slides: Vec<CarouselSlide> = self.parse(raw, "carousel")?;
        Ok(unevaluated(
            CAROUSEL_PLACEHOLDER,
            StructuredOutput::Carousel(slides),
            "Carousel mode enabled. Structural JSON generation active.",
        ))
    }

    /// Combine a standard draft with its drift verdict. An empty rewrite falls
    /// back to the draft; the score is clamped into 0..=100.
    pub fn drift(&self, draft: &str, raw: &str) -> Result<GenerationResult> {
        let assessment: DriftAssessment = serde_json::from_str(raw.trim()).map_err(|e| {
            tracing::error!("Failed to parse drift result: {}\nBody: {}", e, raw);
            Error::AiProvider(format!("Failed to parse drift result: {}", e))
        })?;

        let content = match assessment.final_content {
            Some(rewritten) if !rewritten.trim().is_empty() => rewritten,
            _ => draft.to_string(),
        };

        Ok(GenerationResult {
            content,
            distilled_insight: None,
            structured: None,
            drift_score: Some(assessment.score.clamp(0, 100) as u8),
            drift_reasoning: Some(assessment.reasoning),
        })
    }

    fn parse<T: DeserializeOwned + Default>(&self, raw: &str, what: &str) -> Result<T> {
        match serde_json::from_str(raw.trim()) {
            Ok(parsed) => Ok(parsed),
            Err(e) if self.policy == JsonPolicy::Lenient => {
                tracing::warn!(
                    "Malformed {} response ({}), using an empty result",
                    what,
                    e
                );
                Ok(T::default())
            }
            Err(e) => {
                tracing::error!("Failed to parse {} response: {}\nBody: {}", what, e, raw);
                Err(Error::AiProvider(format!(
                    "Failed to parse {} response: {}",
                    what, e
                )))
            }
        }
    }
}

/// Draft text used for the drift check, with the empty-response placeholder.
pub fn draft_text(raw: &str) -> String {
    non_empty_or(raw, NO_CONTENT)
}

fn unevaluated(content: &str, output: StructuredOutput, reasoning: &str) -> GenerationResult {
    GenerationResult {
        content: content.to_string(),
        distilled_insight: None,
        structured: Some(output),
        drift_score: Some(UNEVALUATED_SCORE),
        drift_reasoning: Some(reasoning.to_string()),
    }
}

fn non_empty_or(raw: &str, placeholder: &str) -> String {
    if raw.trim().is_empty() {
        placeholder.to_string()
    } else {
        raw.to_string()
    }
}
