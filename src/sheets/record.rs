use crate::models::{GenerationInputs, GenerationResult, Platform, StructuredOutput};
use chrono::{DateTime, Local};

const PERSONA_EXCERPT_CHARS: usize = 100;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One spreadsheet row:
/// `[timestamp, persona excerpt, topic, format, audience, drift, content]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRecord {
    pub timestamp: String,
    pub persona_excerpt: String,
    pub topic: String,
    pub format_label: String,
    pub audience: String,
    pub drift_score_label: String,
    pub content: String,
}

impl SheetRecord {
    pub fn new(
        inputs: &GenerationInputs,
        result: &GenerationResult,
        platform: Platform,
        at: DateTime<Local>,
    ) -> Self {
        let (format_label, content) = match &result.structured {
            Some(StructuredOutput::MultiFormat(content)) => (
                format!("{} ({})", inputs.format, platform),
                content.get(platform).to_string(),
            ),
            Some(StructuredOutput::Carousel(slides)) => (
                "Instagram Carousel".to_string(),
                slides
                    .iter()
                    .map(|slide| {
                        format!("[Slide {}] {}: {}", slide.slide_number, slide.title, slide.content)
                    })
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            Some(StructuredOutput::Batch(posts)) => (
                format!("Batch ({})", inputs.batch_count()),
                posts.join("\n\n---\n\n"),
            ),
            None => (inputs.format.to_string(), result.content.clone()),
        };

        Self {
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
            persona_excerpt: persona_excerpt(&inputs.persona),
            topic: inputs.topic.clone(),
            format_label,
            audience: inputs.audience.to_string(),
            // A score of 0 is a real score and is written as "0%".
            drift_score_label: result
                .drift_score
                .map(|score| format!("{}%", score))
                .unwrap_or_else(|| "N/A".to_string()),
            content,
        }
    }

    /// Stamped with the current local time.
    pub fn now(inputs: &GenerationInputs, result: &GenerationResult, platform: Platform) -> Self {
        Self::new(inputs, result, platform, Local::now())
    }

    pub fn into_row(self) -> Vec<String> {
        vec![
            self.timestamp,
            self.persona_excerpt,
            self.topic,
            self.format_label,
            self.audience,
            self.drift_score_label,
            self.content,
        ]
    }
}

fn persona_excerpt(persona: &str) -> String {
    if persona.chars().count() > PERSONA_EXCERPT_CHARS {
        let head: String = persona.chars().take(PERSONA_EXCERPT_CHARS).collect();
        format!("{}...", head)
    } else {
        persona.to_string()
    }
}
