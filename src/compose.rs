//! Prompt composition for every generation mode.
//!
//! Each request is a [`Prompt`] of named blocks plus the response shape the
//! provider is asked to honor.

use crate::mode::Mode;
use crate::models::GenerationInputs;
use crate::prompts::{self, BlockKind, Prompt};
use serde_json::{json, Value};

const SUMMARY_DEFAULT_GOAL: &str =
    "Identify the most critical medical concepts, explain them clearly, and structure them logically.";
const NO_CONTEXT: &str = "No specific context.";
const NO_MEDICAL_CONTEXT: &str = "No specific medical context provided. Use general medical knowledge cautiously and avoid specific statistical claims unless they are widely known.";

/// Output contract requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    FreeText,
    StringArray { max_items: u8 },
    SlideArray,
    MultiFormatObject,
    DriftResult,
}

impl ResponseShape {
    pub fn is_structured(&self) -> bool {
        !matches!(self, ResponseShape::FreeText)
    }

    pub fn is_array(&self) -> bool {
        matches!(
            self,
            ResponseShape::StringArray { .. } | ResponseShape::SlideArray
        )
    }

    /// Structured-output schema in Gemini's OpenAPI subset.
    pub fn schema(&self) -> Option<Value> {
        match self {
            ResponseShape::FreeText => None,
            ResponseShape::StringArray { max_items } => Some(json!({
                "type": "ARRAY",
                "minItems": 1,
                "maxItems": max_items,
                "items": {
                    "type": "STRING",
                    "description": "One complete, non-empty content piece"
                }
            })),
            ResponseShape::SlideArray => Some(json!({
                "type": "ARRAY",
                "minItems": 5,
                "maxItems": 10,
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "slideNumber": { "type": "INTEGER" },
                        "title": { "type": "STRING", "description": "Headline for the slide" },
                        "content": { "type": "STRING", "description": "Body text for the slide" },
                        "visualDescription": { "type": "STRING", "description": "Description of the visual or graphic" }
                    },
                    "required": ["slideNumber", "title", "content", "visualDescription"]
                }
            })),
            ResponseShape::MultiFormatObject => Some(json!({
                "type": "OBJECT",
                "properties": {
                    "instagram": { "type": "STRING", "description": "Content for Instagram carousel" },
                    "linkedin": { "type": "STRING", "description": "Content for LinkedIn post" },
                    "email": { "type": "STRING", "description": "Content for patient email" },
                    "twitter": { "type": "STRING", "description": "Content for tweet thread" }
                },
                "required": ["instagram", "linkedin", "email", "twitter"]
            })),
            ResponseShape::DriftResult => Some(json!({
                "type": "OBJECT",
                "properties": {
                    "score": { "type": "INTEGER", "description": "Alignment score from 0-100" },
                    "reasoning": { "type": "STRING", "description": "Brief explanation of the score and any drift detected" },
                    "finalContent": { "type": "STRING", "description": "The original draft if score >= 85, otherwise the rewrite" }
                },
                "required": ["score", "reasoning", "finalContent"]
            })),
        }
    }
}

/// Everything a provider needs for one call.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    pub prompt: Prompt,
    pub system_instruction: Option<&'static str>,
    pub temperature: Option<f32>,
    pub response_shape: ResponseShape,
}

impl ProviderRequest {
    pub fn prompt_text(&self) -> String {
        self.prompt.render()
    }
}

/// Build the mode-specific request. `distilled_topic` replaces the caller's
/// topic when distillation produced one.
pub fn compose(mode: Mode, inputs: &GenerationInputs, distilled_topic: Option<&str>) -> ProviderRequest {
    let topic = distilled_topic.unwrap_or(&inputs.topic);
    let mut prompt = Prompt::new();

    let (temperature, response_shape) = match mode {
        Mode::Standard => {
            prompt
                .push(BlockKind::Instruction, prompts::STANDARD)
                .push(BlockKind::Format, format!("CONTENT_FORMAT:\n{}", inputs.format))
                .push(BlockKind::Topic, format!("TOPIC_OR_RAW_THOUGHT:\n{}", topic))
                .push(
                    BlockKind::Context,
                    format!(
                        "RETRIEVED_MEDICAL_CONTEXT:\n{}",
                        or_fallback(&inputs.context, NO_MEDICAL_CONTEXT)
                    ),
                )
                .push(
                    BlockKind::AudienceFilter,
                    prompts::render(
                        prompts::AUDIENCE_FILTER,
                        &[
                            ("audience", inputs.audience.label()),
                            ("rule", inputs.audience.risk_rule()),
                        ],
                    ),
                );
            (0.7, ResponseShape::FreeText)
        }
        Mode::MultiFormat => {
            prompt
                .push(BlockKind::Instruction, prompts::MULTI_FORMAT)
                .push(BlockKind::Topic, format!("TOPIC:\n{}", topic));
            push_context(&mut prompt, inputs);
            (0.7, ResponseShape::MultiFormatObject)
        }
        Mode::Batch { count } => {
            let count_text = count.to_string();
            prompt
                .push(
                    BlockKind::Instruction,
                    prompts::render(
                        prompts::BATCH,
                        &[("count", count_text.as_str()), ("format", inputs.format.label())],
                    ),
                )
                .push(BlockKind::Topic, format!("THEME:\n{}", topic));
            push_context(&mut prompt, inputs);
            (
                0.9,
                ResponseShape::StringArray {
                    max_items: count.get(),
                },
            )
        }
        Mode::Carousel => {
            prompt
                .push(BlockKind::Instruction, prompts::CAROUSEL)
                .push_if(
                    inputs.include_hashtags,
                    BlockKind::Instruction,
                    prompts::CAROUSEL_HASHTAGS,
                )
                .push(BlockKind::Topic, format!("TOPIC:\n{}", topic));
            push_context(&mut prompt, inputs);
            (0.7, ResponseShape::SlideArray)
        }
        Mode::Summarizer => {
            prompt
                .push(BlockKind::Instruction, prompts::SUMMARIZER)
                .push(
                    BlockKind::Topic,
                    format!("SUMMARY GOAL:\n{}", or_fallback(topic, SUMMARY_DEFAULT_GOAL)),
                )
                .push(BlockKind::Context, format!("SOURCE TEXT:\n{}", inputs.context))
                .push(BlockKind::Audience, format!("TARGET AUDIENCE: {}", inputs.audience));
            (0.5, ResponseShape::FreeText)
        }
        Mode::SummarizerExam => {
            prompt
                .push(BlockKind::Instruction, prompts::EXAM_SUMMARIZER)
                .push_if(
                    !topic.trim().is_empty(),
                    BlockKind::Topic,
                    format!("STUDY GOAL:\n{}", topic),
                )
                .push(BlockKind::Context, format!("SOURCE CAPTIONS:\n{}", inputs.context));
            (0.5, ResponseShape::FreeText)
        }
    };

    let persona_heading = if mode.is_summarizer() {
        "PERSONA DEFINITION"
    } else {
        "PERSONA_SYSTEM_PROMPT"
    };

    prompt
        .push(BlockKind::Persona, format!("{}:\n{}", persona_heading, inputs.persona))
        .push_if(inputs.include_citations, BlockKind::Citations, prompts::CITATIONS)
        .push_if(inputs.include_hashtags, BlockKind::Hashtags, prompts::HASHTAGS)
        .push(BlockKind::Style, prompts::STYLE_GUIDE);

    ProviderRequest {
        prompt,
        system_instruction: Some(prompts::SYSTEM_INSTRUCTION),
        temperature: Some(temperature),
        response_shape,
    }
}

/// Request that compresses raw notes into one opinionated sentence.
pub fn distillation_request(topic: &str) -> ProviderRequest {
    let mut prompt = Prompt::new();
    prompt.push(
        BlockKind::Instruction,
        prompts::render(prompts::DISTILLATION, &[("notes", topic)]),
    );

    ProviderRequest {
        prompt,
        system_instruction: None,
        temperature: Some(0.5),
        response_shape: ResponseShape::FreeText,
    }
}

/// Request that scores a standard draft against its persona.
pub fn drift_request(persona: &str, draft: &str) -> ProviderRequest {
    let mut prompt = Prompt::new();
    prompt.push(
        BlockKind::Instruction,
        prompts::render(
            prompts::DRIFT_DETECTOR,
            &[("persona", persona), ("draft", draft)],
        ),
    );

    ProviderRequest {
        prompt,
        system_instruction: None,
        temperature: None,
        response_shape: ResponseShape::DriftResult,
    }
}

/// Topic text substituted into later prompts after a successful distillation.
pub fn distilled_topic(insight: &str, original_topic: &str) -> String {
    format!(
        "CORE INSIGHT: \"{}\"\n\n(Derived from original raw notes: {})",
        insight, original_topic
    )
}

fn push_context(prompt: &mut Prompt, inputs: &GenerationInputs) {
    prompt
        .push(
            BlockKind::Context,
            format!("CONTEXT:\n{}", or_fallback(&inputs.context, NO_CONTEXT)),
        )
        .push(BlockKind::Audience, format!("AUDIENCE: {}", inputs.audience));
}

fn or_fallback<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::resolve;
    use crate::models::{Audience, BatchCount, ContentFormat};

    fn gp_inputs() -> GenerationInputs {
        GenerationInputs::new("You are a GP", "sleep hygiene")
    }

    #[test]
    fn test_standard_prompt_block_order() {
        let request = compose(Mode::Standard, &gp_inputs(), None);

        assert_eq!(
            request.prompt.kinds(),
            vec![
                BlockKind::Instruction,
                BlockKind::Persona,
                BlockKind::Format,
                BlockKind::Topic,
                BlockKind::Context,
                BlockKind::AudienceFilter,
                BlockKind::Style,
            ]
        );
        assert_eq!(request.response_shape, ResponseShape::FreeText);
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.system_instruction, Some(prompts::SYSTEM_INSTRUCTION));
    }

    #[test]
    fn test_style_guide_is_always_last() {
        let mut inputs = gp_inputs();
        inputs.include_citations = true;
        inputs.include_hashtags = true;
        inputs.context = "Source".to_string();

        let modes = [
            Mode::Standard,
            Mode::MultiFormat,
            Mode::Batch {
                count: BatchCount::new(2),
            },
            Mode::Carousel,
            Mode::Summarizer,
            Mode::SummarizerExam,
        ];
        for mode in modes {
            let request = compose(mode, &inputs, None);
            let kinds = request.prompt.kinds();
            assert_eq!(kinds.last(), Some(&BlockKind::Style), "mode {}", mode);
            assert_eq!(kinds.first(), Some(&BlockKind::Instruction), "mode {}", mode);
            assert!(request.prompt_text().ends_with(prompts::STYLE_GUIDE.trim_end()));
        }
    }

    #[test]
    fn test_optional_fragments_follow_flags() {
        let mut inputs = gp_inputs();
        let plain = compose(Mode::Standard, &inputs, None);
        assert!(!plain.prompt.has(BlockKind::Citations));
        assert!(!plain.prompt.has(BlockKind::Hashtags));

        inputs.include_citations = true;
        let cited = compose(Mode::Standard, &inputs, None);
        assert!(cited.prompt.has(BlockKind::Citations));
        assert!(!cited.prompt.has(BlockKind::Hashtags));

        inputs.include_hashtags = true;
        let both = compose(Mode::Standard, &inputs, None);
        let kinds = both.prompt.kinds();
        let citations = kinds.iter().position(|k| *k == BlockKind::Citations).unwrap();
        let hashtags = kinds.iter().position(|k| *k == BlockKind::Hashtags).unwrap();
        assert!(citations < hashtags);
    }

    #[test]
    fn test_standard_audience_filter_uses_selected_tier_only() {
        let inputs = gp_inputs().with_audience(Audience::Clinician);
        let request = compose(Mode::Standard, &inputs, None);
        let filter = request.prompt.block(BlockKind::AudienceFilter).unwrap();

        assert!(filter.contains("Licensed Clinician"));
        assert!(filter.contains(Audience::Clinician.risk_rule()));
        assert!(!filter.contains(Audience::Layperson.risk_rule()));
    }

    #[test]
    fn test_standard_without_context_uses_cautious_fallback() {
        let request = compose(Mode::Standard, &gp_inputs(), None);
        let context = request.prompt.block(BlockKind::Context).unwrap();
        assert!(context.contains("No specific medical context provided"));
    }

    #[test]
    fn test_multi_format_forbids_new_claims_and_requests_object() {
        let inputs = gp_inputs().with_format(ContentFormat::MultiFormatExploder);
        let request = compose(resolve(&inputs), &inputs, None);

        assert_eq!(request.response_shape, ResponseShape::MultiFormatObject);
        assert!(request.prompt_text().contains("Do not add new claims"));
        let schema = request.response_shape.schema().unwrap();
        assert_eq!(
            schema["required"],
            json!(["instagram", "linkedin", "email", "twitter"])
        );
    }

    #[test]
    fn test_batch_prompt_embeds_count_and_limits_schema() {
        let mut inputs = gp_inputs();
        inputs.set_batch_mode(true);
        inputs.set_batch_count(4);
        let request = compose(resolve(&inputs), &inputs, None);

        assert_eq!(request.response_shape, ResponseShape::StringArray { max_items: 4 });
        assert_eq!(request.temperature, Some(0.9));
        let instruction = request.prompt.block(BlockKind::Instruction).unwrap();
        assert!(instruction.contains("write 4 distinct pieces"));
        assert!(instruction.contains("\"LinkedIn Post\""));
        assert_eq!(request.response_shape.schema().unwrap()["maxItems"], 4);
    }

    #[test]
    fn test_carousel_hashtags_go_to_final_slide() {
        let mut inputs = gp_inputs();
        inputs.set_carousel_mode(true);
        let without = compose(Mode::Carousel, &inputs, None);
        assert!(!without.prompt_text().contains("FINAL slide"));

        inputs.include_hashtags = true;
        let with = compose(Mode::Carousel, &inputs, None);
        assert!(with.prompt_text().contains("FINAL slide"));
        assert!(with.prompt.has(BlockKind::Hashtags));
        assert_eq!(with.response_shape, ResponseShape::SlideArray);
    }

    #[test]
    fn test_summarizer_uses_default_goal_when_topic_empty() {
        let mut inputs = GenerationInputs::new("You are a GP", "");
        inputs.context = "Long transcript".to_string();
        inputs.set_summarizer_mode(true);

        let request = compose(Mode::Summarizer, &inputs, None);
        let goal = request.prompt.block(BlockKind::Topic).unwrap();
        assert!(goal.contains(SUMMARY_DEFAULT_GOAL));
        assert!(request.prompt_text().contains("Synthesize, do not transcribe"));
        assert!(request.prompt_text().contains("THE CORE THESIS"));
        assert_eq!(request.temperature, Some(0.5));
    }

    #[test]
    fn test_exam_prompt_requires_bracketed_timestamps_and_pearls() {
        let mut inputs = GenerationInputs::new("You are a tutor", "");
        inputs.context = "00:01:00 intro".to_string();
        inputs.set_summarizer_mode(true);
        inputs.set_exam_summarizer_mode(true);

        let request = compose(Mode::SummarizerExam, &inputs, None);
        let text = request.prompt_text();
        assert!(text.contains("square brackets"));
        assert!(text.contains("EXAM PEARLS"));
        assert!(text.contains("00:01:00 intro"));
        assert!(!request.prompt.has(BlockKind::Topic));
    }

    #[test]
    fn test_distilled_topic_replaces_raw_topic() {
        let topic = distilled_topic("Sleep is a vital sign.", "sleep hygiene");
        let request = compose(Mode::Standard, &gp_inputs(), Some(&topic));
        let block = request.prompt.block(BlockKind::Topic).unwrap();

        assert!(block.contains("CORE INSIGHT: \"Sleep is a vital sign.\""));
        assert!(block.contains("Derived from original raw notes: sleep hygiene"));
    }

    #[test]
    fn test_auxiliary_requests_carry_no_system_instruction() {
        let distill = distillation_request("messy notes");
        assert!(distill.prompt_text().contains("\"messy notes\""));
        assert_eq!(distill.system_instruction, None);
        assert_eq!(distill.temperature, Some(0.5));

        let drift = drift_request("You are a GP", "Draft body");
        assert_eq!(drift.response_shape, ResponseShape::DriftResult);
        assert_eq!(drift.system_instruction, None);
        assert!(drift.prompt_text().contains("Draft body"));
        assert!(drift.prompt_text().contains("You are a GP"));
    }

    #[test]
    fn test_drift_request_keeps_placeholder_text_in_persona() {
        let drift = drift_request("Persona mentions {{draft}} literally", "DRAFT_BODY");
        let text = drift.prompt_text();
        assert!(text.contains("Persona mentions {{draft}} literally"));
        assert_eq!(text.matches("DRAFT_BODY").count(), 1);
    }
}
