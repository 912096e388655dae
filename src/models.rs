//! Data models and structures
//!
//! Defines generation inputs, the mode selection they carry, and the result
//! shapes handed back to callers and persistence.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Target content format for single-format generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum ContentFormat {
    #[default]
    #[serde(rename = "LinkedIn Post")]
    #[value(name = "linkedin-post")]
    LinkedInPost,
    #[serde(rename = "Twitter/X Thread")]
    #[value(name = "twitter-thread")]
    TwitterThread,
    #[serde(rename = "Instagram Caption")]
    #[value(name = "instagram-caption")]
    InstagramCaption,
    #[serde(rename = "Patient Email Newsletter")]
    #[value(name = "patient-email")]
    PatientEmailNewsletter,
    #[serde(rename = "Clinical Blog Post")]
    #[value(name = "blog-post")]
    ClinicalBlogPost,
    #[serde(rename = "Conference Abstract")]
    #[value(name = "conference-abstract")]
    ConferenceAbstract,
    #[serde(rename = "Multi-Format Exploder")]
    #[value(name = "multi-format")]
    MultiFormatExploder,
}

impl ContentFormat {
    pub fn label(&self) -> &'static str {
        match self {
            ContentFormat::LinkedInPost => "LinkedIn Post",
            ContentFormat::TwitterThread => "Twitter/X Thread",
            ContentFormat::InstagramCaption => "Instagram Caption",
            ContentFormat::PatientEmailNewsletter => "Patient Email Newsletter",
            ContentFormat::ClinicalBlogPost => "Clinical Blog Post",
            ContentFormat::ConferenceAbstract => "Conference Abstract",
            ContentFormat::MultiFormatExploder => "Multi-Format Exploder",
        }
    }
}

impl fmt::Display for ContentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reader level. Shapes tone and safety framing only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum Audience {
    #[default]
    #[serde(rename = "Layperson (Patient/Public)")]
    Layperson,
    #[serde(rename = "Medical Student")]
    Student,
    #[serde(rename = "Licensed Clinician")]
    Clinician,
    #[serde(rename = "Business Decision-Maker")]
    Business,
}

impl Audience {
    pub fn label(&self) -> &'static str {
        match self {
            Audience::Layperson => "Layperson (Patient/Public)",
            Audience::Student => "Medical Student",
            Audience::Clinician => "Licensed Clinician",
            Audience::Business => "Business Decision-Maker",
        }
    }

    /// Softening and jargon rule for this tier.
    pub fn risk_rule(&self) -> &'static str {
        match self {
            Audience::Layperson => {
                "Remove jargon or explain it on the spot. Soften absolute claims. Keep a clear not-medical-advice tone."
            }
            Audience::Student => "Keep full accuracy and explain the why behind each mechanism.",
            Audience::Clinician => {
                "Respect the reader's expertise. Do not oversimplify. Focus on evidence and nuance."
            }
            Audience::Business => {
                "Focus on strategic value and outcomes. Keep clinical detail to a minimum."
            }
        }
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Number of batch pieces, always within `1..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct BatchCount(u8);

impl BatchCount {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    /// Clamp any requested count into range.
    pub fn new(count: u32) -> Self {
        let clamped = count.clamp(Self::MIN as u32, Self::MAX as u32);
        Self(clamped as u8)
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl Default for BatchCount {
    fn default() -> Self {
        Self(3)
    }
}

impl From<u32> for BatchCount {
    fn from(count: u32) -> Self {
        Self::new(count)
    }
}

impl From<BatchCount> for u32 {
    fn from(count: BatchCount) -> Self {
        count.0 as u32
    }
}

impl fmt::Display for BatchCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The specialised mode an input state has switched on, if any.
///
/// Batch, carousel and summarizer are exclusive by construction and the exam
/// variant only exists inside summarizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModeSelection {
    /// Format-driven generation (standard or multi-format).
    #[default]
    Single,
    Batch,
    Carousel,
    Summarizer {
        exam: bool,
    },
}

/// Complete configuration for one generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "InputsRecord", into = "InputsRecord")]
pub struct GenerationInputs {
    pub persona: String,
    pub format: ContentFormat,
    pub topic: String,
    pub context: String,
    pub audience: Audience,
    pub include_citations: bool,
    pub enable_distillation: bool,
    pub include_hashtags: bool,
    selection: ModeSelection,
    batch_count: BatchCount,
}

impl Default for GenerationInputs {
    fn default() -> Self {
        Self {
            persona: String::new(),
            format: ContentFormat::default(),
            topic: String::new(),
            context: String::new(),
            audience: Audience::default(),
            include_citations: false,
            enable_distillation: false,
            include_hashtags: false,
            selection: ModeSelection::Single,
            batch_count: BatchCount::default(),
        }
    }
}

impl GenerationInputs {
    pub fn new(persona: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            persona: persona.into(),
            topic: topic.into(),
            ..Self::default()
        }
    }

    pub fn with_format(mut self, format: ContentFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_audience(mut self, audience: Audience) -> Self {
        self.audience = audience;
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    pub fn selection(&self) -> ModeSelection {
        self.selection
    }

    pub fn batch_mode(&self) -> bool {
        matches!(self.selection, ModeSelection::Batch)
    }

    pub fn carousel_mode(&self) -> bool {
        matches!(self.selection, ModeSelection::Carousel)
    }

    pub fn summarizer_mode(&self) -> bool {
        matches!(self.selection, ModeSelection::Summarizer { .. })
    }

    pub fn exam_summarizer_mode(&self) -> bool {
        matches!(self.selection, ModeSelection::Summarizer { exam: true })
    }

    pub fn batch_count(&self) -> BatchCount {
        self.batch_count
    }

    /// Enabling batch clears carousel and summarizer. The multi-format
    /// exploder is not offered alongside batch, so it falls back to LinkedIn.
    pub fn set_batch_mode(&mut self, enabled: bool) {
        if enabled {
            self.selection = ModeSelection::Batch;
            if self.format == ContentFormat::MultiFormatExploder {
                self.format = ContentFormat::LinkedInPost;
            }
        } else if self.batch_mode() {
            self.selection = ModeSelection::Single;
        }
    }

    pub fn set_carousel_mode(&mut self, enabled: bool) {
        if enabled {
            self.selection = ModeSelection::Carousel;
        } else if self.carousel_mode() {
            self.selection = ModeSelection::Single;
        }
    }

    /// Disabling summarizer also drops exam mode.
    pub fn set_summarizer_mode(&mut self, enabled: bool) {
        if enabled {
            if !self.summarizer_mode() {
                self.selection = ModeSelection::Summarizer { exam: false };
            }
        } else if self.summarizer_mode() {
            self.selection = ModeSelection::Single;
        }
    }

    /// Only meaningful while summarizer is on; ignored otherwise.
    pub fn set_exam_summarizer_mode(&mut self, enabled: bool) {
        if self.summarizer_mode() {
            self.selection = ModeSelection::Summarizer { exam: enabled };
        }
    }

    pub fn set_batch_count(&mut self, count: u32) {
        self.batch_count = BatchCount::new(count);
    }
}

/// Flat wire shape with one boolean per mode, as the proxy endpoint expects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InputsRecord {
    #[serde(default)]
    persona: String,
    #[serde(default)]
    format: ContentFormat,
    #[serde(default)]
    topic: String,
    #[serde(default)]
    context: String,
    #[serde(default)]
    audience: Audience,
    #[serde(default)]
    include_citations: bool,
    #[serde(default)]
    enable_distillation: bool,
    #[serde(default)]
    batch_mode: bool,
    #[serde(default)]
    batch_count: BatchCount,
    #[serde(default)]
    carousel_mode: bool,
    #[serde(default)]
    include_hashtags: bool,
    #[serde(default)]
    summarizer_mode: bool,
    #[serde(default)]
    exam_summarizer_mode: bool,
}

impl From<GenerationInputs> for InputsRecord {
    fn from(inputs: GenerationInputs) -> Self {
        Self {
            batch_mode: inputs.batch_mode(),
            carousel_mode: inputs.carousel_mode(),
            summarizer_mode: inputs.summarizer_mode(),
            exam_summarizer_mode: inputs.exam_summarizer_mode(),
            batch_count: inputs.batch_count,
            persona: inputs.persona,
            format: inputs.format,
            topic: inputs.topic,
            context: inputs.context,
            audience: inputs.audience,
            include_citations: inputs.include_citations,
            enable_distillation: inputs.enable_distillation,
            include_hashtags: inputs.include_hashtags,
        }
    }
}

impl From<InputsRecord> for GenerationInputs {
    /// Conflicting flags resolve summarizer first, then carousel, then batch.
    fn from(record: InputsRecord) -> Self {
        let selection = if record.summarizer_mode {
            ModeSelection::Summarizer {
                exam: record.exam_summarizer_mode,
            }
        } else if record.carousel_mode {
            ModeSelection::Carousel
        } else if record.batch_mode {
            ModeSelection::Batch
        } else {
            ModeSelection::Single
        };

        Self {
            persona: record.persona,
            format: record.format,
            topic: record.topic,
            context: record.context,
            audience: record.audience,
            include_citations: record.include_citations,
            enable_distillation: record.enable_distillation,
            include_hashtags: record.include_hashtags,
            selection,
            batch_count: record.batch_count,
        }
    }
}

/// Platform keys of the multi-format exploder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    #[value(name = "linkedin")]
    LinkedIn,
    Instagram,
    Twitter,
    Email,
}

impl Platform {
    pub fn key(&self) -> &'static str {
        match self {
            Platform::LinkedIn => "linkedin",
            Platform::Instagram => "instagram",
            Platform::Twitter => "twitter",
            Platform::Email => "email",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The same facts adapted to four platforms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiFormatContent {
    pub instagram: String,
    pub linkedin: String,
    pub email: String,
    pub twitter: String,
}

impl MultiFormatContent {
    pub fn get(&self, platform: Platform) -> &str {
        match platform {
            Platform::LinkedIn => &self.linkedin,
            Platform::Instagram => &self.instagram,
            Platform::Twitter => &self.twitter,
            Platform::Email => &self.email,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarouselSlide {
    pub slide_number: u32,
    pub title: String,
    pub content: String,
    pub visual_description: String,
}

/// Persona-fidelity verdict returned by the drift check.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriftAssessment {
    pub score: i64,
    pub reasoning: String,
    #[serde(default)]
    pub final_content: Option<String>,
}

/// Shape-carrying payload of a result. Free-text modes carry none.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StructuredOutput {
    #[serde(rename = "multiFormatOutput")]
    MultiFormat(MultiFormatContent),
    #[serde(rename = "batchOutput")]
    Batch(Vec<String>),
    #[serde(rename = "carouselOutput")]
    Carousel(Vec<CarouselSlide>),
}

/// Output of one pipeline run. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distilled_insight: Option<String>,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub structured: Option<StructuredOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drift_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drift_reasoning: Option<String>,
}

impl GenerationResult {
    pub fn multi_format_output(&self) -> Option<&MultiFormatContent> {
        match &self.structured {
            Some(StructuredOutput::MultiFormat(content)) => Some(content),
            _ => None,
        }
    }

    pub fn batch_output(&self) -> Option<&[String]> {
        match &self.structured {
            Some(StructuredOutput::Batch(posts)) => Some(posts),
            _ => None,
        }
    }

    pub fn carousel_output(&self) -> Option<&[CarouselSlide]> {
        match &self.structured {
            Some(StructuredOutput::Carousel(slides)) => Some(slides),
            _ => None,
        }
    }

    /// Single copyable string; `platform` picks the multi-format variant.
    pub fn plain_text(&self, platform: Platform) -> String {
        match &self.structured {
            None => self.content.clone(),
            Some(StructuredOutput::MultiFormat(content)) => content.get(platform).to_string(),
            Some(StructuredOutput::Batch(posts)) => posts.join("\n\n---\n\n"),
            Some(StructuredOutput::Carousel(slides)) => slides
                .iter()
                .map(|slide| {
                    format!(
                        "Slide {}: {}\n{}\n[Visual: {}]",
                        slide.slide_number, slide.title, slide.content, slide.visual_description
                    )
                })
                .collect::<Vec<_>>()
                .join("\n\n---\n\n"),
        }
    }
}

impl fmt::Display for GenerationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(insight) = &self.distilled_insight {
            writeln!(f, "CORE INSIGHT: {}\n", insight)?;
        }

        match &self.structured {
            None => writeln!(f, "{}", self.content)?,
            Some(StructuredOutput::MultiFormat(content)) => {
                for platform in [
                    Platform::LinkedIn,
                    Platform::Instagram,
                    Platform::Twitter,
                    Platform::Email,
                ] {
                    writeln!(f, "== {} ==\n{}\n", platform, content.get(platform))?;
                }
            }
            Some(StructuredOutput::Batch(posts)) => {
                for (index, post) in posts.iter().enumerate() {
                    writeln!(f, "== Variation {} ==\n{}\n", index + 1, post)?;
                }
            }
            Some(StructuredOutput::Carousel(_)) => {
                writeln!(f, "{}", self.plain_text(Platform::default()))?;
            }
        }

        if let Some(score) = self.drift_score {
            write!(f, "\nPersona alignment: {}%", score)?;
            if let Some(reasoning) = &self.drift_reasoning {
                write!(f, " ({})", reasoning)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
