//! Generation mode resolution and input validation.

use crate::models::{BatchCount, ContentFormat, GenerationInputs, ModeSelection};
use crate::{Error, Result};
use std::fmt;

/// Exactly one of these is active for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Standard,
    MultiFormat,
    Batch { count: BatchCount },
    Carousel,
    Summarizer,
    SummarizerExam,
}

impl Mode {
    pub fn is_summarizer(&self) -> bool {
        matches!(self, Mode::Summarizer | Mode::SummarizerExam)
    }

    /// Only standard drafts go through the persona drift check.
    pub fn checks_drift(&self) -> bool {
        matches!(self, Mode::Standard)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mode::Standard => "standard",
            Mode::MultiFormat => "multi-format",
            Mode::Batch { .. } => "batch",
            Mode::Carousel => "carousel",
            Mode::Summarizer => "summarizer",
            Mode::SummarizerExam => "summarizer-exam",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Pick the active mode. Summarizer wins over carousel, carousel over batch,
/// and the format only matters when none of them is on.
pub fn resolve(inputs: &GenerationInputs) -> Mode {
    match inputs.selection() {
        ModeSelection::Summarizer { exam: true } => Mode::SummarizerExam,
        ModeSelection::Summarizer { exam: false } => Mode::Summarizer,
        ModeSelection::Carousel => Mode::Carousel,
        ModeSelection::Batch => Mode::Batch {
            count: inputs.batch_count(),
        },
        ModeSelection::Single if inputs.format == ContentFormat::MultiFormatExploder => {
            Mode::MultiFormat
        }
        ModeSelection::Single => Mode::Standard,
    }
}

/// Resolve the mode and reject inputs missing a required field.
pub fn validate(inputs: &GenerationInputs) -> Result<Mode> {
    let mode = resolve(inputs);

    if mode.is_summarizer() {
        require(&inputs.context, "context", "provide source text to summarize")?;
        require(&inputs.persona, "persona", "select a persona for the summary")?;
    } else {
        require(&inputs.persona, "persona", "provide a persona")?;
        require(&inputs.topic, "topic", "provide a topic")?;
    }

    Ok(mode)
}

fn require(value: &str, field: &str, hint: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Validation(format!(
            "Missing required field `{}`: {}",
            field, hint
        )));
    }
    Ok(())
}
