//! Instruction fragments and ordered prompt assembly.
//!
//! Fragment text lives in `data/prompts/` and is compiled in. A [`Prompt`] is a
//! list of named blocks kept in [`BlockKind`] order no matter the push order,
//! so the style guide always closes the prompt.

pub const SYSTEM_INSTRUCTION: &str = include_str!("../data/prompts/system_instruction.txt");
pub const STYLE_GUIDE: &str = include_str!("../data/prompts/style_guide.txt");
pub const CITATIONS: &str = include_str!("../data/prompts/citations.txt");
pub const HASHTAGS: &str = include_str!("../data/prompts/hashtags.txt");
pub const DISTILLATION: &str = include_str!("../data/prompts/distillation.txt");
pub const DRIFT_DETECTOR: &str = include_str!("../data/prompts/drift_detector.txt");
pub const STANDARD: &str = include_str!("../data/prompts/standard.txt");
pub const AUDIENCE_FILTER: &str = include_str!("../data/prompts/audience_filter.txt");
pub const MULTI_FORMAT: &str = include_str!("../data/prompts/multi_format.txt");
pub const BATCH: &str = include_str!("../data/prompts/batch.txt");
pub const CAROUSEL: &str = include_str!("../data/prompts/carousel.txt");
pub const CAROUSEL_HASHTAGS: &str = include_str!("../data/prompts/carousel_hashtags.txt");
pub const SUMMARIZER: &str = include_str!("../data/prompts/summarizer.txt");
pub const EXAM_SUMMARIZER: &str = include_str!("../data/prompts/exam_summarizer.txt");

/// Replace `{{key}}` placeholders in a template string.
///
/// Substitution is a single pass over the template: inserted values are never
/// scanned again, and unknown keys are left as written.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            rest = &rest[start..];
            break;
        };
        let key = &after[..end];
        match vars.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => result.push_str(value),
            None => result.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }
    result.push_str(rest);
    result
}

/// Named prompt sections. Declaration order is render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BlockKind {
    Instruction,
    Persona,
    Format,
    Topic,
    Context,
    Audience,
    AudienceFilter,
    Citations,
    Hashtags,
    Style,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    pub text: String,
}

/// Ordered collection of prompt blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prompt {
    blocks: Vec<Block>,
}

impl Prompt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a block after every block of the same or an earlier kind.
    pub fn push(&mut self, kind: BlockKind, text: impl Into<String>) -> &mut Self {
        let text = text.into();
        let index = self.blocks.partition_point(|block| block.kind <= kind);
        self.blocks.insert(index, Block { kind, text });
        self
    }

    pub fn push_if(&mut self, condition: bool, kind: BlockKind, text: impl Into<String>) -> &mut Self {
        if condition {
            self.push(kind, text);
        }
        self
    }

    pub fn has(&self, kind: BlockKind) -> bool {
        self.blocks.iter().any(|block| block.kind == kind)
    }

    /// Text of the first block of `kind`.
    pub fn block(&self, kind: BlockKind) -> Option<&str> {
        self.blocks
            .iter()
            .find(|block| block.kind == kind)
            .map(|block| block.text.as_str())
    }

    pub fn kinds(&self) -> Vec<BlockKind> {
        self.blocks.iter().map(|block| block.kind).collect()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn render(&self) -> String {
        self.blocks
            .iter()
            .map(|block| block.text.trim_end())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_single_var() {
        assert_eq!(
            render("Hello {{name}}!", &[("name", "world")]),
            "Hello world!"
        );
    }

    #[test]
    fn test_render_multiple_vars() {
        assert_eq!(
            render("{{a}} and {{b}}", &[("a", "cats"), ("b", "dogs")]),
            "cats and dogs"
        );
    }

    #[test]
    fn test_render_does_not_rescan_inserted_values() {
        assert_eq!(
            render("{{a}} / {{b}}", &[("a", "see {{b}}"), ("b", "dogs")]),
            "see {{b}} / dogs"
        );
    }

    #[test]
    fn test_render_leaves_unknown_and_unclosed_placeholders() {
        assert_eq!(
            render("{{missing}} {{a}} {{open", &[("a", "x")]),
            "{{missing}} x {{open"
        );
    }

    #[test]
    fn test_fragments_are_non_empty() {
        for fragment in [
            SYSTEM_INSTRUCTION,
            STYLE_GUIDE,
            CITATIONS,
            HASHTAGS,
            STANDARD,
            MULTI_FORMAT,
            CAROUSEL,
            CAROUSEL_HASHTAGS,
            SUMMARIZER,
            EXAM_SUMMARIZER,
        ] {
            assert!(!fragment.trim().is_empty());
        }
    }

    #[test]
    fn test_templates_have_placeholders() {
        assert!(DISTILLATION.contains("{{notes}}"));
        assert!(DRIFT_DETECTOR.contains("{{persona}}"));
        assert!(DRIFT_DETECTOR.contains("{{draft}}"));
        assert!(AUDIENCE_FILTER.contains("{{audience}}"));
        assert!(AUDIENCE_FILTER.contains("{{rule}}"));
        assert!(BATCH.contains("{{count}}"));
        assert!(BATCH.contains("{{format}}"));
    }

    #[test]
    fn test_style_guide_bans_em_dash_and_markdown() {
        assert!(STYLE_GUIDE.contains("em dash"));
        assert!(STYLE_GUIDE.contains("asterisks"));
        assert!(STYLE_GUIDE.contains("delve"));
    }

    #[test]
    fn test_prompt_keeps_kind_order_regardless_of_push_order() {
        let mut prompt = Prompt::new();
        prompt
            .push(BlockKind::Style, "style")
            .push(BlockKind::Topic, "topic")
            .push(BlockKind::Instruction, "mode")
            .push(BlockKind::Persona, "persona");

        assert_eq!(
            prompt.kinds(),
            vec![
                BlockKind::Instruction,
                BlockKind::Persona,
                BlockKind::Topic,
                BlockKind::Style
            ]
        );
        assert_eq!(prompt.render(), "mode\n\npersona\n\ntopic\n\nstyle");
    }

    #[test]
    fn test_push_if_skips_false_condition() {
        let mut prompt = Prompt::new();
        prompt
            .push_if(false, BlockKind::Citations, "cite")
            .push_if(true, BlockKind::Hashtags, "tags");

        assert!(!prompt.has(BlockKind::Citations));
        assert_eq!(prompt.block(BlockKind::Hashtags), Some("tags"));
    }

    #[test]
    fn test_same_kind_blocks_keep_insertion_order() {
        let mut prompt = Prompt::new();
        prompt
            .push(BlockKind::Instruction, "first")
            .push(BlockKind::Instruction, "second");

        assert_eq!(prompt.render(), "first\n\nsecond");
        assert_eq!(prompt.block(BlockKind::Instruction), Some("first"));
    }
}
