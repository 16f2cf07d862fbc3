// src/generation/prompt.rs
// Generation instruction assembled from ordered, named sections

use std::fmt;

use super::exemplars::ExampleBank;
use super::{GenerationRequest, StyleMode, PARAGRAPH_WORD_LIMIT};
use crate::sentiment::SentimentLabel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptSection {
    TaskFraming,
    Tone,
    Length,
    Structure,
    Style,
    Exemplars,
    Subject,
}

impl PromptSection {
    /// Order sections appear in a rendered instruction
    pub const ORDER: [PromptSection; 7] = [
        PromptSection::TaskFraming,
        PromptSection::Tone,
        PromptSection::Length,
        PromptSection::Structure,
        PromptSection::Style,
        PromptSection::Exemplars,
        PromptSection::Subject,
    ];

    fn rank(&self) -> usize {
        Self::ORDER.iter().position(|s| s == self).unwrap_or(Self::ORDER.len())
    }
}

/// A finished instruction. Sections are kept so tests and logs can look at
/// individual fragments; `text()` is what gets sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    sections: Vec<(PromptSection, String)>,
}

impl Prompt {
    pub fn section(&self, kind: PromptSection) -> Option<&str> {
        self.sections
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, text)| text.as_str())
    }

    pub fn sections(&self) -> impl Iterator<Item = (PromptSection, &str)> {
        self.sections.iter().map(|(k, text)| (*k, text.as_str()))
    }

    pub fn text(&self) -> String {
        self.sections
            .iter()
            .map(|(_, text)| text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

#[derive(Debug, Default)]
pub struct PromptBuilder {
    sections: Vec<(PromptSection, String)>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a section, replacing any earlier text for the same kind.
    pub fn section(mut self, kind: PromptSection, text: impl Into<String>) -> Self {
        let text = text.into();
        match self.sections.iter_mut().find(|(k, _)| *k == kind) {
            Some(existing) => existing.1 = text,
            None => self.sections.push((kind, text)),
        }
        self
    }

    /// Sections come out in `PromptSection::ORDER` regardless of the order
    /// they were added in.
    pub fn build(mut self) -> Prompt {
        self.sections.sort_by_key(|(k, _)| k.rank());
        Prompt {
            sections: self.sections,
        }
    }
}

fn task_framing(word_count: u32) -> String {
    let form = if word_count < PARAGRAPH_WORD_LIMIT {
        "paragraph"
    } else {
        "short essay"
    };
    format!("Task: Generate a coherent {} based on the original prompt.", form)
}

fn playful_flair(sentiment: SentimentLabel) -> &'static str {
    match sentiment {
        SentimentLabel::Positive => {
            "- Add 3-5 fun jokes or puns to make it hilarious, and sprinkle in lots of excited emojis (like 😄, 🚀, 🎉) throughout to amp up the joy!"
        }
        SentimentLabel::Negative => {
            "- Weave in 2-3 dark humor jokes or ironic twists to heighten the gloom, and use grumpy/sad emojis (like 😞, 🌧️, 💔) to match the vibe."
        }
        SentimentLabel::Neutral => {
            "- Keep it balanced with 2-3 light, observational jokes if they fit naturally, and add neutral emojis (like 📖, 🌤️, 🤔) sparingly for visual pop."
        }
    }
}

fn style_directive(style: StyleMode, sentiment: SentimentLabel) -> String {
    match style {
        StyleMode::Playful => format!(
            "- In ELI10 style: Explain like you're talking to a 10-year-old. Use simple words, short sentences, fun examples, and easy ideas anyone can get. Avoid big words or boring facts; make it feel like a story or chat with a kid.\n{}",
            playful_flair(sentiment)
        ),
        StyleMode::Formal => "- Use a formal, professional tone suitable for adults: Clear, concise language with varied sentence structure. No slang, jokes, or emojis.".to_string(),
    }
}

pub fn build_generation_prompt(request: &GenerationRequest) -> Prompt {
    PromptBuilder::new()
        .section(PromptSection::TaskFraming, task_framing(request.word_count))
        .section(
            PromptSection::Tone,
            format!("- Strictly maintain {} tone.", request.sentiment),
        )
        .section(
            PromptSection::Length,
            format!("- Exactly {} words (±20).", request.word_count),
        )
        .section(
            PromptSection::Structure,
            "- Engaging and natural; structure: Start with a hook related to the prompt, develop 2-3 key ideas, and end with a reflective close.",
        )
        .section(
            PromptSection::Style,
            style_directive(request.style, request.sentiment),
        )
        .section(
            PromptSection::Exemplars,
            format!(
                "Examples:\n{}",
                ExampleBank::render(request.style, request.sentiment)
            ),
        )
        .section(
            PromptSection::Subject,
            format!("Original Prompt: {}", request.original_text),
        )
        .build()
}
