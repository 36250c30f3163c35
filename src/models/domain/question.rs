use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Upper bound on the marks a single question may carry.
pub const MAX_QUESTION_MARKS: u32 = 100;

/// Letter label of one of the four multiple-choice options.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum OptionKey {
    A,
    B,
    C,
    D,
}

impl OptionKey {
    pub const ALL: [OptionKey; 4] = [OptionKey::A, OptionKey::B, OptionKey::C, OptionKey::D];

    pub fn as_str(&self) -> &'static str {
        match self {
            OptionKey::A => "A",
            OptionKey::B => "B",
            OptionKey::C => "C",
            OptionKey::D => "D",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            OptionKey::A => 0,
            OptionKey::B => 1,
            OptionKey::C => 2,
            OptionKey::D => 3,
        }
    }

    /// Reads a key out of loosely formatted model or teacher input:
    /// `"B"`, `"b"`, `"B."`, `"(B)"` and `"B. Paris"` all yield `B`.
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        let trimmed = raw.trim().trim_start_matches('(');
        let token: String = trimmed
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .collect();
        if token.len() != 1 {
            return None;
        }
        token.to_ascii_uppercase().parse().ok()
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionKey {
    type Err = String;

    /// Strict, case-sensitive parse used by grading.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(OptionKey::A),
            "B" => Ok(OptionKey::B),
            "C" => Ok(OptionKey::C),
            "D" => Ok(OptionKey::D),
            other => Err(format!("'{}' is not an option letter", other)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice,
    Subjective,
}

impl QuestionKind {
    pub fn default_marks(&self) -> u32 {
        match self {
            QuestionKind::MultipleChoice => 1,
            QuestionKind::Subjective => 10,
        }
    }
}

/// Which kinds of question a quiz request asks for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizFormat {
    #[default]
    Mcq,
    Subjective,
    Both,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuestionBody {
    MultipleChoice {
        /// Always labeled "A. ...", "B. ...", "C. ...", "D. ...".
        options: [String; 4],
        correct_key: OptionKey,
    },
    Subjective {
        reference_answer: String,
    },
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Question {
    pub text: String,
    pub marks: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxonomy_level: Option<String>,
    #[serde(flatten)]
    pub body: QuestionBody,
}

impl Question {
    pub fn multiple_choice(
        text: impl Into<String>,
        options: [String; 4],
        correct_key: OptionKey,
        marks: u32,
    ) -> Self {
        Self {
            text: text.into(),
            marks,
            taxonomy_level: None,
            body: QuestionBody::MultipleChoice {
                options,
                correct_key,
            },
        }
    }

    pub fn subjective(text: impl Into<String>, reference_answer: impl Into<String>, marks: u32) -> Self {
        Self {
            text: text.into(),
            marks,
            taxonomy_level: None,
            body: QuestionBody::Subjective {
                reference_answer: reference_answer.into(),
            },
        }
    }

    pub fn with_taxonomy_level(mut self, level: impl Into<String>) -> Self {
        self.taxonomy_level = Some(level.into());
        self
    }

    pub fn with_marks(mut self, marks: u32) -> Self {
        self.marks = marks;
        self
    }

    pub fn kind(&self) -> QuestionKind {
        match self.body {
            QuestionBody::MultipleChoice { .. } => QuestionKind::MultipleChoice,
            QuestionBody::Subjective { .. } => QuestionKind::Subjective,
        }
    }

    /// Labeled options; empty for subjective questions.
    pub fn options(&self) -> &[String] {
        match &self.body {
            QuestionBody::MultipleChoice { options, .. } => options.as_slice(),
            QuestionBody::Subjective { .. } => &[],
        }
    }

    /// The full text of the correct option, or the reference answer.
    pub fn expected_answer(&self) -> &str {
        match &self.body {
            QuestionBody::MultipleChoice {
                options,
                correct_key,
            } => &options[correct_key.index()],
            QuestionBody::Subjective { reference_answer } => reference_answer,
        }
    }
}

/// Formats a choice the way answer forms submit it: `"<Letter>. <text>"`.
/// Grading reads the letter back with
/// [`extract_choice_letter`](crate::services::grading_service::extract_choice_letter).
pub fn format_choice(key: OptionKey, text: &str) -> String {
    format!("{}. {}", key, text)
}

/// Relabels an option with `key`, dropping any `"<Letter>. "` label it already carries.
pub fn label_option(key: OptionKey, option: &str) -> String {
    format_choice(key, strip_option_label(option))
}

/// Option text without a leading `"A. "`..`"D. "` label.
pub fn strip_option_label(option: &str) -> &str {
    let option = option.trim();
    let bytes = option.as_bytes();
    let labeled = bytes.len() >= 2
        && matches!(bytes[0], b'A'..=b'D')
        && bytes[1] == b'.'
        && bytes.get(2).map_or(true, |b| b.is_ascii_whitespace());
    if labeled {
        option[2..].trim_start()
    } else {
        option
    }
}

/// Sum of question marks; saturates instead of wrapping.
pub fn total_marks<'a>(questions: impl IntoIterator<Item = &'a Question>) -> u32 {
    questions
        .into_iter()
        .fold(0u32, |total, question| total.saturating_add(question.marks))
}
