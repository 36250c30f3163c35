use rand::Rng;

use crate::constants::prompts::{
    EVALUATION_CRITERIA, LEARNING_PATH_SECTIONS, LEARNING_PATH_START_RULE, MCQ_OUTPUT_SHAPE,
    SUBJECTIVE_MARKS_GUIDANCE, SUBJECTIVE_OUTPUT_SHAPE,
};
use crate::models::domain::{Difficulty, QuestionKind};

/// Instruction text for one generation call plus the array shape the model
/// was asked to produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizPrompt {
    pub instruction: String,
    pub expected_shape: &'static str,
    pub nonce: u32,
}

pub fn expected_shape(kind: QuestionKind) -> &'static str {
    match kind {
        QuestionKind::MultipleChoice => MCQ_OUTPUT_SHAPE,
        QuestionKind::Subjective => SUBJECTIVE_OUTPUT_SHAPE,
    }
}

/// Builds a generation prompt with a fresh variety nonce.
pub fn build_quiz_prompt(
    topic: &str,
    difficulty: Difficulty,
    kind: QuestionKind,
    count: u32,
) -> QuizPrompt {
    let nonce = rand::rng().random_range(1000..=9999);
    build_quiz_prompt_with_nonce(topic, difficulty, kind, count, nonce)
}

pub fn build_quiz_prompt_with_nonce(
    topic: &str,
    difficulty: Difficulty,
    kind: QuestionKind,
    count: u32,
    nonce: u32,
) -> QuizPrompt {
    let tier = difficulty.as_str().to_uppercase();
    let description = difficulty.description();
    let shape = expected_shape(kind);

    let instruction = match kind {
        QuestionKind::MultipleChoice => format!(
            "Generate a multiple-choice quiz on {topic} at {tier} level ({description}).\n\
             - Include exactly {count} questions.\n\
             - Each question should have 4 answer choices.\n\
             - Make questions diverse and varied - avoid repetitive patterns.\n\
             - Use randomization seed {nonce} to ensure variety.\n\
             - Include a \"level\" key specifying the Bloom's Taxonomy level (Remembering, Understanding, Applying, etc.).\n\
             - Return output in valid JSON format:\n{shape}\n"
        ),
        QuestionKind::Subjective => format!(
            "Generate subjective questions on {topic} at {tier} level ({description}).\n\
             - Include exactly {count} questions.\n\
             - Questions should be open-ended and require detailed answers.\n\
             - Make questions diverse and varied - avoid repetitive patterns.\n\
             - Use randomization seed {nonce} to ensure variety.\n\
             - Include a \"level\" key specifying the Bloom's Taxonomy level.\n\
             - {SUBJECTIVE_MARKS_GUIDANCE}\n\
             - Return output in valid JSON format:\n{shape}\n"
        ),
    };

    QuizPrompt {
        instruction,
        expected_shape: shape,
        nonce,
    }
}

/// Prompt asking the evaluator to score a subjective answer in [0, 1].
pub fn build_evaluation_prompt(question: &str, student_answer: &str, reference_answer: &str) -> String {
    format!(
        "Evaluate this student's answer for the given question:\n\n\
         Question: {question}\n\
         Student Answer: {student_answer}\n\
         Model Answer: {reference_answer}\n\n\
         {EVALUATION_CRITERIA}\n"
    )
}

/// Prompt for a sectioned study guide on `topic`.
pub fn build_learning_path_prompt(topic: &str, level: Difficulty, style: &str) -> String {
    let sections = LEARNING_PATH_SECTIONS.replace("{style}", style);
    format!(
        "Create a personalized learning path for {topic} at {level} level, focusing on {style} learning style.\n\n\
         IMPORTANT: You MUST use this EXACT format with these EXACT section headers:\n\n\
         {sections}\n\n\
         {LEARNING_PATH_START_RULE}\n",
        level = level.as_str()
    )
}
