//! Fixed text sent to the generation and evaluation models.
//!
//! The output-shape examples are few-shot anchors for the model; keep them
//! byte-for-byte stable so repeated generations stay parseable.

pub const MCQ_OUTPUT_SHAPE: &str = r#"[
    {"question": "What is AI?", "options": ["A. option1", "B. option2", "C. option3", "D. option4"], "answer": "A", "type": "mcq"},
    ...
]"#;

pub const SUBJECTIVE_OUTPUT_SHAPE: &str = r#"[
    {"question": "Explain the concept of AI and its applications", "answer": "Sample answer explaining AI...", "type": "subjective", "marks": 10},
    ...
]"#;

pub const SUBJECTIVE_MARKS_GUIDANCE: &str =
    "Vary the marks between 5, 10, 15, and 20 marks for different questions.";

pub const EVALUATION_CRITERIA: &str = "Rate the student's answer on a scale of 0.0 to 1.0 based on:
- Accuracy and correctness
- Completeness
- Understanding demonstrated
- Relevance to the question

Return only a number between 0.0 and 1.0 (e.g., 0.8 for 80% correct)";

/// Section layout a learning path must follow; `{style}` is filled in per request.
pub const LEARNING_PATH_SECTIONS: &str = "## OVERVIEW
[Brief overview of the topic]

## KEY CONCEPTS
1. [Concept 1]: [Brief explanation]
2. [Concept 2]: [Brief explanation]
3. [Concept 3]: [Brief explanation]

## LEARNING OBJECTIVES
1. [Objective 1]
2. [Objective 2]
3. [Objective 3]

## STUDY APPROACH
[Specific study approach based on {style} learning style]

## COMMON MISCONCEPTIONS
1. [Misconception 1]: [Correction]
2. [Misconception 2]: [Correction]

## NEXT STEPS
[What to learn next after mastering this topic]";

pub const LEARNING_PATH_START_RULE: &str = "CRITICAL: Start your response immediately with \"## OVERVIEW\" and follow the exact format above. Do not add any introductory text or explanations before the sections.";
