use crate::models::answer::AnswerType;
use crate::models::question::{Category, Level, Question};
use crate::models::rubric::build_rubric_text;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringPrompt {
    pub system: String,
    pub user: String,
    /// Upper bound for the returned score.
    pub max_points: i32,
}

/// Expert notes section (only when there are notes) followed by the category rubric.
pub fn build_prompt_context(category: &str, notes: &str) -> String {
    let mut parts: Vec<String> = Vec::new();
    if !notes.trim().is_empty() {
        parts.push(format!("Expert opinions on the topic (summary):\n{}", notes));
    }
    let rubric = build_rubric_text(category);
    if !rubric.is_empty() {
        parts.push(rubric);
    }
    parts.join("\n\n")
}

/// Display label for a stored level or category; unknown values pass through as stored.
fn display_label<'a, T: std::str::FromStr>(raw: &'a str, label: fn(&T) -> &'static str) -> &'a str {
    raw.parse::<T>().map(|value| label(&value)).unwrap_or(raw)
}

pub fn build_scoring_prompt(
    question: &Question,
    answer_text: &str,
    answer_type: AnswerType,
    notes: &str,
) -> ScoringPrompt {
    let points = question.points;
    let context = build_prompt_context(&question.category, notes);
    let context_section = if context.is_empty() {
        String::new()
    } else {
        format!("\n{}\n", context)
    };

    let system = format!(
        r#"You are an expert technical interviewer. Evaluate the candidate's answer to the question.

Question: {title}
Content: {content}
Correct answer: {correct}
Explanation: {explanation}
Difficulty level: {level}
Category: {category}
Maximum score: {points}
{context_section}
Candidate answer: {answer}
Answer type: {answer_type}

Score the answer using these criteria:
1. Accuracy and completeness (0-{accuracy} points)
2. Understanding of concepts (0-{concepts} points)
3. Quality of explanation (0-{clarity} points)

Write the feedback in RUSSIAN language.
Return JSON in this format:
{{
    "score": number_of_points,
    "feedback": "detailed feedback",
    "is_correct": true/false,
    "strengths": ["strengths of the answer"],
    "improvements": ["what can be improved"]
}}"#,
        title = question.title,
        content = question.content,
        correct = question.correct_answer,
        explanation = question.explanation.as_deref().unwrap_or("No explanation"),
        level = display_label(&question.level, Level::label),
        category = display_label(&question.category, Category::label),
        points = points,
        context_section = context_section,
        answer = answer_text,
        answer_type = answer_type.as_str(),
        accuracy = points / 2,
        concepts = points / 4,
        clarity = points / 4,
    );

    ScoringPrompt {
        system,
        user: format!("Evaluate this answer: {}", answer_text),
        max_points: points,
    }
}
