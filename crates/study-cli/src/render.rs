//! Plain-text rendering of a study session.

use std::fmt::Write as _;

use study_engine::{Feedback, FinalScore, Question, QuestionView, StudySession};

/// Letters used to label options on screen.
const OPTION_LETTERS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Letter label for a 0-based option index, or `?` past `Z`.
pub fn option_letter(index: usize) -> char {
    OPTION_LETTERS.chars().nth(index).unwrap_or('?')
}

/// Parses an option given as a letter (`b`, `B`) or a 1-based number (`2`)
/// into a 0-based index.
pub fn parse_option(raw: &str) -> Option<usize> {
    let raw = raw.trim();
    let mut chars = raw.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_alphabetic() {
            return OPTION_LETTERS.find(c.to_ascii_uppercase());
        }
    }
    raw.parse::<usize>().ok()?.checked_sub(1)
}

/// Feedback line for a locked answer.
pub fn render_feedback(question: &Question, feedback: Feedback) -> String {
    if feedback.correct {
        "Correct ✅".to_string()
    } else {
        let answer = question
            .options
            .get(feedback.correct_index)
            .map_or("?", String::as_str);
        format!("Incorrect ❌ (Correct: {answer})")
    }
}

/// Final score banner.
pub fn render_final_score(score: FinalScore) -> String {
    format!("Your Score: {score}")
}

/// Practice counter line.
pub fn render_practiced(count: u32) -> String {
    format!("Topics practiced today: {count}")
}

/// One question with its options, selection marker, and feedback.
///
/// `number` is the 1-based number shown to the user.
pub fn render_question(number: usize, question: &Question, view: QuestionView) -> String {
    let mut out = String::new();
    let lock = if view.locked { " [locked]" } else { "" };
    let _ = writeln!(out, "Q{number}. {}{lock}", question.text);

    for (i, option) in question.options.iter().enumerate() {
        let marker = if view.selected_index == Some(i) { '>' } else { ' ' };
        let _ = writeln!(out, "  {marker} {}) {option}", option_letter(i));
    }

    if let Some(feedback) = view.feedback {
        let _ = writeln!(out, "  {}", render_feedback(question, feedback));
    }
    out
}

/// The full page: content, quiz, score banner, and practice counter.
pub fn render_session(session: &StudySession) -> String {
    let mut out = String::new();

    if let Some(content) = session.content() {
        let _ = writeln!(out, "== {} ==", content.topic);
        let _ = writeln!(out);
        let _ = writeln!(out, "Summary");
        let _ = writeln!(out, "  {}", content.bundle.summary);
        let _ = writeln!(out);
        let _ = writeln!(out, "Key Points");
        for point in &content.bundle.key_points {
            let _ = writeln!(out, "  - {point}");
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "Quiz");

        let engine = session.engine();
        for (i, question) in engine.questions().iter().enumerate() {
            if let Ok(view) = engine.question_view(i) {
                out.push_str(&render_question(i + 1, question, view));
            }
        }

        if let Some(score) = session.final_score() {
            let _ = writeln!(out);
            let _ = writeln!(out, "{}", render_final_score(score));
        }
    } else {
        let _ = writeln!(out, "No topic yet. Try `topic <text>` or `pick <n>`.");
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", render_practiced(session.practiced_today()));
    out
}
