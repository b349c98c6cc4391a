//! Quiz engine for Study Buddy.
//!
//! This module defines the per-question state machine (select, submit,
//! reset) and the aggregate score tracker across a quiz. It has no
//! rendering dependency: shells read [`QuestionView`] and [`ScoreSummary`]
//! snapshots and forward user actions back into the engine.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, StudyError};

// ============================================================================
// Question
// ============================================================================

/// A multiple-choice question supplied by a topic resolver.
///
/// Questions are trusted input. If `correct_index` is outside `options`,
/// no selection is ever judged correct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// The prompt shown to the user.
    pub text: String,

    /// Answer options in display order.
    pub options: Vec<String>,

    /// Index of the single correct option.
    pub correct_index: usize,
}

impl Question {
    /// Creates a new question.
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        options: impl IntoIterator<Item = impl Into<String>>,
        correct_index: usize,
    ) -> Self {
        Self {
            text: text.into(),
            options: options.into_iter().map(Into::into).collect(),
            correct_index,
        }
    }

    /// Returns the text of the correct option, if `correct_index` is valid.
    #[must_use]
    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.correct_index).map(String::as_str)
    }

    /// Returns `true` if choosing `option` answers this question correctly.
    #[must_use]
    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_index && option < self.options.len()
    }
}

// ============================================================================
// QuestionState
// ============================================================================

/// Where a question sits in its select/submit/reset cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionPhase {
    /// No option picked yet.
    Unanswered,
    /// An option is picked but not submitted.
    Selected,
    /// The selection is locked in.
    Submitted,
}

impl std::fmt::Display for QuestionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unanswered => write!(f, "unanswered"),
            Self::Selected => write!(f, "selected"),
            Self::Submitted => write!(f, "submitted"),
        }
    }
}

/// Mutable state of one question, owned by the [`QuizEngine`].
///
/// `ever_submitted` and `counted_correct` record what this question
/// currently contributes to the aggregate score. Reset undoes exactly that
/// contribution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuestionState {
    selected_index: Option<usize>,
    locked: bool,
    ever_submitted: bool,
    counted_correct: bool,
}

impl QuestionState {
    /// The currently selected option, if any.
    #[must_use]
    pub const fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    /// Whether the selection is locked by a submit.
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.locked
    }

    /// Whether this question currently counts toward the aggregate score.
    #[must_use]
    pub const fn ever_submitted(&self) -> bool {
        self.ever_submitted
    }

    /// The phase derived from selection and lock.
    #[must_use]
    pub const fn phase(&self) -> QuestionPhase {
        match (self.selected_index, self.locked) {
            (_, true) => QuestionPhase::Submitted,
            (Some(_), false) => QuestionPhase::Selected,
            (None, false) => QuestionPhase::Unanswered,
        }
    }
}

// ============================================================================
// Outcomes and snapshots
// ============================================================================

/// Result of judging a submitted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    /// Whether the submitted option was the correct one.
    pub correct: bool,

    /// Index of the correct option, for showing the right answer.
    pub correct_index: usize,
}

/// What happened on a `select` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The selection was recorded.
    Applied,
    /// The question is locked; nothing changed.
    Ignored,
}

/// What happened on a `submit` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The answer was locked in and judged.
    Accepted(Feedback),
    /// The question was already locked; counters are unchanged.
    AlreadySubmitted(Feedback),
}

impl SubmitOutcome {
    /// Returns the feedback for the locked answer.
    #[must_use]
    pub const fn feedback(&self) -> Feedback {
        match self {
            Self::Accepted(feedback) | Self::AlreadySubmitted(feedback) => *feedback,
        }
    }

    /// Returns `true` if this call performed the submission.
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

/// Snapshot of one question's state for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    /// The currently selected option, if any.
    pub selected_index: Option<usize>,

    /// Whether the selection is locked.
    pub locked: bool,

    /// Feedback for the locked answer; `None` while unlocked.
    pub feedback: Option<Feedback>,
}

/// Aggregate score at any point in the quiz.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSummary {
    /// Counted submissions that were correct.
    pub num_correct: usize,

    /// Counted submissions.
    pub num_submitted: usize,

    /// Number of questions in the quiz.
    pub total: usize,

    /// Whether every question is counted.
    pub is_complete: bool,
}

/// Final score, exposed only while the quiz is complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalScore {
    /// Correct answers.
    pub correct: usize,

    /// Number of questions.
    pub total: usize,
}

impl std::fmt::Display for FinalScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {}", self.correct, self.total)
    }
}

// ============================================================================
// QuizEngine
// ============================================================================

/// Owns every question's state and the aggregate counters for one quiz.
///
/// Invariant: `num_correct <= num_submitted <= questions.len()`, and
/// `num_submitted` equals the number of questions whose `ever_submitted`
/// flag is set.
///
/// # Examples
///
/// ```
/// use study_engine::{Question, QuizEngine};
///
/// let mut engine = QuizEngine::new(vec![
///     Question::new("2 + 2?", ["3", "4"], 1),
///     Question::new("Sky?", ["Blue", "Green"], 0),
/// ]);
///
/// engine.select(0, 1).unwrap();
/// assert!(engine.submit(0).unwrap().feedback().correct);
/// assert_eq!(engine.score(), (1, 1));
/// assert!(!engine.is_complete());
/// ```
#[derive(Debug, Clone, Default)]
pub struct QuizEngine {
    questions: Vec<Question>,
    states: Vec<QuestionState>,
    num_correct: usize,
    num_submitted: usize,
}

impl QuizEngine {
    /// Creates an engine for the given quiz with every question unanswered.
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        let mut engine = Self::default();
        engine.initialize(questions);
        engine
    }

    /// Replaces the quiz and discards all previous state.
    pub fn initialize(&mut self, questions: Vec<Question>) {
        self.states = vec![QuestionState::default(); questions.len()];
        self.questions = questions;
        self.num_correct = 0;
        self.num_submitted = 0;
        debug!(questions = self.questions.len(), "Quiz initialized");
    }

    /// The questions of this quiz, in order.
    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Number of questions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Returns `true` if the quiz has no questions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Raw state of a question.
    pub fn state(&self, question: usize) -> Result<&QuestionState> {
        self.states
            .get(question)
            .ok_or(StudyError::unknown_question(question))
    }

    /// Picks an option for a question.
    ///
    /// Overwrites any previous selection. A locked question ignores the call
    /// and reports [`SelectOutcome::Ignored`].
    ///
    /// # Errors
    ///
    /// Returns `StudyError::InvalidSelection` if the question or option index
    /// is out of range.
    pub fn select(&mut self, question: usize, option: usize) -> Result<SelectOutcome> {
        let options = self
            .questions
            .get(question)
            .map(|q| q.options.len())
            .ok_or(StudyError::unknown_question(question))?;
        if option >= options {
            return Err(StudyError::unknown_option(question, option));
        }

        let state = &mut self.states[question];
        if state.locked {
            debug!(question, option, "Selection ignored on locked question");
            return Ok(SelectOutcome::Ignored);
        }

        state.selected_index = Some(option);
        debug!(question, option, "Option selected");
        Ok(SelectOutcome::Applied)
    }

    /// Locks in the current selection and judges it.
    ///
    /// The first accepted submit of a cycle counts toward the aggregate.
    /// Submitting a locked question again changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `StudyError::InvalidSelection` for an unknown question and
    /// `StudyError::NotSelected` if no option has been picked.
    pub fn submit(&mut self, question: usize) -> Result<SubmitOutcome> {
        let q = self
            .questions
            .get(question)
            .ok_or(StudyError::unknown_question(question))?;
        let state = &mut self.states[question];

        let Some(selected) = state.selected_index else {
            return Err(StudyError::NotSelected { question });
        };

        let feedback = Feedback {
            correct: q.is_correct(selected),
            correct_index: q.correct_index,
        };

        if state.locked {
            return Ok(SubmitOutcome::AlreadySubmitted(feedback));
        }

        state.locked = true;
        if !state.ever_submitted {
            state.ever_submitted = true;
            state.counted_correct = feedback.correct;
            self.num_submitted += 1;
            if feedback.correct {
                self.num_correct += 1;
            }
        }

        debug!(
            question,
            selected,
            correct = feedback.correct,
            num_correct = self.num_correct,
            num_submitted = self.num_submitted,
            "Answer submitted"
        );
        Ok(SubmitOutcome::Accepted(feedback))
    }

    /// Clears a question back to unanswered and withdraws its contribution
    /// to the aggregate score.
    ///
    /// # Errors
    ///
    /// Returns `StudyError::InvalidSelection` for an unknown question.
    pub fn reset(&mut self, question: usize) -> Result<()> {
        let state = self
            .states
            .get_mut(question)
            .ok_or(StudyError::unknown_question(question))?;

        state.locked = false;
        state.selected_index = None;

        if state.ever_submitted {
            state.ever_submitted = false;
            self.num_submitted -= 1;
            if state.counted_correct {
                self.num_correct -= 1;
            }
            state.counted_correct = false;
        }

        debug!(
            question,
            num_correct = self.num_correct,
            num_submitted = self.num_submitted,
            "Question reset"
        );
        Ok(())
    }

    /// Snapshot of a question for rendering.
    ///
    /// # Errors
    ///
    /// Returns `StudyError::InvalidSelection` for an unknown question.
    pub fn question_view(&self, question: usize) -> Result<QuestionView> {
        let state = self.state(question)?;
        let q = &self.questions[question];

        let feedback = match (state.locked, state.selected_index) {
            (true, Some(selected)) => Some(Feedback {
                correct: q.is_correct(selected),
                correct_index: q.correct_index,
            }),
            _ => None,
        };

        Ok(QuestionView {
            selected_index: state.selected_index,
            locked: state.locked,
            feedback,
        })
    }

    /// `(num_correct, num_submitted)` for partial progress display.
    #[must_use]
    pub const fn score(&self) -> (usize, usize) {
        (self.num_correct, self.num_submitted)
    }

    /// Returns `true` once every question is counted.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.num_submitted == self.questions.len()
    }

    /// The final score while the quiz is complete.
    #[must_use]
    pub fn final_score(&self) -> Option<FinalScore> {
        self.is_complete().then_some(FinalScore {
            correct: self.num_correct,
            total: self.questions.len(),
        })
    }

    /// Aggregate score summary.
    #[must_use]
    pub fn score_summary(&self) -> ScoreSummary {
        ScoreSummary {
            num_correct: self.num_correct,
            num_submitted: self.num_submitted,
            total: self.questions.len(),
            is_complete: self.is_complete(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
