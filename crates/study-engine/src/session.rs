//! Study session orchestration.
//!
//! A [`StudySession`] is what a presentation shell owns: it turns topic text
//! into content, swaps in a fresh [`QuizEngine`] for every generated topic,
//! records one practice per successful generation, and carries the status
//! line and theme the shell displays.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::config::Theme;
use crate::error::{Result, StudyError};
use crate::progress::{today, ProgressStore};
use crate::quiz::{FinalScore, QuestionView, QuizEngine, ScoreSummary, SelectOutcome, SubmitOutcome};
use crate::topic::{ContentBundle, TopicResolver};

/// Status shown after a successful generation.
pub const STATUS_DONE: &str = "Done.";

/// Content generated for the current topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedContent {
    /// The topic as entered, trimmed.
    pub topic: String,

    /// Summary, key points, and quiz.
    pub bundle: ContentBundle,
}

/// State behind one displayed study page.
pub struct StudySession {
    resolver: Box<dyn TopicResolver>,
    progress: Box<dyn ProgressStore>,
    content: Option<GeneratedContent>,
    engine: QuizEngine,
    theme: Theme,
    status: String,
    practiced_today: u32,
}

impl std::fmt::Debug for StudySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StudySession")
            .field("content", &self.content)
            .field("engine", &self.engine)
            .field("theme", &self.theme)
            .field("status", &self.status)
            .field("practiced_today", &self.practiced_today)
            .finish_non_exhaustive()
    }
}

impl StudySession {
    /// Creates a session with no content and an empty quiz.
    #[must_use]
    pub fn new(
        resolver: impl TopicResolver + 'static,
        progress: impl ProgressStore + 'static,
        theme: Theme,
    ) -> Self {
        Self {
            resolver: Box::new(resolver),
            progress: Box::new(progress),
            content: None,
            engine: QuizEngine::default(),
            theme,
            status: String::new(),
            practiced_today: 0,
        }
    }

    /// Reads the stored practice count for `date` into the counter display.
    pub fn load_practice_count(&mut self, date: NaiveDate) -> Result<u32> {
        self.practiced_today = self.progress.practiced_on(date)?;
        Ok(self.practiced_today)
    }

    /// Generates content for `topic`, dated today.
    pub fn generate(&mut self, topic: &str) -> Result<&GeneratedContent> {
        self.generate_on(topic, today())
    }

    /// Generates content for `topic` and records practice on `date`.
    ///
    /// Blank input leaves the content, quiz, and counter untouched. On
    /// success the previous quiz is discarded and practice is recorded
    /// exactly once.
    ///
    /// # Errors
    ///
    /// Returns `StudyError::EmptyTopic` for blank input. A failure to record
    /// practice is returned after the new content is already in place.
    pub fn generate_on(&mut self, topic: &str, date: NaiveDate) -> Result<&GeneratedContent> {
        let topic = topic.trim();
        let Some(bundle) = self.resolver.resolve(topic) else {
            self.status = StudyError::EmptyTopic.to_string();
            return Err(StudyError::EmptyTopic);
        };

        info!(topic, questions = bundle.quiz.len(), "Generating study content");
        self.engine.initialize(bundle.quiz.clone());
        let content = self.content.insert(GeneratedContent {
            topic: topic.to_string(),
            bundle,
        });

        match self.progress.record_practice(date) {
            Ok(count) => {
                self.practiced_today = count;
                self.status = STATUS_DONE.to_string();
                Ok(content)
            }
            Err(e) => {
                warn!(error = %e, "Failed to record practice");
                self.status = format!("Error: {e}");
                Err(e)
            }
        }
    }

    /// Selects an option on the current quiz.
    pub fn select(&mut self, question: usize, option: usize) -> Result<SelectOutcome> {
        self.engine.select(question, option)
    }

    /// Submits an answer on the current quiz.
    ///
    /// A missing selection also sets the status line to the prompt.
    pub fn submit(&mut self, question: usize) -> Result<SubmitOutcome> {
        let result = self.engine.submit(question);
        if let Err(e) = &result {
            if e.is_user_recoverable() {
                self.status = e.to_string();
            }
        }
        result
    }

    /// Resets a question on the current quiz.
    pub fn reset(&mut self, question: usize) -> Result<()> {
        self.engine.reset(question)
    }

    /// Snapshot of one question.
    pub fn question_view(&self, question: usize) -> Result<QuestionView> {
        self.engine.question_view(question)
    }

    /// Aggregate score of the current quiz.
    ///
    /// Before any content is generated there is no quiz, so nothing is
    /// complete.
    #[must_use]
    pub fn score_summary(&self) -> ScoreSummary {
        if self.content.is_none() {
            return ScoreSummary::default();
        }
        self.engine.score_summary()
    }

    /// Final score, while the current quiz is complete.
    #[must_use]
    pub fn final_score(&self) -> Option<FinalScore> {
        self.content.as_ref()?;
        self.engine.final_score()
    }

    /// Switches between light and dark and returns the new theme.
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    /// The current topic, if content has been generated.
    #[must_use]
    pub fn topic(&self) -> Option<&str> {
        self.content.as_ref().map(|c| c.topic.as_str())
    }

    /// The current content, if any.
    #[must_use]
    pub const fn content(&self) -> Option<&GeneratedContent> {
        self.content.as_ref()
    }

    /// The quiz engine for the current content.
    #[must_use]
    pub const fn engine(&self) -> &QuizEngine {
        &self.engine
    }

    /// The status line.
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    /// The current theme.
    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.theme
    }

    /// Topics practiced today, as last read or recorded.
    #[must_use]
    pub const fn practiced_today(&self) -> u32 {
        self.practiced_today
    }
}
