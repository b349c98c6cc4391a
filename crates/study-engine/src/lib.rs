//! Study Buddy Engine
//!
//! Quiz state machine, topic catalog, daily practice counter, and the HTTP
//! API that drives a study session.

pub mod api;
pub mod config;
pub mod error;
pub mod progress;
pub mod quiz;
pub mod session;
pub mod topic;

pub use api::{
    create_router, AppState, ErrorResponse, GenerateRequest, ProgressResponse, QuestionPayload,
    ResetResponse, ScoreResponse, SelectRequest, SelectResponse, SessionView, SubmitResponse,
    ThemeResponse, TopicsResponse,
};
pub use config::{Config, Theme};
pub use error::{Result, StudyError};
pub use progress::{today, FileProgressStore, MemoryProgressStore, PracticeRecord, ProgressStore};
pub use quiz::{
    Feedback, FinalScore, Question, QuestionPhase, QuestionState, QuestionView, QuizEngine,
    ScoreSummary, SelectOutcome, SubmitOutcome,
};
pub use session::{GeneratedContent, StudySession, STATUS_DONE};
pub use topic::{CatalogResolver, ContentBundle, TopicResolver, PRESET_TOPICS};
