//! HTTP API for a Study Buddy session.
//!
//! This module exposes one shared [`StudySession`] as a JSON API that a
//! browser page (or any client) renders and drives.
//!
//! # Endpoints
//!
//! - `GET /api/topics` - Preset topic list
//! - `POST /api/generate` - Generate content for a topic
//! - `GET /api/session` - Current content, quiz state, score, and counters
//! - `POST /api/quiz/:question/select` - Select an option
//! - `POST /api/quiz/:question/submit` - Submit the selected option
//! - `POST /api/quiz/:question/reset` - Reset a question
//! - `GET /api/score` - Aggregate score
//! - `GET /api/progress` - Topics practiced today
//! - `POST /api/theme` - Toggle light/dark theme
//!
//! # Example
//!
//! ```no_run
//! use study_engine::{create_router, AppState, Config};
//!
//! # async fn example() {
//! let router = create_router(AppState::new(Config::default()));
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await.unwrap();
//! axum::serve(listener, router).await.unwrap();
//! # }
//! ```

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::progress::{today, FileProgressStore};
use crate::quiz::{FinalScore, QuestionView, ScoreSummary, SelectOutcome};
use crate::session::StudySession;
use crate::topic::{CatalogResolver, PRESET_TOPICS};
use crate::{Config, StudyError, Theme};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Response body for the topics endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicsResponse {
    /// Preset topics in display order.
    pub topics: Vec<String>,
}

/// Request body for the generate endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Free-text topic.
    pub topic: String,
}

/// A quiz question as shown to the user.
///
/// The correct option is only revealed through `state.feedback` once the
/// question is submitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionPayload {
    /// Prompt.
    pub text: String,
    /// Options in display order.
    pub options: Vec<String>,
    /// Selection, lock, and feedback.
    pub state: QuestionView,
}

/// Everything a page needs to render the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    /// Current topic, if content has been generated.
    pub topic: Option<String>,
    /// Summary of the current topic.
    pub summary: Option<String>,
    /// Key points of the current topic.
    pub key_points: Vec<String>,
    /// Quiz questions with their state.
    pub questions: Vec<QuestionPayload>,
    /// Aggregate score.
    pub score: ScoreSummary,
    /// Final score, present only while the quiz is complete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_score: Option<FinalScore>,
    /// Current theme.
    pub theme: Theme,
    /// Status line.
    pub status: String,
    /// Topics practiced today.
    pub practiced_today: u32,
}

impl SessionView {
    /// Builds a view of the session's current state.
    #[must_use]
    pub fn from_session(session: &StudySession) -> Self {
        let engine = session.engine();
        let questions = engine
            .questions()
            .iter()
            .enumerate()
            .filter_map(|(i, q)| {
                engine.question_view(i).ok().map(|state| QuestionPayload {
                    text: q.text.clone(),
                    options: q.options.clone(),
                    state,
                })
            })
            .collect();

        let content = session.content();
        Self {
            topic: content.map(|c| c.topic.clone()),
            summary: content.map(|c| c.bundle.summary.clone()),
            key_points: content.map(|c| c.bundle.key_points.clone()).unwrap_or_default(),
            questions,
            score: session.score_summary(),
            final_score: session.final_score(),
            theme: session.theme(),
            status: session.status().to_string(),
            practiced_today: session.practiced_today(),
        }
    }
}

/// Request body for the select endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectRequest {
    /// Option index within the question.
    pub option: usize,
}

/// Response body for the select endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectResponse {
    /// `false` if the question was locked and the selection ignored.
    pub applied: bool,
    /// Question state after the call.
    pub state: QuestionView,
}

/// Response body for the submit endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    /// `false` if the question had already been submitted.
    pub accepted: bool,
    /// Question state after the call.
    pub state: QuestionView,
    /// Aggregate score after the call.
    pub score: ScoreSummary,
}

/// Response body for the reset endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetResponse {
    /// Question state after the call.
    pub state: QuestionView,
    /// Aggregate score after the call.
    pub score: ScoreSummary,
}

/// Response body for the score endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResponse {
    /// Aggregate score.
    #[serde(flatten)]
    pub summary: ScoreSummary,
    /// Final score, present only while the quiz is complete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_score: Option<FinalScore>,
}

/// Response body for the progress endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResponse {
    /// The day counted.
    pub date: NaiveDate,
    /// Topics practiced on that day.
    pub practiced_today: u32,
    /// Where the counter is stored.
    pub progress_file: String,
}

/// Response body for the theme endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeResponse {
    /// Theme after toggling.
    pub theme: Theme,
}

/// Error response body returned on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Description of the error.
    pub error: String,
}

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for the HTTP server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Configuration the server was started with.
    pub config: Config,
    /// The session every request operates on.
    pub session: Arc<Mutex<StudySession>>,
}

impl AppState {
    /// Creates state with the built-in catalog and a file-backed counter at
    /// `config.progress_file`.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let session = StudySession::new(
            CatalogResolver,
            FileProgressStore::new(&config.progress_file),
            config.theme,
        );
        Self::with_session(config, session)
    }

    /// Creates state around an existing session.
    #[must_use]
    pub fn with_session(config: Config, session: StudySession) -> Self {
        Self {
            config,
            session: Arc::new(Mutex::new(session)),
        }
    }
}

// ============================================================================
// API Error Type
// ============================================================================

/// Maps engine errors onto HTTP responses.
#[derive(Debug)]
struct ApiError(StudyError);

impl From<StudyError> for ApiError {
    fn from(err: StudyError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            StudyError::EmptyTopic => StatusCode::UNPROCESSABLE_ENTITY,
            StudyError::InvalidSelection { .. } => StatusCode::BAD_REQUEST,
            StudyError::NotSelected { .. } => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse {
            error: self.0.to_string(),
        });
        (status, body).into_response()
    }
}

// ============================================================================
// Router Setup
// ============================================================================

/// Creates the HTTP router with all API endpoints.
///
/// Routes live under `/api`, with CORS open for development and request
/// tracing enabled.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/topics", get(handle_topics))
        .route("/generate", post(handle_generate))
        .route("/session", get(handle_session))
        .route("/quiz/:question/select", post(handle_select))
        .route("/quiz/:question/submit", post(handle_submit))
        .route("/quiz/:question/reset", post(handle_reset))
        .route("/score", get(handle_score))
        .route("/progress", get(handle_progress))
        .route("/theme", post(handle_theme));

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

// ============================================================================
// Handlers
// ============================================================================

async fn handle_topics() -> Json<TopicsResponse> {
    Json(TopicsResponse {
        topics: PRESET_TOPICS.iter().map(ToString::to_string).collect(),
    })
}

/// Handler for `POST /api/generate`.
///
/// Replaces the current quiz and records one practice for today.
async fn handle_generate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let mut session = state.session.lock().await;

    if let Err(e) = session.generate(&request.topic) {
        warn!(error = %e, "Generate rejected");
        return Err(e.into());
    }

    info!(
        topic = session.topic().unwrap_or_default(),
        practiced_today = session.practiced_today(),
        "Content generated"
    );
    Ok(Json(SessionView::from_session(&session)))
}

async fn handle_session(State(state): State<Arc<AppState>>) -> Json<SessionView> {
    let session = state.session.lock().await;
    Json(SessionView::from_session(&session))
}

async fn handle_select(
    State(state): State<Arc<AppState>>,
    Path(question): Path<usize>,
    Json(request): Json<SelectRequest>,
) -> Result<Json<SelectResponse>, ApiError> {
    let mut session = state.session.lock().await;
    let outcome = session.select(question, request.option)?;

    Ok(Json(SelectResponse {
        applied: outcome == SelectOutcome::Applied,
        state: session.question_view(question)?,
    }))
}

/// Handler for `POST /api/quiz/:question/submit`.
///
/// Submitting an already locked question is acknowledged with
/// `accepted: false` and leaves the score unchanged.
async fn handle_submit(
    State(state): State<Arc<AppState>>,
    Path(question): Path<usize>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let mut session = state.session.lock().await;
    let outcome = match session.submit(question) {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(question, error = %e, "Submit rejected");
            return Err(e.into());
        }
    };

    let score = session.score_summary();
    info!(
        question,
        correct = outcome.feedback().correct,
        num_correct = score.num_correct,
        num_submitted = score.num_submitted,
        "Answer submitted"
    );

    Ok(Json(SubmitResponse {
        accepted: outcome.is_accepted(),
        state: session.question_view(question)?,
        score,
    }))
}

async fn handle_reset(
    State(state): State<Arc<AppState>>,
    Path(question): Path<usize>,
) -> Result<Json<ResetResponse>, ApiError> {
    let mut session = state.session.lock().await;
    session.reset(question)?;

    Ok(Json(ResetResponse {
        state: session.question_view(question)?,
        score: session.score_summary(),
    }))
}

async fn handle_score(State(state): State<Arc<AppState>>) -> Json<ScoreResponse> {
    let session = state.session.lock().await;
    Json(ScoreResponse {
        summary: session.score_summary(),
        final_score: session.final_score(),
    })
}

async fn handle_progress(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ProgressResponse>, ApiError> {
    let date = today();
    let mut session = state.session.lock().await;
    let practiced_today = session.load_practice_count(date)?;

    Ok(Json(ProgressResponse {
        date,
        practiced_today,
        progress_file: state.config.progress_file.clone(),
    }))
}

async fn handle_theme(State(state): State<Arc<AppState>>) -> Json<ThemeResponse> {
    let mut session = state.session.lock().await;
    let theme = session.toggle_theme();
    info!(theme = %theme, "Theme toggled");
    Json(ThemeResponse { theme })
}

// ============================================================================
// Tests
// ============================================================================
