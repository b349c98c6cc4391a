//! End-to-end tests for quiz scoring, topic resolution, and practice counting.
//!
//! These run the engine through a `StudySession` the way a shell would.

use std::path::PathBuf;

use chrono::NaiveDate;
use study_engine::{
    CatalogResolver, Config, FileProgressStore, MemoryProgressStore, ProgressStore, Question,
    QuestionPhase, QuizEngine, ScoreSummary, StudyError, StudySession, Theme, TopicResolver,
};

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, d).expect("valid date")
}

fn one_zero_one() -> QuizEngine {
    QuizEngine::new(vec![
        Question::new("Q1", ["a", "b", "c", "d"], 1),
        Question::new("Q2", ["a", "b", "c", "d"], 0),
        Question::new("Q3", ["a", "b", "c", "d"], 1),
    ])
}

fn assert_bounded(engine: &QuizEngine) {
    let s = engine.score_summary();
    assert!(s.num_correct <= s.num_submitted, "{s:?}");
    assert!(s.num_submitted <= s.total, "{s:?}");
}

#[test]
fn test_three_question_scenario() {
    let mut engine = one_zero_one();

    for question in 0..3 {
        engine.select(question, 1).expect("select");
        engine.submit(question).expect("submit");
        assert_bounded(&engine);
    }

    assert_eq!(
        engine.score_summary(),
        ScoreSummary {
            num_correct: 2,
            num_submitted: 3,
            total: 3,
            is_complete: true,
        }
    );
    assert_eq!(engine.final_score().map(|s| s.to_string()).as_deref(), Some("2 / 3"));
}

#[test]
fn test_reset_of_correct_answer_decrements_both_counters() {
    let mut engine = one_zero_one();
    for question in 0..3 {
        engine.select(question, 1).expect("select");
        engine.submit(question).expect("submit");
    }

    // Question 3 (index 2) was correct.
    engine.reset(2).expect("reset");
    let s = engine.score_summary();
    assert_eq!((s.num_correct, s.num_submitted), (1, 2));
    assert!(!s.is_complete);
    assert!(engine.final_score().is_none());

    assert_eq!(engine.state(0).expect("state").phase(), QuestionPhase::Submitted);
    assert_eq!(engine.state(1).expect("state").phase(), QuestionPhase::Submitted);
    assert_eq!(engine.state(2).expect("state").phase(), QuestionPhase::Unanswered);
    assert_bounded(&engine);
}

#[test]
fn test_resubmit_after_reset_counts_once() {
    let mut engine = one_zero_one();

    engine.select(0, 1).expect("select");
    engine.submit(0).expect("submit");
    engine.submit(0).expect("repeat submit");
    assert_eq!(engine.score(), (1, 1));

    engine.reset(0).expect("reset");
    engine.select(0, 1).expect("select");
    engine.submit(0).expect("submit");
    assert_eq!(engine.score(), (1, 1));
    assert_bounded(&engine);
}

#[test]
fn test_locked_select_leaves_state_identical() {
    let mut engine = one_zero_one();
    engine.select(1, 3).expect("select");
    engine.submit(1).expect("submit");

    let before = *engine.state(1).expect("state");
    engine.select(1, 0).expect("select while locked");
    assert_eq!(*engine.state(1).expect("state"), before);
}

#[test]
fn test_resolver_scenarios() {
    let resolver = CatalogResolver;

    let newton = resolver.resolve("Explain NEWTON's third law").expect("bundle");
    assert!(newton.summary.starts_with("Newton"));

    let generic = resolver.resolve("quantum entanglement").expect("bundle");
    assert!(generic.summary.contains("quantum entanglement"));
    assert_eq!(generic.quiz.len(), 3);

    assert!(resolver.resolve("   ").is_none());
}

#[test]
fn test_blank_topic_does_not_touch_engine_or_progress() {
    let mut session = StudySession::new(CatalogResolver, MemoryProgressStore::new(), Theme::Light);

    let err = session.generate_on("\t ", day(18)).expect_err("blank topic");
    assert!(matches!(err, StudyError::EmptyTopic));
    assert!(session.engine().is_empty());
    assert_eq!(session.practiced_today(), 0);
    assert_eq!(session.load_practice_count(day(18)).expect("count"), 0);
}

#[test]
fn test_session_with_file_store_counts_per_day() {
    let dir = std::env::temp_dir().join("study_integration_session");
    std::fs::remove_dir_all(&dir).ok();
    let path = dir.join("progress.json");

    let mut session =
        StudySession::new(CatalogResolver, FileProgressStore::new(&path), Theme::Light);
    session.generate_on("blockchain", day(17)).expect("generate");
    session.generate_on("oop", day(18)).expect("generate");
    session.generate_on("photosynthesis", day(18)).expect("generate");
    assert_eq!(session.practiced_today(), 2);

    let store = FileProgressStore::new(&path);
    assert_eq!(store.practiced_on(day(18)).expect("count"), 2);
    assert_eq!(store.practiced_on(day(17)).expect("count"), 0);

    let raw = std::fs::read_to_string(&path).expect("progress file");
    let json: serde_json::Value = serde_json::from_str(&raw).expect("json");
    assert_eq!(json["date"], "2026-10-18");
    assert_eq!(json["count"], 2);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_fixture_config_loads() {
    let config = Config::load_from_dir(&fixture_path()).expect("Failed to load config");

    assert_eq!(config.progress_file, "target/study-fixture/progress.json");
    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.port, 4100);
    assert_eq!(config.theme, Theme::Dark);
}
