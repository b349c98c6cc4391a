//! Topic resolution for Study Buddy.
//!
//! Content "generation" is a lookup: the topic text is matched against a
//! small built-in catalog by case-insensitive substring, first match wins,
//! and anything unmatched gets a generic template that embeds the topic.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::quiz::Question;

/// Topics offered in the preset picker, in display order.
pub const PRESET_TOPICS: &[&str] = &[
    "Newton's Laws of Motion",
    "Photosynthesis",
    "Object-oriented Programming",
    "Blockchain Technology",
];

// ============================================================================
// ContentBundle
// ============================================================================

/// Summary, key points, and quiz for one topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentBundle {
    /// One-paragraph summary.
    pub summary: String,

    /// Key points in display order.
    pub key_points: Vec<String>,

    /// Quiz questions in display order.
    pub quiz: Vec<Question>,
}

// ============================================================================
// TopicResolver
// ============================================================================

/// Turns free-text topics into study content.
///
/// Implementations must be deterministic and return `None` for blank input.
pub trait TopicResolver: Send + Sync {
    /// Resolves a topic into a content bundle.
    fn resolve(&self, topic: &str) -> Option<ContentBundle>;
}

/// The built-in resolver backed by [`CATALOG`] plus a generic fallback.
///
/// # Examples
///
/// ```
/// use study_engine::{CatalogResolver, TopicResolver};
///
/// let bundle = CatalogResolver.resolve("isaac NEWTON stuff").unwrap();
/// assert!(bundle.summary.starts_with("Newton"));
///
/// assert!(CatalogResolver.resolve("   ").is_none());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogResolver;

impl TopicResolver for CatalogResolver {
    fn resolve(&self, topic: &str) -> Option<ContentBundle> {
        let topic = topic.trim();
        if topic.is_empty() {
            return None;
        }

        let lower = topic.to_lowercase();
        if let Some(entry) = CATALOG
            .iter()
            .find(|entry| entry.keywords.iter().any(|k| lower.contains(k)))
        {
            debug!(topic, matched = entry.title, "Topic matched catalog entry");
            return Some(entry.bundle());
        }

        debug!(topic, "Topic not in catalog, using generic template");
        Some(generic_bundle(topic))
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// A built-in topic with its canned content.
#[derive(Debug)]
pub struct CatalogEntry {
    /// Display title.
    pub title: &'static str,
    /// Lower-case substrings that select this entry.
    pub keywords: &'static [&'static str],
    /// Summary text.
    pub summary: &'static str,
    /// Key points.
    pub key_points: &'static [&'static str],
    /// Quiz questions.
    pub quiz: &'static [CatalogQuestion],
}

/// A static quiz question in the catalog.
#[derive(Debug)]
pub struct CatalogQuestion {
    /// Prompt.
    pub text: &'static str,
    /// Options in display order.
    pub options: &'static [&'static str],
    /// Index of the correct option.
    pub correct_index: usize,
}

impl CatalogEntry {
    /// Builds an owned bundle from this entry.
    #[must_use]
    pub fn bundle(&self) -> ContentBundle {
        ContentBundle {
            summary: self.summary.to_string(),
            key_points: self.key_points.iter().map(ToString::to_string).collect(),
            quiz: self
                .quiz
                .iter()
                .map(|q| Question::new(q.text, q.options.iter().copied(), q.correct_index))
                .collect(),
        }
    }
}

/// Built-in topics in match priority order.
pub const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        title: "Newton's Laws of Motion",
        keywords: &["newton"],
        summary: "Newton’s laws describe forces and motion: inertia, F=ma, and action–reaction pairs.",
        key_points: &[
            "First Law: Velocity stays constant unless a net external force acts.",
            "Second Law: F = m × a; acceleration scales with force and inversely with mass.",
            "Third Law: Every action has an equal and opposite reaction.",
        ],
        quiz: &[
            CatalogQuestion {
                text: "What does the second law relate?",
                options: &[
                    "Force and energy",
                    "Force, mass, and acceleration",
                    "Mass and velocity",
                    "Energy and momentum",
                ],
                correct_index: 1,
            },
            CatalogQuestion {
                text: "Which law explains inertia?",
                options: &["First", "Second", "Third", "Zeroth"],
                correct_index: 0,
            },
            CatalogQuestion {
                text: "Action–reaction forces act on:",
                options: &[
                    "The same object",
                    "Different objects",
                    "No objects",
                    "Only massless objects",
                ],
                correct_index: 1,
            },
        ],
    },
    CatalogEntry {
        title: "Photosynthesis",
        keywords: &["photosynthesis"],
        summary: "Photosynthesis is the process plants use to convert sunlight into chemical energy.",
        key_points: &[
            "Occurs in chloroplasts of plant cells.",
            "Converts carbon dioxide and water into glucose and oxygen.",
            "Essential for plant growth and oxygen production.",
        ],
        quiz: &[
            CatalogQuestion {
                text: "Where does photosynthesis occur?",
                options: &["Mitochondria", "Chloroplasts", "Nucleus", "Ribosomes"],
                correct_index: 1,
            },
            CatalogQuestion {
                text: "Photosynthesis produces:",
                options: &[
                    "Glucose and oxygen",
                    "Carbon dioxide and water",
                    "Nitrogen and methane",
                    "Sugar and nitrogen",
                ],
                correct_index: 0,
            },
            CatalogQuestion {
                text: "Photosynthesis requires:",
                options: &["Sunlight", "Moonlight", "Artificial light only", "Darkness"],
                correct_index: 0,
            },
        ],
    },
    CatalogEntry {
        title: "Object-oriented Programming",
        keywords: &["object-oriented", "oop"],
        summary: "Object-oriented programming (OOP) is a paradigm based on objects containing data and logic.",
        key_points: &[
            "Uses classes and objects to model real-world entities.",
            "Supports encapsulation, inheritance, and polymorphism.",
            "Improves code reusability and organization.",
        ],
        quiz: &[
            CatalogQuestion {
                text: "What is an object in OOP?",
                options: &[
                    "A function",
                    "A data structure with properties and methods",
                    "A variable",
                    "An error",
                ],
                correct_index: 1,
            },
            CatalogQuestion {
                text: "Which is NOT a main OOP concept?",
                options: &["Encapsulation", "Inheritance", "Polymorphism", "Recursion"],
                correct_index: 3,
            },
            CatalogQuestion {
                text: "Inheritance allows:",
                options: &[
                    "Sharing properties and methods between classes",
                    "Running code faster",
                    "Creating variables",
                    "Fixing bugs automatically",
                ],
                correct_index: 0,
            },
        ],
    },
    CatalogEntry {
        title: "Blockchain Technology",
        keywords: &["blockchain"],
        summary: "Blockchain is a decentralized, distributed ledger technology used to record transactions securely.",
        key_points: &[
            "Data is stored in blocks linked in a chain.",
            "It’s immutable and transparent.",
            "Widely used in cryptocurrencies like Bitcoin.",
        ],
        quiz: &[
            CatalogQuestion {
                text: "Blockchain stores data in:",
                options: &["Files", "Blocks", "Databases", "Spreadsheets"],
                correct_index: 1,
            },
            CatalogQuestion {
                text: "A key property of blockchain is:",
                options: &[
                    "Centralized control",
                    "Immutability",
                    "Easy to edit",
                    "Hidden data",
                ],
                correct_index: 1,
            },
            CatalogQuestion {
                text: "Blockchain is primarily used in:",
                options: &["Cryptocurrencies", "Social media", "Online shopping", "Email"],
                correct_index: 0,
            },
        ],
    },
];

/// Template bundle for topics outside the catalog.
fn generic_bundle(topic: &str) -> ContentBundle {
    ContentBundle {
        summary: format!("{topic}: definition, significance, and real-world applications."),
        key_points: vec![
            "Core definition and scope.".to_string(),
            "Main mechanisms or components.".to_string(),
            "Typical use cases and examples.".to_string(),
        ],
        quiz: vec![
            Question::new(
                format!("Which best describes {topic}?"),
                [
                    "Historical figure",
                    "Mathematical constant",
                    "Scientific principle",
                    "Programming language",
                ],
                2,
            ),
            Question::new(
                format!("A common use of {topic} is:"),
                [
                    "Art curation",
                    "Scientific modeling",
                    "Culinary recipes",
                    "Astrology",
                ],
                1,
            ),
            Question::new(
                format!("{topic} concerns:"),
                ["Fiction", "Observation and theory", "Gossip", "Music"],
                1,
            ),
        ],
    }
}
