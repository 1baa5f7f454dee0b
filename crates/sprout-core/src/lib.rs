//! Sprout Core Library
//!
//! Shared functionality for the Sprout baby tracking tool:
//! - Database access and migrations for babies, caregivers, and events
//! - Per-category aggregators (sleep, feeding, diaper, growth, activity)
//! - Wake window and consistency analysis with age-banded reference tables
//! - Rule-based anomaly detection
//! - Trend comparison and insight synthesis
//! - Narrative generation via pluggable local AI backends with a
//!   deterministic fallback
//! - Best-effort expiring cache for assembled insight reports

pub mod ai;
pub mod cache;
pub mod db;
pub mod error;
pub mod insights;
pub mod models;
pub mod store;
pub mod tables;

pub use ai::{
    narrate, AIBackend, AIClient, GeneratedText, MockBackend, NarrativeKind, NarrativeOutcome,
    NarrativeResult, OllamaBackend, PromptContext,
};
pub use cache::{cache_key, InsightCache, MemoryCache, NoopCache};
pub use db::Database;
pub use error::{Error, Result};
pub use insights::engine::{AnomalyReport, SleepPatternReport};
pub use insights::{
    AnomalySeverity, Category, DetectedAnomaly, InsightEngine, InsightReport, SleepPrediction,
    TrendDirection, TrendInsightItem,
};
pub use models::{Baby, Gender, Period};
pub use store::{AccessControl, BabyDirectory, EventStore};
pub use tables::ReferenceTables;
