//! Prompt context assembly
//!
//! Given already-computed aggregates, builds everything the LLM needs to
//! write a narrative. The context never re-queries the event store; it is a
//! snapshot of the summaries the engine just produced.

use chrono::{DateTime, Utc};

use crate::insights::{
    ActivitySummary, DetectedAnomaly, DiaperSummary, FeedingSummary, SleepSummary,
    TrendInsightItem,
};
use crate::models::{Baby, Period};

use super::types::NarrativeKind;

/// Snapshot of computed aggregates for prompt rendering and fallback text
#[derive(Debug, Clone)]
pub struct PromptContext {
    pub baby_name: String,
    pub age_months: u32,
    pub period: Period,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub total_sleep_minutes: i64,
    pub sleep_session_count: usize,
    pub nap_count: usize,
    pub daily_sleep_minutes: f64,
    pub sleep_consistency: f64,
    pub average_wake_window_minutes: f64,
    pub feeding_count: usize,
    pub feedings_per_day: f64,
    pub diaper_count: usize,
    pub wet_diapers_per_day: f64,
    pub activity_minutes: i64,
    /// One line per detected anomaly
    pub anomaly_lines: Vec<String>,
    /// One line per synthesized trend insight
    pub insight_lines: Vec<String>,
}

impl PromptContext {
    /// Assemble a context from computed summaries
    #[allow(clippy::too_many_arguments)]
    pub fn from_summaries(
        baby: &Baby,
        age_months: u32,
        period: Period,
        period_start: DateTime<Utc>,
        period_end: DateTime<Utc>,
        sleep: &SleepSummary,
        feeding: &FeedingSummary,
        diaper: &DiaperSummary,
        activity: &ActivitySummary,
        anomalies: &[DetectedAnomaly],
        insights: &[TrendInsightItem],
    ) -> Self {
        Self {
            baby_name: baby.name.clone(),
            age_months,
            period,
            period_start,
            period_end,
            total_sleep_minutes: sleep.total_minutes,
            sleep_session_count: sleep.session_count,
            nap_count: sleep.nap_count,
            daily_sleep_minutes: sleep.daily_average_minutes,
            sleep_consistency: sleep.consistency_score,
            average_wake_window_minutes: sleep.wake_windows.average_minutes,
            feeding_count: feeding.total_count,
            feedings_per_day: feeding.feedings_per_day,
            diaper_count: diaper.total_count,
            wet_diapers_per_day: diaper.wet_per_day,
            activity_minutes: activity.total_minutes,
            anomaly_lines: anomalies
                .iter()
                .map(|a| {
                    format!(
                        "[{}] {}: {} (observed {}, expected {})",
                        a.severity, a.title, a.description, a.observed_value, a.expected_value
                    )
                })
                .collect(),
            insight_lines: insights
                .iter()
                .map(|i| format!("[{}] {}: {}", i.trend, i.title, i.description))
                .collect(),
        }
    }

    /// Whether any events back this context
    pub fn has_data(&self) -> bool {
        self.sleep_session_count > 0
            || self.feeding_count > 0
            || self.diaper_count > 0
            || self.activity_minutes > 0
    }

    /// Data block shared by every prompt template
    fn data_block(&self) -> String {
        let mut lines = vec![
            format!("Baby: {} ({} months old)", self.baby_name, self.age_months),
            format!(
                "Window: {} to {} ({})",
                self.period_start.format("%Y-%m-%d"),
                self.period_end.format("%Y-%m-%d"),
                self.period
            ),
            format!(
                "Sleep: {} sessions ({} naps), {:.1} hours/day, consistency {:.0}/100, \
                 average wake window {:.0} minutes",
                self.sleep_session_count,
                self.nap_count,
                self.daily_sleep_minutes / 60.0,
                self.sleep_consistency,
                self.average_wake_window_minutes
            ),
            format!(
                "Feeding: {} feedings ({:.1}/day)",
                self.feeding_count, self.feedings_per_day
            ),
            format!(
                "Diapers: {} changes ({:.1} wet/day)",
                self.diaper_count, self.wet_diapers_per_day
            ),
            format!("Activity: {} minutes", self.activity_minutes),
        ];

        if !self.anomaly_lines.is_empty() {
            lines.push("Flags:".to_string());
            lines.extend(self.anomaly_lines.iter().cloned());
        }
        if !self.insight_lines.is_empty() {
            lines.push("Trends:".to_string());
            lines.extend(self.insight_lines.iter().cloned());
        }

        lines.join("\n")
    }

    /// Render the full prompt for a narrative kind
    pub fn render(&self, kind: NarrativeKind) -> String {
        let instruction = match kind {
            NarrativeKind::WeeklySummary => {
                "Write a short, warm summary of this baby's week for their caregiver. \
                 Two or three sentences, plain language, no medical advice."
            }
            NarrativeKind::SleepPattern => {
                "Describe this baby's current sleep pattern and what it suggests about nap \
                 timing. Two sentences, practical tone."
            }
            NarrativeKind::AnomalyAnalysis => {
                "Explain the flagged observations below in reassuring, plain language and \
                 when a caregiver should check with a pediatrician. Three sentences maximum."
            }
            NarrativeKind::TrendDaily
            | NarrativeKind::TrendWeekly
            | NarrativeKind::TrendMonthly
            | NarrativeKind::TrendYearly => {
                "Summarize how this period compares to the baby's usual patterns, leading \
                 with the most notable change. Two or three sentences, plain language."
            }
        };

        format!("{}\n\n{}", instruction, self.data_block())
    }
}
