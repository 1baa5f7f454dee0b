//! Narrative orchestration with deterministic fallback
//!
//! Always attempts the configured AI backend first; on any provider failure
//! the narrative is synthesized from the already-computed aggregates. The
//! caller always receives prose text: AI unavailability degrades quality,
//! never availability. There is deliberately no retry here; retries are the
//! provider gateway's responsibility.

use tracing::{debug, warn};

use super::prompt::PromptContext;
use super::types::{GeneratedText, NarrativeKind, NarrativeResult};
use super::{AIBackend, AIClient};

/// The two ways a narrative can be produced
///
/// Modeling the fallback as a variant rather than an error keeps the
/// "always returns text" contract visible at the type level.
#[derive(Debug, Clone)]
pub enum NarrativeOutcome {
    Generated { text: String, duration_ms: u64 },
    Fallback { text: String, reason: String },
}

impl NarrativeOutcome {
    pub fn into_result(self) -> NarrativeResult {
        match self {
            NarrativeOutcome::Generated { text, duration_ms } => NarrativeResult {
                text,
                generated: true,
                error: None,
                duration_ms: Some(duration_ms),
            },
            NarrativeOutcome::Fallback { text, reason } => NarrativeResult {
                text,
                generated: false,
                error: Some(reason),
                duration_ms: None,
            },
        }
    }
}

/// Produce narrative text for the given kind and context
///
/// Never fails: a provider error is captured as metadata and the
/// deterministic fallback text is returned in its place.
pub async fn narrate(
    ai: Option<&AIClient>,
    kind: NarrativeKind,
    context: &PromptContext,
) -> NarrativeResult {
    let outcome = match ai {
        Some(client) => match client.generate(kind, context).await {
            Ok(GeneratedText { text, duration_ms }) => {
                debug!(kind = kind.as_str(), duration_ms, "AI narrative generated");
                NarrativeOutcome::Generated { text, duration_ms }
            }
            Err(e) => {
                warn!(
                    kind = kind.as_str(),
                    error = %e,
                    "AI narrative failed, using fallback text"
                );
                NarrativeOutcome::Fallback {
                    text: fallback_text(kind, context),
                    reason: e.to_string(),
                }
            }
        },
        None => NarrativeOutcome::Fallback {
            text: fallback_text(kind, context),
            reason: "no AI backend configured".to_string(),
        },
    };

    outcome.into_result()
}

/// Deterministic template narrative synthesized from the aggregates
pub fn fallback_text(kind: NarrativeKind, context: &PromptContext) -> String {
    if !context.has_data() {
        return format!(
            "Not enough data was logged for {} in this {} window to describe patterns yet. \
             Keep tracking sleep, feedings, and diapers to unlock insights.",
            context.baby_name, context.period
        );
    }

    match kind {
        NarrativeKind::SleepPattern => {
            format!(
                "{} is averaging {:.1} hours of sleep per day across {} sessions, with a \
                 typical wake window of about {:.0} minutes. Sleep consistency is {:.0}/100.",
                context.baby_name,
                context.daily_sleep_minutes / 60.0,
                context.sleep_session_count,
                context.average_wake_window_minutes,
                context.sleep_consistency
            )
        }
        NarrativeKind::AnomalyAnalysis => {
            if context.anomaly_lines.is_empty() {
                format!(
                    "Nothing unusual stands out for {} in this window; sleep, feeding, and \
                     diaper patterns all look within the typical range.",
                    context.baby_name
                )
            } else {
                format!(
                    "{} observation(s) stand out for {}: {}. These are pattern flags, not \
                     diagnoses; check with your pediatrician if they persist.",
                    context.anomaly_lines.len(),
                    context.baby_name,
                    context.anomaly_lines.join("; ")
                )
            }
        }
        NarrativeKind::WeeklySummary
        | NarrativeKind::TrendDaily
        | NarrativeKind::TrendWeekly
        | NarrativeKind::TrendMonthly
        | NarrativeKind::TrendYearly => {
            let mut text = format!(
                "This {} {} slept about {:.1} hours per day over {} sessions and had {} \
                 feedings ({:.1}/day) with {} diaper changes.",
                context.period,
                context.baby_name,
                context.daily_sleep_minutes / 60.0,
                context.sleep_session_count,
                context.feeding_count,
                context.feedings_per_day,
                context.diaper_count
            );
            if !context.insight_lines.is_empty() {
                text.push_str(&format!(
                    " Notable: {}.",
                    context.insight_lines.join("; ")
                ));
            }
            text
        }
    }
}
