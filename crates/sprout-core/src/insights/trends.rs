//! Trend comparison and insight synthesis
//!
//! Computes period windows and previous-period deltas, then synthesizes
//! rule-based trend insights. Synthesis is not learned: each rule compares a
//! current metric against the previous period or an age-expected value and
//! emits an item when the deviation exceeds a percentage threshold.

use chrono::{DateTime, Duration, Utc};

use crate::models::Period;
use crate::tables::ReferenceTables;

use super::types::{
    ActivityComparison, ActivitySummary, Category, DiaperComparison, DiaperSummary,
    FeedingComparison, FeedingSummary, SleepComparison, SleepSummary, TrendDirection,
    TrendInsightItem,
};

/// Deviation from the previous period or the age-expected value that
/// qualifies as a trend rather than noise
const TREND_THRESHOLD_PCT: f64 = 15.0;

/// Consistency score at or above this reads as an excellent schedule
const EXCELLENT_CONSISTENCY: f64 = 85.0;

/// Consistency score below this is worth a concern
const POOR_CONSISTENCY: f64 = 50.0;

/// Maximum highlights surfaced (a UI budget, not a statistical cutoff)
const MAX_HIGHLIGHTS: usize = 5;

/// Maximum concerns surfaced (a UI budget, not a statistical cutoff)
const MAX_CONCERNS: usize = 3;

/// Compute the day-normalized `[start, end]` window for a period
///
/// `end` defaults to now and is normalized to the end of its day; `start`
/// is the start of the day one period-length earlier, so the window spans
/// whole days and the cache key's day granularity agrees with it.
pub fn period_window(period: Period, end_override: Option<DateTime<Utc>>) -> (DateTime<Utc>, DateTime<Utc>) {
    let end_day = end_override.unwrap_or_else(Utc::now).date_naive();
    let start_day = end_day - Duration::days(period.days() - 1);
    (
        start_day.and_hms_opt(0, 0, 0).unwrap().and_utc(),
        end_day
            .and_hms_opt(23, 59, 59)
            .unwrap()
            .and_utc(),
    )
}

/// The equal-length window immediately preceding `start`
///
/// `None` for yearly periods, which skip comparison.
pub fn previous_window(period: Period, start: DateTime<Utc>) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    if !period.compares_previous() {
        return None;
    }
    let prev_end_day = start.date_naive() - Duration::days(1);
    let prev_start_day = prev_end_day - Duration::days(period.days() - 1);
    Some((
        prev_start_day
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc(),
        prev_end_day
            .and_hms_opt(23, 59, 59)
            .unwrap()
            .and_utc(),
    ))
}

/// Signed sleep deltas against the previous period
pub fn sleep_comparison(current: &SleepSummary, previous: &SleepSummary) -> SleepComparison {
    SleepComparison {
        total_minutes_change: current.total_minutes - previous.total_minutes,
        nap_count_change: current.nap_count as i64 - previous.nap_count as i64,
        consistency_change: current.consistency_score - previous.consistency_score,
    }
}

/// Signed feeding deltas against the previous period
pub fn feeding_comparison(current: &FeedingSummary, previous: &FeedingSummary) -> FeedingComparison {
    FeedingComparison {
        per_day_change: current.feedings_per_day - previous.feedings_per_day,
        bottle_ml_change: current.total_bottle_ml - previous.total_bottle_ml,
        consistency_change: current.consistency_score - previous.consistency_score,
    }
}

/// Signed diaper deltas against the previous period
pub fn diaper_comparison(current: &DiaperSummary, previous: &DiaperSummary) -> DiaperComparison {
    DiaperComparison {
        total_change: current.total_count as i64 - previous.total_count as i64,
        wet_per_day_change: current.wet_per_day - previous.wet_per_day,
    }
}

/// Signed activity deltas against the previous period
pub fn activity_comparison(current: &ActivitySummary, previous: &ActivitySummary) -> ActivityComparison {
    ActivityComparison {
        total_minutes_change: current.total_minutes - previous.total_minutes,
    }
}

fn percent_change(current: f64, previous: f64) -> Option<f64> {
    if previous.abs() < f64::EPSILON {
        return None;
    }
    Some((current - previous) / previous * 100.0)
}

/// Inputs for insight synthesis: the current summaries plus, where
/// available, the matching previous-period summaries
pub struct TrendInputs<'a> {
    pub sleep: &'a SleepSummary,
    pub feeding: &'a FeedingSummary,
    pub diaper: &'a DiaperSummary,
    pub activity: &'a ActivitySummary,
    pub previous_sleep: Option<&'a SleepSummary>,
    pub previous_feeding: Option<&'a FeedingSummary>,
    pub previous_activity: Option<&'a ActivitySummary>,
}

/// Synthesize trend insights from aggregated summaries
pub fn synthesize(
    inputs: &TrendInputs<'_>,
    age_months: u32,
    tables: &ReferenceTables,
) -> Vec<TrendInsightItem> {
    let mut items = Vec::new();

    sleep_rules(inputs, age_months, tables, &mut items);
    feeding_rules(inputs, age_months, tables, &mut items);
    diaper_rules(inputs.diaper, age_months, tables, &mut items);
    activity_rules(inputs, &mut items);

    items
}

fn sleep_rules(
    inputs: &TrendInputs<'_>,
    age_months: u32,
    tables: &ReferenceTables,
    items: &mut Vec<TrendInsightItem>,
) {
    let sleep = inputs.sleep;
    if sleep.session_count == 0 {
        return;
    }

    match inputs.previous_sleep {
        Some(previous) if previous.session_count > 0 => {
            if let Some(change) =
                percent_change(sleep.total_minutes as f64, previous.total_minutes as f64)
            {
                if change > TREND_THRESHOLD_PCT {
                    items.push(TrendInsightItem {
                        category: Category::Sleep,
                        title: "Sleep is trending up".to_string(),
                        description: format!(
                            "Total sleep rose {:.0}% compared to the previous period",
                            change
                        ),
                        trend: TrendDirection::Improving,
                        change_percent: Some(change),
                        recommendation: None,
                    });
                } else if change < -TREND_THRESHOLD_PCT {
                    items.push(TrendInsightItem {
                        category: Category::Sleep,
                        title: "Sleep is trending down".to_string(),
                        description: format!(
                            "Total sleep fell {:.0}% compared to the previous period",
                            change.abs()
                        ),
                        trend: TrendDirection::Declining,
                        change_percent: Some(change),
                        recommendation: Some(
                            "Review the last few days for schedule disruptions and aim for \
                             consistent nap times."
                                .to_string(),
                        ),
                    });
                } else {
                    items.push(TrendInsightItem {
                        category: Category::Sleep,
                        title: "Sleep is steady".to_string(),
                        description: "Total sleep is within the normal range of the previous \
                                      period"
                            .to_string(),
                        trend: TrendDirection::Stable,
                        change_percent: Some(change),
                        recommendation: None,
                    });
                }
            }
        }
        _ => {
            items.push(TrendInsightItem {
                category: Category::Sleep,
                title: "First sleep data for this period".to_string(),
                description: "Keep logging to unlock period-over-period sleep trends".to_string(),
                trend: TrendDirection::New,
                change_percent: None,
                recommendation: None,
            });
        }
    }

    // Consistency reads against fixed thresholds, not the previous period
    if sleep.session_count >= 3 {
        if sleep.consistency_score >= EXCELLENT_CONSISTENCY {
            items.push(TrendInsightItem {
                category: Category::Sleep,
                title: "Excellent sleep consistency".to_string(),
                description: format!(
                    "Sleep times are very regular (consistency {:.0}/100)",
                    sleep.consistency_score
                ),
                trend: TrendDirection::Improving,
                change_percent: None,
                recommendation: None,
            });
        } else if sleep.consistency_score < POOR_CONSISTENCY {
            items.push(TrendInsightItem {
                category: Category::Sleep,
                title: "Irregular sleep schedule".to_string(),
                description: format!(
                    "Sleep times vary a lot (consistency {:.0}/100)",
                    sleep.consistency_score
                ),
                trend: TrendDirection::Declining,
                change_percent: None,
                recommendation: Some(
                    "A predictable wind-down routine at similar times each day usually improves \
                     consistency within a week or two."
                        .to_string(),
                ),
            });
        }
    }

    // Daily total against the age-expected value
    let expected = tables.expected_daily_sleep_minutes(age_months) as f64;
    if let Some(deviation) = percent_change(sleep.daily_average_minutes, expected) {
        if deviation < -TREND_THRESHOLD_PCT {
            items.push(TrendInsightItem {
                category: Category::Sleep,
                title: "Sleeping less than typical for age".to_string(),
                description: format!(
                    "Daily sleep is {:.0}% below the typical {:.0} hours at {} months",
                    deviation.abs(),
                    expected / 60.0,
                    age_months
                ),
                trend: TrendDirection::Declining,
                change_percent: Some(deviation),
                recommendation: Some(
                    "Consider an earlier bedtime; most sleep debt at this age is recovered at \
                     night."
                        .to_string(),
                ),
            });
        }
    }
}

fn feeding_rules(
    inputs: &TrendInputs<'_>,
    age_months: u32,
    tables: &ReferenceTables,
    items: &mut Vec<TrendInsightItem>,
) {
    let feeding = inputs.feeding;
    if feeding.total_count == 0 {
        return;
    }

    if let Some(previous) = inputs.previous_feeding.filter(|p| p.total_count > 0) {
        if let Some(change) = percent_change(feeding.feedings_per_day, previous.feedings_per_day) {
            if change.abs() > TREND_THRESHOLD_PCT {
                let rising = change > 0.0;
                items.push(TrendInsightItem {
                    category: Category::Feeding,
                    title: if rising {
                        "Feeding frequency is up".to_string()
                    } else {
                        "Feeding frequency is down".to_string()
                    },
                    description: format!(
                        "Feedings per day changed {:.0}% vs. the previous period",
                        change
                    ),
                    // More frequent feeding in an infant reads as improving
                    // appetite; a drop deserves attention
                    trend: if rising {
                        TrendDirection::Improving
                    } else {
                        TrendDirection::Declining
                    },
                    change_percent: Some(change),
                    recommendation: if rising {
                        None
                    } else {
                        Some(
                            "Check whether feeds are being missed in logging before assuming \
                             reduced appetite."
                                .to_string(),
                        )
                    },
                });
            }
        }
    } else {
        items.push(TrendInsightItem {
            category: Category::Feeding,
            title: "First feeding data for this period".to_string(),
            description: "Keep logging to unlock period-over-period feeding trends".to_string(),
            trend: TrendDirection::New,
            change_percent: None,
            recommendation: None,
        });
    }

    let expected = tables.expected_feedings_per_day(age_months);
    if let Some(deviation) = percent_change(feeding.feedings_per_day, expected) {
        if deviation < -TREND_THRESHOLD_PCT {
            items.push(TrendInsightItem {
                category: Category::Feeding,
                title: "Fewer feedings than typical for age".to_string(),
                description: format!(
                    "{:.1} feedings/day vs. a typical {:.0}/day at {} months",
                    feeding.feedings_per_day, expected, age_months
                ),
                trend: TrendDirection::Declining,
                change_percent: Some(deviation),
                recommendation: Some(
                    "Offer feeds on the early hunger cues rather than waiting for crying."
                        .to_string(),
                ),
            });
        }
    }
}

fn diaper_rules(
    diaper: &DiaperSummary,
    age_months: u32,
    tables: &ReferenceTables,
    items: &mut Vec<TrendInsightItem>,
) {
    if diaper.total_count == 0 {
        return;
    }

    let expected = tables.expected_wet_diapers_per_day(age_months);
    if let Some(deviation) = percent_change(diaper.wet_per_day, expected) {
        if deviation < -TREND_THRESHOLD_PCT {
            items.push(TrendInsightItem {
                category: Category::Diaper,
                title: "Wet diaper count is low".to_string(),
                description: format!(
                    "{:.1} wet diapers/day vs. the expected {:.0}/day minimum",
                    diaper.wet_per_day, expected
                ),
                trend: TrendDirection::Declining,
                change_percent: Some(deviation),
                recommendation: Some(
                    "Track wet diapers closely today; fewer than usual can be an early \
                     dehydration sign."
                        .to_string(),
                ),
            });
        } else if deviation > -TREND_THRESHOLD_PCT && deviation < TREND_THRESHOLD_PCT {
            items.push(TrendInsightItem {
                category: Category::Diaper,
                title: "Diaper output on track".to_string(),
                description: format!(
                    "{:.1} wet diapers/day is in the expected range",
                    diaper.wet_per_day
                ),
                trend: TrendDirection::Stable,
                change_percent: Some(deviation),
                recommendation: None,
            });
        }
    }
}

fn activity_rules(inputs: &TrendInputs<'_>, items: &mut Vec<TrendInsightItem>) {
    let activity = inputs.activity;
    if activity.session_count == 0 {
        return;
    }

    if let Some(previous) = inputs.previous_activity.filter(|p| p.total_minutes > 0) {
        if let Some(change) =
            percent_change(activity.total_minutes as f64, previous.total_minutes as f64)
        {
            if change > TREND_THRESHOLD_PCT {
                items.push(TrendInsightItem {
                    category: Category::Activity,
                    title: "More active time".to_string(),
                    description: format!(
                        "Activity minutes rose {:.0}% vs. the previous period",
                        change
                    ),
                    trend: TrendDirection::Improving,
                    change_percent: Some(change),
                    recommendation: None,
                });
            } else if change < -TREND_THRESHOLD_PCT {
                items.push(TrendInsightItem {
                    category: Category::Activity,
                    title: "Less active time".to_string(),
                    description: format!(
                        "Activity minutes fell {:.0}% vs. the previous period",
                        change.abs()
                    ),
                    trend: TrendDirection::Declining,
                    change_percent: Some(change),
                    recommendation: Some(
                        "Short, frequent floor play sessions are easier to fit in than long \
                         ones."
                            .to_string(),
                    ),
                });
            }
        }
    } else {
        items.push(TrendInsightItem {
            category: Category::Activity,
            title: "First activity data for this period".to_string(),
            description: "Keep logging to unlock period-over-period activity trends".to_string(),
            trend: TrendDirection::New,
            change_percent: None,
            recommendation: None,
        });
    }
}

/// Highlights: improving insights, capped for the UI
pub fn highlights(items: &[TrendInsightItem]) -> Vec<TrendInsightItem> {
    items
        .iter()
        .filter(|i| i.trend == TrendDirection::Improving)
        .take(MAX_HIGHLIGHTS)
        .cloned()
        .collect()
}

/// Concerns: declining insights that carry a recommendation, capped for
/// the UI
pub fn concerns(items: &[TrendInsightItem]) -> Vec<TrendInsightItem> {
    items
        .iter()
        .filter(|i| i.trend == TrendDirection::Declining && i.recommendation.is_some())
        .take(MAX_CONCERNS)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::types::WakeWindowStats;
    use chrono::TimeZone;
    use std::collections::BTreeMap;

    fn sleep(total: i64, sessions: usize, consistency: f64) -> SleepSummary {
        SleepSummary {
            total_minutes: total,
            nap_minutes: 0,
            night_minutes: total,
            session_count: sessions,
            nap_count: sessions.saturating_sub(1),
            average_session_minutes: 0.0,
            daily_average_minutes: total as f64,
            longest_session_minutes: 0,
            consistency_score: consistency,
            wake_windows: WakeWindowStats {
                average_minutes: 90.0,
                min_minutes: 60,
                max_minutes: 120,
                count: 2,
                from_age_default: false,
            },
            current_wake_window_minutes: None,
            comparison_to_previous: None,
        }
    }

    fn feeding(per_day: f64, count: usize) -> FeedingSummary {
        FeedingSummary {
            total_count: count,
            breast_count: count,
            bottle_count: 0,
            solid_count: 0,
            total_bottle_ml: 0.0,
            average_bottle_ml: 0.0,
            average_breast_duration_minutes: 15.0,
            feedings_per_day: per_day,
            longest_gap_minutes: Some(180),
            consistency_score: 70.0,
            comparison_to_previous: None,
        }
    }

    fn diaper(wet_per_day: f64, total: usize) -> DiaperSummary {
        DiaperSummary {
            total_count: total,
            wet_count: total,
            dirty_count: 0,
            mixed_count: 0,
            wet_per_day,
            dirty_per_day: 0.0,
            changes_per_day: wet_per_day,
            comparison_to_previous: None,
        }
    }

    fn activity(minutes: i64, sessions: usize) -> ActivitySummary {
        ActivitySummary {
            total_minutes: minutes,
            session_count: sessions,
            minutes_by_type: BTreeMap::new(),
            sessions_per_day: sessions as f64,
            comparison_to_previous: None,
        }
    }

    #[test]
    fn test_period_window_day_normalized() {
        let end = Utc.with_ymd_and_hms(2026, 5, 10, 14, 30, 0).unwrap();
        let (start, window_end) = period_window(Period::Weekly, Some(end));

        assert_eq!(start, Utc.with_ymd_and_hms(2026, 5, 4, 0, 0, 0).unwrap());
        assert_eq!(
            window_end,
            Utc.with_ymd_and_hms(2026, 5, 10, 23, 59, 59).unwrap()
        );

        // Any time within the same day resolves to the same window
        let later = Utc.with_ymd_and_hms(2026, 5, 10, 22, 0, 0).unwrap();
        assert_eq!(period_window(Period::Weekly, Some(later)), (start, window_end));
    }

    #[test]
    fn test_previous_window_adjacent_and_equal_length() {
        let end = Utc.with_ymd_and_hms(2026, 5, 10, 12, 0, 0).unwrap();
        let (start, window_end) = period_window(Period::Weekly, Some(end));
        let (prev_start, prev_end) = previous_window(Period::Weekly, start).unwrap();

        assert_eq!(prev_end, Utc.with_ymd_and_hms(2026, 5, 3, 23, 59, 59).unwrap());
        assert_eq!(prev_start, Utc.with_ymd_and_hms(2026, 4, 27, 0, 0, 0).unwrap());
        // Equal length
        assert_eq!(window_end - start, prev_end - prev_start);
    }

    #[test]
    fn test_yearly_skips_comparison() {
        let end = Utc.with_ymd_and_hms(2026, 5, 10, 12, 0, 0).unwrap();
        let (start, _) = period_window(Period::Yearly, Some(end));
        assert!(previous_window(Period::Yearly, start).is_none());
    }

    #[test]
    fn test_comparisons_signed() {
        let current = sleep(700, 4, 80.0);
        let previous = sleep(800, 5, 60.0);
        let comparison = sleep_comparison(&current, &previous);
        assert_eq!(comparison.total_minutes_change, -100);
        assert_eq!(comparison.nap_count_change, -1);
        assert_eq!(comparison.consistency_change, 20.0);
    }

    #[test]
    fn test_synthesize_improving_and_declining() {
        let tables = ReferenceTables::default();
        let current_sleep = sleep(900, 5, 70.0);
        let previous_sleep = sleep(600, 5, 70.0);
        let inputs = TrendInputs {
            sleep: &current_sleep,
            feeding: &feeding(8.0, 8),
            diaper: &diaper(6.0, 6),
            activity: &activity(60, 3),
            previous_sleep: Some(&previous_sleep),
            previous_feeding: None,
            previous_activity: None,
        };

        let items = synthesize(&inputs, 2, &tables);
        let up = items
            .iter()
            .find(|i| i.title == "Sleep is trending up")
            .unwrap();
        assert_eq!(up.trend, TrendDirection::Improving);
        assert_eq!(up.change_percent, Some(50.0));

        // No previous feeding data: a "new" item instead of a delta
        assert!(items
            .iter()
            .any(|i| i.category == Category::Feeding && i.trend == TrendDirection::New));
    }

    #[test]
    fn test_synthesize_stable_within_threshold() {
        let tables = ReferenceTables::default();
        let current_sleep = sleep(900, 5, 70.0);
        let previous_sleep = sleep(880, 5, 70.0);
        let inputs = TrendInputs {
            sleep: &current_sleep,
            feeding: &feeding(8.0, 8),
            diaper: &diaper(6.0, 6),
            activity: &activity(0, 0),
            previous_sleep: Some(&previous_sleep),
            previous_feeding: None,
            previous_activity: None,
        };

        let items = synthesize(&inputs, 2, &tables);
        assert!(items.iter().any(|i| i.title == "Sleep is steady"));
    }

    #[test]
    fn test_excellent_consistency_becomes_highlight() {
        let tables = ReferenceTables::default();
        let current_sleep = sleep(900, 5, 92.0);
        let inputs = TrendInputs {
            sleep: &current_sleep,
            feeding: &feeding(8.0, 8),
            diaper: &diaper(6.0, 6),
            activity: &activity(0, 0),
            previous_sleep: None,
            previous_feeding: None,
            previous_activity: None,
        };

        let items = synthesize(&inputs, 2, &tables);
        let highlighted = highlights(&items);
        assert!(highlighted
            .iter()
            .any(|i| i.title == "Excellent sleep consistency"));
    }

    #[test]
    fn test_highlight_and_concern_caps() {
        let make = |trend, with_rec: bool| TrendInsightItem {
            category: Category::Sleep,
            title: "t".to_string(),
            description: "d".to_string(),
            trend,
            change_percent: None,
            recommendation: with_rec.then(|| "r".to_string()),
        };

        let many: Vec<_> = (0..8)
            .map(|_| make(TrendDirection::Improving, false))
            .chain((0..6).map(|_| make(TrendDirection::Declining, true)))
            .chain(std::iter::once(make(TrendDirection::Declining, false)))
            .collect();

        assert_eq!(highlights(&many).len(), 5);
        let concerning = concerns(&many);
        assert_eq!(concerning.len(), 3);
        assert!(concerning.iter().all(|i| i.recommendation.is_some()));
    }
}
