//! Aggregates over a user's recent nights: per-factor averages, bedtime
//! trends, and the trailing sleep debt shown on the dashboard.
//!
//! Inputs are logs already fetched and ordered by date ascending.

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::Serialize;
use uuid::Uuid;

use crate::models::sleep_log::SleepLog;
use crate::services::sleep_metrics::{calculate_sleep_score, SleepDuration};

/// Number of trailing nights counted toward sleep debt and the weekly chart.
pub const SLEEP_DEBT_WINDOW: usize = 7;

const MINUTES_PER_DAY: i64 = 24 * 60;
const NOON_MINUTES: i64 = 12 * 60;

#[derive(Debug, Clone, Serialize)]
pub struct NightPoint {
    pub id: Uuid,
    pub date: NaiveDate,
    pub quality: i32,
    pub factors: Vec<String>,
    pub duration_hours: f64,
    pub sleep_score: i32,
    /// Minutes since midnight; bedtimes before noon are shifted by a day so
    /// they sort after evening bedtimes.
    pub bedtime_minutes: i64,
    pub wake_time_minutes: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorImpact {
    pub name: String,
    pub avg_score: i32,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct SleepAnalysis {
    pub nights: Vec<NightPoint>,
    pub factor_impact: Vec<FactorImpact>,
    pub best_factor: Option<FactorImpact>,
    pub worst_factor: Option<FactorImpact>,
    pub average_duration_hours: f64,
    pub sleep_goal_hours: f64,
    pub sleep_debt_hours: f64,
}

#[derive(Debug, Serialize)]
pub struct LastNight {
    pub date: Option<NaiveDate>,
    pub duration: SleepDuration,
    pub score: i32,
}

#[derive(Debug, Serialize)]
pub struct RecentNight {
    pub date: NaiveDate,
    pub weekday: String,
    pub duration_hours: f64,
    pub goal_hours: f64,
}

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub last_night: LastNight,
    pub recent: Vec<RecentNight>,
    pub sleep_goal_hours: f64,
    pub sleep_debt_hours: f64,
}

fn minutes_of_day(time: NaiveTime) -> i64 {
    (time.hour() * 60 + time.minute()) as i64
}

pub fn night_point(log: &SleepLog) -> NightPoint {
    let duration = log.duration();
    let bedtime = minutes_of_day(log.bedtime);
    NightPoint {
        id: log.id,
        date: log.date,
        quality: log.quality,
        factors: log.factors.clone(),
        duration_hours: duration.as_hours(),
        sleep_score: calculate_sleep_score(duration.total_minutes, log.quality),
        bedtime_minutes: if bedtime < NOON_MINUTES {
            bedtime + MINUTES_PER_DAY
        } else {
            bedtime
        },
        wake_time_minutes: minutes_of_day(log.wake_time),
    }
}

pub fn analyze_logs(logs: &[SleepLog]) -> Vec<NightPoint> {
    logs.iter().map(night_point).collect()
}

/// Average score per factor, in the order factors are first seen.
///
/// A log tagged with the same factor twice counts twice.
pub fn factor_impact(nights: &[NightPoint]) -> Vec<FactorImpact> {
    let mut totals: Vec<(String, i64, usize)> = Vec::new();
    for night in nights {
        for factor in &night.factors {
            match totals.iter_mut().find(|(name, _, _)| name == factor) {
                Some((_, total, count)) => {
                    *total += night.sleep_score as i64;
                    *count += 1;
                }
                None => totals.push((factor.clone(), night.sleep_score as i64, 1)),
            }
        }
    }

    totals
        .into_iter()
        .map(|(name, total, count)| FactorImpact {
            name,
            avg_score: (total as f64 / count as f64).round() as i32,
            count,
        })
        .collect()
}

/// Highest average; the earliest factor wins a tie.
pub fn best_factor(impact: &[FactorImpact]) -> Option<&FactorImpact> {
    impact
        .iter()
        .reduce(|best, f| if f.avg_score > best.avg_score { f } else { best })
}

/// Lowest average; the earliest factor wins a tie.
pub fn worst_factor(impact: &[FactorImpact]) -> Option<&FactorImpact> {
    impact
        .iter()
        .reduce(|worst, f| if f.avg_score < worst.avg_score { f } else { worst })
}

pub fn average_duration_hours(nights: &[NightPoint]) -> f64 {
    if nights.is_empty() {
        return 0.0;
    }
    nights.iter().map(|n| n.duration_hours).sum::<f64>() / nights.len() as f64
}

/// Shortfall against the goal summed over the trailing window. Nights
/// above the goal count as zero rather than paying down other nights.
pub fn sleep_debt_hours(durations_hours: &[f64], goal_hours: f64) -> f64 {
    let start = durations_hours.len().saturating_sub(SLEEP_DEBT_WINDOW);
    durations_hours[start..]
        .iter()
        .map(|actual| (goal_hours - actual).max(0.0))
        .sum()
}

pub fn sleep_debt_for_logs(logs: &[SleepLog], goal_hours: f64) -> f64 {
    let durations: Vec<f64> = logs.iter().map(|l| l.duration().as_hours()).collect();
    sleep_debt_hours(&durations, goal_hours)
}

pub fn build_analysis(logs: &[SleepLog], goal_hours: f64) -> SleepAnalysis {
    let nights = analyze_logs(logs);
    let impact = factor_impact(&nights);
    let durations: Vec<f64> = nights.iter().map(|n| n.duration_hours).collect();

    SleepAnalysis {
        best_factor: best_factor(&impact).cloned(),
        worst_factor: worst_factor(&impact).cloned(),
        average_duration_hours: average_duration_hours(&nights),
        sleep_goal_hours: goal_hours,
        sleep_debt_hours: sleep_debt_hours(&durations, goal_hours),
        factor_impact: impact,
        nights,
    }
}

pub fn dashboard_summary(logs: &[SleepLog], goal_hours: f64) -> DashboardSummary {
    let last_night = match logs.last() {
        Some(log) => {
            let duration = log.duration();
            LastNight {
                date: Some(log.date),
                duration,
                score: log.score(),
            }
        }
        None => LastNight {
            date: None,
            duration: SleepDuration::ZERO,
            score: 0,
        },
    };

    let start = logs.len().saturating_sub(SLEEP_DEBT_WINDOW);
    let recent = logs[start..]
        .iter()
        .map(|log| RecentNight {
            date: log.date,
            weekday: log.date.format("%a").to_string(),
            duration_hours: log.duration().as_hours(),
            goal_hours,
        })
        .collect();

    DashboardSummary {
        last_night,
        recent,
        sleep_goal_hours: goal_hours,
        sleep_debt_hours: sleep_debt_for_logs(logs, goal_hours),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn log(day: u32, bedtime: (u32, u32), wake: (u32, u32), quality: i32, factors: &[&str]) -> SleepLog {
        SleepLog {
            id: Uuid::new_v4(),
            user_id: "user_test".into(),
            date: NaiveDate::from_ymd_opt(2026, 3, day).unwrap(),
            bedtime: NaiveTime::from_hms_opt(bedtime.0, bedtime.1, 0).unwrap(),
            wake_time: NaiveTime::from_hms_opt(wake.0, wake.1, 0).unwrap(),
            quality,
            notes: None,
            factors: factors.iter().map(|f| f.to_string()).collect(),
            created_at: Utc::now(),
        }
    }

    fn scored(score: i32, factors: &[&str]) -> NightPoint {
        NightPoint {
            id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            quality: 3,
            factors: factors.iter().map(|f| f.to_string()).collect(),
            duration_hours: 8.0,
            sleep_score: score,
            bedtime_minutes: 1380,
            wake_time_minutes: 420,
        }
    }

    // ── sleep debt ─────────────────────────────────────────────────────

    #[test]
    fn test_sleep_debt_week() {
        let durations = [6.0, 8.0, 9.0, 7.0, 8.0, 6.0, 8.0];
        assert!((sleep_debt_hours(&durations, 8.0) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_sleep_debt_only_counts_trailing_window() {
        // The two oldest short nights fall outside the window.
        let durations = [2.0, 2.0, 8.0, 8.0, 8.0, 8.0, 8.0, 8.0, 7.5];
        assert!((sleep_debt_hours(&durations, 8.0) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_sleep_debt_surplus_is_not_credited() {
        let durations = [10.0, 6.0];
        assert!((sleep_debt_hours(&durations, 8.0) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_sleep_debt_empty() {
        assert_eq!(sleep_debt_hours(&[], 8.0), 0.0);
    }

    #[test]
    fn test_sleep_debt_for_logs_uses_durations() {
        let logs = vec![
            log(1, (23, 0), (5, 0), 3, &[]),  // 6h
            log(2, (22, 0), (6, 0), 3, &[]),  // 8h
            log(3, (0, 30), (7, 30), 3, &[]), // 7h
        ];
        assert!((sleep_debt_for_logs(&logs, 8.0) - 3.0).abs() < 1e-9);
    }

    // ── factor impact ──────────────────────────────────────────────────

    #[test]
    fn test_factor_average() {
        let nights = vec![scored(80, &["Exercise"]), scored(60, &["Exercise"])];
        let impact = factor_impact(&nights);
        assert_eq!(
            impact,
            vec![FactorImpact { name: "Exercise".into(), avg_score: 70, count: 2 }]
        );
    }

    #[test]
    fn test_single_log_average_is_its_score() {
        let impact = factor_impact(&[scored(57, &["Stress"])]);
        assert_eq!(impact[0].avg_score, 57);
        assert_eq!(impact[0].count, 1);
    }

    #[test]
    fn test_factor_average_rounds() {
        let nights = vec![scored(70, &["Caffeine"]), scored(71, &["Caffeine"])];
        assert_eq!(factor_impact(&nights)[0].avg_score, 71);
    }

    #[test]
    fn test_factor_order_is_first_seen() {
        let nights = vec![
            scored(50, &["Stress", "Caffeine"]),
            scored(90, &["Meditation", "Stress"]),
        ];
        let names: Vec<_> = factor_impact(&nights).into_iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["Stress", "Caffeine", "Meditation"]);
    }

    #[test]
    fn test_duplicate_tags_are_not_deduplicated() {
        let nights = vec![scored(90, &["Exercise", "Exercise"]), scored(30, &["Exercise"])];
        let impact = factor_impact(&nights);
        assert_eq!(impact[0].count, 3);
        assert_eq!(impact[0].avg_score, 70);
    }

    #[test]
    fn test_best_and_worst_factor() {
        let nights = vec![
            scored(90, &["Meditation"]),
            scored(40, &["Caffeine"]),
            scored(65, &["Stress"]),
        ];
        let impact = factor_impact(&nights);
        assert_eq!(best_factor(&impact).unwrap().name, "Meditation");
        assert_eq!(worst_factor(&impact).unwrap().name, "Caffeine");
    }

    #[test]
    fn test_ties_keep_first_seen() {
        let nights = vec![scored(60, &["Stress"]), scored(60, &["Caffeine"])];
        let impact = factor_impact(&nights);
        assert_eq!(best_factor(&impact).unwrap().name, "Stress");
        assert_eq!(worst_factor(&impact).unwrap().name, "Stress");
    }

    #[test]
    fn test_no_factors() {
        let impact = factor_impact(&[scored(80, &[])]);
        assert!(impact.is_empty());
        assert!(best_factor(&impact).is_none());
        assert!(worst_factor(&impact).is_none());
    }

    // ── trends ─────────────────────────────────────────────────────────

    #[test]
    fn test_bedtime_after_midnight_is_shifted() {
        let early = night_point(&log(1, (1, 15), (8, 0), 3, &[]));
        assert_eq!(early.bedtime_minutes, 75 + 1440);
        assert_eq!(early.wake_time_minutes, 480);

        let evening = night_point(&log(1, (22, 45), (6, 0), 3, &[]));
        assert_eq!(evening.bedtime_minutes, 22 * 60 + 45);
    }

    #[test]
    fn test_average_duration() {
        let nights = analyze_logs(&[log(1, (22, 0), (6, 0), 4, &[]), log(2, (23, 0), (6, 0), 4, &[])]);
        assert!((average_duration_hours(&nights) - 7.5).abs() < 1e-9);
        assert_eq!(average_duration_hours(&[]), 0.0);
    }

    #[test]
    fn test_build_analysis() {
        let logs = vec![
            log(1, (22, 30), (6, 30), 5, &["Exercise"]),  // 100
            log(2, (0, 30), (4, 30), 5, &["Caffeine"]),   // 70
            log(3, (22, 0), (6, 0), 3, &["Exercise"]),    // 84
        ];
        let analysis = build_analysis(&logs, 8.0);
        assert_eq!(analysis.nights.len(), 3);
        assert_eq!(analysis.nights[1].sleep_score, 70);
        assert_eq!(analysis.best_factor.as_ref().unwrap().name, "Exercise");
        assert_eq!(analysis.best_factor.as_ref().unwrap().avg_score, 92);
        assert_eq!(analysis.worst_factor.as_ref().unwrap().name, "Caffeine");
        assert!((analysis.sleep_debt_hours - 4.0).abs() < 1e-9);
    }

    // ── dashboard ──────────────────────────────────────────────────────

    #[test]
    fn test_dashboard_with_no_logs() {
        let summary = dashboard_summary(&[], 8.0);
        assert_eq!(summary.last_night.duration, SleepDuration::ZERO);
        assert_eq!(summary.last_night.score, 0);
        assert!(summary.last_night.date.is_none());
        assert!(summary.recent.is_empty());
        assert_eq!(summary.sleep_debt_hours, 0.0);
    }

    #[test]
    fn test_dashboard_uses_latest_and_trailing_week() {
        let logs: Vec<SleepLog> = (1..=9)
            .map(|day| log(day, (23, 0), (6, 0), 4, &[]))
            .collect();
        let summary = dashboard_summary(&logs, 7.5);

        assert_eq!(summary.last_night.date, NaiveDate::from_ymd_opt(2026, 3, 9));
        assert_eq!(summary.last_night.duration.total_minutes, 420);
        assert_eq!(summary.recent.len(), SLEEP_DEBT_WINDOW);
        assert_eq!(summary.recent[0].date, NaiveDate::from_ymd_opt(2026, 3, 3).unwrap());
        // 2026-03-03 is a Tuesday
        assert_eq!(summary.recent[0].weekday, "Tue");
        assert!(summary.recent.iter().all(|r| r.goal_hours == 7.5));
        assert!((summary.sleep_debt_hours - 3.5).abs() < 1e-9);
    }
}
