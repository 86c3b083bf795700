use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};

use super::ServiceError;
use crate::models::progress::{
    AttemptRecord, DayStatus, EfficiencyBreakdown, LearnerStats, ProgressView,
};
use crate::models::LearnerId;
use crate::storage::{ProblemStore, ProgressStore};
use crate::utils::time::local_date;

pub const RECENT_DAYS: u32 = 7;
pub const RECENT_ACTIVITY_LIMIT: usize = 5;

pub struct StatsService {
    problems: Arc<dyn ProblemStore>,
    progress: Arc<dyn ProgressStore>,
    offset: FixedOffset,
}

impl StatsService {
    pub fn new(
        problems: Arc<dyn ProblemStore>,
        progress: Arc<dyn ProgressStore>,
        offset: FixedOffset,
    ) -> Self {
        Self {
            problems,
            progress,
            offset,
        }
    }

    /// Dashboard numbers for `learner`. The category filter narrows the attempt
    /// statistics only; streak, recent days and activity always span everything.
    pub async fn learner_stats(
        &self,
        learner: &LearnerId,
        category_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<LearnerStats, ServiceError> {
        let records = self.progress.list_progress(learner.as_str()).await?;

        let filtered: Vec<&AttemptRecord> = match category_id {
            Some(category) => {
                let categories = self.problems.problem_categories().await?;
                records
                    .iter()
                    .filter(|r| categories.get(&r.problem_id).map(String::as_str) == Some(category))
                    .collect()
            }
            None => records.iter().collect(),
        };

        let today = local_date(now, self.offset);
        let summary = summarize(&filtered);

        tracing::debug!(
            "Computed stats for learner={} category={:?}: {} attempted",
            learner,
            category_id,
            summary.total_distinct_attempted
        );

        Ok(LearnerStats {
            category_id: category_id.map(str::to_string),
            daily_streak: daily_streak(&records, today, self.offset),
            recent_days: recent_days(&records, today, self.offset, RECENT_DAYS),
            recent_activity: recent_activity(&records, RECENT_ACTIVITY_LIMIT),
            ..summary
        })
    }
}

/// Attempt totals, accuracy and efficiency over `records`; the time-based
/// fields of the result are left empty.
pub fn summarize(records: &[&AttemptRecord]) -> LearnerStats {
    let solved: Vec<&&AttemptRecord> = records.iter().filter(|r| r.is_correct).collect();
    let total_distinct_attempted = records.len() as u32;
    let total_solved = solved.len() as u32;
    let total_all_attempts = records
        .iter()
        .fold(0u32, |total, r| total.saturating_add(r.attempts_count));

    let mut efficiency = EfficiencyBreakdown::default();
    for record in &solved {
        match record.attempts_count {
            1 => efficiency.first_attempt += 1,
            2 => efficiency.second_attempt += 1,
            3 => efficiency.third_attempt += 1,
            n if n >= 4 => efficiency.fourth_or_more += 1,
            _ => {}
        }
    }

    let accuracy = if total_distinct_attempted > 0 {
        round2(f64::from(total_solved) / f64::from(total_distinct_attempted) * 100.0)
    } else {
        0.0
    };
    let avg_attempts_per_solved = if total_solved > 0 {
        round2(f64::from(total_all_attempts) / f64::from(total_solved))
    } else {
        0.0
    };

    LearnerStats {
        category_id: None,
        total_distinct_attempted,
        total_solved,
        total_all_attempts,
        accuracy,
        avg_attempts_per_solved,
        efficiency,
        daily_streak: 0,
        recent_days: Vec::new(),
        recent_activity: Vec::new(),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn solved_days(records: &[AttemptRecord], offset: FixedOffset) -> BTreeSet<NaiveDate> {
    records
        .iter()
        .filter(|r| r.is_correct)
        .map(|r| local_date(r.updated_at, offset))
        .collect()
}

/// Consecutive days ending `today` on which at least one problem was solved.
pub fn daily_streak(records: &[AttemptRecord], today: NaiveDate, offset: FixedOffset) -> u32 {
    let days = solved_days(records, offset);
    let mut streak = 0;
    let mut expected = today;

    for day in days.iter().rev() {
        if *day > expected {
            continue;
        }
        if *day < expected {
            break;
        }
        streak += 1;
        expected -= Duration::days(1);
    }

    streak
}

/// The last `count` days, oldest first, each flagged if something was solved.
pub fn recent_days(
    records: &[AttemptRecord],
    today: NaiveDate,
    offset: FixedOffset,
    count: u32,
) -> Vec<DayStatus> {
    let days = solved_days(records, offset);
    (0..count)
        .rev()
        .map(|back| {
            let date = today - Duration::days(i64::from(back));
            DayStatus {
                date,
                solved: days.contains(&date),
            }
        })
        .collect()
}

pub fn recent_activity(records: &[AttemptRecord], limit: usize) -> Vec<ProgressView> {
    let mut sorted: Vec<&AttemptRecord> = records.iter().collect();
    sorted.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    sorted.into_iter().take(limit).map(ProgressView::from).collect()
}
