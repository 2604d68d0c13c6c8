use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::super::domain::UnknownValue;

/// Stand-in for "days to deadline" when a grant has no closing date.
pub const NO_DEADLINE_DAYS: i64 = 999;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// How many hard criteria matched, independent of the score magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub const fn label(self) -> &'static str {
        match self {
            ConfidenceLevel::High => "high",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::Low => "low",
        }
    }
}

/// Urgency classification combining score and deadline proximity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Urgent,
    High,
    Normal,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Urgent,
        Priority::High,
        Priority::Normal,
        Priority::Low,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Priority::Urgent => "urgent",
            Priority::High => "high",
            Priority::Normal => "normal",
            Priority::Low => "low",
        }
    }
}

impl FromStr for Priority {
    type Err = UnknownValue;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let needle = raw.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|priority| priority.label() == needle)
            .ok_or_else(|| UnknownValue {
                kind: "priority",
                value: raw.trim().to_string(),
            })
    }
}

/// Presentation band used to group results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Excellent,
    Great,
    Good,
    Fair,
    Poor,
}

impl ScoreBand {
    pub const EXCELLENT_FROM: u8 = 90;
    pub const GREAT_FROM: u8 = 70;
    pub const GOOD_FROM: u8 = 50;
    pub const FAIR_FROM: u8 = 30;

    pub const fn for_score(score: u8) -> Self {
        if score >= Self::EXCELLENT_FROM {
            ScoreBand::Excellent
        } else if score >= Self::GREAT_FROM {
            ScoreBand::Great
        } else if score >= Self::GOOD_FROM {
            ScoreBand::Good
        } else if score >= Self::FAIR_FROM {
            ScoreBand::Fair
        } else {
            ScoreBand::Poor
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent match",
            ScoreBand::Great => "Great match",
            ScoreBand::Good => "Good match",
            ScoreBand::Fair => "Fair match",
            ScoreBand::Poor => "Poor match",
        }
    }
}

/// Whole days from `now` until the start (00:00 UTC) of `closing`, rounded up.
/// Negative once the deadline has passed.
pub fn days_to_deadline(closing: NaiveDate, now: DateTime<Utc>) -> i64 {
    let deadline = closing.and_time(NaiveTime::MIN).and_utc();
    let millis = (deadline - now).num_milliseconds();
    let whole = millis.div_euclid(MILLIS_PER_DAY);
    if millis.rem_euclid(MILLIS_PER_DAY) > 0 {
        whole + 1
    } else {
        whole
    }
}

pub(crate) fn confidence_for(match_count: u8) -> ConfidenceLevel {
    if match_count >= 3 {
        ConfidenceLevel::High
    } else if match_count == 2 {
        ConfidenceLevel::Medium
    } else {
        ConfidenceLevel::Low
    }
}

/// 80% of the score plus five points per fully matched criterion, capped at 95.
pub(crate) fn estimated_success_rate(total_score: u8, match_count: u8) -> u8 {
    let rate = (f64::from(total_score) * 0.8 + 5.0 * f64::from(match_count)).round();
    rate.min(95.0) as u8
}

/// First matching rule wins. `days_to_deadline` of `None` counts as [`NO_DEADLINE_DAYS`].
pub(crate) fn priority_for(total_score: u8, days_to_deadline: Option<i64>) -> Priority {
    let days = days_to_deadline.unwrap_or(NO_DEADLINE_DAYS);

    if total_score >= 70 && days <= 15 {
        Priority::Urgent
    } else if total_score >= 85 || days <= 7 {
        Priority::High
    } else if total_score >= 50 {
        Priority::Normal
    } else {
        Priority::Low
    }
}
