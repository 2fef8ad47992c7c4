//! Plan scoring: one prospect + today's date → a ranking score and the
//! reason a rep would see next to the stop.

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::ScoringRules;
use crate::dates::{add_days, days_since, iso};
use crate::model::{Prospect, ProspectStatus};

pub const REASON_HIGH_VALUE: &str = "High Value Prospect";
pub const REASON_QUALIFIED: &str = "Qualified Lead - Push to close";
pub const REASON_STALE: &str = "High Priority - At Risk (Stale)";
const DEFAULT_FOLLOW_UP: &str = "Check in";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreCard {
    pub plan_score: i32,
    pub reason: String,
}

impl ScoreCard {
    /// Only positive scores make it onto a plan.
    pub fn is_eligible(&self) -> bool {
        self.plan_score > 0
    }
}

/// [`score_with`] using the default rules.
pub fn score(prospect: &Prospect, today: NaiveDate) -> ScoreCard {
    score_with(prospect, today, &ScoringRules::default())
}

/// Score a prospect for a plan built on `today`.
///
/// Starts at the imported priority and applies, in order (a later rule's
/// reason replaces an earlier one):
/// 1. next step due by tomorrow: `+due_boost`;
/// 2. qualified: `+qualified_boost`;
/// 3. high priority, open, not contacted for over `stale_after_days`: `+stale_boost`;
/// 4. contacted within `cooldown_days` and below `protected_score`: `-cooldown_penalty`;
/// 5. customer and below `protected_score`: `-customer_penalty`.
pub fn score_with(prospect: &Prospect, today: NaiveDate, rules: &ScoringRules) -> ScoreCard {
    let mut plan_score = prospect.priority_score;
    let mut reason = REASON_HIGH_VALUE.to_string();

    let days = days_since(prospect.last_contact_date.as_deref(), today);

    // ISO text compares in date order.
    let tomorrow = iso(add_days(today, 1));
    if let Some(due) = prospect.next_step_due.as_deref().filter(|d| !d.is_empty()) {
        if due <= tomorrow.as_str() {
            plan_score = plan_score.saturating_add(rules.due_boost);
            let step = prospect
                .next_step
                .as_deref()
                .filter(|s| !s.is_empty())
                .unwrap_or(DEFAULT_FOLLOW_UP);
            reason = format!("Follow-up Due: {step}");
        }
    }

    if prospect.status == ProspectStatus::Qualified {
        plan_score = plan_score.saturating_add(rules.qualified_boost);
        reason = REASON_QUALIFIED.to_string();
    }

    if prospect.priority_score >= rules.high_priority_threshold
        && days > rules.stale_after_days
        && !prospect.status.is_closed()
    {
        plan_score = plan_score.saturating_add(rules.stale_boost);
        reason = REASON_STALE.to_string();
    }

    if days < rules.cooldown_days && plan_score < rules.protected_score {
        plan_score = plan_score.saturating_sub(rules.cooldown_penalty);
    }

    if prospect.status == ProspectStatus::Customer && plan_score < rules.protected_score {
        plan_score = plan_score.saturating_sub(rules.customer_penalty);
    }

    ScoreCard { plan_score, reason }
}
