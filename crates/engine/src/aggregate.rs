use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::dates::days_since;
use crate::model::{Account, Prospect, ProspectStatus};

const HIGH_PRIORITY: i32 = 80;
const STALE_AFTER_DAYS: i64 = 30;

/// Dashboard headline counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_prospects: usize,
    pub active_customers: usize,
    pub high_priority_leads: usize,
    pub due_for_follow_up: usize,
    pub monthly_potential_revenue: f64,
}

/// Reduce the session collections to dashboard counts. Empty input gives all zeros.
///
/// A prospect with no usable contact date counts as stale (999 days), so
/// never-contacted leads show up in `due_for_follow_up`.
pub fn dashboard_stats(prospects: &[Prospect], accounts: &[Account], today: NaiveDate) -> DashboardStats {
    let mut stats = DashboardStats {
        total_prospects: prospects.len(),
        ..DashboardStats::default()
    };

    for p in prospects {
        if p.status == ProspectStatus::Customer {
            stats.active_customers += 1;
        } else if is_stale(p, today) {
            stats.due_for_follow_up += 1;
        }
        if is_high_priority_lead(p) {
            stats.high_priority_leads += 1;
        }
    }

    stats.monthly_potential_revenue = accounts.iter().map(|a| a.monthly_revenue).sum();
    stats
}

/// Prospect count per pipeline stage, in pipeline order. Every stage is present.
pub fn stage_counts(prospects: &[Prospect]) -> BTreeMap<ProspectStatus, usize> {
    let mut counts: BTreeMap<ProspectStatus, usize> =
        ProspectStatus::ALL.into_iter().map(|s| (s, 0)).collect();
    for p in prospects {
        *counts.entry(p.status).or_insert(0) += 1;
    }
    counts
}

/// Open leads nobody has touched in over a month, highest priority first
/// (ties keep input order), at most `limit` of them.
pub fn stale_leads<'a>(prospects: &'a [Prospect], today: NaiveDate, limit: usize) -> Vec<&'a Prospect> {
    let mut stale: Vec<&Prospect> = prospects
        .iter()
        .filter(|p| p.status != ProspectStatus::Customer && is_stale(p, today))
        .collect();
    stale.sort_by(|a, b| b.priority_score.cmp(&a.priority_score));
    stale.truncate(limit);
    stale
}

/// Prospect list filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProspectFilter {
    All,
    HighPriority,
    /// Open (not customer, not lost) and untouched for over a month.
    Stale,
    Status(ProspectStatus),
}

impl ProspectFilter {
    pub fn matches(&self, prospect: &Prospect, today: NaiveDate) -> bool {
        match self {
            Self::All => true,
            Self::HighPriority => prospect.priority_score >= HIGH_PRIORITY,
            Self::Stale => !prospect.status.is_closed() && is_stale(prospect, today),
            Self::Status(status) => prospect.status == *status,
        }
    }

    pub fn apply<'a>(&self, prospects: &'a [Prospect], today: NaiveDate) -> Vec<&'a Prospect> {
        prospects.iter().filter(|p| self.matches(p, today)).collect()
    }
}

fn is_stale(prospect: &Prospect, today: NaiveDate) -> bool {
    days_since(prospect.last_contact_date.as_deref(), today) > STALE_AFTER_DAYS
}

fn is_high_priority_lead(prospect: &Prospect) -> bool {
    prospect.priority_score >= HIGH_PRIORITY && !prospect.status.is_closed()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()
    }

    fn prospect(company: &str, status: ProspectStatus, priority: i32, last: Option<&str>) -> Prospect {
        let mut p = Prospect::new(format!("id-{company}"), company);
        p.status = status;
        p.priority_score = priority;
        p.last_contact_date = last.map(str::to_string);
        p
    }

    fn account(revenue: f64) -> Account {
        Account {
            company_name: "Acme".into(),
            location_name: String::new(),
            address: String::new(),
            city: "Tyler".into(),
            container_size: 0.0,
            monthly_revenue: revenue,
            monthly_profit: 0.0,
            fill_frequency: 0.0,
            coordinates: None,
        }
    }

    fn sample() -> Vec<Prospect> {
        vec![
            prospect("Cust", ProspectStatus::Customer, 95, Some("2025-01-01")),
            prospect("Hot", ProspectStatus::Contacted, 85, Some("2026-06-10")),
            prospect("Cold", ProspectStatus::New, 90, None),
            prospect("Lost", ProspectStatus::Lost, 99, Some("2026-01-01")),
            prospect("Meh", ProspectStatus::Qualified, 40, Some("2026-05-01")),
        ]
    }

    #[test]
    fn empty_input_is_all_zero() {
        assert_eq!(dashboard_stats(&[], &[], today()), DashboardStats::default());
    }

    #[test]
    fn counts_and_revenue() {
        let stats = dashboard_stats(&sample(), &[account(1200.0), account(300.5)], today());
        assert_eq!(stats.total_prospects, 5);
        assert_eq!(stats.active_customers, 1);
        assert_eq!(stats.high_priority_leads, 2);
        // Cold (never contacted), Lost and Meh; the customer is excluded.
        assert_eq!(stats.due_for_follow_up, 3);
        assert_eq!(stats.monthly_potential_revenue, 1500.5);
    }

    #[test]
    fn stage_counts_cover_every_status() {
        let counts = stage_counts(&sample());
        assert_eq!(counts.len(), 5);
        assert_eq!(counts[&ProspectStatus::Customer], 1);
        assert_eq!(counts[&ProspectStatus::Contacted], 1);
        assert_eq!(counts[&ProspectStatus::New], 1);
        assert_eq!(stage_counts(&[])[&ProspectStatus::Qualified], 0);
    }

    #[test]
    fn stale_leads_by_priority() {
        let prospects = sample();
        let names: Vec<&str> = stale_leads(&prospects, today(), 2)
            .iter()
            .map(|p| p.company_name.as_str())
            .collect();
        assert_eq!(names, ["Lost", "Cold"]);
    }

    #[test]
    fn filters() {
        let prospects = sample();
        let pick = |f: ProspectFilter| -> Vec<String> {
            f.apply(&prospects, today())
                .iter()
                .map(|p| p.company_name.clone())
                .collect()
        };
        assert_eq!(pick(ProspectFilter::All).len(), 5);
        assert_eq!(pick(ProspectFilter::HighPriority), ["Cust", "Hot", "Cold", "Lost"]);
        assert_eq!(pick(ProspectFilter::Stale), ["Cold", "Meh"]);
        assert_eq!(pick(ProspectFilter::Status(ProspectStatus::Lost)), ["Lost"]);
    }
}
