//! Session context: the three in-memory collections a planning session works
//! on, replaced wholesale on every change.
//!
//! The engine keeps no state of its own. A [`Session`] value is the state;
//! every operation hands back a new one, and reconciliation runs only when
//! accounts or logs actually changed (see [`reconcile_if_needed`]).

use chrono::NaiveDate;
use rand::Rng;

use crate::aggregate::{dashboard_stats, DashboardStats};
use crate::config::EngineConfig;
use crate::dates::{add_days, iso};
use crate::model::{same_company, Account, Outcome, OutreachLog, OutreachType, PlanItem, Prospect};
use crate::normalize::new_id;
use crate::plan::plan_from_config;
use crate::reconcile::{apply_linkage, history, latest_log_for, reconcile};

const DEFAULT_NEXT_STEP: &str = "Follow up in 3 months";
const FOLLOW_UP_AFTER_DAYS: u64 = 7;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    accounts: Vec<Account>,
    prospects: Vec<Prospect>,
    logs: Vec<OutreachLog>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a session from already-typed collections, reconciling once.
    pub fn from_parts(accounts: Vec<Account>, prospects: Vec<Prospect>, logs: Vec<OutreachLog>) -> Self {
        let prospects = reconcile(&prospects, &accounts, &logs);
        Self { accounts, prospects, logs }
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn prospects(&self) -> &[Prospect] {
        &self.prospects
    }

    pub fn logs(&self) -> &[OutreachLog] {
        &self.logs
    }

    /// Replace the account set. An empty import keeps the current accounts.
    pub fn import_accounts(&self, accounts: Vec<Account>) -> Session {
        if accounts.is_empty() {
            log::warn!("account import was empty; keeping {} existing accounts", self.accounts.len());
            return self.clone();
        }
        let next = Session {
            accounts,
            ..self.clone()
        };
        reconcile_if_needed(self, next)
    }

    /// Replace the prospect set. Never triggers reconciliation on its own;
    /// prospects are expected to be normalized against the current accounts.
    pub fn import_prospects(&self, prospects: Vec<Prospect>) -> Session {
        if prospects.is_empty() {
            log::warn!("prospect import was empty; keeping {} existing prospects", self.prospects.len());
            return self.clone();
        }
        Session {
            prospects,
            ..self.clone()
        }
    }

    /// Replace the outreach history. An empty import keeps the current logs.
    pub fn import_outreach(&self, logs: Vec<OutreachLog>) -> Session {
        if logs.is_empty() {
            log::warn!("outreach import was empty; keeping {} existing logs", self.logs.len());
            return self.clone();
        }
        let next = Session {
            logs,
            ..self.clone()
        };
        reconcile_if_needed(self, next)
    }

    /// Append one interaction and bring the affected company's prospect up to
    /// date right away, even when no accounts are loaded yet.
    pub fn record_interaction(&self, log: OutreachLog) -> Session {
        let company = log.company.clone();
        let mut logs = self.logs.clone();
        logs.push(log);

        let has_account = self.accounts.iter().any(|a| same_company(&a.company_name, &company));
        let latest = latest_log_for(&logs, &company);
        let prospects = self
            .prospects
            .iter()
            .map(|p| {
                if same_company(&p.company_name, &company) {
                    apply_linkage(p, has_account, latest)
                } else {
                    p.clone()
                }
            })
            .collect();

        let next = Session {
            accounts: self.accounts.clone(),
            prospects,
            logs,
        };
        reconcile_if_needed(self, next)
    }

    /// Logs for one company, newest first.
    pub fn history(&self, company: &str) -> Vec<&OutreachLog> {
        history(&self.logs, company)
    }

    pub fn find_prospect(&self, id: &str) -> Option<&Prospect> {
        self.prospects.iter().find(|p| p.id == id)
    }

    /// Prospects whose company name contains `term`, ignoring case, in
    /// import order. An empty term matches everything.
    pub fn search(&self, term: &str, limit: usize) -> Vec<&Prospect> {
        let needle = term.to_lowercase();
        self.prospects
            .iter()
            .filter(|p| p.company_name.to_lowercase().contains(&needle))
            .take(limit)
            .collect()
    }

    pub fn plan(&self, today: NaiveDate, config: &EngineConfig) -> Vec<PlanItem> {
        plan_from_config(&self.prospects, today, config)
    }

    pub fn stats(&self, today: NaiveDate) -> DashboardStats {
        dashboard_stats(&self.prospects, &self.accounts, today)
    }
}

/// Reconcile `next` if its accounts or logs differ from `prev`'s; otherwise
/// return it untouched. A change to prospects alone never reconciles.
///
/// Reconciliation itself acts only when `next` has both prospects and
/// accounts (see [`reconcile`]).
pub fn reconcile_if_needed(prev: &Session, next: Session) -> Session {
    if prev.accounts == next.accounts && prev.logs == next.logs {
        return next;
    }
    let prospects = reconcile(&next.prospects, &next.accounts, &next.logs);
    Session { prospects, ..next }
}

// ---------------------------------------------------------------------------
// New interactions
// ---------------------------------------------------------------------------

/// A rep's entry for a visit or call that just happened.
#[derive(Debug, Clone)]
pub struct Interaction {
    pub company: String,
    pub date: NaiveDate,
    pub kind: OutreachType,
    pub outcome: Outcome,
    pub notes: String,
    pub next_step: String,
    /// Defaults to a week after `date`.
    pub next_step_due: Option<NaiveDate>,
    pub contact_name: Option<String>,
    pub email: Option<String>,
}

impl Interaction {
    pub fn new(company: impl Into<String>, date: NaiveDate, outcome: Outcome) -> Self {
        Self {
            company: company.into(),
            date,
            kind: OutreachType::Visit,
            outcome,
            notes: String::new(),
            next_step: DEFAULT_NEXT_STEP.to_string(),
            next_step_due: None,
            contact_name: None,
            email: None,
        }
    }
}

impl OutreachLog {
    /// Turn an [`Interaction`] into a log entry with a fresh id. Contact
    /// details are kept only for `Won` outcomes.
    pub fn interaction<R: Rng + ?Sized>(entry: Interaction, rng: &mut R) -> OutreachLog {
        let won = entry.outcome == Outcome::Won;
        let due = entry
            .next_step_due
            .unwrap_or_else(|| add_days(entry.date, FOLLOW_UP_AFTER_DAYS));
        OutreachLog {
            id: new_id(rng),
            company: entry.company,
            date: iso(entry.date),
            kind: entry.kind,
            outcome: entry.outcome,
            notes: entry.notes,
            next_step: entry.next_step,
            next_step_due_date: Some(iso(due)),
            contact_name: entry.contact_name.filter(|_| won),
            email: entry.email.filter(|_| won),
        }
    }
}
