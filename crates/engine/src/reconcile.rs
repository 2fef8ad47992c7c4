use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use crate::dates::parse_date;
use crate::model::{join_key, same_company, Account, Outcome, OutreachLog, Prospect, ProspectStatus};

/// Fold account linkage and the latest outreach log into every prospect.
///
/// Pure and idempotent: feeding the output back in with the same accounts and
/// logs returns it unchanged. When there are no prospects or no accounts the
/// input is returned as-is, so an import that hasn't landed yet can't erase
/// state that earlier runs derived.
///
/// Per prospect:
/// - a matching account makes it `Customer` and deployed, whatever the logs say;
/// - otherwise the latest log decides: `Won` → `Customer`, anything else → `Contacted`;
/// - contact date, next step and due date are copied from the latest log;
/// - contact name/email are copied only when the log carries them.
pub fn reconcile(prospects: &[Prospect], accounts: &[Account], logs: &[OutreachLog]) -> Vec<Prospect> {
    if prospects.is_empty() || accounts.is_empty() {
        log::debug!(
            "reconcile skipped ({} prospects, {} accounts)",
            prospects.len(),
            accounts.len()
        );
        return prospects.to_vec();
    }

    let account_keys: HashSet<String> = accounts.iter().map(|a| join_key(&a.company_name)).collect();
    let latest = latest_logs(logs);

    let reconciled: Vec<Prospect> = prospects
        .iter()
        .map(|p| {
            let key = join_key(&p.company_name);
            apply_linkage(p, account_keys.contains(&key), latest.get(&key).copied())
        })
        .collect();

    let changed = prospects.iter().zip(&reconciled).filter(|(a, b)| a != b).count();
    log::info!(
        "reconciled {} prospects against {} accounts and {} logs ({changed} changed)",
        prospects.len(),
        accounts.len(),
        logs.len()
    );
    reconciled
}

/// Apply one company's account linkage and latest log to its prospect.
pub fn apply_linkage(prospect: &Prospect, has_account: bool, last_log: Option<&OutreachLog>) -> Prospect {
    let mut p = prospect.clone();
    p.is_deployed = p.is_deployed || has_account;

    p.status = match (has_account, last_log) {
        (true, _) => ProspectStatus::Customer,
        (false, Some(log)) if log.outcome == Outcome::Won => ProspectStatus::Customer,
        (false, Some(_)) => ProspectStatus::Contacted,
        (false, None) => p.status,
    };

    if let Some(log) = last_log {
        p.last_contact_date = Some(log.date.clone());
        p.next_step = Some(log.next_step.clone()).filter(|s| !s.is_empty());
        p.next_step_due = log.next_step_due_date.clone();
        if log.contact_name.is_some() {
            p.contact_name = log.contact_name.clone();
        }
        if log.email.is_some() {
            p.email = log.email.clone();
        }
    }

    p
}

/// Latest log per company join key.
///
/// Later dates win; on an equal date the log that appears later in `logs`
/// (the more recently recorded one) wins.
pub fn latest_logs(logs: &[OutreachLog]) -> HashMap<String, &OutreachLog> {
    let mut latest: HashMap<String, &OutreachLog> = HashMap::new();
    for log in logs {
        latest
            .entry(join_key(&log.company))
            .and_modify(|current| {
                if recency(log) >= recency(*current) {
                    *current = log;
                }
            })
            .or_insert(log);
    }
    latest
}

/// Latest log for one company, same tie-break as [`latest_logs`].
pub fn latest_log_for<'a>(logs: &'a [OutreachLog], company: &str) -> Option<&'a OutreachLog> {
    logs.iter()
        .filter(|log| same_company(&log.company, company))
        .fold(None, |best: Option<&OutreachLog>, log| match best {
            Some(current) if recency(log) < recency(current) => Some(current),
            _ => Some(log),
        })
}

/// All logs for one company, newest first (equal dates: most recently recorded first).
pub fn history<'a>(logs: &'a [OutreachLog], company: &str) -> Vec<&'a OutreachLog> {
    let mut matching: Vec<(usize, &OutreachLog)> = logs
        .iter()
        .enumerate()
        .filter(|(_, log)| same_company(&log.company, company))
        .collect();
    matching.sort_by(|(ia, a), (ib, b)| recency(b).cmp(&recency(a)).then(ib.cmp(ia)));
    matching.into_iter().map(|(_, log)| log).collect()
}

/// Ordering key for log dates. Parsed dates compare chronologically and beat
/// unreadable ones; text breaks the remaining ties (plain ISO text order).
fn recency(log: &OutreachLog) -> (Option<NaiveDate>, &str) {
    (parse_date(&log.date), log.date.as_str())
}
