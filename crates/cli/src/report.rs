//! `fplan stats` and `fplan reconcile`: read-only views of the loaded session.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::Serialize;

use fieldplan_engine::aggregate::{stage_counts, stale_leads};
use fieldplan_engine::{DashboardStats, Prospect, ProspectFilter, ProspectStatus};

use crate::inputs::{self, InputArgs};
use crate::CliError;

const STALE_LEAD_LIMIT: usize = 5;

/// `--filter` values for `fplan reconcile`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Filter {
    All,
    HighPriority,
    Stale,
    New,
    Contacted,
    Qualified,
    Customer,
    Lost,
}

impl From<Filter> for ProspectFilter {
    fn from(filter: Filter) -> Self {
        match filter {
            Filter::All => ProspectFilter::All,
            Filter::HighPriority => ProspectFilter::HighPriority,
            Filter::Stale => ProspectFilter::Stale,
            Filter::New => ProspectFilter::Status(ProspectStatus::New),
            Filter::Contacted => ProspectFilter::Status(ProspectStatus::Contacted),
            Filter::Qualified => ProspectFilter::Status(ProspectStatus::Qualified),
            Filter::Customer => ProspectFilter::Status(ProspectStatus::Customer),
            Filter::Lost => ProspectFilter::Status(ProspectStatus::Lost),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsOutput<'a> {
    today: NaiveDate,
    #[serde(flatten)]
    stats: DashboardStats,
    stage_counts: BTreeMap<ProspectStatus, usize>,
    stale_leads: Vec<StaleLead<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StaleLead<'a> {
    company_name: &'a str,
    priority_score: i32,
    last_contact_date: Option<&'a str>,
}

// ============================================================================
// stats
// ============================================================================

pub fn cmd_stats(args: InputArgs, json_output: bool) -> Result<(), CliError> {
    let loaded = inputs::load(&args)?;
    let prospects = loaded.session.prospects();

    let out = StatsOutput {
        today: loaded.today,
        stats: loaded.session.stats(loaded.today),
        stage_counts: stage_counts(prospects),
        stale_leads: stale_leads(prospects, loaded.today, STALE_LEAD_LIMIT)
            .into_iter()
            .map(|p| StaleLead {
                company_name: &p.company_name,
                priority_score: p.priority_score,
                last_contact_date: p.last_contact_date.as_deref(),
            })
            .collect(),
    };

    if json_output {
        println!("{}", to_json(&out)?);
        return Ok(());
    }

    let s = &out.stats;
    println!("prospects:            {}", s.total_prospects);
    println!("active customers:     {}", s.active_customers);
    println!("high-priority leads:  {}", s.high_priority_leads);
    println!("due for follow-up:    {}", s.due_for_follow_up);
    println!("monthly revenue:      ${:.2}", s.monthly_potential_revenue);
    println!();
    println!("pipeline:");
    for (status, count) in &out.stage_counts {
        println!("  {:<10} {}", status.to_string(), count);
    }
    if !out.stale_leads.is_empty() {
        println!();
        println!("stale leads:");
        for lead in &out.stale_leads {
            println!(
                "  {:<32} priority {:>3}  last contact {}",
                lead.company_name,
                lead.priority_score,
                lead.last_contact_date.unwrap_or("never"),
            );
        }
    }
    Ok(())
}

// ============================================================================
// reconcile
// ============================================================================

pub fn cmd_reconcile(
    args: InputArgs,
    filter: Filter,
    json_output: bool,
    output_file: Option<PathBuf>,
) -> Result<(), CliError> {
    let loaded = inputs::load(&args)?;
    let prospects = loaded.session.prospects();
    let listed = ProspectFilter::from(filter).apply(prospects, loaded.today);

    if json_output || output_file.is_some() {
        let json_str = to_json(&listed)?;
        if let Some(ref path) = output_file {
            std::fs::write(path, &json_str)
                .map_err(|e| CliError::general(format!("cannot write output: {e}")))?;
            eprintln!("wrote {}", path.display());
        }
        if json_output {
            println!("{json_str}");
        }
    } else {
        for p in &listed {
            println!("{}", render_row(p));
        }
    }

    let counts = stage_counts(prospects);
    let summary: Vec<String> = counts
        .iter()
        .filter(|(_, n)| **n > 0)
        .map(|(status, n)| format!("{n} {}", status.to_string().to_lowercase()))
        .collect();
    if filter != Filter::All {
        eprintln!("{} of {} prospects match --filter", listed.len(), prospects.len());
    }
    eprintln!(
        "{} prospects reconciled against {} accounts and {} logs: {}",
        prospects.len(),
        loaded.session.accounts().len(),
        loaded.session.logs().len(),
        summary.join(", "),
    );
    Ok(())
}

fn render_row(p: &Prospect) -> String {
    format!(
        "{:<32} {:<10} {:<8} last {:<10}  next {}{}",
        p.company_name,
        p.status.to_string(),
        if p.is_deployed { "deployed" } else { "" },
        p.last_contact_date.as_deref().unwrap_or("-"),
        p.next_step.as_deref().unwrap_or("-"),
        p.next_step_due
            .as_deref()
            .map(|due| format!(" (due {due})"))
            .unwrap_or_default(),
    )
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))
}
