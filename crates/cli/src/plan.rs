//! `fplan plan`: score, rank and cluster prospects into the next visit plan.

use chrono::NaiveDate;
use serde::Serialize;

use fieldplan_engine::PlanItem;

use crate::exit_codes::EXIT_EMPTY_PLAN;
use crate::inputs::{self, InputArgs};
use crate::CliError;

/// `--json` document.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanOutput<'a> {
    today: NaiveDate,
    max_stops: usize,
    anchor_city: Option<&'a str>,
    stops: &'a [PlanItem],
}

pub fn cmd_plan(
    args: InputArgs,
    max_stops: Option<usize>,
    json_output: bool,
    fail_on_empty: bool,
) -> Result<(), CliError> {
    let mut loaded = inputs::load(&args)?;
    if let Some(n) = max_stops {
        loaded.config.planner.max_stops = n;
    }

    let stops = loaded.session.plan(loaded.today, &loaded.config);
    let anchor_city = stops.first().map(|item| item.prospect.city.as_str());

    if json_output {
        let out = PlanOutput {
            today: loaded.today,
            max_stops: loaded.config.planner.max_stops,
            anchor_city,
            stops: &stops,
        };
        let json_str = serde_json::to_string_pretty(&out)
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    } else {
        print!("{}", render_table(&stops));
    }

    // Human summary to stderr
    match anchor_city {
        Some(city) => eprintln!(
            "{} stops for {} anchored in {} ({} prospects considered)",
            stops.len(),
            loaded.today,
            city,
            loaded.session.prospects().len(),
        ),
        None => eprintln!(
            "no eligible prospects for {} ({} considered)",
            loaded.today,
            loaded.session.prospects().len(),
        ),
    }

    if stops.is_empty() && fail_on_empty {
        return Err(CliError::new(EXIT_EMPTY_PLAN, "plan is empty")
            .with_hint("everything is cooling down or deprioritized; try a later --today"));
    }
    Ok(())
}

fn render_table(stops: &[PlanItem]) -> String {
    let mut out = String::new();
    for (i, item) in stops.iter().enumerate() {
        let distance = item
            .distance_from_anchor
            .map(|km| format!("{km:.1} km"))
            .unwrap_or_default();
        out.push_str(&format!(
            "{:>2}. {:<32} {:<12} {:>5}  {:<36} {}\n",
            i + 1,
            item.prospect.company_name,
            item.prospect.city,
            item.plan_score,
            item.reason,
            distance,
        ));
    }
    out
}
