use chrono::NaiveDate;

use crate::config::{EngineConfig, ScoringRules};
use crate::model::{PlanItem, Prospect};
use crate::score::score_with;

pub const DEFAULT_MAX_STOPS: usize = 12;

/// [`plan_with`] with the default scoring rules.
pub fn plan(prospects: &[Prospect], today: NaiveDate, max_stops: usize) -> Vec<PlanItem> {
    plan_with(prospects, today, max_stops, &ScoringRules::default())
}

/// [`plan_with`] driven by a full engine config.
pub fn plan_from_config(prospects: &[Prospect], today: NaiveDate, config: &EngineConfig) -> Vec<PlanItem> {
    plan_with(prospects, today, config.planner.max_stops, &config.scoring)
}

/// Build the next visit plan.
///
/// Every prospect is scored; only positive scores are kept, ranked high to
/// low with a stable sort so equal scores keep their input order. The top
/// candidate is the anchor and always goes first. The rest of the day is
/// filled with candidates in the anchor's city, then, if stops remain, with
/// the best candidates elsewhere. At most `max_stops` items are returned, in
/// visit order.
///
/// "Same city" is plain equality on the `city` field, not a distance check.
pub fn plan_with(
    prospects: &[Prospect],
    today: NaiveDate,
    max_stops: usize,
    rules: &ScoringRules,
) -> Vec<PlanItem> {
    if max_stops == 0 {
        return Vec::new();
    }

    let mut candidates: Vec<PlanItem> = prospects
        .iter()
        .filter_map(|p| {
            let card = score_with(p, today, rules);
            card.is_eligible().then(|| PlanItem {
                prospect: p.clone(),
                plan_score: card.plan_score,
                reason: card.reason,
                distance_from_anchor: None,
            })
        })
        .collect();
    // Vec::sort_by is stable.
    candidates.sort_by(|a, b| b.plan_score.cmp(&a.plan_score));

    let mut remaining = candidates.into_iter();
    let Some(mut anchor) = remaining.next() else {
        log::info!("no eligible candidates among {} prospects", prospects.len());
        return Vec::new();
    };

    let (same_city, other_cities): (Vec<PlanItem>, Vec<PlanItem>) =
        remaining.partition(|item| item.prospect.city == anchor.prospect.city);

    let anchor_coords = anchor.prospect.coordinates;
    anchor.distance_from_anchor = anchor_coords.map(|_| 0.0);
    log::debug!(
        "anchor: {} ({}, score {})",
        anchor.prospect.company_name,
        anchor.prospect.city,
        anchor.plan_score
    );

    let mut plan = Vec::with_capacity(max_stops.min(1 + same_city.len() + other_cities.len()));
    plan.push(anchor);
    plan.extend(same_city.into_iter().take(max_stops - 1));
    let open = max_stops - plan.len();
    plan.extend(other_cities.into_iter().take(open));

    if let Some(origin) = anchor_coords {
        for item in plan.iter_mut().skip(1) {
            item.distance_from_anchor = item.prospect.coordinates.map(|c| origin.distance_km(&c));
        }
    }

    log::info!("planned {} of {} prospects", plan.len(), prospects.len());
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Coordinates, ProspectStatus};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()
    }

    fn prospect(company: &str, city: &str, priority: i32) -> Prospect {
        let mut p = Prospect::new(format!("id-{company}"), company);
        p.city = city.into();
        p.priority_score = priority;
        p
    }

    fn names(plan: &[PlanItem]) -> Vec<&str> {
        plan.iter().map(|i| i.prospect.company_name.as_str()).collect()
    }

    #[test]
    fn empty_when_nothing_eligible() {
        let mut recent = prospect("Recent", "Tyler", 60);
        recent.last_contact_date = Some("2026-06-14".into());
        assert!(plan(&[recent], today(), 12).is_empty());
        assert!(plan(&[], today(), 12).is_empty());
    }

    #[test]
    fn huge_stop_bound_plans_what_is_eligible() {
        let prospects = vec![prospect("Only", "Tyler", 60), prospect("Second", "Kilgore", 40)];
        assert_eq!(names(&plan(&prospects, today(), usize::MAX)), ["Only", "Second"]);
        assert_eq!(plan(&prospects[..1], today(), 1 << 40).len(), 1);
    }

    #[test]
    fn anchor_first_then_same_city_then_others() {
        let mut anchor = prospect("Anchor", "Longview", 50);
        anchor.next_step_due = Some("2026-06-15".into());
        let prospects = vec![
            prospect("Tyler High", "Tyler", 79),
            prospect("Longview Low", "Longview", 20),
            anchor,
            prospect("Longview Mid", "Longview", 60),
            prospect("Tyler Mid", "Tyler", 55),
        ];
        let out = plan(&prospects, today(), 12);
        assert_eq!(
            names(&out),
            ["Anchor", "Longview Mid", "Longview Low", "Tyler High", "Tyler Mid"]
        );
        assert_eq!(out[0].plan_score, 250);
    }

    #[test]
    fn same_city_fills_before_other_cities() {
        let prospects = vec![
            prospect("A", "Tyler", 79),
            prospect("B", "Kilgore", 78),
            prospect("C", "Tyler", 10),
            prospect("D", "Tyler", 5),
        ];
        let out = plan(&prospects, today(), 3);
        assert_eq!(names(&out), ["A", "C", "D"]);
    }

    #[test]
    fn bound_is_respected() {
        let prospects: Vec<Prospect> = (0..30)
            .map(|i| prospect(&format!("P{i}"), if i % 2 == 0 { "Tyler" } else { "Athens" }, 10 + i))
            .collect();
        for n in 1..=15 {
            let out = plan(&prospects, today(), n);
            assert_eq!(out.len(), n);
            assert_eq!(out[0].prospect.company_name, "P29");
        }
        assert!(plan(&prospects, today(), 0).is_empty());
    }

    #[test]
    fn ties_keep_input_order() {
        let prospects = vec![
            prospect("First", "Tyler", 50),
            prospect("Second", "Tyler", 50),
            prospect("Third", "Tyler", 50),
        ];
        let out = plan(&prospects, today(), 12);
        assert_eq!(names(&out), ["First", "Second", "Third"]);
        assert_eq!(plan(&prospects, today(), 12), out);
    }

    #[test]
    fn customers_only_planned_when_something_is_due() {
        let mut routine = prospect("Routine", "Tyler", 40);
        routine.status = ProspectStatus::Customer;
        let mut due = prospect("Due", "Tyler", 40);
        due.status = ProspectStatus::Customer;
        due.next_step_due = Some("2026-06-01".into());
        let out = plan(&[routine, due], today(), 12);
        assert_eq!(names(&out), ["Due"]);
    }

    #[test]
    fn distance_from_anchor() {
        let mut a = prospect("A", "Tyler", 90);
        a.coordinates = Some(Coordinates::new(32.3513, -95.3011));
        let mut b = prospect("B", "Longview", 70);
        b.coordinates = Some(Coordinates::new(32.5007, -94.7405));
        let c = prospect("C", "Tyler", 60);
        let out = plan(&[a, b, c], today(), 12);
        assert_eq!(names(&out), ["A", "C", "B"]);
        assert_eq!(out[0].distance_from_anchor, Some(0.0));
        assert_eq!(out[1].distance_from_anchor, None);
        assert!(out[2].distance_from_anchor.unwrap() > 50.0);
    }

    #[test]
    fn config_drives_stop_count() {
        let mut config = EngineConfig::default();
        config.planner.max_stops = 2;
        let prospects = vec![
            prospect("A", "Tyler", 30),
            prospect("B", "Tyler", 20),
            prospect("C", "Tyler", 10),
        ];
        assert_eq!(plan_from_config(&prospects, today(), &config).len(), 2);
    }
}
