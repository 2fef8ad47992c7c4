use std::fs;

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::tempdir;

use fieldplan_engine::geo::Geocoder;
use fieldplan_engine::normalize::{normalize_outreach, normalize_prospects};
use fieldplan_io::{export_outreach, read_rows, read_rows_from_str};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

#[test]
fn prospect_export_with_repeated_header_and_semicolons() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("prospects.csv");
    fs::write(
        &path,
        "Company Name;Address;Priority Score\n\
         \"Acme, Inc\";\"12 Main St, Kilgore, TX 75662\";$90\n\
         Company Name;Address;Priority Score\n\
         Beta LLC;;\n",
    )
    .unwrap();

    let rows = read_rows(&path).unwrap();
    assert_eq!(rows.len(), 3);

    let prospects = normalize_prospects(&rows, &[], &Geocoder::default(), &mut rng());
    assert_eq!(prospects.len(), 2);
    assert_eq!(prospects[0].company_name, "Acme, Inc");
    assert_eq!(prospects[0].city, "Kilgore");
    assert_eq!(prospects[0].priority_score, 90);
    assert_eq!(prospects[1].priority_score, 50);
}

#[test]
fn outreach_round_trips_through_export() {
    let rows = read_rows_from_str(
        "Company,Visit/Call Date,Outcome,Notes,Next Step,Contact Name\n\
         Acme,2026-06-01,won,\"Signed, \"\"finally\"\"\",Deliver bin,Pat\n\
         Beta,2026-06-02,Not Interested,,,Sam\n",
    )
    .unwrap();
    let logs = normalize_outreach(&rows, today(), &mut rng());
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].contact_name.as_deref(), Some("Pat"));
    assert_eq!(logs[1].contact_name, None);

    let text = export_outreach(&logs).unwrap();
    let back = read_rows_from_str(&text).unwrap();
    assert_eq!(back.len(), 2);
    assert_eq!(back[0]["company"], "Acme");
    assert_eq!(back[0]["outcome"], "Won");
    assert_eq!(back[0]["notes"], "Signed, \"finally\"");
    assert_eq!(back[0]["contactName"], "Pat");
    assert_eq!(back[1]["outcome"], "Not Interested");
    assert_eq!(back[1]["contactName"], "");
}
