//! Raw tabular rows → typed records.
//!
//! Each export arrives as header → value maps. This is the only place those
//! untyped maps are read; everything downstream works on [`Account`],
//! [`Prospect`] and [`OutreachLog`]. Bad values degrade to defaults and rows
//! without a company name are dropped, so an import never fails.

use std::collections::{HashMap, HashSet};
use std::fmt;

use chrono::NaiveDate;
use rand::Rng;

use crate::dates::iso;
use crate::geo::Geocoder;
use crate::model::{join_key, Account, Outcome, OutreachLog, OutreachType, Prospect, ProspectStatus};

/// One row of an imported table, keyed by header text.
pub type RawRow = HashMap<String, String>;

const ACCOUNT_CITY_HINTS: [&str; 3] = ["Longview", "Kilgore", "Lindale"];
const PROSPECT_CITY_HINTS: [&str; 5] = ["Tyler", "Lindale", "Whitehouse", "Longview", "Kilgore"];

const DEFAULT_PRIORITY: i32 = 50;
const DEFAULT_CONTAINER_POTENTIAL: &str = "30";

// ---------------------------------------------------------------------------
// Record kinds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Accounts,
    Prospects,
    Outreach,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accounts => write!(f, "accounts"),
            Self::Prospects => write!(f, "prospects"),
            Self::Outreach => write!(f, "outreach"),
        }
    }
}

/// Typed output of [`normalize`], tagged by source kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Records {
    Accounts(Vec<Account>),
    Prospects(Vec<Prospect>),
    Outreach(Vec<OutreachLog>),
}

impl Records {
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Accounts(_) => RecordKind::Accounts,
            Self::Prospects(_) => RecordKind::Prospects,
            Self::Outreach(_) => RecordKind::Outreach,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Accounts(v) => v.len(),
            Self::Prospects(v) => v.len(),
            Self::Outreach(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What a normalization pass needs besides the rows themselves.
pub struct NormalizeContext<'a> {
    /// Fallback date for outreach rows without one.
    pub today: NaiveDate,
    /// Already-imported accounts; prospects matching one import as customers.
    pub accounts: &'a [Account],
    pub geocoder: &'a Geocoder,
}

/// Normalize `rows` as `kind`. Ids and map jitter are drawn from `rng`.
pub fn normalize<R: Rng + ?Sized>(
    kind: RecordKind,
    rows: &[RawRow],
    ctx: &NormalizeContext<'_>,
    rng: &mut R,
) -> Records {
    let records = match kind {
        RecordKind::Accounts => Records::Accounts(normalize_accounts(rows, ctx.geocoder, rng)),
        RecordKind::Prospects => {
            Records::Prospects(normalize_prospects(rows, ctx.accounts, ctx.geocoder, rng))
        }
        RecordKind::Outreach => Records::Outreach(normalize_outreach(rows, ctx.today, rng)),
    };
    let dropped = rows.len() - records.len();
    if dropped > 0 {
        log::info!("{kind}: kept {} of {} rows ({dropped} without a company name)", records.len(), rows.len());
    } else {
        log::debug!("{kind}: kept all {} rows", rows.len());
    }
    records
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

pub fn normalize_accounts<R: Rng + ?Sized>(
    rows: &[RawRow],
    geocoder: &Geocoder,
    rng: &mut R,
) -> Vec<Account> {
    rows.iter()
        .filter_map(|row| {
            let company_name = field(row, &["Company Name"])?.to_string();
            let address = field(row, &["Location Address", "Address"]).unwrap_or("").to_string();
            let city = ACCOUNT_CITY_HINTS
                .iter()
                .find(|hint| address.contains(*hint))
                .map(|hint| hint.to_string())
                .unwrap_or_else(|| geocoder.default_city().to_string());

            Some(Account {
                location_name: field(row, &["Location Name"]).unwrap_or("").to_string(),
                container_size: number_or_zero(row, "Container Size (yd3)"),
                monthly_revenue: number_or_zero(row, "Projected Monthly Revenue ($)"),
                monthly_profit: number_or_zero(row, "Projected Monthly Profit ($)"),
                fill_frequency: number_or_zero(row, "Fill Frequency (per month)"),
                coordinates: Some(geocoder.jittered(&city, rng)),
                company_name,
                address,
                city,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Prospects
// ---------------------------------------------------------------------------

pub fn normalize_prospects<R: Rng + ?Sized>(
    rows: &[RawRow],
    accounts: &[Account],
    geocoder: &Geocoder,
    rng: &mut R,
) -> Vec<Prospect> {
    let account_keys: HashSet<String> = accounts.iter().map(|a| join_key(&a.company_name)).collect();

    rows.iter()
        .filter_map(|row| {
            let company_name = field(row, &["Company Name", "Company"])?;
            // Repeated header lines in concatenated exports.
            if company_name == "Company Name" {
                return None;
            }

            let is_customer = account_keys.contains(&join_key(company_name))
                || field(row, &["Is Deployed"]).is_some_and(truthy);
            let status = if is_customer {
                ProspectStatus::Customer
            } else {
                field(row, &["Status"])
                    .and_then(parse_status)
                    .filter(|s| *s != ProspectStatus::Customer)
                    .unwrap_or(ProspectStatus::New)
            };

            let address = field(row, &["Address", "Street"]).unwrap_or("");
            let city = resolve_prospect_city(row, address, geocoder);
            let map_city: String = city.chars().filter(|c| c.is_ascii_alphabetic()).collect();

            let mut prospect = Prospect::new(new_id(rng), company_name);
            prospect.address = address.to_string();
            prospect.industry = field(row, &["Industry"]).unwrap_or("Unknown").to_string();
            prospect.phone = field(row, &["Phone"]).unwrap_or("").to_string();
            prospect.priority_score = field(row, &["Priority Score"])
                .and_then(parse_number)
                .map(|n| n.trunc().clamp(i32::MIN as f64, i32::MAX as f64) as i32)
                .unwrap_or(DEFAULT_PRIORITY);
            prospect.status = status;
            prospect.is_deployed = is_customer;
            prospect.last_contact_date = owned(field(row, &["Last Outreach Date", "Last Contact Date"]));
            prospect.next_step = owned(field(row, &["Next Step"]));
            prospect.next_step_due = owned(field(row, &["Next Step Due"]));
            prospect.notes = owned(field(row, &["Notes"]));
            prospect.container_potential = Some(
                field(row, &["Container Size (yd3)"])
                    .unwrap_or(DEFAULT_CONTAINER_POTENTIAL)
                    .to_string(),
            );
            prospect.contact_name = owned(field(row, &["Contact Name"]));
            prospect.email = owned(field(row, &["Email"]));
            prospect.coordinates = Some(geocoder.jittered(&map_city, rng));
            prospect.city = city;
            Some(prospect)
        })
        .collect()
}

/// Explicit `City` column, else the first word of the second-to-last
/// comma-separated address segment, else a known town named in the address,
/// else the default city.
fn resolve_prospect_city(row: &RawRow, address: &str, geocoder: &Geocoder) -> String {
    if let Some(city) = field(row, &["City"]) {
        return city.to_string();
    }

    let parts: Vec<&str> = address.split(',').collect();
    if parts.len() >= 2 {
        if let Some(token) = parts[parts.len() - 2].split_whitespace().next() {
            return token.to_string();
        }
    }

    PROSPECT_CITY_HINTS
        .iter()
        .find(|hint| address.contains(*hint))
        .map(|hint| hint.to_string())
        .unwrap_or_else(|| geocoder.default_city().to_string())
}

fn parse_status(label: &str) -> Option<ProspectStatus> {
    ProspectStatus::ALL
        .into_iter()
        .find(|s| s.to_string().eq_ignore_ascii_case(label))
}

// ---------------------------------------------------------------------------
// Outreach
// ---------------------------------------------------------------------------

pub fn normalize_outreach<R: Rng + ?Sized>(
    rows: &[RawRow],
    today: NaiveDate,
    rng: &mut R,
) -> Vec<OutreachLog> {
    rows.iter()
        .filter_map(|row| {
            let company = field(row, &["Company", "Company Name"])?.to_string();

            let outcome = match field(row, &["Outcome"]) {
                Some(label) => Outcome::parse(label).unwrap_or_else(|| {
                    log::warn!("outreach for '{company}': unknown outcome '{label}', using Nurture");
                    Outcome::Nurture
                }),
                None => Outcome::Nurture,
            };
            let won = outcome == Outcome::Won;

            Some(OutreachLog {
                id: new_id(rng),
                date: field(row, &["Visit/Call Date", "Date"])
                    .map(str::to_string)
                    .unwrap_or_else(|| iso(today)),
                kind: field(row, &["Type"])
                    .and_then(OutreachType::parse)
                    .unwrap_or_default(),
                outcome,
                notes: field(row, &["Notes"]).unwrap_or("").to_string(),
                next_step: field(row, &["Next Step"]).unwrap_or("").to_string(),
                next_step_due_date: owned(field(row, &["Next Step Due", "Next Step Due Date"])),
                contact_name: if won { owned(field(row, &["Contact Name"])) } else { None },
                email: if won { owned(field(row, &["Email"])) } else { None },
                company,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

/// First non-blank value among `names`. Exact header match wins over a
/// case-insensitive one; among case-insensitive matches the smallest header
/// wins, so the pick does not depend on map order.
fn field<'r>(row: &'r RawRow, names: &[&str]) -> Option<&'r str> {
    names.iter().find_map(|name| {
        row.get(*name)
            .or_else(|| {
                row.iter()
                    .filter(|(header, _)| header.trim().eq_ignore_ascii_case(name))
                    .min_by(|(a, _), (b, _)| a.cmp(b))
                    .map(|(_, value)| value)
            })
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    })
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_string)
}

fn number_or_zero(row: &RawRow, name: &str) -> f64 {
    field(row, &[name]).and_then(parse_number).unwrap_or(0.0)
}

/// Leading-number parse in the spirit of spreadsheet exports:
/// `"$1,200.50"` → 1200.5, `"10 yd"` → 10, `"n/a"` → None.
pub(crate) fn parse_number(value: &str) -> Option<f64> {
    let cleaned: String = value
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ','))
        .take_while(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+'))
        .collect();
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn truthy(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "true" | "yes" | "y" | "1")
}

pub(crate) fn new_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    uuid::Builder::from_random_bytes(rng.gen()).into_uuid().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::city_coordinates;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, 1).unwrap()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn within_jitter(city: &str, c: crate::model::Coordinates) -> bool {
        let base = city_coordinates(city).unwrap();
        (c.lat - base.lat).abs() <= 0.025 && (c.lng - base.lng).abs() <= 0.025
    }

    #[test]
    fn accounts_parse_numbers_and_infer_city() {
        let rows = vec![
            row(&[
                ("Company Name", "Acme Co"),
                ("Location Address", "12 Main St, Longview, TX"),
                ("Container Size (yd3)", "10"),
                ("Projected Monthly Revenue ($)", "$1,250.50"),
                ("Projected Monthly Profit ($)", "oops"),
            ]),
            row(&[("Company Name", "Plain Co"), ("Location Address", "9 Elm")]),
        ];
        let accounts = normalize_accounts(&rows, &Geocoder::default(), &mut rng());
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].city, "Longview");
        assert_eq!(accounts[0].container_size, 10.0);
        assert_eq!(accounts[0].monthly_revenue, 1250.5);
        assert_eq!(accounts[0].monthly_profit, 0.0);
        assert_eq!(accounts[0].fill_frequency, 0.0);
        assert!(within_jitter("Longview", accounts[0].coordinates.unwrap()));
        assert_eq!(accounts[1].city, "Tyler");
    }

    #[test]
    fn account_city_first_hint_wins() {
        let rows = vec![row(&[
            ("Company Name", "Both"),
            ("Location Address", "Lindale Rd, Kilgore"),
        ])];
        let accounts = normalize_accounts(&rows, &Geocoder::default(), &mut rng());
        assert_eq!(accounts[0].city, "Kilgore");
    }

    #[test]
    fn rows_without_company_are_dropped() {
        let rows = vec![row(&[("Location Name", "Yard")]), row(&[("Company Name", "  ")])];
        assert!(normalize_accounts(&rows, &Geocoder::default(), &mut rng()).is_empty());
        assert!(normalize_prospects(&rows, &[], &Geocoder::default(), &mut rng()).is_empty());
        assert!(normalize_outreach(&rows, today(), &mut rng()).is_empty());
    }

    #[test]
    fn prospect_matching_account_is_customer() {
        let accounts = normalize_accounts(
            &[row(&[("Company Name", "Acme Co")])],
            &Geocoder::default(),
            &mut rng(),
        );
        let rows = vec![
            row(&[("Company Name", "ACME CO"), ("Priority Score", "90")]),
            row(&[("Company", "Other"), ("Is Deployed", "TRUE")]),
            row(&[("Company Name", "Fresh")]),
        ];
        let prospects = normalize_prospects(&rows, &accounts, &Geocoder::default(), &mut rng());
        assert_eq!(prospects.len(), 3);
        assert_eq!(prospects[0].status, ProspectStatus::Customer);
        assert!(prospects[0].is_deployed);
        assert_eq!(prospects[0].priority_score, 90);
        assert_eq!(prospects[1].status, ProspectStatus::Customer);
        assert_eq!(prospects[2].status, ProspectStatus::New);
        assert!(!prospects[2].is_deployed);
    }

    #[test]
    fn prospect_defaults() {
        let rows = vec![row(&[("Company Name", "Fresh"), ("Priority Score", "high")])];
        let p = &normalize_prospects(&rows, &[], &Geocoder::default(), &mut rng())[0];
        assert_eq!(p.priority_score, 50);
        assert_eq!(p.industry, "Unknown");
        assert_eq!(p.city, "Tyler");
        assert_eq!(p.container_potential.as_deref(), Some("30"));
        assert_eq!(p.last_contact_date, None);
        assert!(within_jitter("Tyler", p.coordinates.unwrap()));
    }

    #[test]
    fn prospect_priority_truncates_decimals() {
        let rows = vec![row(&[("Company Name", "X"), ("Priority Score", "85.9")])];
        let p = &normalize_prospects(&rows, &[], &Geocoder::default(), &mut rng())[0];
        assert_eq!(p.priority_score, 85);
    }

    #[test]
    fn prospect_city_resolution_order() {
        let geo = Geocoder::default();
        let rows = vec![
            row(&[("Company Name", "A"), ("City", "Athens"), ("Address", "1 Rd, Kilgore, TX")]),
            row(&[("Company Name", "B"), ("Address", "1 Rd, Kilgore Loop, TX 75662")]),
            row(&[("Company Name", "C"), ("Address", "500 Whitehouse Pkwy")]),
            row(&[("Company Name", "D"), ("Address", "somewhere")]),
            row(&[("Company Name", "E"), ("Address", "1 Rd, , TX")]),
        ];
        let prospects = normalize_prospects(&rows, &[], &geo, &mut rng());
        let cities: Vec<&str> = prospects.iter().map(|p| p.city.as_str()).collect();
        assert_eq!(cities, ["Athens", "Kilgore", "Whitehouse", "Tyler", "Tyler"]);
        assert!(within_jitter("Kilgore", prospects[1].coordinates.unwrap()));
    }

    #[test]
    fn unknown_city_maps_to_default_coordinates() {
        let rows = vec![row(&[("Company Name", "A"), ("City", "Paris")])];
        let p = &normalize_prospects(&rows, &[], &Geocoder::default(), &mut rng())[0];
        assert_eq!(p.city, "Paris");
        assert!(within_jitter("Tyler", p.coordinates.unwrap()));
    }

    #[test]
    fn repeated_header_row_is_dropped() {
        let rows = vec![row(&[("Company Name", "Company Name")])];
        assert!(normalize_prospects(&rows, &[], &Geocoder::default(), &mut rng()).is_empty());
    }

    #[test]
    fn status_column_is_honoured_for_non_customers() {
        let rows = vec![
            row(&[("Company Name", "Q"), ("Status", "qualified")]),
            row(&[("Company Name", "C"), ("Status", "Customer")]),
        ];
        let prospects = normalize_prospects(&rows, &[], &Geocoder::default(), &mut rng());
        assert_eq!(prospects[0].status, ProspectStatus::Qualified);
        assert_eq!(prospects[1].status, ProspectStatus::New);
    }

    #[test]
    fn ids_are_unique() {
        let rows: Vec<RawRow> = (0..50)
            .map(|i| row(&[("Company Name", &format!("Co {i}"))]))
            .collect();
        let prospects = normalize_prospects(&rows, &[], &Geocoder::default(), &mut rng());
        let ids: HashSet<&str> = prospects.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn outreach_defaults() {
        let rows = vec![row(&[("Company", "Acme Co")])];
        let logs = normalize_outreach(&rows, today(), &mut rng());
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].date, "2026-04-01");
        assert_eq!(logs[0].kind, OutreachType::Visit);
        assert_eq!(logs[0].outcome, Outcome::Nurture);
        assert_eq!(logs[0].next_step_due_date, None);
    }

    #[test]
    fn outreach_contact_only_kept_when_won() {
        let rows = vec![
            row(&[
                ("Company", "A"),
                ("Outcome", "won"),
                ("Type", "Call"),
                ("Contact Name", "Pat"),
                ("Email", "pat@a.example"),
            ]),
            row(&[
                ("Company", "B"),
                ("Outcome", "Has Vendor"),
                ("Contact Name", "Sam"),
            ]),
            row(&[("Company", "C"), ("Outcome", "Maybe later")]),
        ];
        let logs = normalize_outreach(&rows, today(), &mut rng());
        assert_eq!(logs[0].outcome, Outcome::Won);
        assert_eq!(logs[0].kind, OutreachType::Call);
        assert_eq!(logs[0].contact_name.as_deref(), Some("Pat"));
        assert_eq!(logs[0].email.as_deref(), Some("pat@a.example"));
        assert_eq!(logs[1].outcome, Outcome::HasVendor);
        assert_eq!(logs[1].contact_name, None);
        assert_eq!(logs[2].outcome, Outcome::Nurture);
    }

    #[test]
    fn header_lookup_falls_back_to_case_insensitive() {
        let rows = vec![row(&[("company name", "Lower"), ("PRIORITY SCORE", "70")])];
        let p = &normalize_prospects(&rows, &[], &Geocoder::default(), &mut rng())[0];
        assert_eq!(p.company_name, "Lower");
        assert_eq!(p.priority_score, 70);
    }

    #[test]
    fn colliding_headers_pick_the_same_value_every_time() {
        for _ in 0..16 {
            let rows = vec![
                row(&[("company name", "Lower"), ("COMPANY NAME ", "Upper")]),
                row(&[("COMPANY NAME ", "Upper"), ("company name", "Lower")]),
            ];
            let prospects = normalize_prospects(&rows, &[], &Geocoder::default(), &mut rng());
            assert_eq!(prospects[0].company_name, "Upper");
            assert_eq!(prospects[1].company_name, "Upper");
        }
    }

    #[test]
    fn dispatch_tags_by_kind() {
        let geo = Geocoder::default();
        let ctx = NormalizeContext { today: today(), accounts: &[], geocoder: &geo };
        let rows = vec![row(&[("Company Name", "A"), ("Company", "A")])];
        let out = normalize(RecordKind::Outreach, &rows, &ctx, &mut rng());
        assert_eq!(out.kind(), RecordKind::Outreach);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn same_seed_same_records() {
        let rows = vec![row(&[("Company Name", "A")])];
        let a = normalize_prospects(&rows, &[], &Geocoder::default(), &mut rng());
        let b = normalize_prospects(&rows, &[], &Geocoder::default(), &mut rng());
        assert_eq!(a, b);
    }

    #[test]
    fn parse_number_variants() {
        assert_eq!(parse_number("10"), Some(10.0));
        assert_eq!(parse_number("$1,200.50"), Some(1200.5));
        assert_eq!(parse_number("10 yd"), Some(10.0));
        assert_eq!(parse_number("-3"), Some(-3.0));
        assert_eq!(parse_number("n/a"), None);
        assert_eq!(parse_number(""), None);
    }
}
