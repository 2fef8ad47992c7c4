use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Join key
// ---------------------------------------------------------------------------

/// Normalized company join key. Matching is case-insensitive equality,
/// nothing fuzzier.
pub fn join_key(company: &str) -> String {
    company.to_lowercase()
}

/// True when two company names refer to the same company.
pub fn same_company(a: &str, b: &str) -> bool {
    a == b || join_key(a) == join_key(b)
}

// ---------------------------------------------------------------------------
// Geography
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Great-circle distance in kilometres.
    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        const EARTH_RADIUS_KM: f64 = 6371.0;
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lng = (other.lng - self.lng).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos() * other.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
    }
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// A confirmed, deployed customer location. Immutable after import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub company_name: String,
    pub location_name: String,
    pub address: String,
    pub city: String,
    pub container_size: f64,
    pub monthly_revenue: f64,
    pub monthly_profit: f64,
    pub fill_frequency: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

// ---------------------------------------------------------------------------
// Prospects
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum ProspectStatus {
    #[default]
    New,
    Contacted,
    Qualified,
    Customer,
    Lost,
}

impl ProspectStatus {
    pub const ALL: [ProspectStatus; 5] = [
        Self::New,
        Self::Contacted,
        Self::Qualified,
        Self::Customer,
        Self::Lost,
    ];

    /// Customers and lost prospects are out of the sales pipeline.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Customer | Self::Lost)
    }
}

impl fmt::Display for ProspectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New => write!(f, "New"),
            Self::Contacted => write!(f, "Contacted"),
            Self::Qualified => write!(f, "Qualified"),
            Self::Customer => write!(f, "Customer"),
            Self::Lost => write!(f, "Lost"),
        }
    }
}

/// One company the sales team is tracking.
///
/// `id`, `company_name`, `industry` and `priority_score` are fixed at import.
/// Status, contact and date fields are rewritten by reconciliation.
/// Dates are kept as the imported text (ISO `YYYY-MM-DD` in practice) so a
/// malformed value degrades at scoring time instead of failing the import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prospect {
    pub id: String,
    pub company_name: String,
    pub address: String,
    pub city: String,
    pub industry: String,
    pub phone: String,
    pub priority_score: i32,
    pub status: ProspectStatus,
    pub is_deployed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_contact_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_step: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_step_due: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_potential: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Prospect {
    /// A bare prospect with import defaults. Used by the normalizer and tests.
    pub fn new(id: impl Into<String>, company_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            company_name: company_name.into(),
            address: String::new(),
            city: crate::geo::DEFAULT_CITY.to_string(),
            industry: "Unknown".to_string(),
            phone: String::new(),
            priority_score: 50,
            status: ProspectStatus::New,
            is_deployed: false,
            last_contact_date: None,
            next_step: None,
            next_step_due: None,
            notes: None,
            container_potential: None,
            coordinates: None,
            contact_name: None,
            email: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Outreach
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OutreachType {
    #[default]
    Visit,
    Call,
    Email,
}

impl OutreachType {
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "visit" => Some(Self::Visit),
            "call" => Some(Self::Call),
            "email" => Some(Self::Email),
            _ => None,
        }
    }
}

impl fmt::Display for OutreachType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Visit => write!(f, "Visit"),
            Self::Call => write!(f, "Call"),
            Self::Email => write!(f, "Email"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Outcome {
    Interested,
    #[serde(rename = "Has Vendor")]
    HasVendor,
    #[serde(rename = "No Scrap")]
    NoScrap,
    #[serde(rename = "Not Interested")]
    NotInterested,
    Won,
    #[default]
    Nurture,
    #[serde(rename = "Corporate/Manager Approval")]
    ManagerApproval,
}

impl Outcome {
    pub const ALL: [Outcome; 7] = [
        Self::Interested,
        Self::HasVendor,
        Self::NoScrap,
        Self::NotInterested,
        Self::Won,
        Self::Nurture,
        Self::ManagerApproval,
    ];

    /// Case-insensitive match against the display labels.
    pub fn parse(label: &str) -> Option<Self> {
        let wanted = label.trim();
        Self::ALL
            .into_iter()
            .find(|o| o.to_string().eq_ignore_ascii_case(wanted))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interested => write!(f, "Interested"),
            Self::HasVendor => write!(f, "Has Vendor"),
            Self::NoScrap => write!(f, "No Scrap"),
            Self::NotInterested => write!(f, "Not Interested"),
            Self::Won => write!(f, "Won"),
            Self::Nurture => write!(f, "Nurture"),
            Self::ManagerApproval => write!(f, "Corporate/Manager Approval"),
        }
    }
}

/// One recorded interaction. Append-only; the engine never edits or drops logs.
///
/// Field order is the export column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutreachLog {
    pub id: String,
    pub company: String,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: OutreachType,
    pub outcome: Outcome,
    pub notes: String,
    pub next_step: String,
    pub next_step_due_date: Option<String>,
    /// Only captured when the outcome is `Won`.
    pub contact_name: Option<String>,
    /// Only captured when the outcome is `Won`.
    pub email: Option<String>,
}

// ---------------------------------------------------------------------------
// Plan output
// ---------------------------------------------------------------------------

/// A prospect selected for the visit plan, with its derived score.
/// Never written back onto the prospect.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanItem {
    #[serde(flatten)]
    pub prospect: Prospect,
    pub plan_score: i32,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_from_anchor: Option<f64>,
}
