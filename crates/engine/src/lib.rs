//! `fieldplan-engine` - prospect reconciliation and visit planning.
//!
//! Pure engine crate: receives already-parsed rows or typed records, returns
//! new collections. No file, network or database access.

pub mod aggregate;
pub mod config;
pub mod dates;
pub mod error;
pub mod geo;
pub mod model;
pub mod normalize;
pub mod plan;
pub mod reconcile;
pub mod score;
pub mod session;

pub use aggregate::{dashboard_stats, DashboardStats, ProspectFilter};
pub use config::EngineConfig;
pub use error::EngineError;
pub use model::{Account, Outcome, OutreachLog, OutreachType, PlanItem, Prospect, ProspectStatus};
pub use normalize::{normalize, RawRow, RecordKind, Records};
pub use plan::plan;
pub use reconcile::reconcile;
pub use score::{score, ScoreCard};
pub use session::{reconcile_if_needed, Interaction, Session};
