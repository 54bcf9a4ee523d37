pub mod error;
pub mod export;
pub mod record;
pub mod store;

pub use error::ReportError;
pub use record::{Policy, PolicyDetail, RuleInfo, RuleRecord, POLICY_COLUMNS, REPORT_COLUMNS, RULE_COLUMNS};
pub use store::ReportStore;
