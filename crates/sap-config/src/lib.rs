pub mod cdisc;
pub mod checks;
pub mod logging;
pub mod report;
pub mod sap;
pub mod validate;

pub use cdisc::{CdiscConfig, CoreRuleConfig, TargetConfig};
pub use checks::ChecksConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use report::{ReportConfig, ReportFormat};
pub use sap::SapConfig;
