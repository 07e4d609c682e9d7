pub mod telemetry;

pub use evently_domain as domain;
pub use evently_infra as infra;
