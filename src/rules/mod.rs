pub mod consultation_rules;
pub mod usage;

pub use consultation_rules::{ConsultationPhase, ConsultationPolicy};
pub use usage::{BookingBlock, Remaining, UsageSummary, UsageThresholds};
