use crate::models::{Priority, Severity, UserTier};

/// Severity rank used for ordering bugs. Missing severity ranks as P2;
/// the default is never written back to the record.
pub fn severity_weight(severity: Option<Severity>) -> u32 {
    match severity {
        Some(Severity::P0) => 4,
        Some(Severity::P1) => 3,
        Some(Severity::P2) => 2,
        Some(Severity::P3) => 1,
        None => 2,
    }
}

/// Priority rank used for scoring feedback. Missing priority ranks as Medium.
pub fn priority_weight(priority: Option<Priority>) -> u32 {
    match priority {
        Some(Priority::High) => 4,
        Some(Priority::MediumHigh) => 3,
        Some(Priority::Medium) => 2,
        Some(Priority::Low) => 1,
        None => 2,
    }
}

/// Business weight of the submitting account's tier.
pub fn tier_weight(tier: UserTier) -> f32 {
    match tier {
        UserTier::Enterprise => 1.0,
        UserTier::Business => 0.7,
        UserTier::Free => 0.1,
        UserTier::Unknown => 0.5,
    }
}
