//! Pure scoring over classified items: per-item impact for ranking feedback
//! within a theme, and the two per-theme aggregates.

use crate::models::{ClassifiedItem, Disposition, Priority, Sentiment, Severity, Status, UserTier};
use crate::weights::{priority_weight, tier_weight};

/// Impact score for ranking feedback items within a theme. Bug-type and
/// unclassified items score 0.0; bugs rank by severity instead.
pub fn impact_score(item: &ClassifiedItem) -> f32 {
    let Some(analysis) = item.analysis.as_ref() else {
        return 0.0;
    };
    let Disposition::Feedback { priority } = analysis.disposition else {
        return 0.0;
    };

    let mut score = tier_weight(analysis.user_tier) * 10.0;
    score += priority_weight(Some(priority)) as f32 * 5.0;
    score += match analysis.sentiment {
        Sentiment::Negative => 3.0,
        Sentiment::Positive => 1.0,
        Sentiment::Neutral => 0.0,
    };
    if item.status == Status::New {
        score += 2.0;
    }
    score
}

/// Tier-weighted average priority over a theme's feedback items.
///
/// Each item contributes tier_weight * priority_weight to the sum and
/// tier_weight to the divisor, so a single Enterprise report dominates the
/// apparent priority even amid many Free-tier reports. That is the intended
/// business rule, not an accident of the formula.
pub fn aggregate_priority(feedback: &[ClassifiedItem]) -> Option<Priority> {
    if feedback.is_empty() {
        return None;
    }

    let mut weighted_sum = 0.0f32;
    let mut total_tier = 0.0f32;
    for item in feedback {
        let (tier, priority) = match item.analysis.as_ref() {
            Some(a) => (a.user_tier, item.priority()),
            None => (UserTier::Unknown, None),
        };
        let tw = tier_weight(tier);
        weighted_sum += tw * priority_weight(priority) as f32;
        total_tier += tw;
    }

    let avg = if total_tier > 0.0 {
        weighted_sum / total_tier
    } else {
        0.0
    };

    Some(if avg >= 3.5 {
        Priority::High
    } else if avg >= 2.5 {
        Priority::MediumHigh
    } else if avg >= 1.5 {
        Priority::Medium
    } else {
        Priority::Low
    })
}

/// Worst severity present among a theme's bugs, checked in the fixed
/// P0 > P1 > P2 > P3 precedence order.
pub fn aggregate_severity(bugs: &[ClassifiedItem]) -> Option<Severity> {
    Severity::ALL
        .into_iter()
        .find(|&candidate| bugs.iter().any(|item| item.severity() == Some(candidate)))
}
