use std::cmp::Reverse;
use std::collections::HashMap;
use tracing::debug;

use crate::models::{
    ClassifiedItem, Disposition, ItemKind, Priority, Severity, ThemeGroup, TrafficLight,
};
use crate::score::{aggregate_priority, aggregate_severity, impact_score};
use crate::weights::severity_weight;

fn light_order(light: TrafficLight) -> u8 {
    match light {
        TrafficLight::Red => 0,
        TrafficLight::Yellow => 1,
        TrafficLight::Green => 2,
    }
}

/// Traffic light for a theme given its two aggregates.
pub fn traffic_light(severity: Option<Severity>, priority: Option<Priority>) -> TrafficLight {
    if severity == Some(Severity::P0) || priority == Some(Priority::High) {
        TrafficLight::Red
    } else if matches!(severity, Some(Severity::P1) | Some(Severity::P2))
        || matches!(priority, Some(Priority::MediumHigh) | Some(Priority::Medium))
    {
        TrafficLight::Yellow
    } else {
        TrafficLight::Green
    }
}

/// Group classified items by theme, score each group, and rank the groups.
///
/// Theme keys are compared by exact string equality; two spellings of the
/// same concept form two groups. Items without an analysis are excluded.
/// Pure projection over the input snapshot: calling it twice on the same
/// items yields identical output, including order.
pub fn aggregate(items: &[ClassifiedItem]) -> Vec<ThemeGroup> {
    debug!("Aggregation started - items={}", items.len());

    // Group in first-seen order; the index map points into `buckets`.
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut buckets: Vec<(String, Vec<ClassifiedItem>, Vec<ClassifiedItem>)> = Vec::new();
    let mut unclassified = 0usize;

    for item in items {
        let Some(analysis) = item.analysis.as_ref() else {
            unclassified += 1;
            continue;
        };
        let slot = match index.get(&analysis.theme) {
            Some(&i) => i,
            None => {
                index.insert(analysis.theme.clone(), buckets.len());
                buckets.push((analysis.theme.clone(), Vec::new(), Vec::new()));
                buckets.len() - 1
            }
        };
        match analysis.disposition {
            Disposition::Bug { .. } => buckets[slot].1.push(item.clone()),
            Disposition::Feedback { .. } => buckets[slot].2.push(item.clone()),
        }
    }

    if unclassified > 0 {
        debug!("Aggregation skipped unclassified items - count={}", unclassified);
    }

    let mut groups: Vec<ThemeGroup> = buckets
        .into_iter()
        .map(|(theme, mut bugs, mut feedback)| {
            // Stable sorts: ties keep original submission order.
            bugs.sort_by_key(|item| Reverse(severity_weight(item.severity())));
            let mut scored: Vec<(f32, ClassifiedItem)> = feedback
                .drain(..)
                .map(|item| (impact_score(&item), item))
                .collect();
            scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
            let feedback: Vec<ClassifiedItem> = scored.into_iter().map(|(_, item)| item).collect();

            let aggregated_severity = aggregate_severity(&bugs);
            let aggregated_priority = aggregate_priority(&feedback);
            let total_count = bugs.len() + feedback.len();

            ThemeGroup {
                traffic_light: traffic_light(aggregated_severity, aggregated_priority),
                theme,
                bugs,
                feedback,
                aggregated_severity,
                aggregated_priority,
                total_count,
            }
        })
        .collect();

    // Red before yellow before green, busiest themes first within a color;
    // remaining ties keep group-discovery order.
    groups.sort_by_key(|g| (light_order(g.traffic_light), Reverse(g.total_count)));

    if !groups.is_empty() {
        let reds = groups
            .iter()
            .filter(|g| g.traffic_light == TrafficLight::Red)
            .count();
        debug!(
            "Aggregation completed - themes={}, red={}, largest={}",
            groups.len(),
            reds,
            groups.iter().map(|g| g.total_count).max().unwrap_or(0)
        );
    }

    groups
}

/// Subsequence of items matching the optional theme and kind filters.
/// Theme matching is exact; unclassified items never match either filter.
pub fn filter<'a>(
    items: &'a [ClassifiedItem],
    theme: Option<&str>,
    kind: Option<ItemKind>,
) -> Vec<&'a ClassifiedItem> {
    items
        .iter()
        .filter(|item| match theme {
            Some(t) => item.theme() == Some(t),
            None => true,
        })
        .filter(|item| match kind {
            Some(k) => item.kind() == Some(k),
            None => true,
        })
        .collect()
}
