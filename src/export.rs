//! Dashboard export: writes the JSON files the themes dashboard reads.
//! Shapes mirror what the charts consume (name/count/color buckets in
//! display order); the themes file carries the full sorted sequences.

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use std::fs;
use std::path::Path;

use crate::models::{ClassifiedItem, ItemKind, Priority, Severity, ThemeGroup};
use crate::render::capitalize_words;

#[derive(Debug, Serialize)]
struct DistributionBucket {
    name: &'static str,
    count: usize,
    color: &'static str,
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::P0 => "P0 (Critical)",
        Severity::P1 => "P1 (Major)",
        Severity::P2 => "P2 (Minor)",
        Severity::P3 => "P3 (Cosmetic)",
    }
}

fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::P0 => "#ef4444",
        Severity::P1 => "#f97316",
        Severity::P2 => "#eab308",
        Severity::P3 => "#3b82f6",
    }
}

fn priority_label(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "High",
        Priority::MediumHigh => "Medium High",
        Priority::Medium => "Medium",
        Priority::Low => "Low",
    }
}

fn priority_color(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "#ef4444",
        Priority::MediumHigh => "#f97316",
        Priority::Medium => "#eab308",
        Priority::Low => "#3b82f6",
    }
}

fn build_severity_distribution(items: &[ClassifiedItem]) -> Vec<DistributionBucket> {
    Severity::ALL
        .into_iter()
        .map(|sev| DistributionBucket {
            name: severity_label(sev),
            count: items.iter().filter(|i| i.severity() == Some(sev)).count(),
            color: severity_color(sev),
        })
        .filter(|b| b.count > 0)
        .collect()
}

fn build_priority_distribution(items: &[ClassifiedItem]) -> Vec<DistributionBucket> {
    Priority::ALL
        .into_iter()
        .map(|prio| DistributionBucket {
            name: priority_label(prio),
            count: items.iter().filter(|i| i.priority() == Some(prio)).count(),
            color: priority_color(prio),
        })
        .filter(|b| b.count > 0)
        .collect()
}

#[derive(Debug, Serialize)]
struct ThemeEntry<'a> {
    display_name: String,
    #[serde(flatten)]
    group: &'a ThemeGroup,
}

fn write_json<T: Serialize>(path: std::path::PathBuf, value: &T) -> Result<()> {
    fs::write(&path, serde_json::to_vec_pretty(value)?)
        .with_context(|| format!("write {:?}", path))
}

/// Write the full dashboard bundle into `out_dir`.
pub fn write_all_exports(
    out_dir: &Path,
    items: &[ClassifiedItem],
    groups: &[ThemeGroup],
) -> Result<()> {
    fs::create_dir_all(out_dir).with_context(|| format!("create {:?}", out_dir))?;

    let themes: Vec<ThemeEntry> = groups
        .iter()
        .map(|group| ThemeEntry {
            display_name: capitalize_words(&group.theme),
            group,
        })
        .collect();
    write_json(out_dir.join("themes.json"), &themes)?;

    write_json(
        out_dir.join("severity_distribution.json"),
        &build_severity_distribution(items),
    )?;
    write_json(
        out_dir.join("priority_distribution.json"),
        &build_priority_distribution(items),
    )?;

    let bugs = items.iter().filter(|i| i.kind() == Some(ItemKind::Bug)).count();
    let feedback = items
        .iter()
        .filter(|i| i.kind() == Some(ItemKind::Feedback))
        .count();
    let idx = json!({
        "generated_at": Utc::now().to_rfc3339(),
        "version": 1,
        "counts": {
            "items": items.len(),
            "themes": groups.len(),
            "bugs": bugs,
            "feedback": feedback,
        },
        "files": [
            "themes.json",
            "severity_distribution.json",
            "priority_distribution.json"
        ]
    });
    write_json(out_dir.join("index.json"), &idx)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Analysis, Disposition, Sentiment, Status, UserTier};
    use crate::themes::aggregate;
    use chrono::Utc;

    fn item(id: &str, theme: &str, disposition: Disposition) -> ClassifiedItem {
        ClassifiedItem {
            id: id.into(),
            title: format!("item {id}"),
            body: String::new(),
            author: "user@example.com".into(),
            created_at: Utc::now(),
            status: Status::New,
            analysis: Some(Analysis {
                disposition,
                theme: theme.into(),
                user_tier: UserTier::Unknown,
                sentiment: Sentiment::Neutral,
                key_points: vec![],
                suggested_tags: vec![],
                summary: String::new(),
            }),
        }
    }

    #[test]
    fn distributions_count_in_display_order_and_skip_empty() {
        let items = vec![
            item("a", "api", Disposition::Bug { severity: Severity::P2 }),
            item("b", "api", Disposition::Bug { severity: Severity::P0 }),
            item("c", "api", Disposition::Bug { severity: Severity::P2 }),
            item(
                "d",
                "ui",
                Disposition::Feedback {
                    priority: Priority::Low,
                },
            ),
        ];

        let sev = build_severity_distribution(&items);
        assert_eq!(sev.len(), 2);
        assert_eq!(sev[0].name, "P0 (Critical)");
        assert_eq!(sev[0].count, 1);
        assert_eq!(sev[1].name, "P2 (Minor)");
        assert_eq!(sev[1].count, 2);

        let prio = build_priority_distribution(&items);
        assert_eq!(prio.len(), 1);
        assert_eq!(prio[0].name, "Low");
    }

    #[test]
    fn bundle_lands_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let items = vec![
            item("a", "api", Disposition::Bug { severity: Severity::P0 }),
            item(
                "b",
                "ui",
                Disposition::Feedback {
                    priority: Priority::High,
                },
            ),
        ];
        let groups = aggregate(&items);
        write_all_exports(dir.path(), &items, &groups).unwrap();

        for file in [
            "themes.json",
            "severity_distribution.json",
            "priority_distribution.json",
            "index.json",
        ] {
            assert!(dir.path().join(file).exists(), "{file} missing");
        }

        let themes: serde_json::Value =
            serde_json::from_slice(&fs::read(dir.path().join("themes.json")).unwrap()).unwrap();
        assert_eq!(themes[0]["display_name"], "API");
        assert_eq!(themes[0]["traffic_light"], "red");

        let idx: serde_json::Value =
            serde_json::from_slice(&fs::read(dir.path().join("index.json")).unwrap()).unwrap();
        assert_eq!(idx["counts"]["items"], 2);
        assert_eq!(idx["counts"]["bugs"], 1);
    }
}
