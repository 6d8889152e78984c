use anyhow::{Context, Result};
use tracing::{debug, info, warn};
use xxhash_rust::xxh3::xxh3_64;

use crate::classify::Classifier;
use crate::export::write_all_exports;
use crate::models::{ClassifiedItem, ItemKind, RawFeedback, Status};
use crate::render::{render_items_text, render_report};
use crate::store::{FeedbackStore, SkippedRecord};
use crate::themes::{aggregate, filter};

fn make_item_id(raw: &RawFeedback) -> String {
    let seed = format!("{}|{}|{}", raw.author, raw.title, raw.created_at.timestamp());
    format!("{:016x}", xxh3_64(seed.as_bytes()))
}

fn warn_skipped(store: &FeedbackStore, skipped: &[SkippedRecord]) {
    for rec in skipped {
        warn!(
            "Skipped malformed record - file={}, line={}, error={}",
            store.path().display(),
            rec.line,
            rec.error
        );
    }
}

/// Classify a batch of raw feedback and persist the results.
pub async fn run_ingest(
    store: &FeedbackStore,
    classifier: &Classifier,
    raws: Vec<RawFeedback>,
) -> Result<()> {
    let pipeline_start = std::time::Instant::now();
    if raws.is_empty() {
        info!("Nothing to ingest - no raw feedback supplied");
        return Ok(());
    }
    info!("Ingest started - items={}", raws.len());

    // 1) classify (oracle with fallback, or offline fallback only)
    let classify_start = std::time::Instant::now();
    let analyses = classifier.classify_all(&raws).await;
    info!(
        "Classification completed - duration={:.2}s, items={}",
        classify_start.elapsed().as_secs_f32(),
        analyses.len()
    );

    // 2) build records and persist; a storage failure here is fatal to the
    //    ingest, not recoverable like a classification failure
    let total = raws.len();
    for (i, (raw, analysis)) in raws.into_iter().zip(analyses).enumerate() {
        let item = ClassifiedItem {
            id: make_item_id(&raw),
            title: raw.title,
            body: raw.body,
            author: raw.author,
            created_at: raw.created_at,
            status: Status::New,
            analysis: Some(analysis),
        };
        store
            .save(&item)
            .with_context(|| format!("persisting item {}", item.id))?;

        let rating = match (item.severity(), item.priority()) {
            (Some(sev), _) => format!("severity={}", sev.as_str()),
            (_, Some(prio)) => format!("priority={}", prio.as_str()),
            _ => String::new(),
        };
        info!(
            "[{}/{}] Classified \"{}\" - theme={}, {}",
            i + 1,
            total,
            item.title,
            item.theme().unwrap_or("general"),
            rating
        );
    }

    // 3) summarize the store after the write
    let (items, skipped) = store.load_all().context("reloading store after ingest")?;
    warn_skipped(store, &skipped);
    let groups = aggregate(&items);
    info!(
        "Ingest completed - duration={:.2}s, store_items={}, themes={}",
        pipeline_start.elapsed().as_secs_f32(),
        items.len(),
        groups.len()
    );
    Ok(())
}

/// Aggregate the stored items and produce the report plus dashboard bundle.
pub fn run_report(
    store: &FeedbackStore,
    output_dir: &std::path::Path,
    theme: Option<&str>,
    kind: Option<ItemKind>,
) -> Result<()> {
    let pipeline_start = std::time::Instant::now();

    // 1) load
    let load_start = std::time::Instant::now();
    let (items, skipped) = store.load_all().context("loading feedback store")?;
    warn_skipped(store, &skipped);
    info!(
        "Store loaded - duration={:.2}s, items={}, skipped={}",
        load_start.elapsed().as_secs_f32(),
        items.len(),
        skipped.len()
    );

    // 2) optional filter narrows both the report and the export
    let selected: Vec<ClassifiedItem> = if theme.is_some() || kind.is_some() {
        let matched = filter(&items, theme, kind);
        debug!(
            "Filter applied - theme={:?}, kind={:?}, matched={}/{}",
            theme,
            kind,
            matched.len(),
            items.len()
        );
        matched.into_iter().cloned().collect()
    } else {
        items
    };

    // 3) aggregate + render
    let groups = aggregate(&selected);
    print!("{}", render_report(&groups));

    // 4) export bundle for the dashboard
    write_all_exports(output_dir, &selected, &groups)?;
    let refs: Vec<&ClassifiedItem> = selected.iter().collect();
    std::fs::write(output_dir.join("feedbacks.txt"), render_items_text(&refs))
        .with_context(|| format!("write {:?}", output_dir.join("feedbacks.txt")))?;
    debug!("Wrote dashboard bundle - directory={}", output_dir.display());

    info!(
        "Report completed - duration={:.2}s, items={}, themes={}",
        pipeline_start.elapsed().as_secs_f32(),
        selected.len(),
        groups.len()
    );
    Ok(())
}
