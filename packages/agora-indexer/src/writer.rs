//! The indexing job: diff-based merge writes for one content id.

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use tracing::{debug, error, info};

use agora_graph::{edge_ref, GraphStore, GraphUpdate, NodeFragment, Scope, Soul};

use crate::config::IndexerConfig;
use crate::delta::ListingDelta;
use crate::describe::{describe_thing, ListingDescription};
use crate::error::Result;

/// One `(listing path, sort)` combination: the flattened path carries
/// the sort name as its final segment.
struct SortedPath {
    path: String,
    score: f64,
}

/// Run one indexing job to completion.
///
/// Failures are terminal for this job only: logged and swallowed so
/// the queue keeps draining. The job scope is released on every exit
/// path, and a timing diagnostic is emitted regardless of outcome.
pub async fn index_thing(store: &Arc<dyn GraphStore>, config: &IndexerConfig, thing_id: &str) {
    let started = Instant::now();
    let scope = Scope::new(store.clone(), config.read_timeout);

    if let Err(e) = run_job(&scope, store, config, thing_id).await {
        error!("indexing {} failed: {}", thing_id, e);
    }

    scope.release();
    info!("indexed {} in {:.3}s", thing_id, started.elapsed().as_secs_f64());
}

async fn run_job(
    scope: &Scope,
    store: &Arc<dyn GraphStore>,
    config: &IndexerConfig,
    thing_id: &str,
) -> Result<()> {
    let Some(description) = describe_thing(scope, config, thing_id).await? else {
        // Unknown item or no memberships: nothing to write, not an error.
        return Ok(());
    };

    let combinations = flatten(&description);
    let souls: Vec<Soul> = combinations
        .iter()
        .map(|combo| Soul::listing(&config.tabulator, &combo.path))
        .collect();
    if souls.is_empty() {
        // Unreachable given the membership guard above.
        debug!("no listing souls for {}", thing_id);
        return Ok(());
    }

    // Fetch current state of every target listing in parallel; the job
    // scope deduplicates and caches the reads.
    let current: Vec<_> = join_all(souls.iter().map(|soul| scope.get(soul))).await;

    let mut update = GraphUpdate::new();
    let mut meta = NodeFragment::new();

    for ((combo, soul), existing) in combinations.iter().zip(&souls).zip(current) {
        let existing = existing?;
        let entries = [(description.id.clone(), combo.score)];

        let Some(delta) = ListingDelta::compute(existing.as_ref(), &entries, &[]) else {
            continue;
        };

        meta.insert(combo.path.clone(), edge_ref(soul));
        update.insert(soul.clone(), delta.to_fragment());
    }

    if update.is_empty() {
        return Ok(());
    }

    // One combined write: the listing fragments plus the thing's own
    // listings-meta node back-referencing every soul written.
    update.insert(Soul::listings_meta(thing_id, &config.tabulator), meta);
    store.put(update).await?;

    Ok(())
}

/// Expand a description into the cross product of listings × sorts.
fn flatten(description: &ListingDescription) -> Vec<SortedPath> {
    let mut combinations = Vec::new();
    for listing in &description.includes {
        for (sort, score) in &description.sorts {
            combinations.push(SortedPath {
                path: format!("{}/{}", listing, sort),
                score: *score,
            });
        }
    }
    combinations
}
