//! Job-level description of one content item.

use agora_graph::{Scope, Soul};

use crate::config::IndexerConfig;
use crate::error::Result;
use crate::membership::listing_paths;
use crate::sorts::SortKind;
use crate::thing::{ThingData, ThingSnapshot, VoteCounts};

/// Everything the writer needs for one item: the listings it belongs to
/// and one score per configured sort.
#[derive(Debug, Clone)]
pub struct ListingDescription {
    pub id: String,
    pub includes: Vec<String>,
    pub sorts: Vec<(SortKind, f64)>,
}

/// Resolve a thing id into its listing description.
///
/// `None` when the thing has no stored data or belongs to no listing: a
/// normal empty result that produces no writes. Data and vote counts are
/// fetched concurrently through the job scope.
pub async fn describe_thing(
    scope: &Scope,
    config: &IndexerConfig,
    thing_id: &str,
) -> Result<Option<ListingDescription>> {
    if thing_id.is_empty() {
        return Ok(None);
    }

    let thing_soul = Soul::thing(thing_id);
    let vote_counts_soul = Soul::vote_counts(thing_id, &config.tabulator);
    let (data, counts) = futures::join!(
        scope.get(&thing_soul),
        scope.get(&vote_counts_soul),
    );

    let Some(data) = data?.as_ref().and_then(ThingData::from_node) else {
        return Ok(None);
    };
    let counts = VoteCounts::from_node(counts?.as_ref());

    let includes = listing_paths(scope, &data, &counts).await?;
    if includes.is_empty() {
        return Ok(None);
    }

    let snapshot = ThingSnapshot { data, counts };
    let sorts = config
        .sorts
        .iter()
        .map(|sort| (*sort, sort.score(&snapshot)))
        .collect();

    Ok(Some(ListingDescription {
        id: thing_id.to_string(),
        includes,
        sorts,
    }))
}
