//! Change filter: which content ids a notification requires reindexing.

use agora_graph::{ChangeMessage, ThingRoute};

/// Extract the distinct content ids referenced by one change
/// notification, in first-seen order.
///
/// Vote-count souls owned by a different tabulator are skipped;
/// reindexing on behalf of a foreign tabulator would stomp its listings.
/// Souls matching no known pattern are ignored silently.
pub fn ids_to_index(msg: &ChangeMessage, tabulator: &str) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    let Some(put) = &msg.put else {
        return ids;
    };

    for soul in put.keys() {
        let Some(route) = ThingRoute::match_soul(soul) else {
            continue;
        };
        if let ThingRoute::VoteCounts { tabulator: owner, .. } = &route {
            if owner != tabulator {
                continue;
            }
        }

        let thing_id = route.thing_id();
        if !thing_id.is_empty() && !ids.iter().any(|id| id == thing_id) {
            ids.push(thing_id.to_string());
        }
    }

    ids
}
