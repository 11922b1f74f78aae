//! Listing membership resolution.
//!
//! Maps a classified content item to the listing paths it belongs to,
//! one resolver per kind. Deterministic and side-effect-free apart from
//! one extra read: a comment's reply target is fetched to classify
//! whose replies feeds it lands in.

use std::collections::HashSet;

use agora_graph::{Scope, Soul};

use crate::error::Result;
use crate::thing::{ThingData, ThingKind, VoteCounts};

/// Topic whose catch-all listing would otherwise duplicate itself.
const CATCH_ALL_TOPIC: &str = "all";

/// Resolve the listing paths a thing belongs to, in emission order with
/// duplicates removed. Empty for items that map to no listing.
pub async fn listing_paths(
    scope: &Scope,
    data: &ThingData,
    counts: &VoteCounts,
) -> Result<Vec<String>> {
    let mut paths = Vec::new();

    match data.kind {
        ThingKind::Submission => submission_paths(data, counts, &mut paths),
        ThingKind::Comment => comment_paths(scope, data, &mut paths).await?,
        ThingKind::ChatMsg => chat_paths(data, &mut paths),
    }

    Ok(dedupe(paths))
}

fn submission_paths(data: &ThingData, counts: &VoteCounts, paths: &mut Vec<String>) {
    if let Some(topic) = &data.topic {
        paths.push(format!("/t/{}", topic));
    }
    if data.topic.as_deref() != Some(CATCH_ALL_TOPIC) {
        paths.push("/t/all".to_string());
    }
    if let Some(domain) = &data.domain {
        paths.push(format!("/domain/{}", domain));
    }
    if let Some(author) = &data.author_id {
        paths.push(format!("/user/{}/submitted", author));
        paths.push(format!("/user/{}/overview", author));
    }
    for tagger in &counts.taggers {
        paths.push(format!("/user/{}/commented", tagger));
    }
}

async fn comment_paths(scope: &Scope, data: &ThingData, paths: &mut Vec<String>) -> Result<()> {
    if let Some(op_id) = &data.op_id {
        paths.push(format!("/things/{}/comments", op_id));
    }
    if let Some(topic) = &data.topic {
        paths.push(format!("/t/comments:{}", topic));
    }
    if data.topic.as_deref() != Some(CATCH_ALL_TOPIC) {
        paths.push("/t/comments:all".to_string());
    }

    if let Some(reply_to_id) = &data.reply_to_id {
        let target = scope.get(&Soul::thing(reply_to_id)).await?;
        let target = target.as_ref().and_then(ThingData::from_node);

        // No resolvable target or anonymous target: no replies entry.
        if let Some(target) = target {
            if let Some(target_author) = &target.author_id {
                paths.push(format!("/user/{}/replies/overview", target_author));
                match target.kind {
                    ThingKind::Submission => {
                        paths.push(format!("/user/{}/replies/submitted", target_author));
                    }
                    ThingKind::Comment => {
                        paths.push(format!("/user/{}/replies/comments", target_author));
                    }
                    ThingKind::ChatMsg => {}
                }
            }
        }
    }

    if let Some(author) = &data.author_id {
        paths.push(format!("/user/{}/comments", author));
        paths.push(format!("/user/{}/overview", author));
        if data.is_command {
            paths.push(format!("/user/{}/commands", author));
        }
    }

    Ok(())
}

fn chat_paths(data: &ThingData, paths: &mut Vec<String>) {
    if let Some(topic) = &data.topic {
        paths.push(format!("/t/chat:{}", topic));
    }
    if data.topic.as_deref() != Some(CATCH_ALL_TOPIC) {
        paths.push("/t/chat:all".to_string());
    }
}

fn dedupe(paths: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    paths
        .into_iter()
        .filter(|path| seen.insert(path.clone()))
        .collect()
}
