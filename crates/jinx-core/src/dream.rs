//! Dream cycle — scan the conversation log for recurring themes while resting.

use serde_json::json;
use tracing::info;

use crate::error::Result;
use crate::store::RelationshipStore;

/// (keyword, pattern name, note)
const THEMES: &[(&str, &str, &str)] = &[
    (
        "breath",
        "breath_importance",
        "Breath appears often - central to relationships",
    ),
    (
        "sacred",
        "sacred_recognition",
        "Sacred question matters across contexts",
    ),
];

/// Learn a pattern for each theme that shows up anywhere in the log, once
/// the log holds more than `min_conversations` entries. Returns the names
/// noted this pass.
pub fn consolidate(store: &mut RelationshipStore, min_conversations: usize) -> Result<Vec<String>> {
    if store.conversations().len() <= min_conversations {
        return Ok(Vec::new());
    }

    let all_content = store
        .conversations()
        .iter()
        .map(|c| c.content.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");

    let mut noted = Vec::new();
    for &(keyword, name, note) in THEMES {
        if all_content.contains(keyword) {
            store.learn_pattern(name, json!({ "note": note }))?;
            noted.push(name.to_string());
        }
    }

    info!("Dream pass over {} conversations noted {:?}", store.conversations().len(), noted);
    Ok(noted)
}
