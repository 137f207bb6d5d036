//! Intake bridge: assistant and idea results into intent merges.

use serde_json::{Map, Value};
use tracing::info;

use crate::ai::Idea;
use crate::intent::{GoalsPatch, IntentPatch, IntentStore, ScopePatch};

#[cfg(test)]
#[path = "bridge_test.rs"]
mod bridge_test;

/// Follow-up the view must perform after a bridge call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BridgeSignal {
    /// Close the idea surface and open the project-intake form.
    OpenProjectForm,
}

/// Merge a chat reply's `projectData`. The chat backend already emits
/// intent-shaped partials. Returns whether a merge was issued.
pub fn receive_from_chat(store: &mut IntentStore, project_data: &Map<String, Value>) -> bool {
    if project_data.is_empty() {
        return false;
    }
    let changed = store.merge_intent(IntentPatch::from_map(project_data));
    info!(keys = project_data.len(), changed, "bridge: chat project data merged");
    true
}

/// Platform recorded for ideas picked in the generator, so the form's scope
/// step shows where the project came from.
pub const IDEA_PLATFORM: &str = "Suggested by Idea Generator";

/// The partial record an idea contributes: its title and tags become the
/// feature list, its pitch the primary goal.
#[must_use]
pub fn idea_patch(idea: &Idea) -> IntentPatch {
    let features: Vec<String> = std::iter::once(idea.title.clone())
        .chain(idea.tags.iter().cloned())
        .filter(|s| !s.trim().is_empty())
        .collect();
    let pitch = Some(idea.pitch.clone()).filter(|p| !p.trim().is_empty());
    if features.is_empty() && pitch.is_none() {
        return IntentPatch::default();
    }
    IntentPatch {
        scope: Some(ScopePatch {
            features: (!features.is_empty()).then_some(features),
            platforms: Some(vec![IDEA_PLATFORM.to_owned()]),
        }),
        goals: pitch.map(|primary| GoalsPatch { primary: Some(primary), secondary: None }),
        ..IntentPatch::default()
    }
}

/// Merge a selected idea and ask the view to switch to the intake form.
/// An idea with nothing to contribute is a no-op.
pub fn receive_from_idea(store: &mut IntentStore, idea: &Idea) -> Option<BridgeSignal> {
    let patch = idea_patch(idea);
    if patch.is_empty() {
        return None;
    }
    store.merge_intent(patch);
    info!(title = %idea.title, "bridge: idea selected");
    Some(BridgeSignal::OpenProjectForm)
}
