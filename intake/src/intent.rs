//! Intent record: everything known about the visitor's project.
//!
//! DESIGN
//! ======
//! The record only grows. Each group has an explicit `merge` that
//! destructures its patch exhaustively, so a new field is a compile error
//! until its merge rule is written. Blank or absent values never erase a
//! captured value; unknown top-level keys from the backend are kept in
//! `extra` and replaced wholesale.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

#[cfg(test)]
#[path = "intent_test.rs"]
mod intent_test;

pub const GROUP_COMPANY_INFO: &str = "companyInfo";
pub const GROUP_GOALS: &str = "goals";
pub const GROUP_SCOPE: &str = "scope";
pub const GROUP_TIMELINE: &str = "timeline";
pub const GROUP_CONTACT: &str = "contact";

// =============================================================================
// RECORD
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompanyInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Goals {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,
    pub secondary: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Scope {
    pub features: Vec<String>,
    pub platforms: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Timeline {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Contact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// The accumulated structured profile of a prospective client's project.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IntentRecord {
    pub company_info: CompanyInfo,
    pub goals: Goals,
    pub scope: Scope,
    pub timeline: Timeline,
    pub contact: Contact,
    /// Top-level keys the schema does not know yet (e.g. `estimatedRange`).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl IntentRecord {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// =============================================================================
// PATCHES
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompanyInfoPatch {
    pub name: Option<String>,
    pub industry: Option<String>,
    pub size: Option<String>,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GoalsPatch {
    pub primary: Option<String>,
    pub secondary: Option<Vec<String>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScopePatch {
    pub features: Option<Vec<String>>,
    pub platforms: Option<Vec<String>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TimelinePatch {
    pub expected_start: Option<String>,
    pub deadline: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// A partial update to an [`IntentRecord`]. Every field is optional.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IntentPatch {
    pub company_info: Option<CompanyInfoPatch>,
    pub goals: Option<GoalsPatch>,
    pub scope: Option<ScopePatch>,
    pub timeline: Option<TimelinePatch>,
    pub contact: Option<ContactPatch>,
    pub extra: Map<String, Value>,
}

impl IntentPatch {
    /// `true` when applying this patch could not change any record.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.company_info.as_ref().is_none_or(|p| *p == CompanyInfoPatch::default())
            && self.goals.as_ref().is_none_or(|p| *p == GoalsPatch::default())
            && self.scope.as_ref().is_none_or(|p| *p == ScopePatch::default())
            && self.timeline.as_ref().is_none_or(|p| *p == TimelinePatch::default())
            && self.contact.as_ref().is_none_or(|p| *p == ContactPatch::default())
            && self.extra.is_empty()
    }

    /// Convert loosely shaped backend JSON into a patch.
    ///
    /// Anything other than an object yields an empty patch.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self::from_map(map),
            _ => Self::default(),
        }
    }

    /// Convert a backend `projectData` object into a patch.
    ///
    /// Group values that are objects are read field by field: strings are
    /// kept, numbers and booleans are stringified, and a lone string is
    /// accepted where a list is expected. Group values that are not objects
    /// are dropped. Unknown keys pass through to `extra` untouched.
    #[must_use]
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let mut patch = Self::default();
        for (key, value) in map {
            match key.as_str() {
                GROUP_COMPANY_INFO => {
                    patch.company_info = group(key, value).map(|obj| CompanyInfoPatch {
                        name: text(obj, "name"),
                        industry: text(obj, "industry"),
                        size: text(obj, "size"),
                        description: text(obj, "description"),
                    });
                }
                GROUP_GOALS => {
                    patch.goals = group(key, value).map(|obj| GoalsPatch {
                        primary: text(obj, "primary"),
                        secondary: list(obj, "secondary"),
                    });
                }
                GROUP_SCOPE => {
                    patch.scope = group(key, value).map(|obj| ScopePatch {
                        features: list(obj, "features"),
                        platforms: list(obj, "platforms"),
                    });
                }
                GROUP_TIMELINE => {
                    patch.timeline = group(key, value).map(|obj| TimelinePatch {
                        expected_start: text(obj, "expectedStart"),
                        deadline: text(obj, "deadline"),
                    });
                }
                GROUP_CONTACT => {
                    patch.contact = group(key, value).map(|obj| ContactPatch {
                        name: text(obj, "name"),
                        email: text(obj, "email"),
                        phone: text(obj, "phone"),
                    });
                }
                _ => {
                    patch.extra.insert(key.clone(), value.clone());
                }
            }
        }
        patch
    }
}

fn group<'a>(key: &str, value: &'a Value) -> Option<&'a Map<String, Value>> {
    match value {
        Value::Object(obj) => Some(obj),
        Value::Null => None,
        other => {
            warn!(group = key, kind = json_kind(other), "intent: ignoring non-object group");
            None
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn text(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(scalar_text)
}

fn list(obj: &Map<String, Value>, key: &str) -> Option<Vec<String>> {
    match obj.get(key)? {
        Value::Array(items) => Some(items.iter().filter_map(scalar_text).collect()),
        Value::String(s) => Some(vec![s.clone()]),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// MERGE
// =============================================================================

/// Overwrite `slot` only with a non-blank value. Returns `true` on change.
fn fill(slot: &mut Option<String>, incoming: Option<String>) -> bool {
    let Some(value) = incoming else {
        return false;
    };
    let value = value.trim();
    if value.is_empty() || slot.as_deref() == Some(value) {
        return false;
    }
    *slot = Some(value.to_owned());
    true
}

/// Replace `slot` wholesale with the non-blank, de-duplicated entries of
/// `incoming`. An incoming list with nothing left after cleanup is ignored.
fn fill_list(slot: &mut Vec<String>, incoming: Option<Vec<String>>) -> bool {
    let Some(values) = incoming else {
        return false;
    };
    let mut cleaned: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        let value = value.trim();
        if !value.is_empty() && !cleaned.iter().any(|v| v == value) {
            cleaned.push(value.to_owned());
        }
    }
    if cleaned.is_empty() || *slot == cleaned {
        return false;
    }
    *slot = cleaned;
    true
}

impl CompanyInfo {
    fn merge(&mut self, patch: CompanyInfoPatch) -> bool {
        let CompanyInfoPatch { name, industry, size, description } = patch;
        let mut changed = fill(&mut self.name, name);
        changed |= fill(&mut self.industry, industry);
        changed |= fill(&mut self.size, size);
        changed |= fill(&mut self.description, description);
        changed
    }
}

impl Goals {
    fn merge(&mut self, patch: GoalsPatch) -> bool {
        let GoalsPatch { primary, secondary } = patch;
        let mut changed = fill(&mut self.primary, primary);
        changed |= fill_list(&mut self.secondary, secondary);
        changed
    }
}

impl Scope {
    fn merge(&mut self, patch: ScopePatch) -> bool {
        let ScopePatch { features, platforms } = patch;
        let mut changed = fill_list(&mut self.features, features);
        changed |= fill_list(&mut self.platforms, platforms);
        changed
    }
}

impl Timeline {
    fn merge(&mut self, patch: TimelinePatch) -> bool {
        let TimelinePatch { expected_start, deadline } = patch;
        let mut changed = fill(&mut self.expected_start, expected_start);
        changed |= fill(&mut self.deadline, deadline);
        changed
    }
}

impl Contact {
    fn merge(&mut self, patch: ContactPatch) -> bool {
        let ContactPatch { name, email, phone } = patch;
        let mut changed = fill(&mut self.name, name);
        changed |= fill(&mut self.email, email);
        changed |= fill(&mut self.phone, phone);
        changed
    }
}

impl IntentRecord {
    fn merge(&mut self, patch: IntentPatch) -> bool {
        let IntentPatch { company_info, goals, scope, timeline, contact, extra } = patch;
        let mut changed = false;
        if let Some(p) = company_info {
            changed |= self.company_info.merge(p);
        }
        if let Some(p) = goals {
            changed |= self.goals.merge(p);
        }
        if let Some(p) = scope {
            changed |= self.scope.merge(p);
        }
        if let Some(p) = timeline {
            changed |= self.timeline.merge(p);
        }
        if let Some(p) = contact {
            changed |= self.contact.merge(p);
        }
        for (key, value) in extra {
            if self.extra.get(&key) != Some(&value) {
                self.extra.insert(key, value);
                changed = true;
            }
        }
        changed
    }
}

// =============================================================================
// STORE
// =============================================================================

/// Owner of the session's [`IntentRecord`].
///
/// Consumers read through [`IntentStore::record`] and write only through
/// [`IntentStore::merge_intent`], which keeps the fill-forward rule in one
/// place.
#[derive(Debug, Default)]
pub struct IntentStore {
    record: IntentRecord,
    revision: u64,
}

impl IntentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn record(&self) -> &IntentRecord {
        &self.record
    }

    /// Bumped once per merge that changed the record.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Fill-forward merge of `patch` into the record. Returns `true` when
    /// anything changed.
    pub fn merge_intent(&mut self, patch: IntentPatch) -> bool {
        if patch.is_empty() {
            return false;
        }
        let changed = self.record.merge(patch);
        if changed {
            self.revision += 1;
            debug!(revision = self.revision, "intent: merged");
        }
        changed
    }

    /// Drop everything captured so far. Only used by an explicit session reset.
    pub fn clear(&mut self) {
        if !self.record.is_empty() {
            self.record = IntentRecord::default();
            self.revision += 1;
        }
    }
}
