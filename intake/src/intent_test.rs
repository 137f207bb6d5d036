use super::*;
use serde_json::json;

fn contact_email(email: &str) -> IntentPatch {
    IntentPatch {
        contact: Some(ContactPatch { email: Some(email.into()), ..ContactPatch::default() }),
        ..IntentPatch::default()
    }
}

// =============================================================================
// fill-forward merge
// =============================================================================

#[test]
fn merge_keeps_value_when_later_patch_omits_it() {
    let mut store = IntentStore::new();
    assert!(store.merge_intent(contact_email("a@x.com")));

    let later = IntentPatch {
        contact: Some(ContactPatch { name: Some("Ada".into()), ..ContactPatch::default() }),
        ..IntentPatch::default()
    };
    assert!(store.merge_intent(later));

    assert_eq!(store.record().contact.email.as_deref(), Some("a@x.com"));
    assert_eq!(store.record().contact.name.as_deref(), Some("Ada"));
}

#[test]
fn merge_blank_value_does_not_erase() {
    let mut store = IntentStore::new();
    store.merge_intent(contact_email("a@x.com"));

    assert!(!store.merge_intent(contact_email("   ")));
    assert!(!store.merge_intent(contact_email("")));
    assert_eq!(store.record().contact.email.as_deref(), Some("a@x.com"));
}

#[test]
fn merge_non_blank_value_overwrites() {
    let mut store = IntentStore::new();
    store.merge_intent(contact_email("a@x.com"));
    store.merge_intent(contact_email("b@y.org"));
    assert_eq!(store.record().contact.email.as_deref(), Some("b@y.org"));
}

#[test]
fn merge_trims_values() {
    let mut store = IntentStore::new();
    store.merge_intent(contact_email("  a@x.com \n"));
    assert_eq!(store.record().contact.email.as_deref(), Some("a@x.com"));
}

#[test]
fn merge_list_replaces_wholesale_and_ignores_empty() {
    let mut store = IntentStore::new();
    let features = |items: Vec<&str>| IntentPatch {
        scope: Some(ScopePatch {
            features: Some(items.into_iter().map(String::from).collect()),
            ..ScopePatch::default()
        }),
        ..IntentPatch::default()
    };

    store.merge_intent(features(vec!["Portal", "Billing"]));
    assert_eq!(store.record().scope.features, vec!["Portal", "Billing"]);

    assert!(!store.merge_intent(features(vec![])));
    assert!(!store.merge_intent(features(vec!["", "  "])));
    assert_eq!(store.record().scope.features, vec!["Portal", "Billing"]);

    store.merge_intent(features(vec!["Search", "Search", " Export "]));
    assert_eq!(store.record().scope.features, vec!["Search", "Export"]);
}

#[test]
fn empty_patch_is_noop() {
    let mut store = IntentStore::new();
    assert!(!store.merge_intent(IntentPatch::default()));
    assert_eq!(store.revision(), 0);

    let hollow = IntentPatch { goals: Some(GoalsPatch::default()), ..IntentPatch::default() };
    assert!(hollow.is_empty());
    assert!(!store.merge_intent(hollow));
    assert!(store.record().is_empty());
}

#[test]
fn revision_only_moves_on_change() {
    let mut store = IntentStore::new();
    store.merge_intent(contact_email("a@x.com"));
    assert_eq!(store.revision(), 1);
    store.merge_intent(contact_email("a@x.com"));
    assert_eq!(store.revision(), 1);
    store.merge_intent(contact_email("c@z.io"));
    assert_eq!(store.revision(), 2);
}

#[test]
fn unknown_keys_overwrite_directly() {
    let mut store = IntentStore::new();
    store.merge_intent(IntentPatch::from_value(&json!({ "estimatedRange": "$10k–$20k" })));
    store.merge_intent(IntentPatch::from_value(&json!({ "estimatedRange": ["a", "b"] })));
    assert_eq!(store.record().extra.get("estimatedRange"), Some(&json!(["a", "b"])));
}

#[test]
fn clear_resets_record() {
    let mut store = IntentStore::new();
    store.merge_intent(contact_email("a@x.com"));
    store.clear();
    assert!(store.record().is_empty());
    assert_eq!(store.revision(), 2);
}

// =============================================================================
// IntentPatch::from_value
// =============================================================================

#[test]
fn from_value_reads_all_groups() {
    let patch = IntentPatch::from_value(&json!({
        "companyInfo": { "name": "Acme", "industry": "Retail", "size": 50, "description": "Shoes" },
        "goals": { "primary": "Sell online", "secondary": ["Loyalty"] },
        "scope": { "features": ["Cart"], "platforms": "web" },
        "timeline": { "expectedStart": "Q3", "deadline": "December" },
        "contact": { "name": "Ada", "email": "ada@acme.io", "phone": "555" }
    }));

    let mut store = IntentStore::new();
    store.merge_intent(patch);
    let record = store.record();
    assert_eq!(record.company_info.name.as_deref(), Some("Acme"));
    assert_eq!(record.company_info.size.as_deref(), Some("50"));
    assert_eq!(record.goals.secondary, vec!["Loyalty"]);
    assert_eq!(record.scope.platforms, vec!["web"]);
    assert_eq!(record.timeline.expected_start.as_deref(), Some("Q3"));
    assert_eq!(record.contact.phone.as_deref(), Some("555"));
    assert!(record.extra.is_empty());
}

#[test]
fn from_value_ignores_non_object_groups() {
    let patch = IntentPatch::from_value(&json!({ "contact": "ada@acme.io", "goals": null }));
    assert!(patch.contact.is_none());
    assert!(patch.goals.is_none());
    assert!(patch.is_empty());
}

#[test]
fn from_value_non_object_is_empty() {
    assert!(IntentPatch::from_value(&json!("text")).is_empty());
    assert!(IntentPatch::from_value(&json!(null)).is_empty());
}

#[test]
fn record_serializes_camel_case_with_extra_flattened() {
    let mut store = IntentStore::new();
    store.merge_intent(IntentPatch::from_value(&json!({
        "timeline": { "expectedStart": "May" },
        "estimatedRange": "$5k"
    })));
    let value = serde_json::to_value(store.record()).unwrap();
    assert_eq!(value["timeline"]["expectedStart"], "May");
    assert_eq!(value["estimatedRange"], "$5k");
    assert!(value.get("companyInfo").is_some());
}
