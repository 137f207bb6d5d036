use super::*;

#[test]
fn empty_store_loads_defaults() {
    let store = MemoryStore::new();
    assert_eq!(Preferences::load(&store), Preferences { theme: Theme::TrueDark, accent: Accent::Blue });
}

#[test]
fn unknown_values_load_as_defaults() {
    let mut store = MemoryStore::new();
    store.set(THEME_KEY, "light");
    store.set(ACCENT_KEY, "rose");
    assert_eq!(Preferences::load(&store), Preferences::default());
}

#[test]
fn save_then_load_restores_both_keys() {
    let mut store = MemoryStore::new();
    let prefs = Preferences { theme: Theme::Dark, accent: Accent::Purple };
    prefs.save(&mut store);

    assert_eq!(store.get(THEME_KEY).as_deref(), Some("dark"));
    assert_eq!(store.get(ACCENT_KEY).as_deref(), Some("Vivid Purple"));
    assert_eq!(Preferences::load(&store), prefs);
}

#[test]
fn toggle_theme_persists() {
    let mut store = MemoryStore::new();
    let mut prefs = Preferences::load(&store);
    assert_eq!(prefs.toggle_theme(&mut store), Theme::Dark);
    assert_eq!(Preferences::load(&store).theme, Theme::Dark);
    assert_eq!(prefs.toggle_theme(&mut store), Theme::TrueDark);
    assert_eq!(store.get(THEME_KEY).as_deref(), Some("true-dark"));
}

#[test]
fn set_accent_persists() {
    let mut store = MemoryStore::new();
    let mut prefs = Preferences::default();
    prefs.set_accent(Accent::Emerald, &mut store);
    assert_eq!(Preferences::load(&store).accent, Accent::Emerald);
}

#[test]
fn parse_trims_whitespace_but_matches_case() {
    assert_eq!(Theme::parse(" true-dark\n"), Some(Theme::TrueDark));
    assert_eq!(Accent::parse("Rose "), Some(Accent::Rose));
    assert_eq!(Accent::parse("tekguyz blue"), None);
}

#[test]
fn accents_carry_distinct_colors() {
    assert_eq!(Accent::Blue.rgb(), "37 99 235");
    assert_eq!(Accent::Amber.hex(), "#D97706");
    let mut hexes: Vec<_> = Accent::ALL.iter().map(|a| a.hex()).collect();
    hexes.dedup();
    assert_eq!(hexes.len(), Accent::ALL.len());
}

#[test]
fn preferences_serialize_with_stored_names() {
    let prefs = Preferences { theme: Theme::TrueDark, accent: Accent::Blue };
    let value = serde_json::to_value(prefs).unwrap();
    assert_eq!(value, serde_json::json!({ "theme": "true-dark", "accent": "TEKGUYZ Blue" }));
    let back: Preferences = serde_json::from_value(value).unwrap();
    assert_eq!(back, prefs);
}
