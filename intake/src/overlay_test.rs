use super::*;

fn all_overlays() -> Vec<Overlay> {
    vec![
        Overlay::Chat,
        Overlay::ProjectForm,
        Overlay::Playground,
        Overlay::CaseStudy { id: "fintech-app".into() },
        Overlay::Info { topic: "about".into() },
    ]
}

fn visible_count(ctl: &OverlayController) -> usize {
    [OverlayKind::Chat, OverlayKind::ProjectForm, OverlayKind::Playground, OverlayKind::CaseStudy, OverlayKind::Info]
        .iter()
        .filter(|k| ctl.is_active(**k))
        .count()
}

// =============================================================================
// defaults
// =============================================================================

#[test]
fn starts_with_nothing_open() {
    let ctl = OverlayController::new();
    assert!(ctl.active().is_none());
    assert!(!ctl.mobile_menu_open());
}

// =============================================================================
// activate / deactivate
// =============================================================================

#[test]
fn activating_b_hides_a() {
    let mut ctl = OverlayController::new();
    ctl.activate(Overlay::Chat);
    let replaced = ctl.activate(Overlay::ProjectForm);
    assert_eq!(replaced, Some(Overlay::Chat));
    assert!(!ctl.is_active(OverlayKind::Chat));
    assert!(ctl.is_active(OverlayKind::ProjectForm));
}

#[test]
fn never_more_than_one_visible() {
    let mut ctl = OverlayController::new();
    for a in all_overlays() {
        for b in all_overlays() {
            ctl.activate(a.clone());
            assert_eq!(visible_count(&ctl), 1);
            ctl.activate(b.clone());
            assert_eq!(visible_count(&ctl), 1);
            assert_eq!(ctl.active(), Some(&b));
        }
    }
}

#[test]
fn activate_closes_mobile_menu() {
    let mut ctl = OverlayController::new();
    assert!(ctl.toggle_mobile_menu());
    ctl.activate(Overlay::Playground);
    assert!(!ctl.mobile_menu_open());
}

#[test]
fn reactivating_same_overlay_reports_nothing_replaced() {
    let mut ctl = OverlayController::new();
    ctl.activate(Overlay::Chat);
    assert_eq!(ctl.activate(Overlay::Chat), None);
}

#[test]
fn switching_case_study_selection_replaces_previous() {
    let mut ctl = OverlayController::new();
    ctl.activate(Overlay::CaseStudy { id: "a".into() });
    let replaced = ctl.activate(Overlay::CaseStudy { id: "b".into() });
    assert_eq!(replaced, Some(Overlay::CaseStudy { id: "a".into() }));
}

#[test]
fn deactivate_only_affects_matching_kind() {
    let mut ctl = OverlayController::new();
    ctl.activate(Overlay::Chat);
    ctl.activate(Overlay::ProjectForm);

    // A late close of the chat must not hide the form that superseded it.
    assert!(!ctl.deactivate(OverlayKind::Chat));
    assert!(ctl.is_active(OverlayKind::ProjectForm));

    assert!(ctl.deactivate(OverlayKind::ProjectForm));
    assert!(ctl.active().is_none());
}

#[test]
fn close_all_hides_everything() {
    let mut ctl = OverlayController::new();
    ctl.activate(Overlay::Info { topic: "faq".into() });
    ctl.toggle_mobile_menu();
    assert_eq!(ctl.close_all(), Some(Overlay::Info { topic: "faq".into() }));
    assert!(ctl.active().is_none());
    assert!(!ctl.mobile_menu_open());
}

#[test]
fn overlay_kind_display_is_snake_case() {
    assert_eq!(OverlayKind::ProjectForm.to_string(), "project_form");
    assert_eq!(OverlayKind::CaseStudy.to_string(), "case_study");
}
