//! Full-screen overlay exclusivity.
//!
//! DESIGN
//! ======
//! A single `Option<Overlay>` is the whole state machine: `None` is the
//! "nothing open" state and activating anything replaces what was there, so
//! two overlays can never be visible at once. The mobile menu is tracked
//! alongside and always closes when an overlay opens.

use std::fmt;

#[cfg(test)]
#[path = "overlay_test.rs"]
mod overlay_test;

/// A full-screen or panel surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Overlay {
    Chat,
    ProjectForm,
    Playground,
    CaseStudy { id: String },
    Info { topic: String },
}

/// Overlay identity without its selection payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    Chat,
    ProjectForm,
    Playground,
    CaseStudy,
    Info,
}

impl Overlay {
    #[must_use]
    pub fn kind(&self) -> OverlayKind {
        match self {
            Self::Chat => OverlayKind::Chat,
            Self::ProjectForm => OverlayKind::ProjectForm,
            Self::Playground => OverlayKind::Playground,
            Self::CaseStudy { .. } => OverlayKind::CaseStudy,
            Self::Info { .. } => OverlayKind::Info,
        }
    }
}

impl fmt::Display for OverlayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Chat => "chat",
            Self::ProjectForm => "project_form",
            Self::Playground => "playground",
            Self::CaseStudy => "case_study",
            Self::Info => "info",
        })
    }
}

#[derive(Clone, Debug, Default)]
pub struct OverlayController {
    active: Option<Overlay>,
    mobile_menu_open: bool,
}

impl OverlayController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn active(&self) -> Option<&Overlay> {
        self.active.as_ref()
    }

    #[must_use]
    pub fn is_active(&self, kind: OverlayKind) -> bool {
        self.active.as_ref().is_some_and(|o| o.kind() == kind)
    }

    #[must_use]
    pub fn mobile_menu_open(&self) -> bool {
        self.mobile_menu_open
    }

    /// Show `overlay`, hiding whatever was visible and the mobile menu.
    /// Returns the overlay it replaced.
    pub fn activate(&mut self, overlay: Overlay) -> Option<Overlay> {
        self.mobile_menu_open = false;
        let previous = self.active.replace(overlay);
        if previous.as_ref() == self.active.as_ref() {
            return None;
        }
        previous
    }

    /// Hide the overlay of `kind` if it is the visible one. A deactivation
    /// that was already superseded by another activation is ignored.
    pub fn deactivate(&mut self, kind: OverlayKind) -> bool {
        if self.is_active(kind) {
            self.active = None;
            true
        } else {
            false
        }
    }

    /// Hide whatever is visible. Returns what was hidden.
    pub fn close_all(&mut self) -> Option<Overlay> {
        self.mobile_menu_open = false;
        self.active.take()
    }

    pub fn toggle_mobile_menu(&mut self) -> bool {
        self.mobile_menu_open = !self.mobile_menu_open;
        self.mobile_menu_open
    }
}
