//! Session coordinator: single writer for all intake state.
//!
//! DESIGN
//! ======
//! Views never mutate the intent record, chat log, overlays or form
//! lifecycle directly; they call the named operations here. AI calls are
//! split in two phases so the suspension point is explicit:
//!
//! 1. [`Session::begin`] validates input, appends the user's chat message,
//!    marks the surface busy and hands out a [`Ticket`].
//! 2. The caller awaits an [`AssistantApi`] call without holding the session.
//! 3. `complete_*` applies the result only if the ticket is still current.
//!
//! Hiding an overlay bumps the generation of the surfaces it hosts, so a
//! reply that lands after its surface was closed is dropped instead of
//! writing into a view the user already left.

use std::fmt;

use tracing::{debug, info};

use crate::ai::{AssistantApi, AuditResult, ChatReply, Idea, NormalizedResult, Suggestion, SuggestionAction};
use crate::bridge::{self, BridgeSignal};
use crate::chat::{ChatHistory, MessageId, Role};
use crate::error::IntakeError;
use crate::form::{ProjectForm, ProjectSubmission, TextField};
use crate::intent::{IntentPatch, IntentRecord, IntentStore};
use crate::overlay::{Overlay, OverlayController, OverlayKind};

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

/// Info topic opened by a "view work" suggestion.
pub const WORK_TOPIC: &str = "work";

/// Shown in chat when a reply carries no data at all.
pub const CONNECTION_TROUBLE: &str = "I'm having a little trouble connecting right now. Please check your \
                                      internet or try again in a moment.";

const SUMMARY_HEADING: &str = "AI Context Summary:\n";
const SURFACES: usize = Surface::ALL.len();

// =============================================================================
// SURFACES AND TICKETS
// =============================================================================

/// An input surface that calls the assistant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Surface {
    Chat,
    Audit,
    Ideas,
    Refine,
    /// Rewrite of the primary goal inside the project form.
    GoalRefine,
}

impl Surface {
    pub const ALL: [Self; 5] = [Self::Chat, Self::Audit, Self::Ideas, Self::Refine, Self::GoalRefine];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Audit => "audit",
            Self::Ideas => "ideas",
            Self::Refine => "refine",
            Self::GoalRefine => "goal_refine",
        }
    }

    /// The overlay that hosts this surface.
    #[must_use]
    pub fn host(self) -> OverlayKind {
        match self {
            Self::Chat => OverlayKind::Chat,
            Self::Audit | Self::Ideas | Self::Refine => OverlayKind::Playground,
            Self::GoalRefine => OverlayKind::ProjectForm,
        }
    }

    fn slot(self) -> usize {
        match self {
            Self::Chat => 0,
            Self::Audit => 1,
            Self::Ideas => 2,
            Self::Refine => 3,
            Self::GoalRefine => 4,
        }
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Proof that a request was started; redeemed by the matching `complete_*`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket {
    surface: Surface,
    generation: u64,
}

impl Ticket {
    #[must_use]
    pub fn surface(&self) -> Surface {
        self.surface
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    Applied { is_fallback: bool },
    /// The surface was closed or reset after the request started.
    Discarded,
}

/// What the view should do after a suggestion chip is pressed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SuggestionOutcome {
    Opened(OverlayKind),
    /// Untagged chip: send its label as the next chat message.
    SendAsChat(String),
}

/// Latest results shown in the AI playground.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlaygroundState {
    pub audit: Option<AuditResult>,
    pub ideas: Vec<Idea>,
    pub refined: Option<String>,
}

// =============================================================================
// SESSION
// =============================================================================

#[derive(Debug)]
pub struct Session {
    intent: IntentStore,
    chat: ChatHistory,
    overlays: OverlayController,
    form: ProjectForm,
    playground: PlaygroundState,
    busy: [bool; SURFACES],
    generations: [u64; SURFACES],
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self {
            intent: IntentStore::new(),
            chat: ChatHistory::with_greeting(),
            overlays: OverlayController::new(),
            form: ProjectForm::new(),
            playground: PlaygroundState::default(),
            busy: [false; SURFACES],
            generations: [0; SURFACES],
        }
    }

    #[must_use]
    pub fn intent(&self) -> &IntentRecord {
        self.intent.record()
    }

    /// Bumped on every change to the intent record.
    #[must_use]
    pub fn intent_revision(&self) -> u64 {
        self.intent.revision()
    }

    #[must_use]
    pub fn chat(&self) -> &ChatHistory {
        &self.chat
    }

    #[must_use]
    pub fn overlays(&self) -> &OverlayController {
        &self.overlays
    }

    #[must_use]
    pub fn form(&self) -> &ProjectForm {
        &self.form
    }

    /// Field edits and step navigation. Open and close go through
    /// [`Self::activate`] and [`Self::deactivate`].
    pub fn form_mut(&mut self) -> &mut ProjectForm {
        &mut self.form
    }

    #[must_use]
    pub fn playground(&self) -> &PlaygroundState {
        &self.playground
    }

    #[must_use]
    pub fn is_busy(&self, surface: Surface) -> bool {
        self.busy[surface.slot()]
    }

    // -------------------------------------------------------------------------
    // intent and chat
    // -------------------------------------------------------------------------

    pub fn merge_intent(&mut self, patch: IntentPatch) -> bool {
        self.intent.merge_intent(patch)
    }

    pub fn add_to_chat_history(&mut self, role: Role, text: impl Into<String>, suggestions: Vec<Suggestion>) -> MessageId {
        self.chat.push(role, text.into(), suggestions)
    }

    // -------------------------------------------------------------------------
    // overlays
    // -------------------------------------------------------------------------

    /// Show `overlay`, hiding whatever was visible. Opening the project form
    /// hydrates it from the current intent record.
    pub fn activate(&mut self, overlay: Overlay) {
        let kind = overlay.kind();
        if let Some(replaced) = self.overlays.activate(overlay) {
            if replaced.kind() != kind {
                self.on_hidden(replaced.kind());
            }
        }
        if kind == OverlayKind::ProjectForm {
            self.form.open(self.intent.record());
        }
        debug!(overlay = %kind, "session: overlay activated");
    }

    pub fn deactivate(&mut self, kind: OverlayKind) -> bool {
        if !self.overlays.deactivate(kind) {
            return false;
        }
        self.on_hidden(kind);
        true
    }

    pub fn close_all(&mut self) {
        if let Some(closed) = self.overlays.close_all() {
            self.on_hidden(closed.kind());
        }
    }

    pub fn toggle_mobile_menu(&mut self) -> bool {
        self.overlays.toggle_mobile_menu()
    }

    /// Run the delayed form reset scheduled by closing the form.
    pub fn finish_form_close(&mut self) -> bool {
        self.form.finish_close()
    }

    fn on_hidden(&mut self, kind: OverlayKind) {
        for surface in Surface::ALL.into_iter().filter(|s| s.host() == kind) {
            self.invalidate(surface);
        }
        if kind == OverlayKind::ProjectForm {
            self.form.close();
        }
    }

    fn invalidate(&mut self, surface: Surface) {
        self.generations[surface.slot()] += 1;
        self.busy[surface.slot()] = false;
    }

    // -------------------------------------------------------------------------
    // two-phase AI calls
    // -------------------------------------------------------------------------

    /// Start a request on `surface`. For chat the user's message is appended
    /// immediately so it shows before the reply.
    ///
    /// # Errors
    ///
    /// `EmptyInput` for blank input, `Busy` while the surface still waits on
    /// an earlier request. Neither changes any state.
    pub fn begin(&mut self, surface: Surface, input: &str) -> Result<Ticket, IntakeError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(IntakeError::EmptyInput { surface });
        }
        if self.is_busy(surface) {
            return Err(IntakeError::Busy { surface });
        }
        if surface == Surface::Chat {
            self.chat.push(Role::User, input.to_owned(), Vec::new());
        }
        self.busy[surface.slot()] = true;
        let ticket = Ticket { surface, generation: self.generations[surface.slot()] };
        debug!(%surface, generation = ticket.generation, "session: request started");
        Ok(ticket)
    }

    /// Clear busy for a current ticket. Stale or mismatched tickets are
    /// reported as not current and change nothing.
    fn redeem(&mut self, ticket: Ticket, expected: Surface) -> bool {
        let slot = ticket.surface.slot();
        if ticket.surface != expected || ticket.generation != self.generations[slot] {
            info!(surface = %ticket.surface, "session: discarding stale result");
            return false;
        }
        self.busy[slot] = false;
        true
    }

    /// Apply a chat reply: `projectData` is merged into the intent record
    /// before the model message is appended. A reply without data still
    /// answers the user, with [`CONNECTION_TROUBLE`].
    pub fn complete_chat(&mut self, ticket: Ticket, result: NormalizedResult<ChatReply>) -> Completion {
        if !self.redeem(ticket, Surface::Chat) {
            return Completion::Discarded;
        }
        if let Some(reply) = result.data {
            bridge::receive_from_chat(&mut self.intent, &reply.project_data);
            self.chat.push(Role::Model, reply.message, reply.suggestions);
        } else {
            self.chat.push(Role::Model, CONNECTION_TROUBLE.to_owned(), Vec::new());
        }
        Completion::Applied { is_fallback: result.is_fallback }
    }

    pub fn complete_audit(&mut self, ticket: Ticket, result: NormalizedResult<AuditResult>) -> Completion {
        if !self.redeem(ticket, Surface::Audit) {
            return Completion::Discarded;
        }
        if let Some(audit) = result.data {
            self.playground.audit = Some(audit);
        }
        Completion::Applied { is_fallback: result.is_fallback }
    }

    pub fn complete_ideas(&mut self, ticket: Ticket, result: NormalizedResult<Vec<Idea>>) -> Completion {
        if !self.redeem(ticket, Surface::Ideas) {
            return Completion::Discarded;
        }
        if let Some(ideas) = result.data {
            self.playground.ideas = ideas;
        }
        Completion::Applied { is_fallback: result.is_fallback }
    }

    pub fn complete_refine(&mut self, ticket: Ticket, result: NormalizedResult<String>) -> Completion {
        if !self.redeem(ticket, Surface::Refine) {
            return Completion::Discarded;
        }
        if let Some(text) = result.data {
            self.playground.refined = Some(text);
        }
        Completion::Applied { is_fallback: result.is_fallback }
    }

    /// Replace the form's primary goal with the rewrite. The previous text
    /// stays available through [`ProjectForm::undo_refine`].
    pub fn complete_goal_refine(&mut self, ticket: Ticket, result: NormalizedResult<String>) -> Completion {
        if !self.redeem(ticket, Surface::GoalRefine) {
            return Completion::Discarded;
        }
        if let Some(text) = result.data {
            self.form.apply_refined(TextField::PrimaryGoal, text);
        }
        Completion::Applied { is_fallback: result.is_fallback }
    }

    // -------------------------------------------------------------------------
    // one-shot conveniences
    // -------------------------------------------------------------------------
    //
    // These hold the session across the await, so nothing else can run on it
    // meanwhile. Views that stay interactive use `begin` and `complete_*`.

    /// # Errors
    ///
    /// See [`Self::begin`].
    pub async fn send_chat(&mut self, api: &dyn AssistantApi, message: &str) -> Result<Completion, IntakeError> {
        let history = self.chat.turns();
        let ticket = self.begin(Surface::Chat, message)?;
        let result = api.chat(message.trim(), &history).await;
        Ok(self.complete_chat(ticket, result))
    }

    /// # Errors
    ///
    /// See [`Self::begin`].
    pub async fn run_audit(&mut self, api: &dyn AssistantApi, free_text: &str) -> Result<Completion, IntakeError> {
        let ticket = self.begin(Surface::Audit, free_text)?;
        let result = api.audit(free_text.trim()).await;
        Ok(self.complete_audit(ticket, result))
    }

    /// # Errors
    ///
    /// See [`Self::begin`].
    pub async fn run_ideas(&mut self, api: &dyn AssistantApi, prompt: &str) -> Result<Completion, IntakeError> {
        let ticket = self.begin(Surface::Ideas, prompt)?;
        let result = api.generate_ideas(prompt.trim()).await;
        Ok(self.complete_ideas(ticket, result))
    }

    /// # Errors
    ///
    /// See [`Self::begin`].
    pub async fn run_refine(&mut self, api: &dyn AssistantApi, text: &str) -> Result<Completion, IntakeError> {
        let ticket = self.begin(Surface::Refine, text)?;
        let result = api.refine(text).await;
        Ok(self.complete_refine(ticket, result))
    }

    /// Refine whatever the form currently holds as the primary goal.
    ///
    /// # Errors
    ///
    /// See [`Self::begin`].
    pub async fn run_goal_refine(&mut self, api: &dyn AssistantApi) -> Result<Completion, IntakeError> {
        let text = self.form.values().primary_goal.clone();
        let ticket = self.begin(Surface::GoalRefine, &text)?;
        let result = api.refine(&text).await;
        Ok(self.complete_goal_refine(ticket, result))
    }

    // -------------------------------------------------------------------------
    // cross-surface actions
    // -------------------------------------------------------------------------

    /// Feed the idea at `index` into the intent record, then swap the
    /// playground for the hydrated project form.
    ///
    /// # Errors
    ///
    /// `UnknownIdea` if no idea is shown at `index`.
    pub fn select_idea(&mut self, index: usize) -> Result<bool, IntakeError> {
        let idea = self.playground.ideas.get(index).ok_or(IntakeError::UnknownIdea(index))?;
        match bridge::receive_from_idea(&mut self.intent, idea) {
            Some(BridgeSignal::OpenProjectForm) => {
                self.activate(Overlay::ProjectForm);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn apply_suggestion(&mut self, suggestion: &Suggestion) -> SuggestionOutcome {
        let overlay = match suggestion.action {
            Some(SuggestionAction::StartProject | SuggestionAction::Contact) => Overlay::ProjectForm,
            Some(SuggestionAction::OpenPlayground) => Overlay::Playground,
            Some(SuggestionAction::ViewWork) => Overlay::Info { topic: WORK_TOPIC.into() },
            None => return SuggestionOutcome::SendAsChat(suggestion.label.clone()),
        };
        let kind = overlay.kind();
        self.activate(overlay);
        SuggestionOutcome::Opened(kind)
    }

    /// Validate the form, fold its values into the intent record and close
    /// it. The returned submission is what the view posts to `/api/intake`.
    ///
    /// # Errors
    ///
    /// `Validation` when a step fails; the form stays open on that step.
    pub fn submit_form(&mut self) -> Result<ProjectSubmission, IntakeError> {
        let submission = self.form.submit()?;
        self.intent.merge_intent(submission.to_patch());
        self.deactivate(OverlayKind::ProjectForm);
        info!(features = submission.features.len(), "session: project form submitted");
        Ok(submission)
    }

    /// Append a recap of the conversation to the form's notes.
    pub fn summarize_chat_into_notes(&mut self) {
        let summary = self.chat.summary();
        self.form.append_note(&format!("{SUMMARY_HEADING}{summary}"));
        debug!(chars = summary.len(), "session: chat summary added to notes");
    }

    /// Start over: empty record, fresh greeting, nothing open. Requests in
    /// flight are discarded when they land.
    pub fn reset(&mut self) {
        self.overlays.close_all();
        for surface in Surface::ALL {
            self.invalidate(surface);
        }
        self.intent.clear();
        self.chat.clear();
        self.chat.push(Role::Model, crate::chat::GREETING.to_owned(), Vec::new());
        self.form = ProjectForm::new();
        self.playground = PlaygroundState::default();
        info!("session: reset");
    }
}
