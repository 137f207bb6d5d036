//! Multi-step project-intake form.
//!
//! DESIGN
//! ======
//! The form is a one-way projection of the intent record, captured when the
//! form opens: each field still at its initial value is filled from the
//! record, and nothing the user typed is ever overwritten. Later merges into
//! the record do not reach an open form. Closing schedules a reset so every
//! opening starts from a fresh capture.
//!
//! Steps run `Contact → Goals → Scope → Review`. Advancing validates the
//! current step; going back never does.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::intent::{
    CompanyInfo, CompanyInfoPatch, Contact, ContactPatch, Goals, GoalsPatch, IntentPatch, IntentRecord, Scope,
    ScopePatch, Timeline, TimelinePatch,
};

#[cfg(test)]
#[path = "form_test.rs"]
mod form_test;

/// How long the view keeps the closing form on screen before
/// [`ProjectForm::finish_close`] should run.
pub const FORM_RESET_DELAY: Duration = Duration::from_millis(300);

// =============================================================================
// STEPS AND FIELDS
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormStep {
    #[default]
    Contact,
    Goals,
    Scope,
    Review,
}

impl FormStep {
    pub const ALL: [Self; 4] = [Self::Contact, Self::Goals, Self::Scope, Self::Review];

    #[must_use]
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Contact => Some(Self::Goals),
            Self::Goals => Some(Self::Scope),
            Self::Scope => Some(Self::Review),
            Self::Review => None,
        }
    }

    #[must_use]
    pub fn prev(self) -> Option<Self> {
        match self {
            Self::Contact => None,
            Self::Goals => Some(Self::Contact),
            Self::Scope => Some(Self::Goals),
            Self::Review => Some(Self::Scope),
        }
    }

    /// Zero-based position, for progress indicators.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Contact => 0,
            Self::Goals => 1,
            Self::Scope => 2,
            Self::Review => 3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextField {
    ContactName,
    Email,
    Phone,
    CompanyName,
    Industry,
    CompanySize,
    Description,
    PrimaryGoal,
    ExpectedStart,
    Deadline,
    Notes,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListField {
    SecondaryGoals,
    Features,
    Platforms,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FormField {
    Text(TextField),
    List(ListField),
}

impl FormField {
    /// The step on which this field is edited.
    #[must_use]
    pub fn step(self) -> FormStep {
        match self {
            Self::Text(TextField::ContactName | TextField::Email | TextField::Phone | TextField::CompanyName) => {
                FormStep::Contact
            }
            Self::Text(
                TextField::PrimaryGoal | TextField::Industry | TextField::CompanySize | TextField::Description,
            )
            | Self::List(ListField::SecondaryGoals) => FormStep::Goals,
            Self::Text(TextField::ExpectedStart | TextField::Deadline)
            | Self::List(ListField::Features | ListField::Platforms) => FormStep::Scope,
            Self::Text(TextField::Notes) => FormStep::Review,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Text(TextField::ContactName) => "Your name",
            Self::Text(TextField::Email) => "Email",
            Self::Text(TextField::Phone) => "Phone",
            Self::Text(TextField::CompanyName) => "Company",
            Self::Text(TextField::Industry) => "Industry",
            Self::Text(TextField::CompanySize) => "Team size",
            Self::Text(TextField::Description) => "About your company",
            Self::Text(TextField::PrimaryGoal) => "Main goal",
            Self::Text(TextField::ExpectedStart) => "Preferred start",
            Self::Text(TextField::Deadline) => "Deadline",
            Self::Text(TextField::Notes) => "Notes",
            Self::List(ListField::SecondaryGoals) => "Other goals",
            Self::List(ListField::Features) => "Features",
            Self::List(ListField::Platforms) => "Platforms",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// VALIDATION
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationKind {
    Required,
    InvalidEmail,
}

/// Inline validation failure attached to one field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FormError {
    pub field: FormField,
    pub kind: ValidationKind,
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for FormError {}

impl FormError {
    #[must_use]
    pub fn message(&self) -> String {
        match self.kind {
            ValidationKind::Required => format!("{} is required.", self.field.label()),
            ValidationKind::InvalidEmail => "Please enter a valid email address, like name@company.com.".into(),
        }
    }

    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self.kind {
            ValidationKind::Required => "E_FIELD_REQUIRED",
            ValidationKind::InvalidEmail => "E_INVALID_EMAIL",
        }
    }
}

/// One `@` with text on both sides and no whitespace.
#[must_use]
pub fn is_valid_email(raw: &str) -> bool {
    let email = raw.trim();
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty() && !domain.is_empty() && !domain.contains('@') && !email.contains(char::is_whitespace)
}

// =============================================================================
// VALUES
// =============================================================================

/// Everything the form collects. Also the `/api/intake` payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectSubmission {
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub company_name: String,
    pub industry: String,
    pub company_size: String,
    pub description: String,
    pub primary_goal: String,
    pub secondary_goals: Vec<String>,
    pub features: Vec<String>,
    pub platforms: Vec<String>,
    pub expected_start: String,
    pub deadline: String,
    pub notes: String,
}

impl ProjectSubmission {
    #[must_use]
    pub fn text(&self, field: TextField) -> &str {
        match field {
            TextField::ContactName => &self.contact_name,
            TextField::Email => &self.email,
            TextField::Phone => &self.phone,
            TextField::CompanyName => &self.company_name,
            TextField::Industry => &self.industry,
            TextField::CompanySize => &self.company_size,
            TextField::Description => &self.description,
            TextField::PrimaryGoal => &self.primary_goal,
            TextField::ExpectedStart => &self.expected_start,
            TextField::Deadline => &self.deadline,
            TextField::Notes => &self.notes,
        }
    }

    fn text_mut(&mut self, field: TextField) -> &mut String {
        match field {
            TextField::ContactName => &mut self.contact_name,
            TextField::Email => &mut self.email,
            TextField::Phone => &mut self.phone,
            TextField::CompanyName => &mut self.company_name,
            TextField::Industry => &mut self.industry,
            TextField::CompanySize => &mut self.company_size,
            TextField::Description => &mut self.description,
            TextField::PrimaryGoal => &mut self.primary_goal,
            TextField::ExpectedStart => &mut self.expected_start,
            TextField::Deadline => &mut self.deadline,
            TextField::Notes => &mut self.notes,
        }
    }

    #[must_use]
    pub fn list(&self, field: ListField) -> &[String] {
        match field {
            ListField::SecondaryGoals => &self.secondary_goals,
            ListField::Features => &self.features,
            ListField::Platforms => &self.platforms,
        }
    }

    fn list_mut(&mut self, field: ListField) -> &mut Vec<String> {
        match field {
            ListField::SecondaryGoals => &mut self.secondary_goals,
            ListField::Features => &mut self.features,
            ListField::Platforms => &mut self.platforms,
        }
    }

    fn required(&self, field: TextField) -> Result<(), FormError> {
        if self.text(field).trim().is_empty() {
            return Err(FormError { field: FormField::Text(field), kind: ValidationKind::Required });
        }
        Ok(())
    }

    /// Validate the fields that must be filled before leaving `step`.
    ///
    /// # Errors
    ///
    /// Returns the first failing field in display order.
    pub fn validate_step(&self, step: FormStep) -> Result<(), FormError> {
        match step {
            FormStep::Contact => {
                self.required(TextField::ContactName)?;
                self.required(TextField::Email)?;
                if !is_valid_email(&self.email) {
                    return Err(FormError {
                        field: FormField::Text(TextField::Email),
                        kind: ValidationKind::InvalidEmail,
                    });
                }
                Ok(())
            }
            FormStep::Goals => self.required(TextField::PrimaryGoal),
            FormStep::Scope | FormStep::Review => Ok(()),
        }
    }

    /// Validate every step in order.
    ///
    /// # Errors
    ///
    /// Returns the first failing field across all steps.
    pub fn validate(&self) -> Result<(), FormError> {
        FormStep::ALL.iter().try_for_each(|step| self.validate_step(*step))
    }

    /// The submitted values as an intent patch. Blank values are skipped by
    /// the fill-forward merge.
    #[must_use]
    pub fn to_patch(&self) -> IntentPatch {
        let some = |s: &String| Some(s.clone());
        IntentPatch {
            company_info: Some(CompanyInfoPatch {
                name: some(&self.company_name),
                industry: some(&self.industry),
                size: some(&self.company_size),
                description: some(&self.description),
            }),
            goals: Some(GoalsPatch { primary: some(&self.primary_goal), secondary: Some(self.secondary_goals.clone()) }),
            scope: Some(ScopePatch { features: Some(self.features.clone()), platforms: Some(self.platforms.clone()) }),
            timeline: Some(TimelinePatch { expected_start: some(&self.expected_start), deadline: some(&self.deadline) }),
            contact: Some(ContactPatch {
                name: some(&self.contact_name),
                email: some(&self.email),
                phone: some(&self.phone),
            }),
            extra: serde_json::Map::new(),
        }
    }
}

fn fill_if_initial(slot: &mut String, source: Option<&String>) -> bool {
    match source {
        Some(value) if slot.is_empty() && !value.trim().is_empty() => {
            slot.clone_from(value);
            true
        }
        _ => false,
    }
}

fn fill_list_if_initial(slot: &mut Vec<String>, source: &[String]) -> bool {
    if slot.is_empty() && !source.is_empty() {
        *slot = source.to_vec();
        true
    } else {
        false
    }
}

// =============================================================================
// FORM
// =============================================================================

#[derive(Clone, Debug, Default)]
pub struct ProjectForm {
    values: ProjectSubmission,
    step: FormStep,
    open: bool,
    reset_pending: bool,
    error: Option<FormError>,
    /// Value a field held before the last assistant rewrite.
    undo: Option<(TextField, String)>,
}

impl ProjectForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub fn step(&self) -> FormStep {
        self.step
    }

    #[must_use]
    pub fn values(&self) -> &ProjectSubmission {
        &self.values
    }

    /// The inline error currently shown, if any.
    #[must_use]
    pub fn error(&self) -> Option<&FormError> {
        self.error.as_ref()
    }

    /// Open the form and hydrate it from `record`. Returns `false` (and
    /// touches nothing) when the form is already open.
    pub fn open(&mut self, record: &IntentRecord) -> bool {
        if self.open {
            return false;
        }
        if self.reset_pending {
            self.reset();
        }
        self.open = true;
        let filled = self.hydrate(record);
        debug!(filled, "form: opened");
        true
    }

    /// Close the form. The values stay until [`Self::finish_close`] runs
    /// after [`FORM_RESET_DELAY`].
    pub fn close(&mut self) -> bool {
        if !self.open {
            return false;
        }
        self.open = false;
        self.reset_pending = true;
        true
    }

    /// Complete a close by resetting every field and the step. Does nothing
    /// if the form was reopened in the meantime.
    pub fn finish_close(&mut self) -> bool {
        if self.open || !self.reset_pending {
            return false;
        }
        self.reset();
        true
    }

    /// Clear every field and return to the first step while staying open.
    pub fn start_new(&mut self) {
        self.reset();
        debug!("form: started new");
    }

    fn reset(&mut self) {
        self.values = ProjectSubmission::default();
        self.step = FormStep::Contact;
        self.error = None;
        self.reset_pending = false;
        self.undo = None;
    }

    /// Fill every field still at its initial value. Returns how many were set.
    fn hydrate(&mut self, record: &IntentRecord) -> usize {
        let IntentRecord { company_info, goals, scope, timeline, contact, extra: _ } = record;
        let CompanyInfo { name: company_name, industry, size, description } = company_info;
        let Goals { primary, secondary } = goals;
        let Scope { features, platforms } = scope;
        let Timeline { expected_start, deadline } = timeline;
        let Contact { name: contact_name, email, phone } = contact;

        let v = &mut self.values;
        [
            fill_if_initial(&mut v.contact_name, contact_name.as_ref()),
            fill_if_initial(&mut v.email, email.as_ref()),
            fill_if_initial(&mut v.phone, phone.as_ref()),
            fill_if_initial(&mut v.company_name, company_name.as_ref()),
            fill_if_initial(&mut v.industry, industry.as_ref()),
            fill_if_initial(&mut v.company_size, size.as_ref()),
            fill_if_initial(&mut v.description, description.as_ref()),
            fill_if_initial(&mut v.primary_goal, primary.as_ref()),
            fill_if_initial(&mut v.expected_start, expected_start.as_ref()),
            fill_if_initial(&mut v.deadline, deadline.as_ref()),
            fill_list_if_initial(&mut v.secondary_goals, secondary),
            fill_list_if_initial(&mut v.features, features),
            fill_list_if_initial(&mut v.platforms, platforms),
        ]
        .into_iter()
        .filter(|changed| *changed)
        .count()
    }

    fn clear_error_for(&mut self, field: FormField) {
        if self.error.is_some_and(|e| e.field == field) {
            self.error = None;
        }
    }

    pub fn set_text(&mut self, field: TextField, value: impl Into<String>) {
        *self.values.text_mut(field) = value.into();
        self.clear_error_for(FormField::Text(field));
    }

    pub fn set_list(&mut self, field: ListField, values: Vec<String>) {
        *self.values.list_mut(field) = values;
        self.clear_error_for(FormField::List(field));
    }

    /// Replace a field with assistant-rewritten text, keeping the previous
    /// value for [`Self::undo_refine`]. Identical or blank text is ignored.
    pub fn apply_refined(&mut self, field: TextField, text: String) -> bool {
        if text.trim().is_empty() || text == self.values.text(field) {
            return false;
        }
        let previous = std::mem::replace(self.values.text_mut(field), text);
        self.undo = Some((field, previous));
        self.clear_error_for(FormField::Text(field));
        true
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.undo.is_some()
    }

    /// Restore the value replaced by the last [`Self::apply_refined`].
    pub fn undo_refine(&mut self) -> bool {
        match self.undo.take() {
            Some((field, previous)) => {
                *self.values.text_mut(field) = previous;
                true
            }
            None => false,
        }
    }

    /// Append a paragraph to the notes field.
    pub fn append_note(&mut self, text: &str) {
        let notes = &mut self.values.notes;
        if !notes.is_empty() {
            notes.push_str("\n\n");
        }
        notes.push_str(text);
    }

    /// Add `item` to the list if absent, remove it if present.
    pub fn toggle_item(&mut self, field: ListField, item: &str) {
        let list = self.values.list_mut(field);
        if let Some(pos) = list.iter().position(|v| v == item) {
            list.remove(pos);
        } else {
            list.push(item.to_owned());
        }
        self.clear_error_for(FormField::List(field));
        if field == ListField::Platforms {
            self.clear_error_for(FormField::List(ListField::Features));
        }
    }

    /// Validate the current step and move forward.
    ///
    /// # Errors
    ///
    /// Returns the validation failure, which also stays visible through
    /// [`Self::error`]; the step does not change.
    pub fn advance(&mut self) -> Result<FormStep, FormError> {
        if let Err(err) = self.values.validate_step(self.step) {
            self.error = Some(err);
            return Err(err);
        }
        self.error = None;
        if let Some(next) = self.step.next() {
            self.step = next;
        }
        Ok(self.step)
    }

    /// Move one step back without validating.
    pub fn back(&mut self) -> FormStep {
        if let Some(prev) = self.step.prev() {
            self.step = prev;
        }
        self.error = None;
        self.step
    }

    /// Validate everything and hand out the collected values.
    ///
    /// # Errors
    ///
    /// On failure the form jumps to the step owning the failing field and
    /// shows the error there.
    pub fn submit(&mut self) -> Result<ProjectSubmission, FormError> {
        if let Err(err) = self.values.validate() {
            self.step = err.field.step();
            self.error = Some(err);
            return Err(err);
        }
        self.error = None;
        Ok(self.values.clone())
    }
}
