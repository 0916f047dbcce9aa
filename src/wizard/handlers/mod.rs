//! Per-kind input handlers.
//!
//! Each step kind has exactly one handler, selected by an exhaustive match on
//! [`StepKind`]. A handler updates the draft, records an answer when its rules
//! allow it, and reports what the navigation controller should do next.

mod choice;
mod contact;
mod free_text;
mod multi_choice;
mod phone;

pub use multi_choice::SELECTION_REQUIRED;
pub use phone::{PHONE_FALLBACK, PHONE_REQUIRED_FOR_WHATSAPP};

use crate::error::WizardError;

use super::answers::AnswerStore;
use super::catalog::{Step, StepKind};
use super::draft::Drafts;

/// Primary action label for most steps.
pub const CONTINUE_LABEL: &str = "Weiter";
/// Primary action label of the terminal text step.
pub const SUBMIT_LABEL: &str = "Absenden";

/// A discrete visitor interaction with the current step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    /// Tap an option of a single-choice or scale step.
    ChooseOption(String),
    /// Toggle an option of a multiple-choice step.
    ToggleOption(String),
    /// Replace the free-text body.
    EditText(String),
    /// Replace the "Sonstige" elaboration.
    EditOtherText(String),
    SetPrivacyConsent(bool),
    EditFirstName(String),
    EditEmail(String),
    /// Pick a preset code, or type one in manual mode.
    SetCountryCode(String),
    ToggleManualCountryCode,
    /// Replace the phone number; input is filtered.
    EditPhoneNumber(String),
    SetWhatsAppConsent(bool),
    /// The primary action ("Weiter" / "Absenden").
    Continue,
}

impl std::fmt::Display for Interaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::ChooseOption(_) => "choose_option",
            Self::ToggleOption(_) => "toggle_option",
            Self::EditText(_) => "edit_text",
            Self::EditOtherText(_) => "edit_other_text",
            Self::SetPrivacyConsent(_) => "set_privacy_consent",
            Self::EditFirstName(_) => "edit_first_name",
            Self::EditEmail(_) => "edit_email",
            Self::SetCountryCode(_) => "set_country_code",
            Self::ToggleManualCountryCode => "toggle_manual_country_code",
            Self::EditPhoneNumber(_) => "edit_phone_number",
            Self::SetWhatsAppConsent(_) => "set_whatsapp_consent",
            Self::Continue => "continue",
        };
        write!(f, "{s}")
    }
}

/// What a handler decided for one interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Draft or selection changed; stay on the step.
    Updated,
    /// An answer was recorded; move on.
    Advance,
    /// The primary action is disabled for the current input. No message.
    Blocked,
    /// Validation failed; the message is shown inline.
    Invalid(String),
}

/// Apply `interaction` to the current `step`.
pub fn handle(
    step: &Step,
    answers: &mut AnswerStore,
    drafts: &mut Drafts,
    interaction: Interaction,
) -> Result<StepOutcome, WizardError> {
    match &step.kind {
        StepKind::SingleChoice { options } | StepKind::Scale { options, .. } => {
            choice::handle(step, options, answers, interaction)
        }
        StepKind::MultipleChoice { options, .. } => {
            multi_choice::handle(step, options, answers, &mut drafts.step, interaction)
        }
        StepKind::FreeText {
            requires_privacy_consent,
        } => free_text::handle(
            step,
            *requires_privacy_consent,
            answers,
            &mut drafts.step,
            interaction,
        ),
        StepKind::ContactVerification => {
            contact::handle(step, answers, &mut drafts.contact, interaction)
        }
        StepKind::Phone => phone::handle(step, answers, drafts, interaction),
    }
}

/// Whether the primary action is currently enabled.
///
/// Single-choice and scale steps have no primary action; tapping an option
/// advances directly, so they report `false`.
pub fn can_continue(step: &Step, drafts: &Drafts) -> bool {
    match &step.kind {
        StepKind::SingleChoice { .. } | StepKind::Scale { .. } => false,
        // Always clickable; an empty selection is reported on click.
        StepKind::MultipleChoice { .. } => true,
        StepKind::FreeText {
            requires_privacy_consent,
        } => free_text::can_continue(*requires_privacy_consent, &drafts.step),
        StepKind::ContactVerification => contact::can_continue(&drafts.contact),
        StepKind::Phone => phone::can_continue(&drafts.step),
    }
}

/// Label of the primary action, if the step has one.
pub fn action_label(step: &Step) -> Option<&'static str> {
    match &step.kind {
        StepKind::SingleChoice { .. } | StepKind::Scale { .. } => None,
        StepKind::FreeText {
            requires_privacy_consent: true,
        } => Some(SUBMIT_LABEL),
        StepKind::MultipleChoice { .. }
        | StepKind::FreeText { .. }
        | StepKind::ContactVerification
        | StepKind::Phone => Some(CONTINUE_LABEL),
    }
}

fn mismatch(step: &Step, interaction: &Interaction) -> WizardError {
    WizardError::InteractionMismatch {
        step_id: step.id,
        kind: step.kind.to_string(),
        interaction: interaction.to_string(),
    }
}

fn ensure_offered(step: &Step, options: &[String], option: &str) -> Result<(), WizardError> {
    if options.iter().any(|o| o == option) {
        Ok(())
    } else {
        Err(WizardError::UnknownOption {
            step_id: step.id,
            option: option.to_string(),
        })
    }
}
