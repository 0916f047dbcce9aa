//! Phone step: optional number with country code and WhatsApp consent.
//!
//! Rules on "Weiter", in order:
//! 1. consent given but no number: inline error, stay;
//! 2. no number, no consent: record [`PHONE_FALLBACK`] and advance;
//! 3. at least [`PHONE_MIN_LENGTH`] characters: record `"<code> <number>"`;
//! 4. anything shorter keeps the action disabled without a message.

use crate::error::WizardError;
use crate::wizard::answers::{Answer, AnswerKey, AnswerStore};
use crate::wizard::catalog::Step;
use crate::wizard::draft::{COUNTRY_CODES, Drafts, StepDraft};

use super::{Interaction, StepOutcome, mismatch};

/// Recorded when the visitor skips the optional number.
pub const PHONE_FALLBACK: &str = "Nicht angegeben";

/// Shortest number length that can be submitted.
pub const PHONE_MIN_LENGTH: usize = 6;

pub const PHONE_REQUIRED_FOR_WHATSAPP: &str =
    "Bitte trage Deine Telefonnummer ein, damit wir Dich per WhatsApp kontaktieren können.";

pub(super) fn handle(
    step: &Step,
    answers: &mut AnswerStore,
    drafts: &mut Drafts,
    interaction: Interaction,
) -> Result<StepOutcome, WizardError> {
    match interaction {
        Interaction::SetCountryCode(code) => {
            // Free input only in manual mode; otherwise one of the presets.
            if !drafts.phone.manual_code && !COUNTRY_CODES.iter().any(|c| c.code == code) {
                return Err(WizardError::UnknownOption {
                    step_id: step.id,
                    option: code,
                });
            }
            drafts.phone.country_code = code;
            Ok(StepOutcome::Updated)
        }
        Interaction::ToggleManualCountryCode => {
            drafts.phone.toggle_manual();
            Ok(StepOutcome::Updated)
        }
        Interaction::EditPhoneNumber(raw) => {
            drafts.step.set_phone_number(&raw);
            Ok(StepOutcome::Updated)
        }
        Interaction::SetWhatsAppConsent(consent) => {
            drafts.phone.whatsapp_consent = consent;
            Ok(StepOutcome::Updated)
        }
        Interaction::Continue => {
            if !can_continue(&drafts.step) {
                return Ok(StepOutcome::Blocked);
            }
            drafts.step.validation_error = None;

            let number = &drafts.step.phone_number;
            if number.trim().is_empty() {
                if drafts.phone.whatsapp_consent {
                    drafts.step.validation_error = Some(PHONE_REQUIRED_FOR_WHATSAPP.to_string());
                    return Ok(StepOutcome::Invalid(PHONE_REQUIRED_FOR_WHATSAPP.to_string()));
                }
                answers.set(AnswerKey::Step(step.id), Answer::Text(PHONE_FALLBACK.to_string()));
                return Ok(StepOutcome::Advance);
            }

            let formatted = format!("{} {}", drafts.phone.country_code, number);
            answers.set(AnswerKey::Step(step.id), Answer::Text(formatted));
            Ok(StepOutcome::Advance)
        }
        other => Err(mismatch(step, &other)),
    }
}

/// Disabled only while a started number is still too short.
pub(super) fn can_continue(draft: &StepDraft) -> bool {
    let len = draft.phone_number.chars().count();
    len == 0 || len >= PHONE_MIN_LENGTH
}
