//! Contact verification: a non-empty name and a syntactically valid email.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::WizardError;
use crate::wizard::answers::{Answer, AnswerKey, AnswerStore, ContactDetails};
use crate::wizard::catalog::Step;
use crate::wizard::draft::ContactDraft;

use super::{Interaction, StepOutcome, mismatch};

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// `local@domain.tld`, no whitespace anywhere.
fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

pub(super) fn handle(
    step: &Step,
    answers: &mut AnswerStore,
    contact: &mut ContactDraft,
    interaction: Interaction,
) -> Result<StepOutcome, WizardError> {
    match interaction {
        Interaction::EditFirstName(name) => {
            contact.first_name = name;
            Ok(StepOutcome::Updated)
        }
        Interaction::EditEmail(email) => {
            contact.email = email;
            Ok(StepOutcome::Updated)
        }
        Interaction::Continue => {
            if !can_continue(contact) {
                return Ok(StepOutcome::Blocked);
            }
            answers.set(
                AnswerKey::Step(step.id),
                Answer::Contact(ContactDetails::new(&contact.first_name, &contact.email)),
            );
            Ok(StepOutcome::Advance)
        }
        other => Err(mismatch(step, &other)),
    }
}

pub(super) fn can_continue(contact: &ContactDraft) -> bool {
    !contact.first_name.trim().is_empty() && is_valid_email(&contact.email)
}
