//! Free-text steps. The action stays disabled while the trimmed text is empty
//! or, on the terminal step, while privacy consent is missing.

use crate::error::WizardError;
use crate::wizard::answers::{Answer, AnswerKey, AnswerStore};
use crate::wizard::catalog::Step;
use crate::wizard::draft::StepDraft;

use super::{Interaction, StepOutcome, mismatch};

pub(super) fn handle(
    step: &Step,
    requires_privacy_consent: bool,
    answers: &mut AnswerStore,
    draft: &mut StepDraft,
    interaction: Interaction,
) -> Result<StepOutcome, WizardError> {
    match interaction {
        Interaction::EditText(text) => {
            draft.text = text;
            Ok(StepOutcome::Updated)
        }
        Interaction::SetPrivacyConsent(accepted) if requires_privacy_consent => {
            draft.privacy_accepted = accepted;
            Ok(StepOutcome::Updated)
        }
        Interaction::Continue => {
            if !can_continue(requires_privacy_consent, draft) {
                return Ok(StepOutcome::Blocked);
            }
            answers.set(AnswerKey::Step(step.id), Answer::Text(draft.text.clone()));
            Ok(StepOutcome::Advance)
        }
        other => Err(mismatch(step, &other)),
    }
}

pub(super) fn can_continue(requires_privacy_consent: bool, draft: &StepDraft) -> bool {
    !draft.text.trim().is_empty() && (!requires_privacy_consent || draft.privacy_accepted)
}
