//! Multiple-choice steps: options toggle, "Weiter" needs a non-empty selection.
//!
//! The "Sonstige" elaboration is only held in the draft here. The navigation
//! controller persists it when the step is left.

use crate::error::WizardError;
use crate::wizard::answers::{Answer, AnswerKey, AnswerStore};
use crate::wizard::catalog::Step;
use crate::wizard::draft::StepDraft;

use super::{Interaction, StepOutcome, ensure_offered, mismatch};

/// Shown when "Weiter" is pressed with nothing selected.
pub const SELECTION_REQUIRED: &str = "Bitte wähle eine Option aus, um fortfahren zu können";

pub(super) fn handle(
    step: &Step,
    options: &[String],
    answers: &mut AnswerStore,
    draft: &mut StepDraft,
    interaction: Interaction,
) -> Result<StepOutcome, WizardError> {
    match interaction {
        Interaction::ToggleOption(option) => {
            ensure_offered(step, options, &option)?;
            draft.validation_error = None;

            let mut selection = answers.selection(step.id).to_vec();
            match selection.iter().position(|o| *o == option) {
                Some(pos) => {
                    selection.remove(pos);
                }
                None => selection.push(option),
            }
            answers.set(AnswerKey::Step(step.id), Answer::Selection(selection));
            Ok(StepOutcome::Updated)
        }
        Interaction::EditOtherText(text) if step.allows_other() => {
            draft.other_text = text;
            Ok(StepOutcome::Updated)
        }
        Interaction::Continue => {
            if answers.selection(step.id).is_empty() {
                draft.validation_error = Some(SELECTION_REQUIRED.to_string());
                return Ok(StepOutcome::Invalid(SELECTION_REQUIRED.to_string()));
            }
            Ok(StepOutcome::Advance)
        }
        other => Err(mismatch(step, &other)),
    }
}
