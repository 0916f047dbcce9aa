//! Single-choice and scale steps: a tap records the option and advances.

use crate::error::WizardError;
use crate::wizard::answers::{Answer, AnswerKey, AnswerStore};
use crate::wizard::catalog::Step;

use super::{Interaction, StepOutcome, ensure_offered, mismatch};

pub(super) fn handle(
    step: &Step,
    options: &[String],
    answers: &mut AnswerStore,
    interaction: Interaction,
) -> Result<StepOutcome, WizardError> {
    match interaction {
        Interaction::ChooseOption(option) => {
            ensure_offered(step, options, &option)?;
            answers.set(AnswerKey::Step(step.id), Answer::Text(option));
            Ok(StepOutcome::Advance)
        }
        other => Err(mismatch(step, &other)),
    }
}
