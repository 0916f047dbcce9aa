//! Wizard session — the step cursor, answer store and drafts of one visitor.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::WizardError;

use super::answers::{Answer, AnswerKey, AnswerStore, ContactDetails};
use super::catalog::{HostContext, OTHER_OPTION, Step, StepCatalog, StepCopy};
use super::draft::Drafts;
use super::handlers::{self, Interaction, StepOutcome};
use super::navigation::{NavEvent, NavTarget, next_position};

/// Result of one interaction or navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Still on the same step. `Updated`, `Blocked` or `Invalid`.
    Stayed(StepOutcome),
    /// The cursor moved.
    Moved { from: usize, to: usize },
    /// The last step was answered; the completion sequence must run.
    Finished,
}

/// In-memory state of one wizard mount.
#[derive(Debug, Clone)]
pub struct WizardSession {
    id: Uuid,
    catalog: Arc<StepCatalog>,
    host: HostContext,
    current: usize,
    answers: AnswerStore,
    drafts: Drafts,
    /// Set once the completion sequence has been started.
    submitted: bool,
    /// Drives the in-page thank-you view. The standard completion sequence
    /// redirects instead and leaves this unset.
    completed: bool,
}

impl WizardSession {
    pub fn new(
        catalog: Arc<StepCatalog>,
        host: HostContext,
        identity: Option<&ContactDetails>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            catalog,
            host,
            current: 0,
            answers: AnswerStore::new(),
            drafts: Drafts::seeded(identity),
            submitted: false,
            completed: false,
        }
    }

    /// Carried-over identity that arrived after mount. Fills empty fields only.
    pub fn provide_identity(&mut self, identity: &ContactDetails) {
        self.drafts.contact.fill_missing(identity);
    }

    /// Apply a visitor interaction to the current step.
    pub fn interact(&mut self, interaction: Interaction) -> Result<Transition, WizardError> {
        self.ensure_open()?;

        let step = self.catalog.step_at(self.current);
        let outcome = handlers::handle(step, &mut self.answers, &mut self.drafts, interaction)?;
        if let StepOutcome::Invalid(message) = &outcome {
            tracing::debug!(session = %self.id, step = step.id, %message, "Step validation failed");
        }

        match outcome {
            StepOutcome::Advance => self.advance(),
            other => Ok(Transition::Stayed(other)),
        }
    }

    /// Leave the current step forward.
    ///
    /// Persists a pending "Sonstige" elaboration first. Does not validate the
    /// current step: validated advancing goes through [`Self::interact`].
    pub fn advance(&mut self) -> Result<Transition, WizardError> {
        self.ensure_open()?;
        self.persist_other_text();

        match next_position(self.current, self.catalog.last_index(), NavEvent::Advance) {
            NavTarget::Step(to) => Ok(self.move_to(to)),
            NavTarget::Complete => {
                self.submitted = true;
                tracing::debug!(session = %self.id, answers = self.answers.len(), "Last step answered");
                Ok(Transition::Finished)
            }
            NavTarget::Stay => Ok(Transition::Stayed(StepOutcome::Updated)),
        }
    }

    /// Go back one step. No-op on the first step. Answers are kept.
    pub fn retreat(&mut self) -> Result<Transition, WizardError> {
        self.ensure_open()?;

        match next_position(self.current, self.catalog.last_index(), NavEvent::Retreat) {
            NavTarget::Step(to) => Ok(self.move_to(to)),
            NavTarget::Stay | NavTarget::Complete => Ok(Transition::Stayed(StepOutcome::Updated)),
        }
    }

    /// Switch to the in-page confirmation view instead of a redirect.
    pub fn mark_completed(&mut self) {
        self.completed = true;
    }

    fn move_to(&mut self, to: usize) -> Transition {
        let from = self.current;
        self.current = to;
        self.drafts.step.reset();
        tracing::debug!(
            session = %self.id,
            from = self.catalog.step_at(from).id,
            to = self.catalog.step_at(to).id,
            "Step changed"
        );
        Transition::Moved { from, to }
    }

    fn persist_other_text(&mut self) {
        let step = self.catalog.step_at(self.current);
        if !step.allows_other() {
            return;
        }
        let other_selected = self
            .answers
            .selection(step.id)
            .iter()
            .any(|o| o == OTHER_OPTION);
        let text = &self.drafts.step.other_text;
        if other_selected && !text.trim().is_empty() {
            self.answers
                .set(AnswerKey::Other(step.id), Answer::Text(text.clone()));
        }
    }

    fn ensure_open(&self) -> Result<(), WizardError> {
        if self.submitted {
            return Err(WizardError::AlreadySubmitted);
        }
        Ok(())
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn host(&self) -> HostContext {
        self.host
    }

    pub fn catalog(&self) -> &StepCatalog {
        &self.catalog
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_step(&self) -> &Step {
        self.catalog.step_at(self.current)
    }

    /// Copy of the current step for this host context.
    pub fn current_copy(&self) -> &StepCopy {
        self.current_step().copy_for(self.host)
    }

    pub fn is_last_step(&self) -> bool {
        self.current == self.catalog.last_index()
    }

    pub fn answers(&self) -> &AnswerStore {
        &self.answers
    }

    pub fn drafts(&self) -> &Drafts {
        &self.drafts
    }

    pub fn validation_error(&self) -> Option<&str> {
        self.drafts.step.validation_error.as_deref()
    }

    /// Whether the current step's primary action is enabled.
    pub fn can_continue(&self) -> bool {
        handlers::can_continue(self.current_step(), &self.drafts)
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::catalog::step_ids;
    use crate::wizard::handlers::SELECTION_REQUIRED;

    fn session() -> WizardSession {
        WizardSession::new(
            Arc::new(StepCatalog::funnel_default()),
            HostContext::Standalone,
            None,
        )
    }

    fn first_option(session: &WizardSession) -> String {
        session.current_step().options()[0].clone()
    }

    #[test]
    fn multi_choice_needs_selection() {
        let mut s = session();
        let t = s.interact(Interaction::Continue).unwrap();
        assert_eq!(
            t,
            Transition::Stayed(StepOutcome::Invalid(SELECTION_REQUIRED.to_string()))
        );
        assert_eq!(s.current_index(), 0);
        assert_eq!(s.validation_error(), Some(SELECTION_REQUIRED));
    }

    #[test]
    fn single_choice_advances_immediately() {
        let mut s = session();
        for _ in 0..2 {
            let option = first_option(&s);
            s.interact(Interaction::ToggleOption(option)).unwrap();
            s.interact(Interaction::Continue).unwrap();
        }
        assert_eq!(s.current_step().id, step_ids::SITUATION_RATING);

        let t = s.interact(Interaction::ChooseOption("7".into())).unwrap();
        assert_eq!(t, Transition::Moved { from: 2, to: 3 });
        assert_eq!(s.answers().text(step_ids::SITUATION_RATING), Some("7"));
    }

    #[test]
    fn step_change_resets_draft_but_not_answers() {
        let mut s = session();
        let option = first_option(&s);
        s.interact(Interaction::Continue).unwrap();
        assert!(s.validation_error().is_some());

        s.interact(Interaction::ToggleOption(option.clone())).unwrap();
        s.interact(Interaction::Continue).unwrap();
        assert_eq!(s.current_index(), 1);
        assert!(s.validation_error().is_none());

        s.retreat().unwrap();
        assert_eq!(s.current_index(), 0);
        assert_eq!(s.answers().selection(step_ids::CHALLENGE), [option]);

        s.interact(Interaction::Continue).unwrap();
        assert_eq!(s.current_index(), 1);
    }

    #[test]
    fn retreat_at_first_step_is_noop() {
        let mut s = session();
        assert_eq!(
            s.retreat().unwrap(),
            Transition::Stayed(StepOutcome::Updated)
        );
        assert_eq!(s.current_index(), 0);
    }

    #[test]
    fn other_text_persisted_only_when_selected_and_non_blank() {
        let mut s = session();
        for _ in 0..2 {
            s.advance().unwrap();
        }
        s.interact(Interaction::ChooseOption("5".into())).unwrap();
        s.interact(Interaction::ChooseOption("Nein".into())).unwrap();
        assert_eq!(s.current_step().id, step_ids::METABOLIC_DISEASES);

        // Typed but "Sonstige" not selected: dropped.
        s.interact(Interaction::ToggleOption("PCOS".into())).unwrap();
        s.interact(Interaction::EditOtherText("Gicht".into())).unwrap();
        s.interact(Interaction::Continue).unwrap();
        assert!(s.answers().other_text(step_ids::METABOLIC_DISEASES).is_none());

        s.retreat().unwrap();
        s.interact(Interaction::ToggleOption(OTHER_OPTION.into())).unwrap();
        s.interact(Interaction::EditOtherText("   ".into())).unwrap();
        s.interact(Interaction::Continue).unwrap();
        assert!(s.answers().other_text(step_ids::METABOLIC_DISEASES).is_none());

        s.retreat().unwrap();
        s.interact(Interaction::EditOtherText("Gicht".into())).unwrap();
        s.interact(Interaction::Continue).unwrap();
        assert_eq!(
            s.answers().other_text(step_ids::METABOLIC_DISEASES),
            Some("Gicht")
        );
    }

    #[test]
    fn country_code_and_consent_survive_navigation() {
        let mut s = session();
        while s.current_step().id != step_ids::PHONE {
            s.advance().unwrap();
        }
        s.interact(Interaction::SetCountryCode("+43".into())).unwrap();
        s.interact(Interaction::SetWhatsAppConsent(true)).unwrap();
        s.interact(Interaction::EditPhoneNumber("0664".into())).unwrap();

        s.retreat().unwrap();
        s.advance().unwrap();
        assert_eq!(s.current_step().id, step_ids::PHONE);
        assert_eq!(s.drafts().phone.country_code, "+43");
        assert!(s.drafts().phone.whatsapp_consent);
        assert!(s.drafts().step.phone_number.is_empty());
    }

    #[test]
    fn finishing_closes_the_session() {
        let mut s = session();
        while !s.is_last_step() {
            s.advance().unwrap();
        }
        s.interact(Interaction::EditText("abends".into())).unwrap();
        s.interact(Interaction::SetPrivacyConsent(true)).unwrap();
        let t = s.interact(Interaction::Continue).unwrap();
        assert_eq!(t, Transition::Finished);
        assert!(s.is_submitted());
        assert!(!s.is_completed());
        assert_eq!(s.answers().text(step_ids::AVAILABILITY), Some("abends"));

        assert!(matches!(
            s.interact(Interaction::Continue),
            Err(WizardError::AlreadySubmitted)
        ));
        assert!(matches!(s.retreat(), Err(WizardError::AlreadySubmitted)));
    }

    #[test]
    fn identity_prefills_contact() {
        let identity = ContactDetails::new("Anna", "a@b.de");
        let mut s = WizardSession::new(
            Arc::new(StepCatalog::funnel_default()),
            HostContext::Embedded,
            None,
        );
        s.provide_identity(&identity);
        while s.current_step().id != step_ids::CONTACT {
            s.advance().unwrap();
        }
        assert!(s.can_continue());
        assert_eq!(
            s.current_copy().question,
            "Verrätst Du uns Deinen Namen & Deine E-Mail?"
        );
        s.interact(Interaction::Continue).unwrap();
        assert_eq!(s.answers().contact(step_ids::CONTACT), Some(&identity));
    }
}
