//! Render-ready snapshot of a session for hosts.

use serde::Serialize;

use super::catalog::{OTHER_OPTION, StepKind};
use super::draft::{COUNTRY_CODES, CountryCode};
use super::handlers;
use super::session::WizardSession;

/// Shown under the first step.
pub const SECURITY_FOOTER: &str = "Deine Daten werden sicher verschlüsselt.";
pub const PRIVACY_CONSENT_LABEL: &str =
    "Ich habe die Datenschutzbestimmungen gelesen und stimme diesen zu.";
pub const THANK_YOU_TITLE: &str = "Vielen Dank!";
pub const THANK_YOU_MESSAGE: &str =
    "Wir haben Deine Antworten erhalten und werden sie berücksichtigen.";

/// What the host should render right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum WizardView {
    Step(StepView),
    ThankYou { title: String, message: String },
}

impl WizardView {
    pub fn of(session: &WizardSession) -> Self {
        if session.is_completed() {
            return Self::ThankYou {
                title: THANK_YOU_TITLE.to_string(),
                message: THANK_YOU_MESSAGE.to_string(),
            };
        }
        Self::Step(StepView::of(session))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepView {
    pub step_id: u32,
    pub index: usize,
    pub step_count: usize,
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtext: Option<String>,
    pub input: InputView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<ActionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_error: Option<String>,
    pub show_back: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<&'static str>,
    /// Only on the last step.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<ProgressBanner>,
}

/// Kind-specific input controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum InputView {
    Choice {
        options: Vec<OptionView>,
        multiple: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        min_label: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max_label: Option<String>,
        /// Present while "Sonstige" is selected on a step that allows it.
        #[serde(skip_serializing_if = "Option::is_none")]
        other_text: Option<String>,
    },
    Text {
        text: String,
        /// `Some` when the step requires privacy consent.
        #[serde(skip_serializing_if = "Option::is_none")]
        privacy_accepted: Option<bool>,
    },
    Contact {
        first_name: String,
        email: String,
    },
    Phone {
        presets: Vec<CountryCode>,
        country_code: String,
        manual_code: bool,
        number: String,
        whatsapp_consent: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionView {
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionView {
    pub label: &'static str,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressBanner {
    pub title: &'static str,
    pub percent: u8,
    pub caption: &'static str,
}

impl ProgressBanner {
    pub fn last_step() -> Self {
        Self {
            title: "Fast geschafft",
            percent: 97,
            caption: "Nur noch ein Klick",
        }
    }
}

impl StepView {
    pub fn of(session: &WizardSession) -> Self {
        let step = session.current_step();
        let copy = session.current_copy();
        let index = session.current_index();

        Self {
            step_id: step.id,
            index,
            step_count: session.catalog().step_count(),
            question: copy.question.clone(),
            subtext: copy.subtext.clone(),
            input: InputView::of(session),
            action: handlers::action_label(step).map(|label| ActionView {
                label,
                enabled: session.can_continue(),
            }),
            validation_error: session.validation_error().map(str::to_string),
            show_back: index > 0,
            footer: (index == 0).then_some(SECURITY_FOOTER),
            progress: session.is_last_step().then(ProgressBanner::last_step),
        }
    }
}

impl InputView {
    fn of(session: &WizardSession) -> Self {
        let step = session.current_step();
        let answers = session.answers();
        let drafts = session.drafts();

        let options = |selected: &dyn Fn(&str) -> bool| -> Vec<OptionView> {
            step.options()
                .iter()
                .map(|label| OptionView {
                    label: label.clone(),
                    selected: selected(label.as_str()),
                })
                .collect()
        };
        let chosen = answers.text(step.id);

        match &step.kind {
            StepKind::SingleChoice { .. } => Self::Choice {
                options: options(&|o: &str| chosen == Some(o)),
                multiple: false,
                min_label: None,
                max_label: None,
                other_text: None,
            },
            StepKind::Scale {
                min_label,
                max_label,
                ..
            } => Self::Choice {
                options: options(&|o: &str| chosen == Some(o)),
                multiple: false,
                min_label: min_label.clone(),
                max_label: max_label.clone(),
                other_text: None,
            },
            StepKind::MultipleChoice { allows_other, .. } => {
                let selection = answers.selection(step.id);
                let other_open = *allows_other && selection.iter().any(|o| o == OTHER_OPTION);
                Self::Choice {
                    options: options(&|o: &str| selection.iter().any(|s| s == o)),
                    multiple: true,
                    min_label: None,
                    max_label: None,
                    other_text: other_open.then(|| drafts.step.other_text.clone()),
                }
            }
            StepKind::FreeText {
                requires_privacy_consent,
            } => Self::Text {
                text: drafts.step.text.clone(),
                privacy_accepted: requires_privacy_consent.then_some(drafts.step.privacy_accepted),
            },
            StepKind::ContactVerification => Self::Contact {
                first_name: drafts.contact.first_name.clone(),
                email: drafts.contact.email.clone(),
            },
            StepKind::Phone => Self::Phone {
                presets: COUNTRY_CODES.to_vec(),
                country_code: drafts.phone.country_code.clone(),
                manual_code: drafts.phone.manual_code,
                number: drafts.step.phone_number.clone(),
                whatsapp_consent: drafts.phone.whatsapp_consent,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::wizard::answers::ContactDetails;
    use crate::wizard::catalog::{HostContext, StepCatalog, step_ids};
    use crate::wizard::handlers::{CONTINUE_LABEL, Interaction, SUBMIT_LABEL};

    fn session() -> WizardSession {
        WizardSession::new(
            Arc::new(StepCatalog::funnel_default()),
            HostContext::Standalone,
            None,
        )
    }

    fn step_view(session: &WizardSession) -> StepView {
        match WizardView::of(session) {
            WizardView::Step(view) => view,
            other => panic!("expected step view, got {other:?}"),
        }
    }

    #[test]
    fn first_step_has_footer_and_no_back() {
        let s = session();
        let view = step_view(&s);
        assert_eq!(view.index, 0);
        assert_eq!(view.step_count, 9);
        assert!(!view.show_back);
        assert_eq!(view.footer, Some(SECURITY_FOOTER));
        assert!(view.progress.is_none());
        assert_eq!(
            view.action,
            Some(ActionView {
                label: CONTINUE_LABEL,
                enabled: true
            })
        );
    }

    #[test]
    fn selection_and_other_field_visibility() {
        let mut s = session();
        while s.current_step().id != step_ids::METABOLIC_DISEASES {
            s.advance().unwrap();
        }
        s.interact(Interaction::ToggleOption("PCOS".into())).unwrap();
        let InputView::Choice {
            options, other_text, ..
        } = step_view(&s).input
        else {
            panic!("expected choice input");
        };
        assert!(options.iter().any(|o| o.label == "PCOS" && o.selected));
        assert!(other_text.is_none());

        s.interact(Interaction::ToggleOption(OTHER_OPTION.into())).unwrap();
        s.interact(Interaction::EditOtherText("Gicht".into())).unwrap();
        let view = step_view(&s);
        assert!(view.show_back);
        assert!(view.footer.is_none());
        let InputView::Choice { other_text, .. } = view.input else {
            panic!("expected choice input");
        };
        assert_eq!(other_text.as_deref(), Some("Gicht"));
    }

    #[test]
    fn single_choice_has_no_action_and_marks_answer() {
        let mut s = session();
        while s.current_step().id != step_ids::EATING_DISORDER {
            s.advance().unwrap();
        }
        s.interact(Interaction::ChooseOption("Nein".into())).unwrap();
        s.retreat().unwrap();

        let view = step_view(&s);
        assert!(view.action.is_none());
        let InputView::Choice { options, .. } = view.input else {
            panic!("expected choice input");
        };
        let selected: Vec<_> = options.iter().filter(|o| o.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].label, "Nein");
    }

    #[test]
    fn last_step_shows_banner_and_submit_label() {
        let mut s = session();
        while !s.is_last_step() {
            s.advance().unwrap();
        }
        let view = step_view(&s);
        assert_eq!(view.progress, Some(ProgressBanner::last_step()));
        assert_eq!(
            view.action,
            Some(ActionView {
                label: SUBMIT_LABEL,
                enabled: false
            })
        );
        assert_eq!(
            view.input,
            InputView::Text {
                text: String::new(),
                privacy_accepted: Some(false)
            }
        );

        s.interact(Interaction::EditText("abends".into())).unwrap();
        s.interact(Interaction::SetPrivacyConsent(true)).unwrap();
        assert_eq!(step_view(&s).action.map(|a| a.enabled), Some(true));
    }

    #[test]
    fn contact_fields_are_prefilled() {
        let identity = ContactDetails::new("Anna", "anna@example.de");
        let mut s = WizardSession::new(
            Arc::new(StepCatalog::funnel_default()),
            HostContext::Standalone,
            Some(&identity),
        );
        while s.current_step().id != step_ids::CONTACT {
            s.advance().unwrap();
        }
        let view = step_view(&s);
        assert_eq!(
            view.input,
            InputView::Contact {
                first_name: "Anna".into(),
                email: "anna@example.de".into()
            }
        );
        assert_eq!(view.action.map(|a| a.enabled), Some(true));
    }

    #[test]
    fn completed_session_shows_thank_you() {
        let mut s = session();
        s.mark_completed();
        let json = serde_json::to_value(WizardView::of(&s)).unwrap();
        assert_eq!(json["view"], "thank_you");
        assert_eq!(json["title"], THANK_YOU_TITLE);
    }
}
