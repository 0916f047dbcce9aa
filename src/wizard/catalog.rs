//! Step catalog — the ordered, immutable list of questions.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::CatalogError;

/// Catalog-defined step identifier. Unique; catalog order follows it.
pub type StepId = u32;

/// Option label that opens the free-text elaboration on steps allowing it.
pub const OTHER_OPTION: &str = "Sonstige";

/// Step ids of the default funnel catalog.
pub mod step_ids {
    use super::StepId;

    pub const CHALLENGE: StepId = 1;
    pub const GOALS: StepId = 2;
    pub const SITUATION_RATING: StepId = 3;
    pub const EATING_DISORDER: StepId = 4;
    pub const METABOLIC_DISEASES: StepId = 5;
    pub const BUDGET: StepId = 6;
    pub const CONTACT: StepId = 7;
    pub const PHONE: StepId = 8;
    pub const AVAILABILITY: StepId = 9;
}

/// Where the wizard is mounted. Decided from the hosting page's path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HostContext {
    /// Regular landing/thank-you page.
    #[default]
    Standalone,
    /// Embedded in a third-party page through an iframe.
    Embedded,
}

impl HostContext {
    /// Embedded iff the path mentions `iframe`.
    pub fn from_path(path: &str) -> Self {
        if path.contains("iframe") {
            Self::Embedded
        } else {
            Self::Standalone
        }
    }

    /// Source tag reported in the submission payload.
    pub fn source_tag(&self) -> &'static str {
        match self {
            Self::Standalone => "Survey_ThankYouPage",
            Self::Embedded => "Survey_Frame",
        }
    }
}

impl std::fmt::Display for HostContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standalone => write!(f, "standalone"),
            Self::Embedded => write!(f, "embedded"),
        }
    }
}

/// The kind of a step, together with the data only that kind carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum StepKind {
    /// Tapping an option records it and advances.
    SingleChoice { options: Vec<String> },
    /// Options toggle in and out of a selection; "Weiter" advances.
    MultipleChoice {
        options: Vec<String>,
        allows_other: bool,
    },
    /// Discrete ordered values, same semantics as single choice.
    Scale {
        options: Vec<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        min_label: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max_label: Option<String>,
    },
    /// Multi-line text. A terminal text step also needs privacy consent.
    FreeText { requires_privacy_consent: bool },
    /// Name and email, pre-filled from the opt-in form.
    ContactVerification,
    /// Optional phone number with country code and WhatsApp consent.
    Phone,
}

impl StepKind {
    /// Options offered by choice-like kinds.
    pub fn options(&self) -> &[String] {
        match self {
            Self::SingleChoice { options }
            | Self::MultipleChoice { options, .. }
            | Self::Scale { options, .. } => options,
            Self::FreeText { .. } | Self::ContactVerification | Self::Phone => &[],
        }
    }

    fn is_choice(&self) -> bool {
        matches!(
            self,
            Self::SingleChoice { .. } | Self::MultipleChoice { .. } | Self::Scale { .. }
        )
    }
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::SingleChoice { .. } => "single-choice",
            Self::MultipleChoice { .. } => "multiple-choice",
            Self::Scale { .. } => "scale",
            Self::FreeText { .. } => "free-text",
            Self::ContactVerification => "contact-verification",
            Self::Phone => "phone",
        };
        write!(f, "{s}")
    }
}

/// Question text shown for a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepCopy {
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtext: Option<String>,
}

impl StepCopy {
    pub fn new(question: &str, subtext: Option<&str>) -> Self {
        Self {
            question: question.to_string(),
            subtext: subtext.map(str::to_string),
        }
    }
}

/// One catalog-defined question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    pub id: StepId,
    pub copy: StepCopy,
    /// Alternate copy used when the wizard is embedded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedded_copy: Option<StepCopy>,
    pub kind: StepKind,
}

impl Step {
    pub fn new(id: StepId, question: &str, subtext: Option<&str>, kind: StepKind) -> Self {
        Self {
            id,
            copy: StepCopy::new(question, subtext),
            embedded_copy: None,
            kind,
        }
    }

    pub fn with_embedded_copy(mut self, question: &str, subtext: Option<&str>) -> Self {
        self.embedded_copy = Some(StepCopy::new(question, subtext));
        self
    }

    /// The copy to show in the given host context.
    pub fn copy_for(&self, host: HostContext) -> &StepCopy {
        match (host, &self.embedded_copy) {
            (HostContext::Embedded, Some(copy)) => copy,
            _ => &self.copy,
        }
    }

    pub fn options(&self) -> &[String] {
        self.kind.options()
    }

    /// Whether the step offers the "Sonstige" elaboration field.
    pub fn allows_other(&self) -> bool {
        matches!(self.kind, StepKind::MultipleChoice { allows_other: true, .. })
    }
}

/// Ordered, validated list of steps. Never empty.
#[derive(Debug, Clone)]
pub struct StepCatalog {
    steps: Vec<Step>,
}

impl StepCatalog {
    /// Build a catalog, ordering the steps by id.
    pub fn new(mut steps: Vec<Step>) -> Result<Self, CatalogError> {
        if steps.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for step in &steps {
            if !seen.insert(step.id) {
                return Err(CatalogError::DuplicateStepId(step.id));
            }
            if step.kind.is_choice() && step.options().is_empty() {
                return Err(CatalogError::MissingOptions { step_id: step.id });
            }
        }

        steps.sort_by_key(|s| s.id);
        Ok(Self { steps })
    }

    /// Step at `index`. Indices past the end resolve to the last step.
    pub fn step_at(&self, index: usize) -> &Step {
        &self.steps[index.min(self.steps.len() - 1)]
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn last_index(&self) -> usize {
        self.steps.len() - 1
    }

    pub fn find(&self, id: StepId) -> Option<&Step> {
        self.steps.iter().find(|s| s.id == id)
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// The nine-step qualifying questionnaire of the funnel.
    pub fn funnel_default() -> Self {
        let options = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        let steps = vec![
            Step::new(
                step_ids::CHALLENGE,
                "Was ist aktuell Deine größte Herausforderung?",
                Some("Du kannst mehrere Punkte auswählen."),
                StepKind::MultipleChoice {
                    options: options(&[
                        "Ich möchte Gewicht verlieren und definierter aussehen",
                        "Ich möchte meine Kalorien erhöhen, bin jedoch unsicher",
                        "Ich möchte wieder ein entspanntes Essverhalten",
                        "Ich möchte weg vom Kalorienzählen",
                        "Nichts davon",
                    ]),
                    allows_other: false,
                },
            ),
            Step::new(
                step_ids::GOALS,
                "Welche Ziele möchtest Du erreichen?",
                Some("Du kannst mehrere auswählen."),
                StepKind::MultipleChoice {
                    options: options(&[
                        "Ich möchte Gewicht verlieren (über 10 Kilogramm)",
                        "Ich möchte Gewicht verlieren (unter 10 Kilogramm)",
                        "Ich möchte definierter aussehen",
                        "Ich möchte meine Periode wieder haben",
                        "Ich möchte essen, ohne schlechtes Gewissen",
                        "Ich möchte gesund zunehmen, Normalgewicht erreichen und Muskeln aufbauen",
                        "Ich möchte meine Kalorien erhöhen, ohne zuzunehmen",
                        "Nichts davon",
                    ]),
                    allows_other: false,
                },
            ),
            Step::new(
                step_ids::SITUATION_RATING,
                "Wie sehr stört Dich Deine Situation aktuell?",
                Some("1 = Gar nicht, 10 = Es muss sich etwas ändern"),
                StepKind::Scale {
                    options: (1..=10).map(|n| n.to_string()).collect(),
                    min_label: None,
                    max_label: None,
                },
            ),
            Step::new(
                step_ids::EATING_DISORDER,
                "Besteht aktuell oder hattest Du in der Vergangenheit eine diagnostizierte Essstörung?",
                None,
                StepKind::SingleChoice {
                    options: options(&["Ja", "Nein"]),
                },
            ),
            Step::new(
                step_ids::METABOLIC_DISEASES,
                "Bist Du von einer oder mehreren dieser Stoffwechselkrankheiten betroffen?",
                Some("Du kannst mehrere auswählen."),
                StepKind::MultipleChoice {
                    options: options(&[
                        "PCOS",
                        "Hashimoto",
                        "Lipödem",
                        "Diabetes Typ 2",
                        OTHER_OPTION,
                        "Nichts davon",
                    ]),
                    allows_other: true,
                },
            ),
            Step::new(
                step_ids::BUDGET,
                "Angenommen, wir erreichen sicher Dein Ziel: Wie viel wärst Du bereit, monatlich in eine Lösung zu investieren?",
                None,
                StepKind::SingleChoice {
                    options: options(&[
                        "0 € ❌",
                        "Bis zu 80 € ✌️",
                        "Bis zu 150 € ✅",
                        "Zwischen 150 und 250 € ☑️",
                        "Bis zu 400 €, wenn ich mein Ziel dadurch schneller erreiche 🦄",
                    ]),
                },
            ),
            Step::new(
                step_ids::CONTACT,
                "Sind Dein Vorname und die E-Mail korrekt?",
                Some("Wenn ja, drücke auf Weiter."),
                StepKind::ContactVerification,
            )
            .with_embedded_copy(
                "Verrätst Du uns Deinen Namen & Deine E-Mail?",
                Some("Trage hier bitte Deinen Vornamen und Deine E-Mail ein. (Pflichtfelder)"),
            ),
            Step::new(
                step_ids::PHONE,
                "Wie lautet Deine Telefonnummer?",
                Some("Damit wir Dich erreichen können."),
                StepKind::Phone,
            ),
            Step::new(
                step_ids::AVAILABILITY,
                "Wann bist Du am besten erreichbar?",
                Some("Beispiel: Montags und Mittwochs, ab 17 Uhr."),
                StepKind::FreeText {
                    requires_privacy_consent: true,
                },
            ),
        ];

        Self { steps }
    }
}
