//! Draft input state, kept apart from the durable answers.
//!
//! `StepDraft` lives for one visit to a step and is reset whenever the step
//! index changes. `ContactDraft` and `PhoneDraft` outlive navigation: the
//! contact fields are pre-seeded from the opt-in form, and the country code
//! plus WhatsApp consent stay selected when the visitor goes back and forth.

use serde::Serialize;

use super::answers::ContactDetails;

/// Preset country codes offered by the phone step, first is the default.
pub const COUNTRY_CODES: [CountryCode; 3] = [
    CountryCode {
        code: "+49",
        label: "🇩🇪 +49",
    },
    CountryCode {
        code: "+43",
        label: "🇦🇹 +43",
    },
    CountryCode {
        code: "+41",
        label: "🇨🇭 +41",
    },
];

/// A preset entry of the country code selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CountryCode {
    pub code: &'static str,
    pub label: &'static str,
}

/// Per-visit input of the current step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepDraft {
    /// Free-text body.
    pub text: String,
    /// Elaboration typed next to a selected "Sonstige".
    pub other_text: String,
    /// Privacy checkbox of the terminal text step.
    pub privacy_accepted: bool,
    /// Number typed on the phone step, filtered to digits, spaces and hyphens.
    pub phone_number: String,
    /// Inline message of the last failed validation.
    pub validation_error: Option<String>,
}

impl StepDraft {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn set_phone_number(&mut self, raw: &str) {
        self.phone_number = filter_phone_input(raw);
    }
}

/// All draft state of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Drafts {
    pub step: StepDraft,
    pub contact: ContactDraft,
    pub phone: PhoneDraft,
}

impl Drafts {
    pub fn seeded(identity: Option<&ContactDetails>) -> Self {
        Self {
            contact: ContactDraft::seeded(identity),
            ..Self::default()
        }
    }
}

/// Contact fields of the verification step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDraft {
    pub first_name: String,
    pub email: String,
}

impl ContactDraft {
    pub fn seeded(identity: Option<&ContactDetails>) -> Self {
        identity
            .map(|id| Self {
                first_name: id.first_name.clone(),
                email: id.email.clone(),
            })
            .unwrap_or_default()
    }

    /// Fill fields that are still empty. Typed input is never overwritten.
    pub fn fill_missing(&mut self, identity: &ContactDetails) {
        if self.first_name.is_empty() {
            self.first_name = identity.first_name.clone();
        }
        if self.email.is_empty() {
            self.email = identity.email.clone();
        }
    }
}

/// Country code selection and WhatsApp consent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneDraft {
    pub country_code: String,
    /// Free-text country code instead of the preset selector.
    pub manual_code: bool,
    pub whatsapp_consent: bool,
}

impl Default for PhoneDraft {
    fn default() -> Self {
        Self {
            country_code: COUNTRY_CODES[0].code.to_string(),
            manual_code: false,
            whatsapp_consent: false,
        }
    }
}

impl PhoneDraft {
    /// Switch between preset selector and manual entry.
    ///
    /// Entering manual mode clears the code; leaving it restores the default.
    pub fn toggle_manual(&mut self) {
        self.manual_code = !self.manual_code;
        if self.manual_code {
            self.country_code.clear();
        } else {
            self.country_code = COUNTRY_CODES[0].code.to_string();
        }
    }
}

/// Keep ASCII digits, whitespace and hyphens.
pub fn filter_phone_input(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || c.is_whitespace() || *c == '-')
        .collect()
}
