//! Submission payload assembled once, when the last step is answered.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::answers::{AnswerStore, ContactDetails};
use super::catalog::{HostContext, StepId, step_ids};
use super::handlers::PHONE_FALLBACK;

/// Fallback for missing text answers.
pub const NOT_PROVIDED: &str = "Nicht angegeben";
/// Fallback for a missing situation rating.
pub const RATING_FALLBACK: &str = "0";
/// Fallback for a missing budget answer.
pub const BUDGET_FALLBACK: &str = "0 €";
pub const PLACEHOLDER_FIRST_NAME: &str = "Unknown";
pub const PLACEHOLDER_EMAIL: &str = "unknown@example.com";

/// Flat record forwarded to the delivery transport.
///
/// Missing answers never block submission; each field falls back to a
/// literal default instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionPayload {
    pub timestamp: DateTime<Utc>,
    pub source: String,
    pub challenge: Vec<String>,
    pub goals: Vec<String>,
    pub situation_rating: String,
    pub eating_disorder: String,
    pub metabolic_diseases: Vec<String>,
    pub budget: String,
    pub contact: ContactDetails,
    pub phone: String,
    pub availability: String,
    pub whatsapp_consent: bool,
    /// Every recorded answer, including `"<id>_other"` slots.
    pub raw_answers: AnswerStore,
}

impl SubmissionPayload {
    pub fn build(
        answers: &AnswerStore,
        host: HostContext,
        whatsapp_consent: bool,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let text_or = |id: StepId, fallback: &str| {
            answers.text(id).unwrap_or(fallback).to_string()
        };

        Self {
            timestamp,
            source: host.source_tag().to_string(),
            challenge: answers.selection(step_ids::CHALLENGE).to_vec(),
            goals: answers.selection(step_ids::GOALS).to_vec(),
            situation_rating: text_or(step_ids::SITUATION_RATING, RATING_FALLBACK),
            eating_disorder: text_or(step_ids::EATING_DISORDER, NOT_PROVIDED),
            metabolic_diseases: answers.selection(step_ids::METABOLIC_DISEASES).to_vec(),
            budget: text_or(step_ids::BUDGET, BUDGET_FALLBACK),
            contact: answers
                .contact(step_ids::CONTACT)
                .cloned()
                .unwrap_or_else(|| ContactDetails::new(PLACEHOLDER_FIRST_NAME, PLACEHOLDER_EMAIL)),
            phone: text_or(step_ids::PHONE, PHONE_FALLBACK),
            availability: text_or(step_ids::AVAILABILITY, NOT_PROVIDED),
            whatsapp_consent,
            raw_answers: answers.clone(),
        }
    }
}
