//! Disqualification and redirect policy.

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

use super::answers::AnswerStore;
use super::catalog::{StepCatalog, StepId, step_ids};

/// Number of lowest budget tiers that disqualify in the default funnel.
pub const DISQUALIFYING_TIERS: usize = 2;

pub const DEFAULT_BOOKING_URL: &str = "https://start.einfachernaehrung.com/buchung";
pub const DEFAULT_SOFT_LANDING_URL: &str = "https://start.einfachernaehrung.com/kontakterfolgreich";

/// Disqualifies when the budget answer equals one of the lowest tier labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetRule {
    step_id: StepId,
    disqualifying: Vec<String>,
}

impl BudgetRule {
    /// Take the first `count` options of `step_id` as disqualifying labels.
    pub fn lowest_tiers(
        catalog: &StepCatalog,
        step_id: StepId,
        count: usize,
    ) -> Result<Self, CatalogError> {
        let step = catalog
            .find(step_id)
            .ok_or(CatalogError::UnknownStep(step_id))?;
        let options = step.options();
        if options.len() < count {
            return Err(CatalogError::NotEnoughTiers {
                step_id,
                available: options.len(),
                requested: count,
            });
        }
        Ok(Self {
            step_id,
            disqualifying: options[..count].to_vec(),
        })
    }

    /// Budget step and tier count of the default funnel.
    pub fn funnel_default(catalog: &StepCatalog) -> Result<Self, CatalogError> {
        Self::lowest_tiers(catalog, step_ids::BUDGET, DISQUALIFYING_TIERS)
    }

    /// True iff the budget answer is text exactly matching a low tier label.
    pub fn is_disqualified(&self, answers: &AnswerStore) -> bool {
        answers
            .text(self.step_id)
            .is_some_and(|budget| self.disqualifying.iter().any(|label| label == budget))
    }

    pub fn disqualifying_labels(&self) -> &[String] {
        &self.disqualifying
    }
}

/// Where the visitor is sent after submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    /// Contact confirmation for disqualified visitors.
    SoftLanding,
    /// Appointment booking for qualified visitors.
    Booking,
}

impl Destination {
    pub fn for_disqualified(disqualified: bool) -> Self {
        if disqualified {
            Self::SoftLanding
        } else {
            Self::Booking
        }
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SoftLanding => write!(f, "soft_landing"),
            Self::Booking => write!(f, "booking"),
        }
    }
}

/// URLs behind each destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTargets {
    pub soft_landing: String,
    pub booking: String,
}

impl Default for RedirectTargets {
    fn default() -> Self {
        Self {
            soft_landing: DEFAULT_SOFT_LANDING_URL.to_string(),
            booking: DEFAULT_BOOKING_URL.to_string(),
        }
    }
}

impl RedirectTargets {
    pub fn url_for(&self, destination: Destination) -> &str {
        match destination {
            Destination::SoftLanding => &self.soft_landing,
            Destination::Booking => &self.booking,
        }
    }
}
