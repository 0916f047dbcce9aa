//! WizardManager — drives a session and runs the completion sequence.
//!
//! On the last step the manager builds the payload, decides
//! disqualification, awaits the delivery transport once, and redirects.
//! The redirect happens whatever the transport reports.

use std::sync::Arc;

use chrono::Utc;

use crate::error::{TransportError, WizardError};
use crate::transport::DeliveryTransport;

use super::answers::ContactDetails;
use super::catalog::{HostContext, StepCatalog};
use super::handlers::Interaction;
use super::payload::SubmissionPayload;
use super::policy::{BudgetRule, Destination, RedirectTargets};
use super::session::{Transition, WizardSession};
use super::view::WizardView;

/// Event name passed to the transport at completion.
pub const SURVEY_SUBMIT_EVENT: &str = "SURVEY_SUBMIT";

/// Performs the final page navigation.
pub trait Navigator: Send + Sync {
    fn redirect(&self, url: &str);
}

/// Everything the manager needs besides the session itself.
#[derive(Clone)]
pub struct WizardDeps {
    pub catalog: Arc<StepCatalog>,
    pub budget_rule: BudgetRule,
    pub targets: RedirectTargets,
    pub event_name: String,
    pub transport: Arc<dyn DeliveryTransport>,
    pub navigator: Arc<dyn Navigator>,
}

/// What happened when the survey was submitted.
#[derive(Debug, Clone)]
pub struct CompletionReport {
    pub disqualified: bool,
    pub destination: Destination,
    pub url: String,
    /// Whether the transport reported success. Informational only.
    pub delivered: bool,
    pub payload: SubmissionPayload,
}

/// Result of dispatching one interaction.
#[derive(Debug, Clone)]
pub enum DispatchOutcome {
    /// The wizard is still collecting answers.
    Pending(Transition),
    /// The survey was submitted and the visitor redirected.
    Redirected(CompletionReport),
}

/// Coordinates one mounted wizard: session state, delivery, and redirect.
pub struct WizardManager {
    session: WizardSession,
    deps: WizardDeps,
}

impl WizardManager {
    pub fn new(deps: WizardDeps, host: HostContext, identity: Option<&ContactDetails>) -> Self {
        let session = WizardSession::new(Arc::clone(&deps.catalog), host, identity);
        tracing::info!(session = %session.id(), %host, steps = deps.catalog.step_count(), "Wizard mounted");
        Self { session, deps }
    }

    pub fn session(&self) -> &WizardSession {
        &self.session
    }

    pub fn view(&self) -> WizardView {
        WizardView::of(&self.session)
    }

    /// Identity from the opt-in form that arrived after mount.
    pub fn provide_identity(&mut self, identity: &ContactDetails) {
        self.session.provide_identity(identity);
    }

    /// Apply an interaction; runs the completion sequence after the last step.
    pub async fn dispatch(&mut self, interaction: Interaction) -> Result<DispatchOutcome, WizardError> {
        let transition = self.session.interact(interaction)?;
        self.settle(transition).await
    }

    /// Skip forward without validating the current step.
    pub async fn advance(&mut self) -> Result<DispatchOutcome, WizardError> {
        let transition = self.session.advance()?;
        self.settle(transition).await
    }

    pub fn back(&mut self) -> Result<Transition, WizardError> {
        self.session.retreat()
    }

    async fn settle(&mut self, transition: Transition) -> Result<DispatchOutcome, WizardError> {
        match transition {
            Transition::Finished => Ok(DispatchOutcome::Redirected(self.complete().await)),
            other => Ok(DispatchOutcome::Pending(other)),
        }
    }

    /// Build payload, decide disqualification, deliver once, redirect once.
    async fn complete(&mut self) -> CompletionReport {
        let session_id = self.session.id();
        let payload = SubmissionPayload::build(
            self.session.answers(),
            self.session.host(),
            self.session.drafts().phone.whatsapp_consent,
            Utc::now(),
        );
        let disqualified = self.deps.budget_rule.is_disqualified(self.session.answers());

        let delivered = match self.deliver(&payload).await {
            Ok(()) => {
                tracing::info!(
                    session = %session_id,
                    event = %self.deps.event_name,
                    transport = self.deps.transport.name(),
                    "Survey answers delivered"
                );
                true
            }
            Err(e) => {
                tracing::warn!(
                    session = %session_id,
                    event = %self.deps.event_name,
                    transport = self.deps.transport.name(),
                    "Failed to deliver survey answers: {}",
                    e
                );
                false
            }
        };

        let destination = Destination::for_disqualified(disqualified);
        let url = self.deps.targets.url_for(destination).to_string();
        tracing::info!(session = %session_id, %destination, %url, disqualified, "Redirecting");
        self.deps.navigator.redirect(&url);

        CompletionReport {
            disqualified,
            destination,
            url,
            delivered,
            payload,
        }
    }

    async fn deliver(&self, payload: &SubmissionPayload) -> Result<(), TransportError> {
        let value = serde_json::to_value(payload)?;
        self.deps
            .transport
            .deliver(&self.deps.event_name, &value)
            .await
    }
}
