//! Survey wizard — the multi-step qualification funnel.
//!
//! A visitor walks an ordered catalog of steps one at a time. Each step kind
//! has its own input handler; answers accumulate in an `AnswerStore`. After the
//! last step the manager sends the answers through a delivery transport and
//! redirects the visitor to booking or to the soft landing page, depending on
//! the budget answer.

pub mod answers;
pub mod catalog;
pub mod draft;
pub mod handlers;
pub mod manager;
pub mod navigation;
pub mod payload;
pub mod policy;
pub mod session;
pub mod view;

pub use answers::{Answer, AnswerKey, AnswerStore, ContactDetails};
pub use catalog::{HostContext, Step, StepCatalog, StepCopy, StepId, StepKind};
pub use handlers::{Interaction, StepOutcome};
pub use manager::{CompletionReport, DispatchOutcome, Navigator, WizardDeps, WizardManager};
pub use payload::SubmissionPayload;
pub use policy::{BudgetRule, Destination, RedirectTargets};
pub use session::{Transition, WizardSession};
pub use view::{InputView, StepView, WizardView};
