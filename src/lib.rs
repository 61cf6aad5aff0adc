//! Checkout page controller: payment-field formatting, button busy states,
//! response classification and submission orchestration against an injected
//! page and transport.

pub mod checkout;
pub mod cli;
pub mod control;
pub mod error;
pub mod format;
pub mod page;
pub mod response;
pub mod schedule;
pub mod storefront;
pub mod trace;
pub mod transport;

pub use checkout::context::{SubmissionContext, Trigger};
pub use checkout::orchestrator::{Orchestrator, PendingSubmission, SubmissionEnd};
pub use error::{CheckoutError, TransportError};
pub use response::response_model::{HttpResponse, ResponseOutcome};
