//! External collaborator interfaces.
//!
//! The booking pipeline consumes four external services: payment intents,
//! outbound mail, phone OTP verification, and ticket rendering/storage.
//! Each is behind a trait so real integrations and test doubles are
//! interchangeable. Collaborator failures are never fatal to a persisted
//! booking — only the payment step is fatal to its own request.

pub mod mail;
pub mod mock;
pub mod otp;
pub mod payment;
pub mod ticket;

pub use mail::{Attachment, LogMailer, Mailer};
pub use mock::{MockGateway, RecordingMailer};
pub use otp::{MockOtpService, OtpService};
pub use payment::{PaymentGateway, PaymentIntent, StripeGateway};
pub use ticket::{InMemoryTicketVault, TicketVault};
