//! Payment processing: checkout sessions, verification and payment emails.

pub mod checkout;
mod error;
pub mod mailer;
pub mod stripe;

#[cfg(test)]
mod mailer_test;
#[cfg(test)]
mod stripe_test;

pub use checkout::{CheckoutOutcome, VerifyOutcome, start_checkout, verify_checkout};
pub use error::{PaymentError, PaymentResult};
pub use mailer::{Delivery, Mailer, OutgoingEmail, PaymentEmailRequest, compose_payment_email};
pub use stripe::{CheckoutRequest, CheckoutSession, StripeClient};
