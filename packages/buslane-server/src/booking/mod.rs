//! The booking transaction pipeline: payment intent, durable insert,
//! best-effort ticket issuance.

pub mod sequencer;

pub use sequencer::BookingSequencer;
