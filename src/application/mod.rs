//! Application layer orchestrating the domain.
//!
//! The [`machine::VendingMachine`] uses an actor pattern with `tokio`
//! channels: all mutable state lives in one task, commands arrive over a
//! channel, and the timed auto-transitions are driven by a single
//! rescheduled timer slot inside the same task.

pub mod machine;
pub mod payment;
