//! Domain layer: pure types and decision logic for a single vending machine.
//!
//! Everything in this module is synchronous and side-effect free. The state
//! reducer in [`state`] is a pure function over `(state, event)`; the change
//! engine in [`money`] computes speculatively and lets callers decide whether
//! to commit. IO, timers and the card reader live in the outer layers.

pub mod catalog;
pub mod history;
pub mod inventory;
pub mod money;
pub mod ports;
pub mod state;
