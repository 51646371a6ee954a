//! Adapters for the domain's ports.

pub mod card;
