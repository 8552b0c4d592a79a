//! Combat: damage events and the pipeline that resolves them.
//!
//! ## Key Types
//!
//! - [`DamageEvent`]: One attack in flight, mutable by behaviors
//! - [`DamagePipeline`]: Hit, be-hurt, apply, be-killed, kill
//! - [`DamageOutcome`]: Health lost and whether the defender died

pub mod event;
mod pipeline;

pub use event::DamageEvent;
pub use pipeline::{DamageOutcome, DamagePipeline};
