//! Effect containers.
//!
//! Every target that can carry effects owns one [`EffectContainer`]: the
//! ordered list of its active instances. The container decides stacking,
//! keeps priority order, and applies removal policies. It never runs
//! anything on its own; the scheduler and the damage pipeline drive it.

mod effect_container;

pub use effect_container::{AddOutcome, EffectContainer, RemoveOutcome};
