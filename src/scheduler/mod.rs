//! Effect scheduler - advancing effect timers.
//!
//! The host calls into the scheduler once per frame (usually through
//! [`World::advance`](crate::world::World::advance)). Ticks fire during a
//! single pass over the container; expiry removals run as a separate phase
//! after that pass.

mod advance;

pub use advance::{AdvanceReport, EffectScheduler};
