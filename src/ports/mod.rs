//! Ports (trait boundaries) between the learning core and its hosts.
//!
//! The training pipeline reports to [`Observer`]s; the live game asks a
//! [`Policy`] for each tick's action.

pub mod observer;
pub mod policy;

pub use observer::{EpisodeSummary, Observer, StepRecord};
pub use policy::Policy;
