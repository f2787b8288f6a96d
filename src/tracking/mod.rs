//! Order lifecycle tracking: the status to progress mapping and the polling tracker.

pub mod board;
pub mod progress;
pub mod tracker;

pub use board::*;
pub use progress::*;
pub use tracker::*;
