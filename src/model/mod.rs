//! Pure data structures exchanged with the gateway and held by the stores.

pub mod cart;
pub(crate) mod de;
pub mod ids;
pub mod order;

pub use cart::*;
pub use ids::*;
pub use order::*;
