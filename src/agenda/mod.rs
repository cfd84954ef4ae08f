pub mod fold;
pub mod reconcile;

pub use fold::*;
pub use reconcile::*;
