pub mod catalog;
pub mod content;
pub mod providers;
pub mod query;
pub mod reconciler;
pub mod resolver;
pub mod search;

pub use catalog::Catalog;
pub use reconciler::{AvailabilityPolicy, Reconciler};
