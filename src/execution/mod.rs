// Order submission and position reconciliation
pub mod executor;
pub mod reconciler;

pub use executor::OrderExecutor;
pub use reconciler::{reconcile, Reconciliation};
