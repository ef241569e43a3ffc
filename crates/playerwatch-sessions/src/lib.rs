pub mod reconciler;
pub mod stats;
pub mod store;
pub mod tracker;
pub mod types;

pub use reconciler::{reconcile, ReconcilerState};
pub use stats::{aggregate, PlayerOverview};
pub use store::{SessionLog, StoreError};
pub use tracker::SessionTracker;
pub use types::{format_timestamp, ConnectionState, SessionRow, ONLINE};
