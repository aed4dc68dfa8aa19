//! Pulls case status from the Mahakim portal, one affaire at a time.
mod service;
mod sync;

pub use service::{FormSelectors, MahakimSyncService, PortalSettings};
pub use sync::SyncRequest;
