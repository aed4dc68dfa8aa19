// src/domain/mahakim/mod.rs
//! Domain side of the Mahakim portal synchronisation: how a case number is
//! written, what we try to read back from the portal and what we store.
pub mod dossier;
pub mod extract;
pub mod result;

pub use dossier::DossierNumber;
pub use extract::{PortalExtract, extract_fields};
pub use result::{SyncResult, SyncResultRepository};
