use std::{sync::Arc, time::Duration};

use crate::application::ports::{browser::BrowserLauncher, time::Clock};
use crate::domain::{cases::AffaireData, mahakim::SyncResultRepository, record::RecordRepository};

/// CSS selectors of the portal's search form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSelectors {
    pub numero: String,
    pub code: String,
    pub annee: String,
    pub submit: String,
    pub result: String,
}

impl Default for FormSelectors {
    fn default() -> Self {
        Self {
            numero: "input[name='numero']".into(),
            code: "input[name='code']".into(),
            annee: "input[name='annee']".into(),
            submit: "button[type='submit']".into(),
            result: "#resultat".into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PortalSettings {
    pub url: String,
    pub timeout: Duration,
    pub headless: bool,
    pub selectors: FormSelectors,
}

pub struct MahakimSyncService {
    pub(super) affaires: Arc<dyn RecordRepository<AffaireData>>,
    pub(super) results: Arc<dyn SyncResultRepository>,
    pub(super) launcher: Arc<dyn BrowserLauncher>,
    pub(super) clock: Arc<dyn Clock>,
    pub(super) settings: PortalSettings,
}

impl MahakimSyncService {
    pub fn new(
        affaires: Arc<dyn RecordRepository<AffaireData>>,
        results: Arc<dyn SyncResultRepository>,
        launcher: Arc<dyn BrowserLauncher>,
        clock: Arc<dyn Clock>,
        settings: PortalSettings,
    ) -> Self {
        Self {
            affaires,
            results,
            launcher,
            clock,
            settings,
        }
    }
}
