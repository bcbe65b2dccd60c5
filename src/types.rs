use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

use crate::barcode::{BarcodeList, ScanDebouncer, normalize};
use crate::config::Config;
use crate::submission::SubmissionController;

/// Everything one form session owns. Discarded when the app closes.
pub struct OrderSession {
    pub barcodes: BarcodeList,
    pub controller: SubmissionController,
    pub debouncer: ScanDebouncer,
}

impl OrderSession {
    pub fn new(config: Config) -> Self {
        let window = chrono::Duration::from_std(config.scan_debounce)
            .unwrap_or_else(|_| chrono::Duration::zero());
        Self {
            barcodes: BarcodeList::new(),
            controller: SubmissionController::new(config),
            debouncer: ScanDebouncer::new(window),
        }
    }

    pub fn config(&self) -> &Config {
        self.controller.config()
    }

    /// Scanner input: records `code` unless it is a double-fire of the previous scan.
    pub fn scan(&mut self, code: &str, now: DateTime<Utc>) -> bool {
        let code = normalize(code);
        if code.is_empty() || !self.debouncer.accept(&code, now) {
            return false;
        }
        self.barcodes.add_code(&code)
    }

    /// "Add Another Order": drops the previous order's items and leaves re-entry mode.
    pub fn start_new_order(&mut self) {
        self.barcodes.clear();
        self.controller.start_new_order();
    }
}

/// Shared between the UI thread and request completions.
pub type SharedSession = Arc<Mutex<OrderSession>>;

pub fn lock_session(session: &SharedSession) -> MutexGuard<'_, OrderSession> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}
