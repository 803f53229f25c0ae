use std::sync::Arc;

use tracing::{debug, info};

use crate::category::CategoryCatalog;
use crate::record::{ConsentPreferences, ConsentRecord};

/// Cookie banner with a customize modal.
///
/// The modal edits a draft record. Closing the modal keeps the draft; only
/// `save`, `accept_all` and `reject_all` produce preferences to persist, and
/// each of them dismisses the banner.
#[derive(Clone, Debug)]
pub struct CookieBanner {
    visible: bool,
    modal_open: bool,
    draft: ConsentRecord,
}

impl CookieBanner {
    pub fn new<I, K>(catalog: Arc<CategoryCatalog>, initial: I) -> Self
    where
        I: IntoIterator<Item = (K, bool)>,
        K: AsRef<str>,
    {
        Self {
            visible: true,
            modal_open: false,
            draft: ConsentRecord::new(catalog, initial),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal_open
    }

    pub fn draft(&self) -> &ConsentRecord {
        &self.draft
    }

    /// "Customize" pressed.
    pub fn open_modal(&mut self) {
        if self.visible {
            self.modal_open = true;
        }
    }

    /// Backdrop click or Escape. The draft survives.
    pub fn close_modal(&mut self) {
        self.modal_open = false;
    }

    /// Edit one category in the draft. Required categories stay granted.
    pub fn set_preference(&mut self, id: &str, granted: bool) {
        if self.draft.set_consent(id, granted).is_none() {
            debug!(category = id, "Banner preference unchanged");
        }
    }

    /// Grant every optional category, persist and dismiss.
    ///
    /// `None` once the banner has been dismissed.
    pub fn accept_all(&mut self) -> Option<ConsentPreferences> {
        if !self.visible {
            return None;
        }
        let saved = self.draft.accept_all();
        self.dismiss();
        Some(saved)
    }

    /// Withdraw every optional category, persist and dismiss.
    pub fn reject_all(&mut self) -> Option<ConsentPreferences> {
        if !self.visible {
            return None;
        }
        let saved = self.draft.reject_all();
        self.dismiss();
        Some(saved)
    }

    /// Persist the draft as edited in the modal and dismiss.
    pub fn save(&mut self) -> Option<ConsentPreferences> {
        if !self.visible {
            return None;
        }
        let saved = self.draft.preferences().clone();
        self.dismiss();
        Some(saved)
    }

    fn dismiss(&mut self) {
        self.modal_open = false;
        self.visible = false;
        info!("Cookie banner dismissed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn banner() -> CookieBanner {
        CookieBanner::new(
            Arc::new(CategoryCatalog::cookies()),
            [("analytics", true)],
        )
    }

    #[test]
    fn accept_all_grants_everything_and_dismisses() {
        let mut banner = banner();
        let saved = banner.accept_all().unwrap();
        assert!(saved.iter().all(|(_, granted)| granted));
        assert!(!banner.is_visible());
        assert!(banner.accept_all().is_none());
    }

    #[test]
    fn reject_all_keeps_only_necessary() {
        let mut banner = banner();
        let saved = banner.reject_all().unwrap();
        assert!(saved.get("necessary"));
        assert!(!saved.get("analytics"));
        assert!(!saved.get("marketing"));
    }

    #[test]
    fn closing_modal_keeps_draft() {
        let mut banner = banner();
        banner.open_modal();
        banner.set_preference("marketing", true);
        banner.set_preference("necessary", false);
        banner.close_modal();
        assert!(!banner.is_modal_open());
        assert!(banner.is_visible());

        banner.open_modal();
        let saved = banner.save().unwrap();
        assert!(saved.get("necessary"));
        assert!(saved.get("analytics"));
        assert!(saved.get("marketing"));
        assert!(!banner.is_modal_open());
        assert!(!banner.is_visible());
    }

    #[test]
    fn modal_does_not_open_once_dismissed() {
        let mut banner = banner();
        banner.reject_all();
        banner.open_modal();
        assert!(!banner.is_modal_open());
    }
}
