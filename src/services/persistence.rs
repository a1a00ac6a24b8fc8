use std::rc::Rc;

use crate::dom::FieldElement;
use crate::error::StorageError;
use crate::models::{FieldKind, FieldValue};
use crate::services::storage::Storage;

const MANIFEST_PREFIX: &str = "elementList_";

/// Typed access to stored field values and field manifests.
#[derive(Clone)]
pub struct PersistenceStore {
    storage: Rc<dyn Storage>,
}

impl PersistenceStore {
    pub fn new(storage: Rc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub fn manifest_key(form_id: &str) -> String {
        format!("{}{}", MANIFEST_PREFIX, form_id)
    }

    /// Missing, unreadable and malformed entries all come back as `None`.
    pub fn load(&self, key: &str) -> Option<FieldValue> {
        let json = match self.storage.get_item(key) {
            Ok(json) => json?,
            Err(err) => {
                log::warn!("could not read `{}`: {}", key, err);
                return None;
            }
        };
        match serde_json::from_str(&json) {
            Ok(value) => Some(value),
            Err(err) => {
                log::warn!("ignoring malformed value stored under `{}`: {}", key, err);
                None
            }
        }
    }

    pub fn save(&self, key: &str, value: &FieldValue) -> Result<(), StorageError> {
        let json = serde_json::to_string(value).map_err(|err| StorageError::Operation {
            key: key.to_string(),
            message: err.to_string(),
        })?;
        self.storage.set_item(key, &json)
    }

    pub fn load_manifest(&self, form_id: &str) -> Vec<String> {
        let key = Self::manifest_key(form_id);
        match self.storage.get_item(&key) {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|err| {
                log::warn!("ignoring malformed field list `{}`: {}", key, err);
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(err) => {
                log::warn!("could not read field list `{}`: {}", key, err);
                Vec::new()
            }
        }
    }

    pub fn save_manifest(&self, form_id: &str, keys: &[String]) -> Result<(), StorageError> {
        let key = Self::manifest_key(form_id);
        let json = serde_json::to_string(keys).map_err(|err| StorageError::Operation {
            key: key.clone(),
            message: err.to_string(),
        })?;
        self.storage.set_item(&key, &json)
    }

    pub fn clear_manifest(&self, form_id: &str) -> Result<(), StorageError> {
        self.storage.remove_item(&Self::manifest_key(form_id))
    }

    /// Removes every value listed in the form's manifest and returns how
    /// many removals succeeded. Failures are logged and skipped.
    pub fn clear_all(&self, form_id: &str) -> usize {
        let mut removed = 0;
        for key in self.load_manifest(form_id) {
            match self.storage.remove_item(&key) {
                Ok(()) => removed += 1,
                Err(err) => log::warn!("could not clear `{}`: {}", key, err),
            }
        }
        log::debug!("cleared {} stored fields of `{}`", removed, form_id);
        removed
    }

    /// Reads the value worth storing for `element`. Unchecked radios have
    /// nothing to contribute to their group and yield `None`.
    pub fn capture(element: &dyn FieldElement) -> Option<FieldValue> {
        match element.kind() {
            FieldKind::Checkbox => Some(FieldValue::Checked(element.is_checked())),
            FieldKind::Radio if !element.is_checked() => None,
            FieldKind::SelectMultiple => Some(FieldValue::Selected(element.selected_values())),
            _ => Some(FieldValue::Text(element.value())),
        }
    }

    /// Applies a stored value to `element`; returns whether anything changed.
    pub fn restore(element: &dyn FieldElement, value: &FieldValue) -> bool {
        match (element.kind(), value) {
            (FieldKind::Checkbox, FieldValue::Checked(checked)) => {
                element.set_checked(*checked);
                true
            }
            (FieldKind::Checkbox, _) => false,
            (FieldKind::Radio, FieldValue::Text(stored)) => {
                if *stored == element.value() {
                    element.set_checked(true);
                    true
                } else {
                    false
                }
            }
            (FieldKind::Radio, _) => false,
            (FieldKind::SelectMultiple, FieldValue::Selected(values)) => {
                element.set_selected_values(values);
                true
            }
            (FieldKind::SelectMultiple, FieldValue::Text(single)) => {
                element.set_selected_values(std::slice::from_ref(single));
                true
            }
            (_, FieldValue::Text(text)) => {
                element.set_value(text);
                true
            }
            (_, FieldValue::Checked(checked)) => {
                element.set_value(&checked.to_string());
                true
            }
            (_, FieldValue::Selected(_)) => false,
        }
    }

    pub fn load_into(&self, key: &str, element: &dyn FieldElement) -> bool {
        match self.load(key) {
            Some(value) => Self::restore(element, &value),
            None => false,
        }
    }

    pub fn store_from(&self, key: &str, element: &dyn FieldElement) {
        if let Some(value) = Self::capture(element) {
            if let Err(err) = self.save(key, &value) {
                log::warn!("could not store `{}`: {}", key, err);
            }
        }
    }
}
