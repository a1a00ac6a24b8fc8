use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::FormError;

/// What kind of control a field is, as far as persistence cares.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FieldKind {
    Text,
    TextArea,
    Select,
    SelectMultiple,
    Checkbox,
    Radio,
    Password,
    Hidden,
    File,
    Submit,
    Button,
}

impl FieldKind {
    /// Derives the kind from a lower-case tag name, the `type` attribute and
    /// whether a `<select>` carries `multiple`.
    pub fn from_parts(tag: &str, input_type: Option<&str>, multiple: bool) -> Self {
        match tag {
            "textarea" => FieldKind::TextArea,
            "select" if multiple => FieldKind::SelectMultiple,
            "select" => FieldKind::Select,
            "button" => match input_type.map(str::to_ascii_lowercase).as_deref() {
                Some("button") | Some("reset") => FieldKind::Button,
                _ => FieldKind::Submit,
            },
            _ => match input_type.map(str::to_ascii_lowercase).as_deref() {
                Some("checkbox") => FieldKind::Checkbox,
                Some("radio") => FieldKind::Radio,
                Some("password") => FieldKind::Password,
                Some("hidden") => FieldKind::Hidden,
                Some("file") => FieldKind::File,
                Some("submit") | Some("image") => FieldKind::Submit,
                Some("button") | Some("reset") => FieldKind::Button,
                _ => FieldKind::Text,
            },
        }
    }
}

/// A value as it is kept in storage (JSON encoded).
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(untagged)]
pub enum FieldValue {
    Checked(bool),
    Text(String),
    Selected(Vec<String>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }
}

/// Operations that can be triggered on an already attached form.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    /// Populate every registered field from storage.
    Load,
    /// Write the current value of every registered field.
    Store,
    StoreElementList,
    ClearElementList,
    /// Remove every stored value listed in the manifest.
    ClearStorage,
    /// Detach all listeners and drop pending writes.
    Dispose,
}

impl FromStr for Command {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "loadElements" | "load" => Ok(Command::Load),
            "storeElements" | "store" => Ok(Command::Store),
            "storeElementList" => Ok(Command::StoreElementList),
            "clearElementList" => Ok(Command::ClearElementList),
            "clearStorage" => Ok(Command::ClearStorage),
            "dispose" | "destroy" => Ok(Command::Dispose),
            other => Err(FormError::UnknownCommand(other.to_string())),
        }
    }
}
