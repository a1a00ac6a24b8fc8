use serde::{Deserialize, Serialize};

use crate::error::FormError;
use crate::selector::SelectorList;

pub const DEFAULT_EXCLUDE: &str = ":password, :hidden, :file, .disable_save";
pub const DEFAULT_SEPARATOR: &str = "___";
pub const DEFAULT_KEYUP_DELAY_MS: u32 = 500;

/// Options as they arrive from the caller (a JS object or JSON).
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    /// `null` turns exclusion off.
    pub exclude: Option<String>,
    pub include: Option<String>,
    pub form_name: Option<String>,
    pub add_path_to_name: bool,
    /// JavaScript `slice` argument applied to the page path.
    pub add_path_length: i32,
    pub load_inputs: bool,
    pub same_name_separator: String,
    pub reset_on_submit: bool,
    pub keyup_delay: u32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            exclude: Some(DEFAULT_EXCLUDE.to_string()),
            include: None,
            form_name: None,
            add_path_to_name: false,
            add_path_length: -255,
            load_inputs: true,
            same_name_separator: DEFAULT_SEPARATOR.to_string(),
            reset_on_submit: true,
            keyup_delay: DEFAULT_KEYUP_DELAY_MS,
        }
    }
}

impl Options {
    pub fn from_json(json: &str) -> Result<Self, FormError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Validated options with compiled selectors.
#[derive(Clone, Debug)]
pub struct Settings {
    pub exclude: Option<SelectorList>,
    pub include: Option<SelectorList>,
    pub form_name: Option<String>,
    pub add_path_to_name: bool,
    pub add_path_length: i32,
    pub load_inputs: bool,
    pub same_name_separator: String,
    pub reset_on_submit: bool,
    pub keyup_delay: u32,
}

impl TryFrom<Options> for Settings {
    type Error = FormError;

    fn try_from(options: Options) -> Result<Self, Self::Error> {
        Ok(Self {
            exclude: compile(options.exclude.as_deref())?,
            include: compile(options.include.as_deref())?,
            form_name: options.form_name,
            add_path_to_name: options.add_path_to_name,
            add_path_length: options.add_path_length,
            load_inputs: options.load_inputs,
            same_name_separator: options.same_name_separator,
            reset_on_submit: options.reset_on_submit,
            keyup_delay: options.keyup_delay,
        })
    }
}

fn compile(selector: Option<&str>) -> Result<Option<SelectorList>, FormError> {
    selector.map(SelectorList::parse).transpose()
}
