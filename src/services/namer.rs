use std::collections::HashMap;
use std::rc::Rc;

use crate::dom::FieldElement;

/// Duplicate indices assigned to elements, keyed by element identity.
#[derive(Default)]
pub struct DuplicateIndex {
    assigned: HashMap<usize, u32>,
}

impl DuplicateIndex {
    fn identity(element: &Rc<dyn FieldElement>) -> usize {
        Rc::as_ptr(element) as *const () as usize
    }

    pub fn assign(&mut self, element: &Rc<dyn FieldElement>, index: u32) {
        self.assigned.insert(Self::identity(element), index);
    }

    pub fn get(&self, element: &Rc<dyn FieldElement>) -> Option<u32> {
        self.assigned.get(&Self::identity(element)).copied()
    }

    pub fn clear(&mut self) {
        self.assigned.clear();
    }
}

/// Builds `<form>_<id or name>[<separator><index>]` storage keys.
#[derive(Clone, Debug)]
pub struct FieldNamer {
    form_id: String,
    separator: String,
}

impl FieldNamer {
    pub fn new(form_id: impl Into<String>, separator: impl Into<String>) -> Self {
        Self {
            form_id: form_id.into(),
            separator: separator.into(),
        }
    }

    pub fn form_id(&self) -> &str {
        &self.form_id
    }

    /// The id or name a field is tracked by; `None` if it has neither.
    pub fn base_of(element: &dyn FieldElement) -> Option<String> {
        element.id().or_else(|| element.name())
    }

    pub fn name_of(&self, element: &dyn FieldElement, duplicate: Option<u32>) -> Option<String> {
        let base = Self::base_of(element)?;
        Some(match duplicate {
            Some(index) => format!("{}_{}{}{}", self.form_id, base, self.separator, index),
            None => format!("{}_{}", self.form_id, base),
        })
    }
}
