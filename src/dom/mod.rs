//! The slice of the DOM a form binding needs.
//!
//! Bindings only ever talk to forms and fields through these traits. The
//! browser implementation lives in [`web`] and an in-memory one, used by the
//! tests, in [`memory`].

pub mod memory;
#[cfg(target_arch = "wasm32")]
pub mod web;

use std::fmt;
use std::rc::Rc;

use crate::models::FieldKind;

pub type Handler = Rc<dyn Fn()>;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FieldEvent {
    Change,
    KeyUp,
}

impl FieldEvent {
    pub fn dom_name(self) -> &'static str {
        match self {
            FieldEvent::Change => "change",
            FieldEvent::KeyUp => "keyup",
        }
    }
}

/// Disposer for a registered listener. Dropping it removes the listener.
pub struct Subscription {
    dispose: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(dispose: impl FnOnce() + 'static) -> Self {
        Self {
            dispose: Some(Box::new(dispose)),
        }
    }

    pub fn dispose(mut self) {
        if let Some(dispose) = self.dispose.take() {
            dispose();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(dispose) = self.dispose.take() {
            dispose();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.dispose.is_some())
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

pub trait FieldElement {
    /// Lower-case tag name (`input`, `select`, ...).
    fn tag_name(&self) -> String;
    fn attribute(&self, name: &str) -> Option<String>;
    /// Whether the host lays the element out. Elements that are not rendered
    /// match `:hidden`.
    fn is_rendered(&self) -> bool {
        true
    }

    fn value(&self) -> String;
    fn set_value(&self, value: &str);
    fn is_checked(&self) -> bool;
    fn set_checked(&self, checked: bool);
    fn selected_values(&self) -> Vec<String>;
    fn set_selected_values(&self, values: &[String]);

    fn subscribe(&self, event: FieldEvent, handler: Handler) -> Subscription;

    fn id(&self) -> Option<String> {
        non_empty(self.attribute("id"))
    }

    fn name(&self) -> Option<String> {
        non_empty(self.attribute("name"))
    }

    fn kind(&self) -> FieldKind {
        let tag = self.tag_name();
        let input_type = self.attribute("type");
        let multiple = self.attribute("multiple").is_some();
        FieldKind::from_parts(&tag, input_type.as_deref(), multiple)
    }

    fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .map(|classes| classes.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }
}

pub trait FormElement {
    fn id(&self) -> Option<String>;
    fn name(&self) -> Option<String>;
    /// Position of this form among all forms of the page, if it is on one.
    fn page_index(&self) -> Option<usize>;
    /// Input-capable descendants (`input`, `select`, `textarea`, `button`) in
    /// document order.
    fn fields(&self) -> Vec<Rc<dyn FieldElement>>;
    fn subscribe_submit(&self, handler: Handler) -> Subscription;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn subscription_disposes_once() {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let sub = Subscription::new(move || c.set(c.get() + 1));
        sub.dispose();
        assert_eq!(count.get(), 1);

        let c = count.clone();
        drop(Subscription::new(move || c.set(c.get() + 1)));
        assert_eq!(count.get(), 2);
    }
}
