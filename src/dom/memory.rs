//! In-memory forms and fields for tests and headless use.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use super::{FieldElement, FieldEvent, FormElement, Handler, Subscription};

struct Listeners<E> {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(u64, E, Handler)>>,
}

impl<E: Copy + PartialEq + 'static> Listeners<E> {
    fn new() -> Rc<Self> {
        Rc::new(Self {
            next_id: Cell::new(0),
            entries: RefCell::new(Vec::new()),
        })
    }

    fn add(self: &Rc<Self>, event: E, handler: Handler) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.entries.borrow_mut().push((id, event, handler));

        let weak: Weak<Self> = Rc::downgrade(self);
        Subscription::new(move || {
            if let Some(listeners) = weak.upgrade() {
                listeners.entries.borrow_mut().retain(|(other, _, _)| *other != id);
            }
        })
    }

    fn dispatch(&self, event: E) {
        // Collected first so handlers may (un)subscribe while running.
        let handlers: Vec<Handler> = self
            .entries
            .borrow()
            .iter()
            .filter(|(_, e, _)| *e == event)
            .map(|(_, _, h)| h.clone())
            .collect();
        for handler in handlers {
            handler();
        }
    }

    fn count(&self) -> usize {
        self.entries.borrow().len()
    }
}

pub struct MemoryField {
    tag: String,
    attributes: RefCell<BTreeMap<String, String>>,
    value: RefCell<String>,
    checked: Cell<bool>,
    selected: RefCell<Vec<String>>,
    rendered: Cell<bool>,
    listeners: Rc<Listeners<FieldEvent>>,
}

impl MemoryField {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: RefCell::new(BTreeMap::new()),
            value: RefCell::new(String::new()),
            checked: Cell::new(false),
            selected: RefCell::new(Vec::new()),
            rendered: Cell::new(true),
            listeners: Listeners::new(),
        }
    }

    pub fn input(input_type: &str) -> Self {
        Self::new("input").attr("type", input_type)
    }

    pub fn attr(self, name: &str, value: &str) -> Self {
        self.attributes
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
        if name == "value" {
            *self.value.borrow_mut() = value.to_string();
        }
        self
    }

    pub fn with_id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    pub fn with_name(self, name: &str) -> Self {
        self.attr("name", name)
    }

    pub fn not_rendered(self) -> Self {
        self.rendered.set(false);
        self
    }

    /// Simulates typing: replaces the value and fires `keyup`.
    pub fn type_text(&self, text: &str) {
        self.set_value(text);
        self.fire(FieldEvent::KeyUp);
    }

    /// Simulates a click on a checkbox or radio, firing `change`.
    pub fn click(&self) {
        match self.kind() {
            crate::models::FieldKind::Radio => self.set_checked(true),
            _ => self.set_checked(!self.is_checked()),
        }
        self.fire(FieldEvent::Change);
    }

    pub fn fire(&self, event: FieldEvent) {
        self.listeners.dispatch(event);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.count()
    }
}

impl FieldElement for MemoryField {
    fn tag_name(&self) -> String {
        self.tag.clone()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.borrow().get(name).cloned()
    }

    fn is_rendered(&self) -> bool {
        self.rendered.get()
    }

    fn value(&self) -> String {
        self.value.borrow().clone()
    }

    fn set_value(&self, value: &str) {
        *self.value.borrow_mut() = value.to_string();
    }

    fn is_checked(&self) -> bool {
        self.checked.get()
    }

    fn set_checked(&self, checked: bool) {
        self.checked.set(checked);
    }

    fn selected_values(&self) -> Vec<String> {
        self.selected.borrow().clone()
    }

    fn set_selected_values(&self, values: &[String]) {
        *self.selected.borrow_mut() = values.to_vec();
    }

    fn subscribe(&self, event: FieldEvent, handler: Handler) -> Subscription {
        self.listeners.add(event, handler)
    }
}

pub struct MemoryForm {
    id: Option<String>,
    name: Option<String>,
    page_index: Cell<Option<usize>>,
    fields: RefCell<Vec<Rc<MemoryField>>>,
    listeners: Rc<Listeners<()>>,
}

impl MemoryForm {
    pub fn new() -> Self {
        Self {
            id: None,
            name: None,
            page_index: Cell::new(None),
            fields: RefCell::new(Vec::new()),
            listeners: Listeners::new(),
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn at_page_index(self, index: usize) -> Self {
        self.page_index.set(Some(index));
        self
    }

    /// Appends a field and hands back the shared handle to drive it.
    pub fn add(&self, field: MemoryField) -> Rc<MemoryField> {
        let field = Rc::new(field);
        self.fields.borrow_mut().push(field.clone());
        field
    }

    pub fn submit(&self) {
        self.listeners.dispatch(());
    }

    pub fn submit_listener_count(&self) -> usize {
        self.listeners.count()
    }
}

impl Default for MemoryForm {
    fn default() -> Self {
        Self::new()
    }
}

impl FormElement for MemoryForm {
    fn id(&self) -> Option<String> {
        self.id.clone().filter(|id| !id.is_empty())
    }

    fn name(&self) -> Option<String> {
        self.name.clone().filter(|name| !name.is_empty())
    }

    fn page_index(&self) -> Option<usize> {
        self.page_index.get()
    }

    fn fields(&self) -> Vec<Rc<dyn FieldElement>> {
        self.fields
            .borrow()
            .iter()
            .map(|field| field.clone() as Rc<dyn FieldElement>)
            .collect()
    }

    fn subscribe_submit(&self, handler: Handler) -> Subscription {
        self.listeners.add((), handler)
    }
}
