//! web-sys implementations of the DOM traits.

use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{
    Element, Event, EventTarget, HtmlElement, HtmlFormElement, HtmlInputElement, HtmlOptionElement,
    HtmlSelectElement, HtmlTextAreaElement,
};

use super::{FieldElement, FieldEvent, FormElement, Handler, Subscription};

const FIELD_SELECTOR: &str = "input, select, textarea, button";

fn listen(target: &EventTarget, event: &'static str, handler: Handler) -> Subscription {
    let closure = Closure::<dyn FnMut(Event)>::new(move |_event: Event| handler());
    if let Err(err) = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
        log::warn!("could not listen for `{}`: {:?}", event, err);
    }
    let target = target.clone();
    Subscription::new(move || {
        let _ = target.remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    })
}

pub struct WebField {
    element: Element,
}

impl WebField {
    pub fn new(element: Element) -> Self {
        Self { element }
    }

    fn select_options(select: &HtmlSelectElement) -> impl Iterator<Item = HtmlOptionElement> + '_ {
        (0..select.length()).filter_map(move |i| {
            select
                .item(i)
                .and_then(|option| option.dyn_into::<HtmlOptionElement>().ok())
        })
    }
}

impl FieldElement for WebField {
    fn tag_name(&self) -> String {
        self.element.tag_name().to_ascii_lowercase()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.element.get_attribute(name)
    }

    fn is_rendered(&self) -> bool {
        // Same test jQuery uses for `:visible`.
        match self.element.dyn_ref::<HtmlElement>() {
            Some(el) => el.offset_width() > 0 || el.offset_height() > 0 || el.get_client_rects().length() > 0,
            None => true,
        }
    }

    fn value(&self) -> String {
        if let Some(input) = self.element.dyn_ref::<HtmlInputElement>() {
            input.value()
        } else if let Some(area) = self.element.dyn_ref::<HtmlTextAreaElement>() {
            area.value()
        } else if let Some(select) = self.element.dyn_ref::<HtmlSelectElement>() {
            select.value()
        } else {
            self.element.get_attribute("value").unwrap_or_default()
        }
    }

    fn set_value(&self, value: &str) {
        if let Some(input) = self.element.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        } else if let Some(area) = self.element.dyn_ref::<HtmlTextAreaElement>() {
            area.set_value(value);
        } else if let Some(select) = self.element.dyn_ref::<HtmlSelectElement>() {
            select.set_value(value);
        } else {
            let _ = self.element.set_attribute("value", value);
        }
    }

    fn is_checked(&self) -> bool {
        self.element
            .dyn_ref::<HtmlInputElement>()
            .map_or(false, |input| input.checked())
    }

    fn set_checked(&self, checked: bool) {
        if let Some(input) = self.element.dyn_ref::<HtmlInputElement>() {
            input.set_checked(checked);
        }
    }

    fn selected_values(&self) -> Vec<String> {
        match self.element.dyn_ref::<HtmlSelectElement>() {
            Some(select) => Self::select_options(select)
                .filter(|option| option.selected())
                .map(|option| option.value())
                .collect(),
            None => Vec::new(),
        }
    }

    fn set_selected_values(&self, values: &[String]) {
        if let Some(select) = self.element.dyn_ref::<HtmlSelectElement>() {
            for option in Self::select_options(select) {
                option.set_selected(values.contains(&option.value()));
            }
        }
    }

    fn subscribe(&self, event: FieldEvent, handler: Handler) -> Subscription {
        listen(&self.element, event.dom_name(), handler)
    }
}

pub struct WebForm {
    form: HtmlFormElement,
}

impl WebForm {
    pub fn new(form: HtmlFormElement) -> Self {
        Self { form }
    }
}

impl FormElement for WebForm {
    fn id(&self) -> Option<String> {
        self.form.get_attribute("id").filter(|id| !id.is_empty())
    }

    fn name(&self) -> Option<String> {
        self.form.get_attribute("name").filter(|name| !name.is_empty())
    }

    fn page_index(&self) -> Option<usize> {
        let forms = self.form.owner_document()?.forms();
        (0..forms.length()).position(|i| {
            forms
                .item(i)
                .map_or(false, |candidate| candidate == **self.form)
        })
    }

    fn fields(&self) -> Vec<Rc<dyn FieldElement>> {
        let nodes = match self.form.query_selector_all(FIELD_SELECTOR) {
            Ok(nodes) => nodes,
            Err(err) => {
                log::warn!("could not enumerate form fields: {:?}", err);
                return Vec::new();
            }
        };
        (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|element| Rc::new(WebField::new(element)) as Rc<dyn FieldElement>)
            .collect()
    }

    fn subscribe_submit(&self, handler: Handler) -> Subscription {
        listen(&self.form, "submit", handler)
    }
}
