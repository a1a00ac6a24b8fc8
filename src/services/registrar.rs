use std::collections::HashMap;
use std::rc::Rc;

use crate::config::Settings;
use crate::dom::{FieldElement, FieldEvent, FormElement, Handler, Subscription};
use crate::models::FieldKind;
use crate::services::debounce::Debounced;
use crate::services::namer::{DuplicateIndex, FieldNamer};
use crate::services::persistence::PersistenceStore;
use crate::services::scheduler::Scheduler;

pub struct TrackedField {
    pub element: Rc<dyn FieldElement>,
    pub key: String,
    keyup: Rc<Debounced<()>>,
}

pub struct FieldRegistrar {
    namer: FieldNamer,
    duplicates: DuplicateIndex,
    fields: Vec<TrackedField>,
    keys: Vec<String>,
    subscriptions: Vec<Subscription>,
}

impl FieldRegistrar {
    pub fn new(namer: FieldNamer) -> Self {
        Self {
            namer,
            duplicates: DuplicateIndex::default(),
            fields: Vec::new(),
            keys: Vec::new(),
            subscriptions: Vec::new(),
        }
    }

    fn accepts(settings: &Settings, element: &dyn FieldElement) -> bool {
        if let Some(exclude) = &settings.exclude {
            if exclude.matches(element) {
                return false;
            }
        }
        match &settings.include {
            Some(include) => include.matches(element),
            None => true,
        }
    }

    /// Tracks every eligible field of `form` and returns the ordered set of
    /// keys they are stored under.
    ///
    /// Non-radio fields sharing an id or name are numbered from 1 in document
    /// order, the first one included. Radios sharing a name form one logical
    /// field and are never numbered.
    pub fn register(
        &mut self,
        form: &dyn FormElement,
        settings: &Settings,
        store: &PersistenceStore,
        scheduler: &Rc<dyn Scheduler>,
    ) -> &[String] {
        let candidates: Vec<(Rc<dyn FieldElement>, String)> = form
            .fields()
            .into_iter()
            .filter(|element| Self::accepts(settings, element.as_ref()))
            .filter_map(|element| {
                let base = FieldNamer::base_of(element.as_ref())?;
                Some((element, base))
            })
            .collect();

        let mut group_sizes: HashMap<&str, u32> = HashMap::new();
        for (element, base) in &candidates {
            if element.kind() != FieldKind::Radio {
                *group_sizes.entry(base.as_str()).or_insert(0) += 1;
            }
        }

        let mut next_index: HashMap<&str, u32> = HashMap::new();
        for (element, base) in &candidates {
            let duplicated = group_sizes.get(base.as_str()).map_or(false, |n| *n > 1);
            if duplicated && element.kind() != FieldKind::Radio {
                let index = next_index.entry(base.as_str()).or_insert(0);
                *index += 1;
                self.duplicates.assign(element, *index);
            }

            let key = match self.namer.name_of(element.as_ref(), self.duplicates.get(element)) {
                Some(key) => key,
                None => continue,
            };
            self.track(element.clone(), key, settings, store, scheduler);
        }

        log::debug!(
            "registered {} fields ({} keys) for `{}`",
            self.fields.len(),
            self.keys.len(),
            self.namer.form_id()
        );
        &self.keys
    }

    fn track(
        &mut self,
        element: Rc<dyn FieldElement>,
        key: String,
        settings: &Settings,
        store: &PersistenceStore,
        scheduler: &Rc<dyn Scheduler>,
    ) {
        let store_now: Handler = {
            let weak = Rc::downgrade(&element);
            let store = store.clone();
            let key = key.clone();
            Rc::new(move || {
                if let Some(element) = weak.upgrade() {
                    store.store_from(&key, element.as_ref());
                }
            })
        };

        let keyup = {
            let store_now = store_now.clone();
            Rc::new(Debounced::new(
                move |()| store_now(),
                settings.keyup_delay,
                false,
                scheduler.clone(),
            ))
        };

        self.subscriptions
            .push(element.subscribe(FieldEvent::Change, store_now));
        let on_keyup: Handler = {
            let keyup = keyup.clone();
            Rc::new(move || keyup.call(()))
        };
        self.subscriptions
            .push(element.subscribe(FieldEvent::KeyUp, on_keyup));

        if !self.keys.contains(&key) {
            self.keys.push(key.clone());
        }
        if settings.load_inputs {
            store.load_into(&key, element.as_ref());
        }
        self.fields.push(TrackedField {
            element,
            key,
            keyup,
        });
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn fields(&self) -> &[TrackedField] {
        &self.fields
    }

    pub fn key_of(&self, element: &Rc<dyn FieldElement>) -> Option<String> {
        self.namer
            .name_of(element.as_ref(), self.duplicates.get(element))
    }

    pub fn load_all(&self, store: &PersistenceStore) -> usize {
        self.fields
            .iter()
            .filter(|field| store.load_into(&field.key, field.element.as_ref()))
            .count()
    }

    pub fn store_all(&self, store: &PersistenceStore) {
        for field in &self.fields {
            field.keyup.cancel();
            store.store_from(&field.key, field.element.as_ref());
        }
    }

    pub fn dispose(&mut self) {
        for field in &self.fields {
            field.keyup.cancel();
        }
        self.subscriptions.clear();
        self.fields.clear();
        self.duplicates.clear();
    }
}
