use std::rc::Rc;

use crate::config::{Options, Settings};
use crate::dom::{FormElement, Subscription};
use crate::error::FormError;
use crate::models::Command;
use crate::services::namer::FieldNamer;
use crate::services::persistence::PersistenceStore;
use crate::services::registrar::FieldRegistrar;
use crate::services::scheduler::Scheduler;
use crate::services::storage::Storage;
use crate::utils::js_slice;

/// Everything a binding needs from its host page.
#[derive(Clone)]
pub struct Runtime {
    pub storage: Rc<dyn Storage>,
    pub scheduler: Rc<dyn Scheduler>,
    pub page_path: String,
}

impl Runtime {
    pub fn new(storage: Rc<dyn Storage>, scheduler: Rc<dyn Scheduler>, page_path: impl Into<String>) -> Self {
        Self {
            storage,
            scheduler,
            page_path: page_path.into(),
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn browser() -> Self {
        use crate::services::scheduler::WebScheduler;
        use crate::services::storage::LocalStorage;

        let page_path = web_sys::window()
            .and_then(|w| w.location().pathname().ok())
            .unwrap_or_default();
        Self::new(Rc::new(LocalStorage), Rc::new(WebScheduler), page_path)
    }
}

/// Picks the identifier all of a form's keys are prefixed with: the
/// `formName` option, then the form's id, then its name, then its position
/// among the page's forms.
pub fn resolve_form_id(
    form: &dyn FormElement,
    settings: &Settings,
    page_path: &str,
) -> Result<String, FormError> {
    let form_id = match settings
        .form_name
        .clone()
        .or_else(|| form.id())
        .or_else(|| form.name())
    {
        Some(form_id) => form_id,
        None => {
            let index = form.page_index().ok_or(FormError::UnresolvableForm)?;
            format!("{}_formindex_{}", page_path, index)
        }
    };

    if settings.add_path_to_name {
        Ok(format!(
            "{}___{}",
            form_id,
            js_slice(page_path, settings.add_path_length)
        ))
    } else {
        Ok(form_id)
    }
}

pub struct FormBinding {
    form_id: String,
    store: PersistenceStore,
    registrar: FieldRegistrar,
    submit: Option<Subscription>,
    active: bool,
}

impl FormBinding {
    pub fn attach(form: &dyn FormElement, options: Options, runtime: &Runtime) -> Result<Self, FormError> {
        let settings = Settings::try_from(options)?;
        Self::with_settings(form, &settings, runtime)
    }

    pub fn with_settings(form: &dyn FormElement, settings: &Settings, runtime: &Runtime) -> Result<Self, FormError> {
        let form_id = resolve_form_id(form, settings, &runtime.page_path)?;
        let store = PersistenceStore::new(runtime.storage.clone());

        let mut registrar = FieldRegistrar::new(FieldNamer::new(
            form_id.clone(),
            settings.same_name_separator.clone(),
        ));
        let keys = registrar.register(form, settings, &store, &runtime.scheduler);
        if let Err(err) = store.save_manifest(&form_id, keys) {
            log::warn!("could not store field list of `{}`: {}", form_id, err);
        }

        let submit = if settings.reset_on_submit {
            let store = store.clone();
            let form_id = form_id.clone();
            Some(form.subscribe_submit(Rc::new(move || {
                store.clear_all(&form_id);
            })))
        } else {
            None
        };

        log::info!("saving form `{}` ({} fields)", form_id, registrar.keys().len());
        Ok(Self {
            form_id,
            store,
            registrar,
            submit,
            active: true,
        })
    }

    pub fn form_id(&self) -> &str {
        &self.form_id
    }

    /// Keys of the registered fields, in document order.
    pub fn keys(&self) -> &[String] {
        self.registrar.keys()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn execute(&mut self, command: Command) {
        if !self.active {
            log::debug!("ignoring {:?} on disposed form `{}`", command, self.form_id);
            return;
        }
        match command {
            Command::Load => {
                self.registrar.load_all(&self.store);
            }
            Command::Store => self.registrar.store_all(&self.store),
            Command::StoreElementList => {
                if let Err(err) = self.store.save_manifest(&self.form_id, self.registrar.keys()) {
                    log::warn!("could not store field list of `{}`: {}", self.form_id, err);
                }
            }
            Command::ClearElementList => {
                if let Err(err) = self.store.clear_manifest(&self.form_id) {
                    log::warn!("could not clear field list of `{}`: {}", self.form_id, err);
                }
            }
            Command::ClearStorage => {
                self.store.clear_all(&self.form_id);
            }
            Command::Dispose => {
                self.registrar.dispose();
                self.submit = None;
                self.active = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::memory::{MemoryField, MemoryForm};
    use crate::dom::FieldElement;
    use crate::models::FieldValue;
    use crate::services::scheduler::ManualScheduler;
    use crate::services::storage::MemoryStorage;

    fn runtime() -> (Rc<MemoryStorage>, ManualScheduler, Runtime) {
        let storage = Rc::new(MemoryStorage::new());
        let scheduler = ManualScheduler::new();
        let runtime = Runtime::new(storage.clone(), Rc::new(scheduler.clone()), "/shop/cart");
        (storage, scheduler, runtime)
    }

    fn settings(options: Options) -> Settings {
        Settings::try_from(options).unwrap()
    }

    #[test]
    fn form_id_resolution_order() {
        let named = MemoryForm::new().with_id("checkout").with_name("co");
        assert_eq!(resolve_form_id(&named, &settings(Options::default()), "/p").unwrap(), "checkout");

        let by_name = MemoryForm::new().with_name("co");
        assert_eq!(resolve_form_id(&by_name, &settings(Options::default()), "/p").unwrap(), "co");

        let explicit = Options {
            form_name: Some("mine".into()),
            ..Options::default()
        };
        assert_eq!(resolve_form_id(&named, &settings(explicit), "/p").unwrap(), "mine");

        let anonymous = MemoryForm::new().at_page_index(2);
        assert_eq!(
            resolve_form_id(&anonymous, &settings(Options::default()), "/p").unwrap(),
            "/p_formindex_2"
        );
    }

    #[test]
    fn path_suffix_is_appended() {
        let form = MemoryForm::new().with_id("search");
        let options = Options {
            add_path_to_name: true,
            add_path_length: -4,
            ..Options::default()
        };
        assert_eq!(
            resolve_form_id(&form, &settings(options), "/shop/cart").unwrap(),
            "search___cart"
        );
    }

    #[test]
    fn unresolvable_form_never_registers() {
        let (storage, _, runtime) = runtime();
        let form = MemoryForm::new();
        let field = form.add(MemoryField::input("text").with_id("email"));

        let result = FormBinding::attach(&form, Options::default(), &runtime);
        assert!(matches!(result, Err(FormError::UnresolvableForm)));
        assert_eq!(field.listener_count(), 0);
        assert_eq!(form.submit_listener_count(), 0);
        assert!(storage.is_empty());
    }

    #[test]
    fn attach_writes_manifest() {
        let (storage, _, runtime) = runtime();
        let form = MemoryForm::new().with_id("f");
        form.add(MemoryField::input("text").with_id("email"));
        form.add(MemoryField::new("textarea").with_name("notes"));

        let binding = FormBinding::attach(&form, Options::default(), &runtime).unwrap();
        assert_eq!(binding.keys().to_vec(), vec!["f_email", "f_notes"]);
        assert_eq!(
            storage.raw("elementList_f").as_deref(),
            Some("[\"f_email\",\"f_notes\"]")
        );
    }

    #[test]
    fn separator_option_reaches_field_keys() {
        let (storage, _, runtime) = runtime();
        let form = MemoryForm::new().with_id("f");
        form.add(MemoryField::input("checkbox").with_name("opt"));
        form.add(MemoryField::input("checkbox").with_name("opt"));
        let options = Options {
            same_name_separator: "--".into(),
            ..Options::default()
        };

        let binding = FormBinding::attach(&form, options, &runtime).unwrap();
        assert_eq!(binding.keys().to_vec(), vec!["f_opt--1", "f_opt--2"]);
        assert_eq!(
            storage.raw("elementList_f").as_deref(),
            Some("[\"f_opt--1\",\"f_opt--2\"]")
        );
    }

    #[test]
    fn submit_clears_saved_values() {
        let (storage, scheduler, runtime) = runtime();
        let form = MemoryForm::new().with_id("f");
        let email = form.add(MemoryField::input("text").with_id("email"));
        let _binding = FormBinding::attach(&form, Options::default(), &runtime).unwrap();

        email.type_text("x@y.z");
        scheduler.advance(500);
        assert!(storage.raw("f_email").is_some());

        form.submit();
        assert!(storage.raw("f_email").is_none());
    }

    #[test]
    fn submit_keeps_values_when_reset_disabled() {
        let (storage, _, runtime) = runtime();
        let form = MemoryForm::new().with_id("f");
        let opt = form.add(MemoryField::input("checkbox").with_id("opt"));
        let options = Options {
            reset_on_submit: false,
            ..Options::default()
        };
        let _binding = FormBinding::attach(&form, options, &runtime).unwrap();
        assert_eq!(form.submit_listener_count(), 0);

        opt.click();
        form.submit();
        assert_eq!(storage.raw("f_opt").as_deref(), Some("true"));
    }

    #[test]
    fn commands_drive_the_binding() {
        let (storage, _, runtime) = runtime();
        let form = MemoryForm::new().with_id("f");
        let email = form.add(MemoryField::input("text").with_id("email"));
        let options = Options {
            load_inputs: false,
            ..Options::default()
        };
        let mut binding = FormBinding::attach(&form, options, &runtime).unwrap();

        email.set_value("typed");
        binding.execute(Command::Store);
        assert_eq!(storage.raw("f_email").as_deref(), Some("\"typed\""));

        email.set_value("");
        binding.execute(Command::Load);
        assert_eq!(email.value(), "typed");

        binding.execute(Command::ClearStorage);
        assert!(storage.raw("f_email").is_none());

        binding.execute(Command::ClearElementList);
        assert!(storage.raw("elementList_f").is_none());
        binding.execute(Command::StoreElementList);
        assert!(storage.raw("elementList_f").is_some());
    }

    #[test]
    fn dispose_tears_everything_down() {
        let (storage, scheduler, runtime) = runtime();
        let form = MemoryForm::new().with_id("f");
        let email = form.add(MemoryField::input("text").with_id("email"));
        let mut binding = FormBinding::attach(&form, Options::default(), &runtime).unwrap();

        email.type_text("half");
        binding.execute(Command::Dispose);
        assert!(!binding.is_active());
        assert_eq!(email.listener_count(), 0);
        assert_eq!(form.submit_listener_count(), 0);

        scheduler.advance(1000);
        assert!(storage.raw("f_email").is_none());

        storage.set_item("f_email", "\"later\"").unwrap();
        binding.execute(Command::Load);
        assert_eq!(email.value(), "half");
    }

    #[test]
    fn stored_values_restore_on_attach() {
        let (storage, _, runtime) = runtime();
        let store = PersistenceStore::new(storage.clone());
        store.save("f_size", &FieldValue::text("M")).unwrap();

        let form = MemoryForm::new().with_id("f");
        let sizes: Vec<_> = ["S", "M", "L"]
            .iter()
            .map(|s| form.add(MemoryField::input("radio").with_name("size").attr("value", s)))
            .collect();
        let _binding = FormBinding::attach(&form, Options::default(), &runtime).unwrap();

        let checked: Vec<bool> = sizes.iter().map(|r| r.is_checked()).collect();
        assert_eq!(checked, vec![false, true, false]);
    }
}
