use std::rc::Rc;

use save_my_form::dom::memory::{MemoryField, MemoryForm};
use save_my_form::dom::FieldElement;
use save_my_form::services::scheduler::ManualScheduler;
use save_my_form::services::storage::MemoryStorage;
use save_my_form::{Command, FormBinding, Options, Runtime};

struct Page {
    form: MemoryForm,
    email: Rc<MemoryField>,
    opts: Vec<Rc<MemoryField>>,
    notes: Rc<MemoryField>,
}

fn signup_page() -> Page {
    let form = MemoryForm::new().with_id("signup");
    let email = form.add(MemoryField::input("email").with_id("email"));
    let opts = vec![
        form.add(MemoryField::input("checkbox").with_name("opt")),
        form.add(MemoryField::input("checkbox").with_name("opt")),
    ];
    form.add(MemoryField::input("password").with_name("password"));
    let notes = form.add(MemoryField::new("textarea").with_name("notes"));
    Page {
        form,
        email,
        opts,
        notes,
    }
}

#[test]
fn values_survive_a_reload() {
    let storage = Rc::new(MemoryStorage::new());
    let scheduler = ManualScheduler::new();
    let runtime = Runtime::new(storage.clone(), Rc::new(scheduler.clone()), "/signup");

    {
        let page = signup_page();
        let _binding = FormBinding::attach(&page.form, Options::default(), &runtime).unwrap();

        page.email.type_text("d");
        page.email.type_text("dev@example.org");
        page.opts[1].click();
        page.notes.type_text("call me");
        scheduler.advance(500);
    }

    assert_eq!(storage.raw("signup_email").as_deref(), Some("\"dev@example.org\""));
    assert_eq!(storage.raw("signup_opt___1"), None);
    assert_eq!(storage.raw("signup_opt___2").as_deref(), Some("true"));
    assert_eq!(storage.raw("signup_notes").as_deref(), Some("\"call me\""));
    assert_eq!(
        storage.raw("elementList_signup").as_deref(),
        Some(r#"["signup_email","signup_opt___1","signup_opt___2","signup_notes"]"#)
    );
    assert!(storage.keys().iter().all(|k| !k.contains("password")));

    let page = signup_page();
    let _binding = FormBinding::attach(&page.form, Options::default(), &runtime).unwrap();
    assert_eq!(page.email.value(), "dev@example.org");
    assert!(!page.opts[0].is_checked());
    assert!(page.opts[1].is_checked());
    assert_eq!(page.notes.value(), "call me");
}

#[test]
fn submit_forgets_everything_listed() {
    let storage = Rc::new(MemoryStorage::new());
    let scheduler = ManualScheduler::new();
    let runtime = Runtime::new(storage.clone(), Rc::new(scheduler.clone()), "/signup");

    let page = signup_page();
    let _binding = FormBinding::attach(&page.form, Options::default(), &runtime).unwrap();
    page.opts[0].click();
    page.email.type_text("gone@example.org");
    scheduler.advance(500);

    page.form.submit();
    for key in ["signup_email", "signup_opt___1", "signup_opt___2", "signup_notes"] {
        assert_eq!(storage.raw(key), None, "{} should be cleared", key);
    }
}

#[test]
fn forms_on_one_page_do_not_collide() {
    let storage = Rc::new(MemoryStorage::new());
    let scheduler = ManualScheduler::new();
    let runtime = Runtime::new(storage.clone(), Rc::new(scheduler.clone()), "/contact");

    let first = MemoryForm::new().at_page_index(0);
    let first_email = first.add(MemoryField::input("text").with_id("email"));
    let second = MemoryForm::new().at_page_index(1);
    let second_email = second.add(MemoryField::input("text").with_id("email"));

    let _a = FormBinding::attach(&first, Options::default(), &runtime).unwrap();
    let mut b = FormBinding::attach(&second, Options::default(), &runtime).unwrap();
    assert_eq!(b.form_id(), "/contact_formindex_1");

    first_email.type_text("one");
    second_email.type_text("two");
    scheduler.advance(500);
    assert_eq!(storage.raw("/contact_formindex_0_email").as_deref(), Some("\"one\""));
    assert_eq!(storage.raw("/contact_formindex_1_email").as_deref(), Some("\"two\""));

    b.execute(Command::ClearStorage);
    assert!(storage.raw("/contact_formindex_1_email").is_none());
    assert!(storage.raw("/contact_formindex_0_email").is_some());
}
