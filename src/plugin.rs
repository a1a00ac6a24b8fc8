//! JavaScript entry point: `saveMyForm(target, optionsOrCommand)`.

use std::cell::RefCell;

use anyhow::{anyhow, bail, Context, Result};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlFormElement;

use crate::binding::{FormBinding, Runtime};
use crate::config::Options;
use crate::dom::web::WebForm;
use crate::models::Command;

thread_local! {
    static BINDINGS: RefCell<Vec<(HtmlFormElement, FormBinding)>> = RefCell::new(Vec::new());
}

enum Invocation {
    Attach(Options),
    Run(Command),
}

impl Invocation {
    fn from_js(arg: &JsValue) -> Result<Self> {
        if arg.is_undefined() || arg.is_null() {
            return Ok(Invocation::Attach(Options::default()));
        }
        if let Some(method) = arg.as_string() {
            return Ok(Invocation::Run(method.parse()?));
        }
        let json: String = js_sys::JSON::stringify(arg)
            .map_err(|err| anyhow!("options are not serializable: {:?}", err))?
            .into();
        let options = Options::from_json(&json).context("could not read options")?;
        Ok(Invocation::Attach(options))
    }
}

fn target_forms(target: &JsValue) -> Result<Vec<HtmlFormElement>> {
    if let Some(selector) = target.as_string() {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| anyhow!("no document available"))?;
        let nodes = document
            .query_selector_all(&selector)
            .map_err(|err| anyhow!("invalid selector `{}`: {:?}", selector, err))?;
        return Ok((0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<HtmlFormElement>().ok())
            .collect());
    }
    match target.dyn_ref::<HtmlFormElement>() {
        Some(form) => Ok(vec![form.clone()]),
        None => bail!("target is neither a form element nor a selector"),
    }
}

fn is_attached(form: &HtmlFormElement) -> bool {
    BINDINGS.with(|bindings| bindings.borrow().iter().any(|(f, _)| f == form))
}

/// Binds `form` unless it already is. Returns whether a new binding was made.
pub fn attach_once(form: &HtmlFormElement, options: Options) -> Result<bool> {
    if is_attached(form) {
        return Ok(false);
    }
    let binding = FormBinding::attach(&WebForm::new(form.clone()), options, &Runtime::browser())?;
    BINDINGS.with(|bindings| bindings.borrow_mut().push((form.clone(), binding)));
    Ok(true)
}

/// Disposes the binding of `form` and forgets it.
pub fn release(form: &HtmlFormElement) {
    run(form, Command::Dispose);
}

fn run(form: &HtmlFormElement, command: Command) {
    BINDINGS.with(|bindings| {
        let mut bindings = bindings.borrow_mut();
        if let Some(position) = bindings.iter().position(|(f, _)| f == form) {
            bindings[position].1.execute(command);
            if command == Command::Dispose {
                bindings.remove(position);
            }
        }
    });
}

fn invoke(target: JsValue, arg: JsValue) -> Result<()> {
    let invocation = Invocation::from_js(&arg)?;
    for form in target_forms(&target)? {
        let outcome = match &invocation {
            Invocation::Attach(options) => attach_once(&form, options.clone()).map(|attached| {
                if !attached {
                    log::debug!("form is already being saved");
                }
            }),
            Invocation::Run(command) => {
                attach_once(&form, Options::default()).map(|_| run(&form, *command))
            }
        };
        if let Err(err) = outcome {
            log::error!("{:#}", err);
        }
    }
    Ok(())
}

/// Attaches persistence to the target form(s), or runs a command on forms
/// that already have it. Never throws; problems end up in the console.
#[wasm_bindgen(js_name = saveMyForm)]
pub fn save_my_form(target: JsValue, arg: JsValue) {
    if let Err(err) = invoke(target, arg) {
        log::error!("{:#}", err);
    }
}
