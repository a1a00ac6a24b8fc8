use web_sys::HtmlFormElement;
use yew::prelude::*;

use crate::config::Options;
use crate::plugin;

#[derive(Properties, PartialEq)]
pub struct PersistedFormProps {
    pub id: AttrValue,
    #[prop_or_default]
    pub options: Options,
    /// Keep the page when the form is submitted (the saved data is still cleared).
    #[prop_or(true)]
    pub prevent_submit: bool,
    #[prop_or_default]
    pub children: Html,
}

#[function_component(PersistedForm)]
pub fn persisted_form(props: &PersistedFormProps) -> Html {
    let form_ref = use_node_ref();

    {
        let form_ref = form_ref.clone();
        use_effect_with(props.options.clone(), move |options| {
            // Only a binding made here is torn down here; one made earlier
            // through `saveMyForm` stays in place.
            let owned = form_ref.cast::<HtmlFormElement>().filter(|form| {
                match plugin::attach_once(form, options.clone()) {
                    Ok(attached) => attached,
                    Err(err) => {
                        log::error!("{:#}", err);
                        false
                    }
                }
            });
            move || {
                if let Some(form) = owned {
                    plugin::release(&form);
                }
            }
        });
    }

    let onsubmit = {
        let prevent = props.prevent_submit;
        Callback::from(move |e: SubmitEvent| {
            if prevent {
                e.prevent_default();
            }
        })
    };

    html! {
        <form id={props.id.clone()} ref={form_ref} {onsubmit}>
            { props.children.clone() }
        </form>
    }
}
