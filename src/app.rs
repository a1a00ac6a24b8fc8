use yew::prelude::*;

use crate::components::persisted_form::PersistedForm;

const GLOBAL_STYLES: &str = r#"
    :root {
        --bg-app: #ffffff;
        --border-color: #e5e5e5;
        --text-primary: #333;
        --text-secondary: #666;
        --accent-color: #10a37f;
    }

    * { box-sizing: border-box; }
    body { margin: 0; font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Helvetica, Arial, sans-serif; color: var(--text-primary); background: var(--bg-app); }

    .demo { max-width: 520px; margin: 40px auto; padding: 0 20px; }
    .demo p { color: var(--text-secondary); font-size: 0.9rem; }
    .demo form { display: flex; flex-direction: column; gap: 14px; }
    .demo label { display: flex; flex-direction: column; gap: 4px; font-size: 0.9rem; }
    .demo .inline { flex-direction: row; align-items: center; gap: 8px; }
    .demo input[type=email], .demo textarea, .demo select { padding: 8px; border: 1px solid var(--border-color); border-radius: 6px; font: inherit; }
    .btn-primary { cursor: pointer; background: var(--accent-color); color: white; border: none; padding: 8px 12px; border-radius: 6px; font-size: 0.9rem; }
"#;

#[function_component(App)]
pub fn app() -> Html {
    html! {
        <>
            <style>{ GLOBAL_STYLES }</style>
            <div class="demo">
                <h2>{ "Newsletter signup" }</h2>
                <p>{ "Type something and reload the page. Submitting clears what was saved." }</p>
                <PersistedForm id="signup">
                    <label>{ "Email" }
                        <input id="email" type="email" />
                    </label>
                    <label class="inline"><input type="checkbox" name="opt" />{ "Weekly digest" }</label>
                    <label class="inline"><input type="checkbox" name="opt" />{ "Product news" }</label>
                    <div>
                        <label class="inline"><input type="radio" name="format" value="html" />{ "HTML" }</label>
                        <label class="inline"><input type="radio" name="format" value="text" />{ "Plain text" }</label>
                    </div>
                    <label>{ "Topics" }
                        <select name="topics" multiple={true}>
                            <option value="rust">{ "Rust" }</option>
                            <option value="wasm">{ "WebAssembly" }</option>
                            <option value="web">{ "Web" }</option>
                        </select>
                    </label>
                    <label>{ "Notes" }
                        <textarea id="notes" rows="3" />
                    </label>
                    <input type="password" name="password" placeholder="never saved" />
                    <button class="btn-primary" type="submit">{ "Subscribe" }</button>
                </PersistedForm>
            </div>
        </>
    }
}
