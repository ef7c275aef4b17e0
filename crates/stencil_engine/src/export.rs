//! Client-side export surface.
//!
//! Produces the inline-delivery forms consumed by browser-side Handlebars:
//! raw template sources wrapped in `x-handlebars-template` script tags, the
//! partial registry as a JS global for re-registration, and the render-data
//! journal as a JS global so the client can re-render with the same data.
//! Export-only: nothing here is read back into the engine.

use stencil_common::TemplateName;

/// JS global receiving the partial registry contents.
pub const PARTIALS_GLOBAL: &str = "__handlebars_server_partials";

/// JS global receiving the render-data journal.
pub const DATA_GLOBAL: &str = "__handlebars_server_data";

/// DOM id prefix of wrapped template script tags.
const SCRIPT_ID_PREFIX: &str = "hb-";

/// DOM id for a wrapped template: `hb-` plus the name with `/` flattened to
/// `__` (slashes are not usable in selectors).
pub fn script_id(name: &TemplateName) -> String {
    format!("{SCRIPT_ID_PREFIX}{}", name.as_str().replace('/', "__"))
}

/// Wraps raw template source for inline delivery to the client.
///
/// Newlines, tabs, and carriage returns are stripped so the tag body stays a
/// single line, matching what the client-side compiler expects.
pub fn script_wrapper(name: &TemplateName, source: &str) -> String {
    let flattened: String = source
        .chars()
        .filter(|c| !matches!(c, '\n' | '\t' | '\r'))
        .collect();
    format!(
        "<script id=\"{}\" type=\"text/x-handlebars-template\">{}</script>",
        script_id(name),
        flattened.trim()
    )
}

/// Emits a `<script>` block assigning a JSON payload to a JS global.
pub fn global_assignment(global: &str, json: &str) -> String {
    format!("<script type=\"text/javascript\">\n\t{global} = {json};\n</script>")
}
