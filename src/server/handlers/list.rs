//! Module with the handler for listing available templates.

use memer::{Template, TEMPLATES};
use serde_json::Value as Json;


/// List all the meme templates, with their layouts.
pub fn list_templates() -> Json {
    debug!("Listing all {} templates", TEMPLATES.len());
    let templates: &[Template] = TEMPLATES;
    json!({"templates": templates})
}
