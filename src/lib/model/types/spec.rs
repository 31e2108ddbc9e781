//! Module implementing the `RenderSpec` type.

use crate::model::constants::{DEFAULT_HEIGHT, DEFAULT_TEMPLATE, DEFAULT_WIDTH};


/// Normalized description of a meme, as produced from free text.
///
/// Serialized with the field names that API clients expect
/// (`templateId`, `bg`, etc.).
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderSpec {
    /// Identifier of one of the `TEMPLATES`.
    pub template_id: String,
    /// Text rendered near the top edge.
    pub top: String,
    /// Text rendered near the bottom edge.
    pub bottom: String,
    pub width: u32,
    pub height: u32,
    /// Background image URL (or data), if any was suggested.
    #[serde(rename = "bg")]
    pub background: Option<String>,
}

impl Default for RenderSpec {
    fn default() -> Self {
        RenderSpec{
            template_id: DEFAULT_TEMPLATE.into(),
            top: String::new(),
            bottom: String::new(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            background: None,
        }
    }
}


#[cfg(test)]
mod tests {
    use serde_json::{self, Value as Json};
    use super::RenderSpec;

    #[test]
    fn serializes_client_field_names() {
        let spec = RenderSpec{top: "Top".into(), bottom: "Bottom".into(), ..Default::default()};
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json!({
            "templateId": "gradient",
            "top": "Top",
            "bottom": "Bottom",
            "width": 1200,
            "height": 675,
            "bg": Json::Null,
        }), json);
    }
}
