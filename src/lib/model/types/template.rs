//! Module with the catalogue of meme layout templates.


/// Layout template that memes can be created from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Preferred width of the image.
    pub width: u32,
    /// Preferred height of the image.
    pub height: u32,
    /// Where the texts go.
    pub text_layout: &'static [TextPosition],
}

/// Named slot for a caption within a `Template`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TextPosition {
    pub position: &'static str,
    /// Vertical center of the text, as a fraction of image height.
    pub y: f32,
}

impl Template {
    /// Look up a template by its identifier.
    pub fn find(id: &str) -> Option<&'static Template> {
        TEMPLATES.iter().find(|t| t.id == id)
    }
}


/// All known templates.
pub const TEMPLATES: &[Template] = &[
    Template{
        id: "gradient",
        name: "Gradient Meme",
        description: "Simple gradient background with top/bottom text",
        width: 1200,
        height: 675,
        text_layout: &[
            TextPosition{position: "top", y: 0.12},
            TextPosition{position: "bottom", y: 0.88},
        ],
    },
    Template{
        id: "drake",
        name: "Drake (mock/approve)",
        description: "Two rows: top row (disapprove), bottom row (approve)",
        width: 1200,
        height: 800,
        text_layout: &[
            TextPosition{position: "top", y: 0.25},
            TextPosition{position: "bottom", y: 0.75},
        ],
    },
    Template{
        id: "loss",
        name: "Loss (4-panel)",
        description: "Four-panel meme layout (coming soon)",
        width: 1200,
        height: 900,
        text_layout: &[
            TextPosition{position: "top-left", y: 0.25},
            TextPosition{position: "top-right", y: 0.25},
            TextPosition{position: "bottom-left", y: 0.75},
            TextPosition{position: "bottom-right", y: 0.75},
        ],
    },
];


#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use serde_json;
    use crate::model::constants::DEFAULT_TEMPLATE;
    use super::{Template, TEMPLATES};

    #[test]
    fn ids_are_unique() {
        let ids: HashSet<_> = TEMPLATES.iter().map(|t| t.id).collect();
        assert_eq!(TEMPLATES.len(), ids.len());
    }

    #[test]
    fn default_template_exists() {
        assert!(Template::find(DEFAULT_TEMPLATE).is_some());
        assert!(Template::find("zoidberg").is_none());
    }

    #[test]
    fn serializes_text_layout() {
        let json = serde_json::to_value(Template::find("drake").unwrap()).unwrap();
        assert_eq!(json!("drake"), json["id"]);
        assert_eq!(json!(800), json["height"]);
        assert_eq!(json!("top"), json["textLayout"][0]["position"]);
        assert_eq!(json!(0.75), json["textLayout"][1]["y"]);
    }
}
