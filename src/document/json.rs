//! Structural loader for the JSON form of a raw tree.
//!
//! The JSON form uses the XML attribute names as keys and the element names as variant tags:
//!
//! ```json
//! { "Dimensions": "100,50",
//!   "Items": [ { "ctCircle": { "Center": "10,10", "Radius": 5, "Fill": "#FF0000" } } ] }
//! ```

use std::path::Path;

use crate::document::model::Page;
use crate::foundation::error::{PdlError, PdlResult};

pub fn from_str(source: &str) -> PdlResult<Page> {
    serde_json::from_str(source).map_err(|e| PdlError::structural(format!("invalid JSON: {e}")))
}

pub fn from_path(path: &Path) -> PdlResult<Page> {
    let source = std::fs::read_to_string(path).map_err(|e| PdlError::io(path, e))?;
    from_str(&source)
}

/// Encode the raw attributes of `page` (cached fields are not included).
pub fn to_string_pretty(page: &Page) -> PdlResult<String> {
    serde_json::to_string_pretty(page)
        .map_err(|e| PdlError::Other(anyhow::Error::new(e).context("encode page as JSON")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::model::Node;

    #[test]
    fn loads_tagged_nodes() {
        let page = from_str(
            r##"{"Dimensions":"100,50","Items":[
                {"ctCircle":{"Center":"10,10","Radius":5,"Fill":"#FF0000"}},
                {"ctCanvas":{"Opacity":0,"Items":[{"ctLine":{"Points":"0,0,1,1"}}]}}
            ]}"##,
        )
        .unwrap();
        assert_eq!(page.node_count(), 3);
        let Node::Canvas(canvas) = &page.items[1] else {
            panic!("expected canvas");
        };
        assert_eq!(canvas.opacity, Some(0.0));
    }

    #[test]
    fn unknown_keys_are_structural() {
        let err = from_str(r#"{"Dimensions":"1,1","Colour":"x"}"#).unwrap_err();
        assert!(err.is_structural());
        let err = from_str(r#"{"Dimensions":"1,1","Items":[{"ctEllipse":{}}]}"#).unwrap_err();
        assert!(err.is_structural());
    }

    #[test]
    fn xml_and_json_forms_agree() {
        let xml = crate::document::xml::from_str(
            r##"<Page Dimensions="4,4"><ctRectangle Points="0,0,2,2" Fill="#00FF00"/></Page>"##,
        )
        .unwrap();
        let json = to_string_pretty(&xml).unwrap();
        let back = from_str(&json).unwrap();
        assert_eq!(back.dimensions, xml.dimensions);
        let Node::Rectangle(r) = &back.items[0] else {
            panic!("expected rectangle");
        };
        assert_eq!(r.fill.as_deref(), Some("#00FF00"));
    }
}
