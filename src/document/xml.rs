//! Structural loader for the XML form of a document.
//!
//! This only builds the raw tree: string attributes are copied verbatim and decoded later by the
//! parse pass. Numeric attributes (`Radius`, `StrokeWidth`, `Size`, `Width`, `Opacity`) are typed
//! here, so a non-numeric value in one of them is a structural error rather than a format error.
//! Element and attribute names are case-sensitive; unknown names are rejected. Attributes in a
//! foreign namespace (for example `xsi:*`) are ignored.

use std::path::Path;

use roxmltree::{Attribute, Document, Node as XmlNode};

use crate::document::model::{Canvas, Circle, Line, Node, Page, Rectangle, Text};
use crate::foundation::error::{PdlError, PdlResult};

/// Read and structurally load the document at `path`.
pub fn from_path(path: &Path) -> PdlResult<Page> {
    let source = std::fs::read_to_string(path).map_err(|e| PdlError::io(path, e))?;
    from_str(&source)
}

/// Structurally load a document from XML text.
pub fn from_str(source: &str) -> PdlResult<Page> {
    let doc = Document::parse(source)
        .map_err(|e| PdlError::structural(format!("malformed XML: {e}")))?;
    let root = doc.root_element();
    if root.tag_name().name() != "Page" {
        return Err(error_at(
            root,
            format!("root element must be <Page>, found <{}>", root.tag_name().name()),
        ));
    }
    read_page(root)
}

fn error_at(node: XmlNode<'_, '_>, msg: impl std::fmt::Display) -> PdlError {
    let pos = node.document().text_pos_at(node.range().start);
    PdlError::structural(format!("{msg} (line {}, column {})", pos.row, pos.col))
}

fn attributes<'a, 'input>(
    node: XmlNode<'a, 'input>,
) -> impl Iterator<Item = Attribute<'a, 'input>> {
    node.attributes().filter(|a| a.namespace().is_none())
}

fn unknown_attribute(node: XmlNode<'_, '_>, attr: &Attribute<'_, '_>) -> PdlError {
    error_at(
        node,
        format!(
            "unknown attribute '{}' on <{}>",
            attr.name(),
            node.tag_name().name()
        ),
    )
}

fn number(node: XmlNode<'_, '_>, attr: &Attribute<'_, '_>) -> PdlResult<f64> {
    attr.value().trim().parse::<f64>().map_err(|_| {
        error_at(
            node,
            format!(
                "attribute '{}' on <{}> must be a number, found '{}'",
                attr.name(),
                node.tag_name().name(),
                attr.value()
            ),
        )
    })
}

fn text(attr: &Attribute<'_, '_>) -> Option<String> {
    Some(attr.value().to_string())
}

fn read_page(node: XmlNode<'_, '_>) -> PdlResult<Page> {
    let mut page = Page::default();
    for attr in attributes(node) {
        match attr.name() {
            "Dimensions" => page.dimensions = text(&attr),
            _ => return Err(unknown_attribute(node, &attr)),
        }
    }
    page.items = read_children(node)?;
    Ok(page)
}

fn read_children(node: XmlNode<'_, '_>) -> PdlResult<Vec<Node>> {
    node.children()
        .filter(XmlNode::is_element)
        .map(read_node)
        .collect()
}

fn read_node(node: XmlNode<'_, '_>) -> PdlResult<Node> {
    match node.tag_name().name() {
        "ctCanvas" => read_canvas(node).map(Node::Canvas),
        "ctCircle" => read_circle(node).map(Node::Circle),
        "ctText" => read_text(node).map(Node::Text),
        "ctLine" => read_line(node).map(Node::Line),
        "ctRectangle" => read_rectangle(node).map(Node::Rectangle),
        other => Err(error_at(node, format!("unknown element <{other}>"))),
    }
}

fn ensure_leaf(node: XmlNode<'_, '_>) -> PdlResult<()> {
    match node.children().find(XmlNode::is_element) {
        Some(child) => Err(error_at(
            child,
            format!(
                "<{}> cannot contain <{}>",
                node.tag_name().name(),
                child.tag_name().name()
            ),
        )),
        None => Ok(()),
    }
}

fn read_canvas(node: XmlNode<'_, '_>) -> PdlResult<Canvas> {
    let mut canvas = Canvas::default();
    for attr in attributes(node) {
        match attr.name() {
            "Transform" => canvas.transform = text(&attr),
            "Opacity" => canvas.opacity = Some(number(node, &attr)?),
            _ => return Err(unknown_attribute(node, &attr)),
        }
    }
    canvas.items = read_children(node)?;
    Ok(canvas)
}

fn read_circle(node: XmlNode<'_, '_>) -> PdlResult<Circle> {
    let mut circle = Circle::default();
    for attr in attributes(node) {
        match attr.name() {
            "Transform" => circle.transform = text(&attr),
            "Opacity" => circle.opacity = Some(number(node, &attr)?),
            "Center" => circle.center = text(&attr),
            "Radius" => circle.radius = number(node, &attr)?,
            "Fill" => circle.fill = text(&attr),
            "Stroke" => circle.stroke = text(&attr),
            "StrokeWidth" => circle.stroke_width = number(node, &attr)?,
            _ => return Err(unknown_attribute(node, &attr)),
        }
    }
    ensure_leaf(node)?;
    Ok(circle)
}

fn read_text(node: XmlNode<'_, '_>) -> PdlResult<Text> {
    let mut t = Text::default();
    for attr in attributes(node) {
        match attr.name() {
            "Transform" => t.transform = text(&attr),
            "Opacity" => t.opacity = Some(number(node, &attr)?),
            "Origin" => t.origin = text(&attr),
            "Size" => t.size = number(node, &attr)?,
            "Font" => t.font = attr.value().to_string(),
            "Color" => t.color = text(&attr),
            _ => return Err(unknown_attribute(node, &attr)),
        }
    }
    ensure_leaf(node)?;
    t.string = node
        .children()
        .filter(XmlNode::is_text)
        .filter_map(|c| c.text())
        .collect();
    Ok(t)
}

fn read_line(node: XmlNode<'_, '_>) -> PdlResult<Line> {
    let mut line = Line::default();
    for attr in attributes(node) {
        match attr.name() {
            "Transform" => line.transform = text(&attr),
            "Opacity" => line.opacity = Some(number(node, &attr)?),
            "Points" => line.points = text(&attr),
            "Color" => line.color = text(&attr),
            "Width" => line.width = number(node, &attr)?,
            _ => return Err(unknown_attribute(node, &attr)),
        }
    }
    ensure_leaf(node)?;
    Ok(line)
}

fn read_rectangle(node: XmlNode<'_, '_>) -> PdlResult<Rectangle> {
    let mut rect = Rectangle::default();
    for attr in attributes(node) {
        match attr.name() {
            "Transform" => rect.transform = text(&attr),
            "Opacity" => rect.opacity = Some(number(node, &attr)?),
            "Points" => rect.points = text(&attr),
            "Fill" => rect.fill = text(&attr),
            "Stroke" => rect.stroke = text(&attr),
            "StrokeWidth" => rect.stroke_width = number(node, &attr)?,
            _ => return Err(unknown_attribute(node, &attr)),
        }
    }
    ensure_leaf(node)?;
    Ok(rect)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"<?xml version="1.0" encoding="utf-8"?>
<Page Dimensions="200,100">
  <ctCanvas Transform="2,0,0,2,0,0" Opacity="0.5">
    <ctCircle Center="10,10" Radius="5" Fill="#FF0000" Stroke="#00FF00" StrokeWidth="1.5"/>
    <ctText Origin="1,2" Size="12" Font="Arial" Color="#000000">Hello &amp; bye</ctText>
  </ctCanvas>
  <ctLine Points="0,0,10,10" Color="#0000FF" Width="2"/>
  <ctRectangle Points="1,2,3,4" Opacity="0"/>
</Page>"##;

    #[test]
    fn loads_raw_tree_verbatim() {
        let page = from_str(SAMPLE).unwrap();
        assert_eq!(page.dimensions.as_deref(), Some("200,100"));
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.node_count(), 5);

        let Node::Canvas(canvas) = &page.items[0] else {
            panic!("expected canvas");
        };
        assert_eq!(canvas.transform.as_deref(), Some("2,0,0,2,0,0"));
        assert_eq!(canvas.opacity, Some(0.5));

        let Node::Circle(circle) = &canvas.items[0] else {
            panic!("expected circle");
        };
        assert_eq!(circle.center.as_deref(), Some("10,10"));
        assert_eq!(circle.radius, 5.0);
        assert_eq!(circle.stroke_width, 1.5);
        assert_eq!(circle.opacity, None);

        let Node::Text(text) = &canvas.items[1] else {
            panic!("expected text");
        };
        assert_eq!(text.string, "Hello & bye");
        assert_eq!(text.font, "Arial");

        let Node::Rectangle(rect) = &page.items[2] else {
            panic!("expected rectangle");
        };
        assert_eq!(rect.opacity, Some(0.0));
        assert_eq!(rect.fill, None);
    }

    #[test]
    fn malformed_xml_is_structural() {
        let err = from_str("<Page Dimensions=\"1,1\">").unwrap_err();
        assert!(err.is_structural());
    }

    #[test]
    fn wrong_root_is_structural() {
        let err = from_str("<Document/>").unwrap_err();
        assert!(err.is_structural());
        assert!(err.to_string().contains("<Page>"));
    }

    #[test]
    fn unknown_names_are_structural() {
        let err = from_str(r#"<Page Dimensions="1,1"><ctEllipse/></Page>"#).unwrap_err();
        assert!(err.is_structural());

        let err = from_str(r#"<Page Dimensions="1,1"><ctLine Colour="x"/></Page>"#).unwrap_err();
        assert!(err.is_structural());
        assert!(err.to_string().contains("Colour"));
    }

    #[test]
    fn bad_number_is_structural_with_position() {
        let err = from_str("<Page Dimensions=\"1,1\">\n<ctCircle Radius=\"big\"/></Page>")
            .unwrap_err();
        assert!(err.is_structural());
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn malformed_string_attribute_is_left_for_parse_pass() {
        let page = from_str(r#"<Page Dimensions="1,1"><ctCircle Center="oops"/></Page>"#).unwrap();
        let Node::Circle(circle) = &page.items[0] else {
            panic!("expected circle");
        };
        assert_eq!(circle.center.as_deref(), Some("oops"));
    }

    #[test]
    fn leaves_cannot_have_children() {
        let err = from_str(r#"<Page Dimensions="1,1"><ctLine><ctCircle/></ctLine></Page>"#)
            .unwrap_err();
        assert!(err.is_structural());
    }

    #[test]
    fn foreign_namespace_attributes_are_ignored() {
        let page = from_str(
            r#"<Page xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:noNamespaceSchemaLocation="pdl.xsd" Dimensions="3,4"/>"#,
        )
        .unwrap();
        assert_eq!(page.dimensions.as_deref(), Some("3,4"));
    }
}
