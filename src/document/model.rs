//! Raw document tree.
//!
//! Nodes carry their attributes exactly as written in the source document (strings for geometry,
//! colors and transforms) plus cached numeric fields filled in by the parse pass. Field names
//! serialize to the document's attribute names, so the JSON encoding of a raw tree mirrors the
//! XML vocabulary.

use crate::foundation::core::{Affine, Color, Point, Rect, Size};

/// Root of a document. Owns the whole node tree.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct Page {
    /// `"W,H"`. Required.
    pub dimensions: Option<String>,
    /// Top-level nodes, drawn in order.
    #[serde(default)]
    pub items: Vec<Node>,

    #[serde(skip)]
    pub(crate) size: Size,
}

/// The closed set of drawable node kinds.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub enum Node {
    #[serde(rename = "ctCanvas")]
    Canvas(Canvas),
    #[serde(rename = "ctCircle")]
    Circle(Circle),
    #[serde(rename = "ctText")]
    Text(Text),
    #[serde(rename = "ctLine")]
    Line(Line),
    #[serde(rename = "ctRectangle")]
    Rectangle(Rectangle),
}

impl Node {
    /// Element name of this node in the XML vocabulary.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Canvas(_) => "ctCanvas",
            Self::Circle(_) => "ctCircle",
            Self::Text(_) => "ctText",
            Self::Line(_) => "ctLine",
            Self::Rectangle(_) => "ctRectangle",
        }
    }

    pub(crate) fn placement(&self) -> &Placement {
        match self {
            Self::Canvas(n) => &n.placement,
            Self::Circle(n) => &n.placement,
            Self::Text(n) => &n.placement,
            Self::Line(n) => &n.placement,
            Self::Rectangle(n) => &n.placement,
        }
    }

    /// Cached local transform. Identity until parsed.
    pub fn matrix(&self) -> Affine {
        self.placement().matrix
    }

    /// Cached opacity: the `Opacity` attribute, or 1.0 when it was not specified.
    pub fn resolved_opacity(&self) -> f64 {
        self.placement().opacity
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        match self {
            Self::Canvas(c) => 1 + c.items.iter().map(Node::node_count).sum::<usize>(),
            _ => 1,
        }
    }
}

/// Transform and opacity shared by every drawable node, in parsed form.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Placement {
    pub(crate) matrix: Affine,
    pub(crate) opacity: f64,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            matrix: Affine::IDENTITY,
            opacity: 1.0,
        }
    }
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct Canvas {
    /// `"m11,m12,m21,m22,m31,m32"`. Identity when absent.
    pub transform: Option<String>,
    /// Layer opacity. 1.0 when absent.
    pub opacity: Option<f64>,
    /// Children, drawn in order under this canvas's transform and opacity.
    #[serde(default)]
    pub items: Vec<Node>,

    #[serde(skip)]
    pub(crate) placement: Placement,
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct Circle {
    /// `"m11,m12,m21,m22,m31,m32"`. Identity when absent.
    pub transform: Option<String>,
    /// Layer opacity. 1.0 when absent.
    pub opacity: Option<f64>,
    /// `"x,y"`. Origin when absent.
    pub center: Option<String>,
    /// Radius in document units.
    #[serde(default)]
    pub radius: f64,
    /// Fill color. No fill when absent.
    pub fill: Option<String>,
    /// Stroke color. No stroke when absent.
    pub stroke: Option<String>,
    /// Stroke width in document units. No stroke unless positive.
    #[serde(default)]
    pub stroke_width: f64,

    #[serde(skip)]
    pub(crate) placement: Placement,
    #[serde(skip)]
    pub(crate) center_pt: Point,
    #[serde(skip)]
    pub(crate) fill_color: Color,
    #[serde(skip)]
    pub(crate) stroke_color: Color,
}

impl Circle {
    pub fn center_point(&self) -> Point {
        self.center_pt
    }

    pub fn fill_color(&self) -> Color {
        self.fill_color
    }

    pub fn stroke_color(&self) -> Color {
        self.stroke_color
    }
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct Text {
    /// `"m11,m12,m21,m22,m31,m32"`. Identity when absent.
    pub transform: Option<String>,
    /// Layer opacity. 1.0 when absent.
    pub opacity: Option<f64>,
    /// `"x,y"` of the layout's top-left corner. Origin when absent.
    pub origin: Option<String>,
    /// Text content (the element body in XML).
    #[serde(default)]
    pub string: String,
    /// Font size in document units.
    #[serde(default)]
    pub size: f64,
    /// Font family name.
    #[serde(default)]
    pub font: String,
    /// Text color. Transparent when absent.
    pub color: Option<String>,

    #[serde(skip)]
    pub(crate) placement: Placement,
    #[serde(skip)]
    pub(crate) origin_pt: Point,
    #[serde(skip)]
    pub(crate) text_color: Color,
}

impl Text {
    pub fn origin_point(&self) -> Point {
        self.origin_pt
    }

    pub fn text_color(&self) -> Color {
        self.text_color
    }
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct Line {
    /// `"m11,m12,m21,m22,m31,m32"`. Identity when absent.
    pub transform: Option<String>,
    /// Layer opacity. 1.0 when absent.
    pub opacity: Option<f64>,
    /// `"x1,y1,x2,y2"`. Required.
    pub points: Option<String>,
    /// Line color. Transparent when absent.
    pub color: Option<String>,
    /// Stroke width in document units.
    #[serde(default)]
    pub width: f64,

    #[serde(skip)]
    pub(crate) placement: Placement,
    #[serde(skip)]
    pub(crate) endpoints: [Point; 2],
    #[serde(skip)]
    pub(crate) line_color: Color,
}

impl Line {
    pub fn endpoints(&self) -> (Point, Point) {
        (self.endpoints[0], self.endpoints[1])
    }

    pub fn line_color(&self) -> Color {
        self.line_color
    }
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct Rectangle {
    /// `"m11,m12,m21,m22,m31,m32"`. Identity when absent.
    pub transform: Option<String>,
    /// Layer opacity. 1.0 when absent.
    pub opacity: Option<f64>,
    /// `"left,top,right,bottom"`. Empty rectangle when absent.
    pub points: Option<String>,
    /// Fill color. No fill when absent.
    pub fill: Option<String>,
    /// Stroke color. No stroke when absent.
    pub stroke: Option<String>,
    /// Stroke width in document units. No stroke unless positive.
    #[serde(default)]
    pub stroke_width: f64,

    #[serde(skip)]
    pub(crate) placement: Placement,
    #[serde(skip)]
    pub(crate) rect: Rect,
    #[serde(skip)]
    pub(crate) fill_color: Color,
    #[serde(skip)]
    pub(crate) stroke_color: Color,
}

impl Rectangle {
    pub fn bounds(&self) -> Rect {
        self.rect
    }

    pub fn fill_color(&self) -> Color {
        self.fill_color
    }

    pub fn stroke_color(&self) -> Color {
        self.stroke_color
    }
}

impl Page {
    /// Cached page size. Zero until parsed.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Number of drawable nodes in the tree (the page itself excluded).
    pub fn node_count(&self) -> usize {
        self.items.iter().map(Node::node_count).sum()
    }
}
