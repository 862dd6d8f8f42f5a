use simplepdl::{
    Affine, Color, DrawCall, DrawSession, Node, OpacityLayer, Point, Primitive, RecordingSession,
    load, load_xml_str, render,
};

const DOC: &str = r##"<Page Dimensions="100,50">
  <ctCanvas Transform="2,0,0,2,0,0" Opacity="0.5">
    <ctCircle Transform="1,0,0,1,3,0" Center="1,0" Radius="4" Fill="#FF0000" Stroke="#0000FF" StrokeWidth="1"/>
    <ctText Origin="2,2" Size="10" Font="Arial" Color="#000000">hi</ctText>
  </ctCanvas>
  <ctLine Points="0,0,10,10" Width="2"/>
  <ctRectangle Points="1,2,5,8" Fill="#80FF8800"/>
</Page>"##;

fn record(xml: &str) -> Vec<DrawCall> {
    let doc = load_xml_str(xml).unwrap();
    let mut rec = RecordingSession::new();
    render(&doc, &mut rec, Affine::IDENTITY);
    assert_eq!(rec.open_layers(), 0);
    rec.into_calls()
}

#[test]
fn draw_is_deterministic() {
    let doc = load_xml_str(DOC).unwrap();
    let mut a = RecordingSession::new();
    let mut b = RecordingSession::new();
    render(&doc, &mut a, Affine::scale(1.5));
    render(&doc, &mut b, Affine::scale(1.5));
    assert!(!a.calls().is_empty());
    assert_eq!(a.calls(), b.calls());
}

#[test]
fn canvas_then_own_transform_composes_parent_first() {
    let calls = record(DOC);
    let (transform, center) = calls
        .iter()
        .find_map(|c| match c {
            DrawCall::Draw {
                primitive: Primitive::FillCircle { center, .. },
                transform,
                ..
            } => Some((*transform, *center)),
            _ => None,
        })
        .unwrap();
    assert_eq!(transform * center, Point::new(8.0, 0.0));
}

#[test]
fn page_background_is_drawn_first_without_layer() {
    let calls = record(DOC);
    assert_eq!(
        calls[0],
        DrawCall::Draw {
            primitive: Primitive::FillRect {
                rect: simplepdl::Rect::new(0.0, 0.0, 100.0, 50.0),
                color: Color::WHITE,
            },
            transform: Affine::IDENTITY,
            opacity: 1.0,
        }
    );
}

#[test]
fn nested_opacity_multiplies() {
    let calls = record(DOC);
    let opacities: Vec<f32> = calls
        .iter()
        .filter_map(|c| match c {
            DrawCall::Draw {
                primitive: Primitive::FillCircle { .. } | Primitive::StrokeCircle { .. },
                opacity,
                ..
            } => Some(*opacity),
            _ => None,
        })
        .collect();
    assert_eq!(opacities, vec![0.5, 0.5]);
}

#[test]
fn opacity_defaults_only_when_absent() {
    let doc = load_xml_str(
        r#"<Page Dimensions="1,1"><ctLine Points="0,0,1,1"/><ctLine Points="0,0,1,1" Opacity="0"/></Page>"#,
    )
    .unwrap();
    let items = &doc.page().items;
    assert_eq!(items[0].resolved_opacity(), 1.0);
    assert_eq!(items[1].resolved_opacity(), 0.0);
}

#[test]
fn rectangle_without_paint_only_scopes_a_layer() {
    let calls = record(r#"<Page Dimensions="10,10"><ctRectangle Points="0,0,5,5" Opacity="0.4"/></Page>"#);
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[1], DrawCall::PushLayer { opacity: 0.4 });
    assert_eq!(calls[2], DrawCall::PopLayer);
}

#[test]
fn zero_stroke_width_skips_stroke() {
    let calls = record(
        r##"<Page Dimensions="10,10"><ctCircle Center="1,1" Radius="1" Stroke="#000000" StrokeWidth="0"/></Page>"##,
    );
    assert!(
        !calls
            .iter()
            .any(|c| matches!(c, DrawCall::Draw { primitive: Primitive::StrokeCircle { .. }, .. }))
    );
}

#[test]
fn line_without_color_draws_transparent() {
    let calls = record(DOC);
    let line = calls
        .iter()
        .find_map(|c| match c {
            DrawCall::Draw {
                primitive: Primitive::Line { color, width, .. },
                ..
            } => Some((*color, *width)),
            _ => None,
        })
        .unwrap();
    assert_eq!(line, (Color::TRANSPARENT, 2.0));
}

#[test]
fn one_bad_attribute_fails_the_whole_document() {
    let raw = simplepdl::document::xml::from_str(
        r##"<Page Dimensions="10,10">
  <ctRectangle Points="0,0,5,5" Fill="#00FF00"/>
  <ctCanvas><ctCircle Center="1,1" Fill="#ABC"/></ctCanvas>
</Page>"##,
    )
    .unwrap();
    let err = load(raw).unwrap_err();
    assert!(err.is_format());
    assert_eq!(err.location(), Some("Page/ctCanvas[1]/ctCircle[0]@Fill"));
}

#[test]
fn raw_nodes_parse_and_draw_individually() {
    let mut circle = simplepdl::Circle::default();
    circle.center = Some("2,3".into());
    circle.radius = 1.0;
    circle.fill = Some("#FFFFFF".into());
    let mut node = Node::Circle(circle);
    node.parse().unwrap();

    let mut rec = RecordingSession::new();
    node.draw(&mut rec, Affine::translate((10.0, 0.0)));
    let prims: Vec<_> = rec.primitives().cloned().collect();
    assert_eq!(
        prims,
        vec![Primitive::FillCircle {
            center: Point::new(2.0, 3.0),
            radius: 1.0,
            color: Color::WHITE,
        }]
    );
}

#[test]
fn guard_balances_layers_for_custom_sessions() {
    let mut rec = RecordingSession::new();
    {
        let mut layer = OpacityLayer::push(&mut rec, 0.75);
        layer.set_transform(Affine::IDENTITY);
        layer.fill_rect(simplepdl::Rect::new(0.0, 0.0, 1.0, 1.0), Color::BLACK);
    }
    assert_eq!(rec.open_layers(), 0);
    assert_eq!(rec.calls().len(), 3);
}
