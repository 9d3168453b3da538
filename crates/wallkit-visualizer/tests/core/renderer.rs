use wallkit_core::{Obstacle, ObstacleKind, Trajectory, Wall, Waypoint};
use wallkit_visualizer::{
    render, Color, DrawCommand, DrawSurface, LineCap, RecordingSurface, RenderStyle,
    SceneSnapshot, ScreenPoint,
};

fn coverage_path() -> Trajectory {
    vec![
        Waypoint::new(0.25, 0.25),
        Waypoint::new(3.75, 0.25),
        Waypoint::new(3.75, 0.75),
        Waypoint::new(0.25, 0.75),
    ]
    .into()
}

fn scene() -> SceneSnapshot {
    let wall = Wall::new(4.0, 3.0).unwrap();
    SceneSnapshot::new(wall)
        .with_obstacles(vec![
            Obstacle::new(1.0, 1.0, 1.0, 1.0, ObstacleKind::Window, "Window 1").unwrap(),
            Obstacle::new(3.0, 0.0, 0.5, 2.0, ObstacleKind::Door, "").unwrap(),
        ])
        .with_trajectory(coverage_path())
        .with_marker(Some(Waypoint::new(3.75, 0.25)))
}

#[test]
fn test_full_scene_draw_order() {
    let style = RenderStyle::default();
    let mut surface = RecordingSurface::new(800, 600);
    let transform = render(&scene(), &mut surface, &style).unwrap();

    let kinds: Vec<&'static str> = surface
        .commands()
        .iter()
        .map(|c| match c {
            DrawCommand::Clear => "clear",
            DrawCommand::FillRect { .. } => "fill_rect",
            DrawCommand::StrokeRect { .. } => "stroke_rect",
            DrawCommand::StrokePath { .. } => "path",
            DrawCommand::FillCircle { .. } => "fill_circle",
            DrawCommand::StrokeCircle { .. } => "stroke_circle",
            DrawCommand::FillText { .. } => "text",
        })
        .collect();

    assert_eq!(
        kinds,
        vec![
            "clear",
            // wall
            "fill_rect",
            "stroke_rect",
            // two obstacles with labels
            "fill_rect",
            "stroke_rect",
            "text",
            "fill_rect",
            "stroke_rect",
            "text",
            // path, start and end markers
            "path",
            "fill_circle",
            "stroke_circle",
            "fill_circle",
            "stroke_circle",
            // robot marker
            "fill_circle",
            "stroke_circle",
            // legend ruler, two caps, label
            "path",
            "path",
            "path",
            "text",
        ]
    );

    let start = transform.to_screen(&Waypoint::new(0.25, 0.25));
    assert_eq!(surface.circles(style.start_color), vec![(start, 5.0)]);
    // End marker and robot marker share a color.
    let red = surface.circles(style.end_color);
    assert_eq!(red.len(), 2);
    assert_eq!(red[1].1, 10.0);
}

#[test]
fn test_unnamed_obstacle_is_labelled_with_kind() {
    let mut surface = RecordingSurface::new(800, 600);
    render(&scene(), &mut surface, &RenderStyle::default());
    let texts = surface.texts();
    assert_eq!(texts[0], "Window 1");
    assert_eq!(texts[1], "door");
}

#[test]
fn test_path_uses_round_caps() {
    let mut surface = RecordingSurface::new(800, 600);
    render(&scene(), &mut surface, &RenderStyle::default());
    let path = surface
        .commands()
        .iter()
        .find_map(|c| match c {
            DrawCommand::StrokePath { points, stroke } if stroke.cap == LineCap::Round => {
                Some(points.clone())
            }
            _ => None,
        })
        .unwrap();
    assert_eq!(path.len(), 4);
}

#[test]
fn test_legend_anchored_bottom_right() {
    let mut surface = RecordingSurface::new(800, 600);
    let transform = render(&scene(), &mut surface, &RenderStyle::default()).unwrap();

    let label = surface
        .commands()
        .iter()
        .rev()
        .find_map(|c| match c {
            DrawCommand::FillText { text, anchor, .. } => Some((text.clone(), *anchor)),
            _ => None,
        })
        .unwrap();

    assert_eq!(label.0, format!("{} m", transform.scale_legend(50.0)));
    // x = 800 - 10 - 50, centered; y = 600 - 10 - 20 - 15 + 20 + 12
    assert_eq!(label.1, ScreenPoint::new(765.0, 587.0));
}

#[test]
fn test_rerender_after_resize_draws_same_content() {
    let snapshot = scene();
    let style = RenderStyle::default();
    let mut surface = RecordingSurface::new(800, 600);
    render(&snapshot, &mut surface, &style);
    let before = surface.commands().len();
    let before_texts: Vec<String> = surface.texts().iter().map(|s| s.to_string()).collect();

    surface.resize(1200, 500);
    let transform = render(&snapshot, &mut surface, &style).unwrap();
    assert_eq!(surface.commands().len(), before);
    assert_eq!(surface.texts()[..2], before_texts[..2]);

    // Wall stays centered in the new viewport.
    let center = transform.to_screen(&Waypoint::new(2.0, 1.5));
    assert!((center.x - 600.0).abs() < 1e-9);
    assert!((center.y - 250.0).abs() < 1e-9);
}

#[test]
fn test_preview_uses_translucent_style() {
    let preview = Obstacle::new(0.2, 0.2, 0.5, 0.5, ObstacleKind::Window, "").unwrap();
    let snapshot = SceneSnapshot::new(Wall::new(4.0, 3.0).unwrap()).with_preview(Some(preview));
    let style = RenderStyle::default();
    let mut surface = RecordingSurface::new(800, 600);
    render(&snapshot, &mut surface, &style);

    let preview_fill = surface.commands().iter().any(|c| {
        matches!(c, DrawCommand::FillRect { color, .. } if *color == style.preview_fill)
    });
    assert!(preview_fill);
    assert_eq!(style.preview_fill, Color::rgba(0xFF, 0x98, 0x00, 128));
    assert_eq!(style.preview_stroke.width, 1.0);
    // Only the legend label is drawn.
    assert_eq!(surface.texts().len(), 1);
}
