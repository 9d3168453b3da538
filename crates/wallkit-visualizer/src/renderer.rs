//! Scene rendering.
//!
//! [`render`] redraws the whole scene from a [`SceneSnapshot`] on every call.
//! It holds no state: redrawing after a resize means calling it again with
//! the same snapshot on the resized surface.

use wallkit_core::constants::{LEGEND_WIDTH_PX, VIEW_PADDING_PX};
use wallkit_core::{Obstacle, Trajectory, Wall, Waypoint};

use crate::surface::{Color, DrawSurface, StrokeStyle, TextStyle};
use crate::viewport::{ScreenPoint, ViewTransform};

/// Everything needed to draw one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneSnapshot {
    pub wall: Option<Wall>,
    pub obstacles: Vec<Obstacle>,
    /// Obstacle being drawn with the pointer, not yet committed.
    pub preview: Option<Obstacle>,
    pub trajectory: Trajectory,
    pub marker: Option<Waypoint>,
}

impl SceneSnapshot {
    pub fn new(wall: Wall) -> Self {
        Self {
            wall: Some(wall),
            ..Self::default()
        }
    }

    pub fn with_obstacles(mut self, obstacles: Vec<Obstacle>) -> Self {
        self.obstacles = obstacles;
        self
    }

    pub fn with_preview(mut self, preview: Option<Obstacle>) -> Self {
        self.preview = preview;
        self
    }

    pub fn with_trajectory(mut self, trajectory: Trajectory) -> Self {
        self.trajectory = trajectory;
        self
    }

    pub fn with_marker(mut self, marker: Option<Waypoint>) -> Self {
        self.marker = marker;
        self
    }
}

/// Colors and sizes used by [`render`].
#[derive(Debug, Clone, PartialEq)]
pub struct RenderStyle {
    pub padding_px: f64,
    pub wall_fill: Color,
    pub wall_stroke: StrokeStyle,
    pub obstacle_fill: Color,
    pub obstacle_stroke: StrokeStyle,
    pub preview_fill: Color,
    pub preview_stroke: StrokeStyle,
    pub label: TextStyle,
    /// Vertical nudge applied to obstacle labels so they sit visually centered.
    pub label_baseline_offset: f64,
    pub path: StrokeStyle,
    pub start_color: Color,
    pub end_color: Color,
    pub endpoint_radius: f64,
    pub endpoint_outline: StrokeStyle,
    pub marker_color: Color,
    pub marker_radius: f64,
    pub marker_outline: StrokeStyle,
    pub legend: LegendStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendStyle {
    pub width_px: f64,
    pub height_px: f64,
    pub margin_px: f64,
    /// Extra space kept below the ruler for its label.
    pub label_space_px: f64,
    pub stroke: StrokeStyle,
    pub text: TextStyle,
}

impl Default for LegendStyle {
    fn default() -> Self {
        Self {
            width_px: LEGEND_WIDTH_PX,
            height_px: 20.0,
            margin_px: 10.0,
            label_space_px: 15.0,
            stroke: StrokeStyle::new(Color::BLACK, 2.0),
            text: TextStyle {
                color: Color::BLACK,
                size_px: 10.0,
            },
        }
    }
}

impl Default for RenderStyle {
    fn default() -> Self {
        let orange = Color::rgb(0xFF, 0x98, 0x00);
        Self {
            padding_px: VIEW_PADDING_PX,
            wall_fill: Color::rgb(0xE3, 0xF2, 0xFD),
            wall_stroke: StrokeStyle::new(Color::rgb(0x21, 0x96, 0xF3), 2.0),
            obstacle_fill: orange,
            obstacle_stroke: StrokeStyle::new(Color::rgb(0xE6, 0x51, 0x00), 2.0),
            preview_fill: orange.with_alpha(0.5),
            preview_stroke: StrokeStyle::new(orange, 1.0),
            label: TextStyle {
                color: Color::BLACK,
                size_px: 10.0,
            },
            label_baseline_offset: 3.0,
            path: StrokeStyle::new(Color::rgb(0x21, 0x96, 0xF3), 2.0).round(),
            start_color: Color::rgb(0x4C, 0xAF, 0x50),
            end_color: Color::rgb(0xF4, 0x43, 0x36),
            endpoint_radius: 5.0,
            endpoint_outline: StrokeStyle::new(Color::WHITE, 1.0),
            marker_color: Color::rgb(0xF4, 0x43, 0x36),
            marker_radius: 10.0,
            marker_outline: StrokeStyle::new(Color::WHITE, 2.0),
            legend: LegendStyle::default(),
        }
    }
}

/// Draws `snapshot` onto `surface`, fitted to the surface size.
///
/// Returns the transform used, or `None` when there is no wall (the surface
/// is only cleared).
pub fn render(
    snapshot: &SceneSnapshot,
    surface: &mut dyn DrawSurface,
    style: &RenderStyle,
) -> Option<ViewTransform> {
    surface.clear();
    let wall = snapshot.wall.as_ref()?;
    let viewport = surface.size();
    let transform = ViewTransform::fit_wall(wall, viewport, style.padding_px);

    let wall_rect = transform.rect_to_screen(0.0, 0.0, wall.width, wall.height);
    surface.fill_rect(wall_rect, style.wall_fill);
    surface.stroke_rect(wall_rect, &style.wall_stroke);

    for obstacle in &snapshot.obstacles {
        draw_obstacle(surface, &transform, obstacle, style, false);
    }
    if let Some(preview) = &snapshot.preview {
        draw_obstacle(surface, &transform, preview, style, true);
    }

    if snapshot.trajectory.len() > 1 {
        draw_trajectory(surface, &transform, &snapshot.trajectory, style);
    }

    if let Some(marker) = &snapshot.marker {
        let center = transform.to_screen(marker);
        surface.fill_circle(center, style.marker_radius, style.marker_color);
        surface.stroke_circle(center, style.marker_radius, &style.marker_outline);
    }

    draw_legend(surface, &transform, style);
    Some(transform)
}

fn draw_obstacle(
    surface: &mut dyn DrawSurface,
    transform: &ViewTransform,
    obstacle: &Obstacle,
    style: &RenderStyle,
    preview: bool,
) {
    let rect = transform.rect_to_screen(obstacle.x, obstacle.y, obstacle.width, obstacle.height);
    if preview {
        surface.fill_rect(rect, style.preview_fill);
        surface.stroke_rect(rect, &style.preview_stroke);
        return;
    }

    surface.fill_rect(rect, style.obstacle_fill);
    surface.stroke_rect(rect, &style.obstacle_stroke);
    let center = rect.center();
    surface.fill_text(
        obstacle.label(),
        ScreenPoint::new(center.x, center.y + style.label_baseline_offset),
        &style.label,
    );
}

fn draw_trajectory(
    surface: &mut dyn DrawSurface,
    transform: &ViewTransform,
    trajectory: &Trajectory,
    style: &RenderStyle,
) {
    let points: Vec<ScreenPoint> = trajectory
        .points()
        .iter()
        .map(|p| transform.to_screen(p))
        .collect();
    surface.stroke_path(&points, &style.path);

    let endpoints = [
        (points.first(), style.start_color),
        (points.last(), style.end_color),
    ];
    for (point, color) in endpoints {
        if let Some(point) = point {
            surface.fill_circle(*point, style.endpoint_radius, color);
            surface.stroke_circle(*point, style.endpoint_radius, &style.endpoint_outline);
        }
    }
}

/// Ruler anchored to the bottom-right corner with its world length below it.
fn draw_legend(surface: &mut dyn DrawSurface, transform: &ViewTransform, style: &RenderStyle) {
    let legend = &style.legend;
    let viewport = surface.size();
    let x = viewport.width - legend.margin_px - legend.width_px;
    let y = viewport.height - legend.margin_px - legend.height_px - legend.label_space_px;
    let mid = y + legend.height_px / 2.0;

    surface.stroke_path(
        &[
            ScreenPoint::new(x, mid),
            ScreenPoint::new(x + legend.width_px, mid),
        ],
        &legend.stroke,
    );
    for cap_x in [x, x + legend.width_px] {
        surface.stroke_path(
            &[
                ScreenPoint::new(cap_x, y),
                ScreenPoint::new(cap_x, y + legend.height_px),
            ],
            &legend.stroke,
        );
    }

    let distance = transform.scale_legend(legend.width_px);
    surface.fill_text(
        &format!("{} m", distance),
        ScreenPoint::new(x + legend.width_px / 2.0, y + legend.height_px + 12.0),
        &legend.text,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, LineCap, RecordingSurface};
    use wallkit_core::ObstacleKind;

    fn snapshot() -> SceneSnapshot {
        SceneSnapshot::new(Wall::new(4.0, 3.0).unwrap())
    }

    #[test]
    fn test_no_wall_only_clears() {
        let mut surface = RecordingSurface::new(800, 600);
        let transform = render(&SceneSnapshot::default(), &mut surface, &RenderStyle::default());
        assert!(transform.is_none());
        assert_eq!(surface.commands(), &[DrawCommand::Clear]);
    }

    #[test]
    fn test_wall_is_filled_then_stroked() {
        let mut surface = RecordingSurface::new(800, 600);
        let style = RenderStyle::default();
        render(&snapshot(), &mut surface, &style);

        let commands = surface.commands();
        assert_eq!(commands[0], DrawCommand::Clear);
        assert!(matches!(
            commands[1],
            DrawCommand::FillRect { color, .. } if color == style.wall_fill
        ));
        assert!(matches!(commands[2], DrawCommand::StrokeRect { .. }));
    }

    #[test]
    fn test_preview_has_no_label() {
        let preview = Obstacle::new(0.5, 0.5, 1.0, 1.0, ObstacleKind::Window, "Draft").unwrap();
        let committed = Obstacle::new(2.0, 1.0, 1.0, 1.0, ObstacleKind::Door, "Door 1").unwrap();
        let scene = snapshot()
            .with_obstacles(vec![committed])
            .with_preview(Some(preview));

        let mut surface = RecordingSurface::new(800, 600);
        render(&scene, &mut surface, &RenderStyle::default());
        let texts = surface.texts();
        assert!(texts.contains(&"Door 1"));
        assert!(!texts.contains(&"Draft"));
    }

    #[test]
    fn test_single_point_trajectory_is_not_drawn() {
        let scene = snapshot().with_trajectory(Trajectory::new(vec![Waypoint::new(1.0, 1.0)]));
        let mut surface = RecordingSurface::new(800, 600);
        render(&scene, &mut surface, &RenderStyle::default());
        let paths = surface
            .commands()
            .iter()
            .filter(|c| {
                matches!(c, DrawCommand::StrokePath { stroke, .. } if stroke.cap == LineCap::Round)
            })
            .count();
        assert_eq!(paths, 0);
    }
}
