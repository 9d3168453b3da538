use wallkit_core::Waypoint;
use wallkit_visualizer::ViewTransform;

const PADDING: f64 = 40.0;

fn assert_fits(t: &ViewTransform, wall_w: f64, wall_h: f64, vp_w: f64, vp_h: f64) {
    let min = t.to_screen(&Waypoint::new(0.0, 0.0));
    let max = t.to_screen(&Waypoint::new(wall_w, wall_h));
    assert!(min.x >= PADDING - 1e-6, "left edge {} inside padding", min.x);
    assert!(min.y >= PADDING - 1e-6, "top edge {} inside padding", min.y);
    assert!(max.x <= vp_w - PADDING + 1e-6, "right edge {} past padding", max.x);
    assert!(max.y <= vp_h - PADDING + 1e-6, "bottom edge {} past padding", max.y);
}

#[test]
fn test_fit_touches_padding_on_limiting_axis() {
    let t = ViewTransform::fit_to_viewport(4.0, 3.0, 800.0, 600.0, PADDING);
    assert_fits(&t, 4.0, 3.0, 800.0, 600.0);

    // Height limits: the wall spans exactly the padded height.
    let top = t.to_screen(&Waypoint::new(0.0, 0.0)).y;
    let bottom = t.to_screen(&Waypoint::new(0.0, 3.0)).y;
    assert!((top - PADDING).abs() < 1e-9);
    assert!((bottom - (600.0 - PADDING)).abs() < 1e-9);
}

#[test]
fn test_larger_scale_would_overflow() {
    let t = ViewTransform::fit_to_viewport(10.0, 2.0, 640.0, 480.0, PADDING);
    let bigger = ViewTransform::fit_to_viewport(10.0, 2.0, 640.0, 480.0, PADDING - 1.0);
    assert!(bigger.scale > t.scale);
    // Width limits: 10m at the larger scale no longer fits in 640 - 2*40.
    assert!(10.0 * bigger.scale > 640.0 - 2.0 * PADDING);
}

#[test]
fn test_refit_keeps_wall_centered() {
    for (vp_w, vp_h) in [(800.0, 600.0), (1024.0, 400.0), (300.0, 900.0)] {
        let t = ViewTransform::fit_to_viewport(4.0, 3.0, vp_w, vp_h, PADDING);
        assert_fits(&t, 4.0, 3.0, vp_w, vp_h);
        let center = t.to_screen(&Waypoint::new(2.0, 1.5));
        assert!((center.x - vp_w / 2.0).abs() < 1e-9);
        assert!((center.y - vp_h / 2.0).abs() < 1e-9);
    }
}

#[test]
fn test_screen_y_grows_with_world_y() {
    let t = ViewTransform::fit_to_viewport(4.0, 3.0, 800.0, 600.0, PADDING);
    let low = t.to_screen(&Waypoint::new(1.0, 0.5));
    let high = t.to_screen(&Waypoint::new(1.0, 2.5));
    assert!(high.y > low.y);
}

#[test]
fn test_legend_distance() {
    // 800x600 viewport, 8m x 2m wall: scale = 720 / 8 = 90 px/m.
    let t = ViewTransform::fit_to_viewport(8.0, 2.0, 800.0, 600.0, PADDING);
    assert!((t.scale - 90.0).abs() < 1e-9);
    assert_eq!(t.scale_legend(50.0), 0.56);
    assert_eq!(t.scale_legend(90.0), 1.0);
}
