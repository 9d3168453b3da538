use wallkit_core::{Obstacle, ObstacleKind, Trajectory, Wall, Waypoint};

#[test]
fn test_wall_roundtrips_through_json() {
    let wall = Wall::new(4.0, 3.0).unwrap();
    let json = serde_json::to_string(&wall).unwrap();
    assert_eq!(json, r#"{"width":4.0,"height":3.0}"#);
}

#[test]
fn test_obstacle_reads_service_payload() {
    let payload = r#"{"x":1.0,"y":0.5,"width":0.8,"height":2.0,"type":"door","name":"Door 1"}"#;
    let obstacle: Obstacle = serde_json::from_str(payload).unwrap();
    assert_eq!(obstacle.kind, ObstacleKind::Door);
    assert_eq!(obstacle.label(), "Door 1");
    assert_eq!(obstacle.rect().max_y(), 2.5);
}

#[test]
fn test_trajectory_is_a_point_list() {
    let trajectory = Trajectory::new(vec![Waypoint::new(0.25, 0.25), Waypoint::new(3.75, 0.25)]);
    let json = serde_json::to_value(&trajectory).unwrap();
    assert_eq!(json["points"][1]["x"], 3.75);
}
