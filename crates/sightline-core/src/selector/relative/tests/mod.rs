use super::*;

fn rect(left: f64, top: f64, right: f64, bottom: f64) -> Rect {
    Rect {
        left,
        top,
        right,
        bottom,
    }
}

#[test]
fn test_rect_from_quad_takes_extremes() {
    // A rotated-ish quad still yields its bounding rect.
    let quad = [10.0, 5.0, 100.0, 8.0, 98.0, 40.0, 12.0, 38.0];
    let r = Rect::from_quad(&quad).unwrap();
    assert!((r.left - 10.0).abs() < f64::EPSILON);
    assert!((r.top - 5.0).abs() < f64::EPSILON);
    assert!((r.right - 100.0).abs() < f64::EPSILON);
    assert!((r.bottom - 40.0).abs() < f64::EPSILON);
}

#[test]
fn test_left_of_compares_left_edges() {
    let anchor = rect(100.0, 0.0, 200.0, 20.0);
    assert!(RelativePosition::LeftOf.satisfies(&rect(10.0, 0.0, 90.0, 20.0), &anchor));
    // Same left edge does not count as "left of".
    assert!(!RelativePosition::LeftOf.satisfies(&rect(100.0, 0.0, 150.0, 20.0), &anchor));
    assert!(!RelativePosition::LeftOf.satisfies(&rect(150.0, 0.0, 250.0, 20.0), &anchor));
}

#[test]
fn test_right_of_compares_right_edges() {
    let anchor = rect(100.0, 0.0, 200.0, 20.0);
    assert!(RelativePosition::RightOf.satisfies(&rect(150.0, 0.0, 250.0, 20.0), &anchor));
    assert!(!RelativePosition::RightOf.satisfies(&rect(50.0, 0.0, 200.0, 20.0), &anchor));
}

#[test]
fn test_above_and_below_compare_vertical_edges() {
    let anchor = rect(0.0, 100.0, 50.0, 150.0);
    assert!(RelativePosition::Above.satisfies(&rect(0.0, 10.0, 50.0, 60.0), &anchor));
    assert!(!RelativePosition::Above.satisfies(&rect(0.0, 120.0, 50.0, 170.0), &anchor));
    assert!(RelativePosition::Below.satisfies(&rect(0.0, 120.0, 50.0, 170.0), &anchor));
    assert!(!RelativePosition::Below.satisfies(&rect(0.0, 10.0, 50.0, 60.0), &anchor));
}

#[test]
fn test_near_uses_edge_proximity_threshold() {
    let anchor = rect(100.0, 100.0, 200.0, 140.0);
    // Left edges 30px apart: exactly at the threshold.
    assert!(RelativePosition::Near.satisfies(&rect(130.0, 300.0, 260.0, 340.0), &anchor));
    // All edges more than 30px away.
    assert!(!RelativePosition::Near.satisfies(&rect(300.0, 300.0, 400.0, 340.0), &anchor));
}

#[test]
fn test_score_is_none_when_any_constraint_fails() {
    let candidate = rect(0.0, 0.0, 50.0, 20.0);
    let anchors = vec![
        (
            RelativePosition::LeftOf,
            vec![rect(100.0, 0.0, 200.0, 20.0)],
        ),
        (RelativePosition::Below, vec![rect(0.0, 100.0, 50.0, 120.0)]),
    ];
    // LeftOf holds, Below fails.
    assert!(score_candidate(&candidate, &anchors).is_none());
}

#[test]
fn test_score_sums_distances_over_constraints() {
    let candidate = rect(0.0, 0.0, 10.0, 10.0);
    let a1 = rect(20.0, 0.0, 30.0, 10.0);
    let a2 = rect(0.0, 20.0, 10.0, 30.0);
    let anchors = vec![
        (RelativePosition::LeftOf, vec![a1]),
        (RelativePosition::Above, vec![a2]),
    ];
    let score = score_candidate(&candidate, &anchors).unwrap();
    let expected = candidate.center_distance(&a1) + candidate.center_distance(&a2);
    assert!((score - expected).abs() < 1e-9);
}

#[test]
fn test_score_takes_nearest_satisfying_anchor() {
    let candidate = rect(0.0, 0.0, 10.0, 10.0);
    let far = rect(500.0, 0.0, 510.0, 10.0);
    let near = rect(20.0, 0.0, 30.0, 10.0);
    let anchors = vec![(RelativePosition::LeftOf, vec![far, near])];
    let score = score_candidate(&candidate, &anchors).unwrap();
    assert!((score - candidate.center_distance(&near)).abs() < 1e-9);
}

#[test]
fn test_closest_candidate_wins_ordering() {
    // Two "Delete" links; the anchor is the "Bob" row. Both are right of the
    // anchor; the nearer one must score lower.
    let anchor = rect(40.0, 100.0, 80.0, 120.0);
    let same_row = rect(300.0, 100.0, 350.0, 120.0);
    let other_row = rect(300.0, 160.0, 350.0, 180.0);

    let constraints = vec![(RelativePosition::RightOf, vec![anchor])];
    let near_score = score_candidate(&same_row, &constraints).unwrap();
    let far_score = score_candidate(&other_row, &constraints).unwrap();
    assert!(near_score < far_score);
}
