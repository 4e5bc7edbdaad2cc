use super::NodeLayout;

/// Points closer than this are merged.
const POINT_EPSILON: f32 = 0.01;

/// Orthogonal smooth-step route from the bottom of `from` to the top of `to`,
/// threading through `via` (long-edge waypoints). Each hop drops to the
/// midpoint between its ends, runs across, then drops into the next point.
pub(super) fn smooth_step(from: &NodeLayout, to: &NodeLayout, via: &[(f32, f32)]) -> Vec<(f32, f32)> {
    let start = from.bottom_center();
    let end = to.top_center();
    let mut points = vec![start];
    let mut cursor = start;
    for &target in via.iter().chain(std::iter::once(&end)) {
        step_to(&mut points, cursor, target);
        cursor = target;
    }
    dedup_points(points)
}

/// Route between two nodes on the same rank: down from the source, across
/// below the band, and back up into the target.
pub(super) fn same_rank_step(from: &NodeLayout, to: &NodeLayout, drop: f32) -> Vec<(f32, f32)> {
    let start = from.bottom_center();
    let end = to.bottom_center();
    let channel = start.1.max(end.1) + drop;
    dedup_points(vec![start, (start.0, channel), (end.0, channel), end])
}

fn step_to(points: &mut Vec<(f32, f32)>, from: (f32, f32), to: (f32, f32)) {
    if (from.0 - to.0).abs() > POINT_EPSILON {
        let mid_y = (from.1 + to.1) / 2.0;
        points.push((from.0, mid_y));
        points.push((to.0, mid_y));
    }
    points.push(to);
}

fn dedup_points(points: Vec<(f32, f32)>) -> Vec<(f32, f32)> {
    let mut out: Vec<(f32, f32)> = Vec::with_capacity(points.len());
    for point in points {
        let duplicate = out.last().is_some_and(|last| {
            (last.0 - point.0).abs() <= POINT_EPSILON && (last.1 - point.1).abs() <= POINT_EPSILON
        });
        if !duplicate {
            out.push(point);
        }
    }
    out
}
