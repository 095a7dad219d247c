use nalgebra::Vector3;
use std::fmt;

/// Segment label understood by the robot controller
pub const INSPECTION_LABEL: &str = "VisualInspection";
/// End-of-line token expected by the controller parser
pub const LINE_TERMINATOR: &str = "EOL";

pub const CLEARANCE_ABOVE_MM: i64 = -100;
pub const CLEARANCE_BELOW_MM: i64 = 150;

/// Radius used for the fallback circle when a command has no stored file
pub const DEFAULT_RADIUS_MM: i64 = 100;

/// One straight-line move in a path payload.
///
/// Serialized as a single 11 field CSV row:
/// `label,pass,sx,sy,sz,ex,ey,ez,above,below,EOL`
/// Coordinates are signed millimeters.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSegment {
    pub label: String,
    pub pass_index: i32,
    pub start: Vector3<i64>,
    pub end: Vector3<i64>,
    pub clearance_above: i64,
    pub clearance_below: i64,
}

impl PathSegment {
    pub fn new(
        label: String,
        pass_index: i32,
        start: Vector3<i64>,
        end: Vector3<i64>,
        clearance_above: i64,
        clearance_below: i64,
    ) -> PathSegment {
        PathSegment {
            label,
            pass_index,
            start,
            end,
            clearance_above,
            clearance_below,
        }
    }

    /// Inspection segment with the fixed label and clearances
    pub fn inspection(pass_index: i32, start: Vector3<i64>, end: Vector3<i64>) -> PathSegment {
        PathSegment::new(
            INSPECTION_LABEL.to_owned(),
            pass_index,
            start,
            end,
            CLEARANCE_ABOVE_MM,
            CLEARANCE_BELOW_MM,
        )
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{},{},{},{},{},{},{}",
            self.label,
            self.pass_index,
            self.start.x,
            self.start.y,
            self.start.z,
            self.end.x,
            self.end.y,
            self.end.z,
            self.clearance_above,
            self.clearance_below,
            LINE_TERMINATOR,
        )
    }
}

/// Approximate a circle in the XY plane by 4 straight segments:
/// right, top, left, bottom and back to right.
///
/// The last waypoint repeats the first so the polyline always closes.
/// Output is deterministic for a given radius.
pub fn circle_path(radius: i64) -> String {
    let waypoints = [
        Vector3::new(radius, 0, 0),
        Vector3::new(0, radius, 0),
        Vector3::new(-radius, 0, 0),
        Vector3::new(0, -radius, 0),
        Vector3::new(radius, 0, 0),
    ];
    waypoints
        .windows(2)
        .map(|pair| PathSegment::inspection(1, pair[0], pair[1]).to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_renders_eleven_fields() {
        let segment = PathSegment::inspection(1, Vector3::new(0, 0, 0), Vector3::new(10, 0, 0));
        let row = segment.to_string();
        assert_eq!(row, "VisualInspection,1,0,0,0,10,0,0,-100,150,EOL");
        assert_eq!(row.split(',').count(), 11);
    }

    #[test]
    fn circle_has_four_segments() {
        let payload = circle_path(100);
        assert_eq!(payload.lines().count(), 4);
    }

    #[test]
    fn circle_matches_fixed_construction_for_default_radius() {
        let expected = "VisualInspection,1,100,0,0,0,100,0,-100,150,EOL\n\
                        VisualInspection,1,0,100,0,-100,0,0,-100,150,EOL\n\
                        VisualInspection,1,-100,0,0,0,-100,0,-100,150,EOL\n\
                        VisualInspection,1,0,-100,0,100,0,0,-100,150,EOL";
        assert_eq!(circle_path(DEFAULT_RADIUS_MM), expected);
    }

    #[test]
    fn circle_is_byte_identical_across_calls() {
        assert_eq!(circle_path(42), circle_path(42));
    }

    #[test]
    fn circle_closes_the_loop_for_any_radius() {
        for radius in [1, 7, 100, 2500] {
            let payload = circle_path(radius);
            let rows: Vec<&str> = payload.lines().collect();
            let first: Vec<&str> = rows.first().unwrap().split(',').collect();
            let last: Vec<&str> = rows.last().unwrap().split(',').collect();
            // last end point equals first start point
            assert_eq!(last[5..8], first[2..5], "radius {}", radius);
        }
    }

    #[test]
    fn circle_uses_radius_for_all_chords() {
        let payload = circle_path(30);
        assert!(payload.contains("30,0,0"));
        assert!(payload.contains("0,30,0"));
        assert!(payload.contains("-30,0,0"));
        assert!(payload.contains("0,-30,0"));
    }
}
