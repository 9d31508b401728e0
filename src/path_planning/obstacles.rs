//! Obstacle fields consulted by the growth loop
//!
//! Each field answers the two validity questions of [`ObstacleField`]:
//! is a position free, and is the straight edge between two positions free.

use crate::common::{ObstacleField, Point2D, Visualizable};
use crate::utils::Visualizer;

/// Empty world, every query succeeds
#[derive(Debug, Clone, Copy, Default)]
pub struct NoObstacles;

impl ObstacleField for NoObstacles {
    fn is_point_free(&self, _point: Point2D) -> bool {
        true
    }

    fn is_segment_free(&self, _from: Point2D, _to: Point2D) -> bool {
        true
    }
}

/// Circular obstacle (x, y, radius)
#[derive(Debug, Clone)]
pub struct CircleObstacle {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

impl CircleObstacle {
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Self { x, y, radius }
    }

    pub fn center(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }
}

/// Set of circles inflated by the robot radius
#[derive(Debug, Clone, Default)]
pub struct CircleField {
    pub obstacles: Vec<CircleObstacle>,
    pub robot_radius: f64,
}

impl CircleField {
    pub fn new(obstacles: Vec<CircleObstacle>, robot_radius: f64) -> Self {
        Self { obstacles, robot_radius }
    }

    /// Build from `(x, y, radius)` tuples
    pub fn from_tuples(obstacle_list: Vec<(f64, f64, f64)>, robot_radius: f64) -> Self {
        let obstacles = obstacle_list
            .into_iter()
            .map(|(x, y, r)| CircleObstacle::new(x, y, r))
            .collect();
        Self::new(obstacles, robot_radius)
    }
}

/// Distance from `p` to the closest point of segment `a -> b`
fn distance_to_segment(p: Point2D, a: Point2D, b: Point2D) -> f64 {
    let ab = b.to_vector() - a.to_vector();
    let len_sq = ab.norm_squared();
    if len_sq == 0.0 {
        return p.distance(&a);
    }
    let t = ((p.to_vector() - a.to_vector()).dot(&ab) / len_sq).clamp(0.0, 1.0);
    let closest = Point2D::from(a.to_vector() + ab * t);
    p.distance(&closest)
}

impl ObstacleField for CircleField {
    fn is_point_free(&self, point: Point2D) -> bool {
        self.obstacles
            .iter()
            .all(|obs| point.distance(&obs.center()) > obs.radius + self.robot_radius)
    }

    fn is_segment_free(&self, from: Point2D, to: Point2D) -> bool {
        self.obstacles
            .iter()
            .all(|obs| distance_to_segment(obs.center(), from, to) > obs.radius + self.robot_radius)
    }
}

impl Visualizable for CircleField {
    fn visualize(&self, vis: &mut Visualizer) {
        vis.plot_circles(&self.obstacles, self.robot_radius);
    }
}

/// Axis-aligned rectangular obstacle
#[derive(Debug, Clone)]
pub struct RectObstacle {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl RectObstacle {
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Self {
        RectObstacle { xmin, xmax, ymin, ymax }
    }

    /// Rectangle from its top-left corner and extent
    pub fn from_corner(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x, x + width, y, y + height)
    }

    pub fn contains(&self, p: &Point2D) -> bool {
        p.x >= self.xmin && p.x <= self.xmax && p.y >= self.ymin && p.y <= self.ymax
    }

    /// Liang-Barsky clip of `from -> to` against the rectangle
    pub fn intersects_segment(&self, from: Point2D, to: Point2D) -> bool {
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let mut t0 = 0.0_f64;
        let mut t1 = 1.0_f64;

        let edges = [
            (-dx, from.x - self.xmin),
            (dx, self.xmax - from.x),
            (-dy, from.y - self.ymin),
            (dy, self.ymax - from.y),
        ];

        for &(p, q) in &edges {
            if p == 0.0 {
                // parallel to this edge and outside its slab
                if q < 0.0 {
                    return false;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
            if t0 > t1 {
                return false;
            }
        }
        true
    }
}

/// Set of rectangles, the shape drawn by interactive obstacle editors
#[derive(Debug, Clone, Default)]
pub struct RectField {
    pub obstacles: Vec<RectObstacle>,
}

impl RectField {
    pub fn new(obstacles: Vec<RectObstacle>) -> Self {
        Self { obstacles }
    }

    pub fn push(&mut self, obstacle: RectObstacle) {
        self.obstacles.push(obstacle);
    }
}

impl ObstacleField for RectField {
    fn is_point_free(&self, point: Point2D) -> bool {
        !self.obstacles.iter().any(|obs| obs.contains(&point))
    }

    fn is_segment_free(&self, from: Point2D, to: Point2D) -> bool {
        !self.obstacles.iter().any(|obs| obs.intersects_segment(from, to))
    }
}

impl Visualizable for RectField {
    fn visualize(&self, vis: &mut Visualizer) {
        vis.plot_rects(&self.obstacles);
    }
}
