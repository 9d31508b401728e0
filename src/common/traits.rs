//! Common traits defining interfaces between the tree and its collaborators

use crate::common::types::*;
use crate::common::error::RoboticsError;

/// Trait for path planning algorithms
pub trait PathPlanner {
    /// Plan a path from start to goal
    fn plan(&self, start: Point2D, goal: Point2D) -> Result<Path2D, RoboticsError>;
}

/// Trait for sampling-based path planning algorithms
pub trait SamplingBasedPlanner: PathPlanner {
    /// Set the extension step used when steering toward a sample
    fn set_step_size(&mut self, step_size: f64);

    /// Set maximum iterations for planning
    fn set_max_iterations(&mut self, max_iter: usize);
}

/// Validity queries the growth loop asks before inserting a node.
///
/// The tree never checks collisions on its own; whoever drives it
/// consults a field before calling `insert`.
pub trait ObstacleField {
    /// Is `point` outside every obstacle?
    fn is_point_free(&self, point: Point2D) -> bool;

    /// Is the straight segment `from -> to` collision-free?
    fn is_segment_free(&self, from: Point2D, to: Point2D) -> bool;
}

impl<T: ObstacleField + ?Sized> ObstacleField for &T {
    fn is_point_free(&self, point: Point2D) -> bool {
        (**self).is_point_free(point)
    }

    fn is_segment_free(&self, from: Point2D, to: Point2D) -> bool {
        (**self).is_segment_free(from, to)
    }
}

/// Trait for visualizable algorithms
pub trait Visualizable {
    /// Draw current state to visualizer
    fn visualize(&self, vis: &mut crate::utils::Visualizer);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct DummyPlanner;

    impl PathPlanner for DummyPlanner {
        fn plan(&self, start: Point2D, goal: Point2D) -> Result<Path2D, RoboticsError> {
            Ok(Path2D::from_points(vec![start, goal]))
        }
    }

    struct HalfPlane;

    impl ObstacleField for HalfPlane {
        fn is_point_free(&self, point: Point2D) -> bool {
            point.x < 5.0
        }

        fn is_segment_free(&self, from: Point2D, to: Point2D) -> bool {
            self.is_point_free(from) && self.is_point_free(to)
        }
    }

    #[test]
    fn test_path_planner_trait() {
        let planner = DummyPlanner;
        let result = planner.plan(Point2D::origin(), Point2D::new(1.0, 1.0));
        assert_eq!(result.map(|p| p.len()).ok(), Some(2));
    }

    #[test]
    fn test_obstacle_field_by_reference() {
        let field = HalfPlane;
        let by_ref = &field;
        assert!(by_ref.is_point_free(Point2D::new(1.0, 0.0)));
        assert!(!by_ref.is_segment_free(Point2D::new(1.0, 0.0), Point2D::new(6.0, 0.0)));
    }
}
