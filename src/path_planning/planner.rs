//! Growth loop for [`Tree`] and a ready-made planner around it
//!
//! One call to [`Tree::extend`] is one iteration: sample, nearest, steer,
//! cheapest parent in the neighbourhood, validate, insert, goal check.

use crate::common::{ObstacleField, Path2D, PathPlanner, Point2D, RoboticsError, RoboticsResult, SamplingBasedPlanner};
use crate::path_planning::tree::{NodeId, Tree, TreeConfig};

/// Outcome of a single growth iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extend {
    /// The sample was skipped (degenerate steer, out of bounds or blocked)
    Trapped,
    /// A node was inserted
    Advanced(NodeId),
    /// A node was inserted within the goal threshold
    Reached(NodeId),
}

impl<F: ObstacleField> Tree<F> {
    /// Run one growth iteration
    pub fn extend(&mut self) -> RoboticsResult<Extend> {
        let sample = match self.sample_random() {
            Some(sample) => sample,
            None => return Ok(Extend::Trapped),
        };
        let nearest = match self.nearest(sample) {
            Some(nearest) => nearest,
            None => return Ok(Extend::Trapped),
        };
        let new_position = match self.steer(sample, nearest) {
            Some(position) => position,
            None => return Ok(Extend::Trapped),
        };
        if !self.bounds().contains(&new_position) || !self.obstacles().is_point_free(new_position) {
            return Ok(Extend::Trapped);
        }

        let parent = match self.connectable_parent(nearest, new_position) {
            Some(parent) => parent,
            None => return Ok(Extend::Trapped),
        };
        let id = self.insert(parent, new_position)?;

        if self.config().rewire {
            let near = self.near(new_position);
            self.rewire(id, &near);
        }

        if self.reached_goal() {
            Ok(Extend::Reached(id))
        } else {
            Ok(Extend::Advanced(id))
        }
    }

    /// Grow until the goal is reached or the iteration budget runs out.
    ///
    /// The returned path runs from the start through the tree and ends at
    /// the goal itself when the final edge is free.
    pub fn grow(&mut self) -> RoboticsResult<Path2D> {
        if self.reached_goal() {
            return self.final_course();
        }
        for _ in 0..self.max_iterations() {
            if let Extend::Reached(_) = self.extend()? {
                return self.final_course();
            }
        }
        Err(RoboticsError::PlanningError(format!(
            "goal not reached within {} iterations ({} nodes)",
            self.max_iterations(),
            self.len()
        )))
    }

    /// Cheapest parent near `position` whose edge is free, else `nearest`
    fn connectable_parent(&self, nearest: NodeId, position: Point2D) -> Option<NodeId> {
        let edge_free = |id: NodeId| {
            self.node(id)
                .map_or(false, |node| self.obstacles().is_segment_free(node.position, position))
        };

        match self.min_cost_parent(position) {
            Some(best) if edge_free(best) => Some(best),
            _ if edge_free(nearest) => Some(nearest),
            _ => None,
        }
    }

    fn final_course(&self) -> RoboticsResult<Path2D> {
        let mut path = self
            .path_to_goal()
            .ok_or_else(|| RoboticsError::PlanningError("goal not reached".to_string()))?;
        let goal = self.goal();
        if let Some(&end) = path.last() {
            if end != goal && self.obstacles().is_segment_free(end, goal) {
                path.push(goal);
            }
        }
        Ok(path)
    }
}

/// Planner that grows a fresh tree for every query
pub struct RRTTreePlanner<F> {
    config: TreeConfig,
    field: F,
}

impl<F: ObstacleField> RRTTreePlanner<F> {
    pub fn new(config: TreeConfig, field: F) -> Self {
        RRTTreePlanner { config, field }
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn obstacles(&self) -> &F {
        &self.field
    }

    /// Grow a tree for `start -> goal` and hand it back with the outcome
    pub fn build_tree(&self, start: Point2D, goal: Point2D) -> RoboticsResult<(Tree<&F>, RoboticsResult<Path2D>)> {
        let config = TreeConfig {
            start,
            goal,
            ..self.config.clone()
        };
        let mut tree = Tree::new(config, &self.field)?;
        let result = tree.grow();
        Ok((tree, result))
    }
}

impl<F: ObstacleField> PathPlanner for RRTTreePlanner<F> {
    fn plan(&self, start: Point2D, goal: Point2D) -> Result<Path2D, RoboticsError> {
        let (_, result) = self.build_tree(start, goal)?;
        result
    }
}

impl<F: ObstacleField> SamplingBasedPlanner for RRTTreePlanner<F> {
    fn set_step_size(&mut self, step_size: f64) {
        self.config.step_size = step_size;
    }

    fn set_max_iterations(&mut self, max_iter: usize) {
        self.config.max_iter = max_iter;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::WorldBounds;
    use crate::path_planning::obstacles::{CircleField, NoObstacles, RectField, RectObstacle};

    fn scenario_config() -> TreeConfig {
        TreeConfig {
            bounds: WorldBounds::new(20.0, 20.0),
            start: Point2D::new(0.0, 0.0),
            goal: Point2D::new(10.0, 10.0),
            goal_threshold: 1.0,
            step_size: 1.0,
            max_iter: 500,
            rewire: false,
            seed: Some(42),
        }
    }

    #[test]
    fn test_end_to_end_open_world() {
        let mut tree = Tree::new(scenario_config(), NoObstacles).unwrap();

        let mut reached = None;
        for _ in 0..tree.max_iterations() {
            if let Extend::Reached(id) = tree.extend().unwrap() {
                reached = Some(id);
                break;
            }
        }
        let end = reached.expect("goal not reached within 500 iterations");
        assert!(tree.reached_goal());
        assert!(tree.node(end).unwrap().position.distance(&tree.goal()) < 1.0);

        // parent chain back to the root has strictly decreasing cost
        let mut current = end;
        let mut cost = tree.node(end).unwrap().cost;
        while let Some(parent) = tree.node(current).unwrap().parent {
            let parent_cost = tree.node(parent).unwrap().cost;
            assert!(parent_cost < cost);
            cost = parent_cost;
            current = parent;
        }
        assert_eq!(Some(current), tree.root());
        assert_eq!(cost, 0.0);

        let path = tree.path_to(end).unwrap();
        assert_eq!(path.first(), Some(&tree.start()));
        assert!((path.total_length() - tree.node(end).unwrap().cost).abs() < 1e-9);
    }

    #[test]
    fn test_grow_appends_goal() {
        let mut tree = Tree::new(scenario_config(), NoObstacles).unwrap();
        tree.set_max_iterations(3000);
        let path = tree.grow().unwrap();
        assert_eq!(path.first(), Some(&Point2D::new(0.0, 0.0)));
        assert_eq!(path.last(), Some(&Point2D::new(10.0, 10.0)));
    }

    #[test]
    fn test_grow_start_within_threshold() {
        let config = TreeConfig {
            goal: Point2D::new(0.5, 0.0),
            ..scenario_config()
        };
        let mut tree = Tree::new(config, NoObstacles).unwrap();
        let path = tree.grow().unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn test_grow_budget_exhausted() {
        // goal sealed inside a box
        let field = RectField::new(vec![RectObstacle::new(8.0, 12.0, 8.0, 12.0)]);
        let config = TreeConfig {
            max_iter: 200,
            ..scenario_config()
        };
        let mut tree = Tree::new(config, field).unwrap();
        let result = tree.grow();
        assert!(matches!(result, Err(RoboticsError::PlanningError(_))));
        assert!(!tree.reached_goal());
    }

    #[test]
    fn test_extend_never_enters_obstacles() {
        let field = CircleField::from_tuples(vec![(5.0, 5.0, 2.0), (12.0, 8.0, 3.0)], 0.3);
        let config = TreeConfig {
            max_iter: 400,
            rewire: true,
            ..scenario_config()
        };
        let mut tree = Tree::new(config, field).unwrap();
        for _ in 0..400 {
            tree.extend().unwrap();
        }

        let field = tree.obstacles();
        for node in tree.nodes() {
            assert!(tree.bounds().contains(&node.position));
            assert!(field.is_point_free(node.position));
            if let Some(parent) = node.parent {
                let parent = tree.node(parent).unwrap();
                assert!(field.is_segment_free(parent.position, node.position));
                assert!((node.cost - parent.cost - parent.position.distance(&node.position)).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_rewiring_never_worsens_path_cost() {
        let plain = Tree::new(scenario_config(), NoObstacles);
        let rewired = Tree::new(TreeConfig { rewire: true, ..scenario_config() }, NoObstacles);
        let (mut plain, mut rewired) = (plain.unwrap(), rewired.unwrap());
        // same seed, same samples; only parent links may differ
        for _ in 0..300 {
            plain.extend().unwrap();
            rewired.extend().unwrap();
        }
        assert_eq!(plain.len(), rewired.len());
        for (a, b) in plain.nodes().iter().zip(rewired.nodes()) {
            assert_eq!(a.position, b.position);
            assert!(b.cost <= a.cost + 1e-9);
        }
    }

    #[test]
    fn test_planner_trait() {
        let field = CircleField::from_tuples(vec![(5.0, 5.0, 1.0), (3.0, 6.0, 2.0), (7.0, 5.0, 2.0)], 0.5);
        let mut planner = RRTTreePlanner::new(TreeConfig { seed: Some(5), ..Default::default() }, field);
        planner.set_step_size(1.0);
        planner.set_max_iterations(3000);
        assert_eq!(planner.config().step_size, 1.0);

        let start = Point2D::new(1.0, 1.0);
        let goal = Point2D::new(15.0, 15.0);
        let path = planner.plan(start, goal).unwrap();
        assert_eq!(path.first(), Some(&start));
        assert!(path.last().unwrap().distance(&goal) < 1.0);
        for w in path.points.windows(2) {
            assert!(planner.obstacles().is_segment_free(w[0], w[1]));
        }
    }

    #[test]
    fn test_planner_rejects_goal_outside_world() {
        let planner = RRTTreePlanner::new(TreeConfig::default(), NoObstacles);
        let result = planner.plan(Point2D::new(1.0, 1.0), Point2D::new(30.0, 1.0));
        assert!(matches!(result, Err(RoboticsError::InvalidParameter(_))));
    }
}
