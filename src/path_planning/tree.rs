//! Rapidly-exploring random tree over a bounded 2D world
//!
//! The tree owns every node in one flat arena. Parent and child links are
//! [`NodeId`] indices into that arena, so releasing the tree is a matter of
//! walking it once and clearing the vector.
//!
//! Growth is driven from outside (see `planner.rs`): sample, pick the
//! nearest node, steer one step, choose the cheapest parent in the
//! neighbourhood, validate against an [`ObstacleField`], insert.

use itertools::Itertools;
use ordered_float::OrderedFloat;
use rand::SeedableRng;
use rand_chacha::ChaChaRng;
use rand_distr::{Distribution, Uniform};

use crate::common::{ObstacleField, Path2D, Point2D, RoboticsError, RoboticsResult, Visualizable, WorldBounds};
use crate::utils::Visualizer;

/// Neighbourhood radius used by `min_cost_parent`, in multiples of the step size
pub const NEAR_RADIUS_FACTOR: f64 = 3.0;

/// Handle of a node inside one tree's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Tree vertex
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub position: Point2D,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Accumulated edge length from the root
    pub cost: f64,
}

impl TreeNode {
    fn root(position: Point2D) -> Self {
        TreeNode {
            position,
            parent: None,
            children: Vec::new(),
            cost: 0.0,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Configuration for the tree
#[derive(Debug, Clone)]
pub struct TreeConfig {
    /// Sampling rectangle `[0, width] x [0, height]`
    pub bounds: WorldBounds,
    pub start: Point2D,
    pub goal: Point2D,
    /// The goal counts as reached strictly below this distance
    pub goal_threshold: f64,
    /// Distance covered by one steering step
    pub step_size: f64,
    /// Iteration budget for the growth loop
    pub max_iter: usize,
    /// Re-parent existing neighbours through each new node (RRT*)
    pub rewire: bool,
    /// Fixed seed for reproducible sampling, entropy when `None`
    pub seed: Option<u64>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            bounds: WorldBounds::default(),
            start: Point2D::new(0.0, 0.0),
            goal: Point2D::new(10.0, 10.0),
            goal_threshold: 1.0,
            step_size: 3.0,
            max_iter: 3000,
            rewire: false,
            seed: None,
        }
    }
}

impl TreeConfig {
    pub fn near_radius(&self) -> f64 {
        NEAR_RADIUS_FACTOR * self.step_size
    }

    pub fn validate(&self) -> RoboticsResult<()> {
        let positive = |name: &str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(RoboticsError::InvalidParameter(format!(
                    "{} must be positive and finite, got {}",
                    name, value
                )))
            }
        };
        positive("world width", self.bounds.width)?;
        positive("world height", self.bounds.height)?;
        positive("step size", self.step_size)?;
        positive("goal threshold", self.goal_threshold)?;

        if self.max_iter == 0 {
            return Err(RoboticsError::InvalidParameter(
                "max iterations must be at least 1".to_string(),
            ));
        }
        if !self.bounds.contains(&self.start) {
            return Err(RoboticsError::InvalidParameter(format!(
                "start {:?} lies outside the world",
                self.start
            )));
        }
        if !self.bounds.contains(&self.goal) {
            return Err(RoboticsError::InvalidParameter(format!(
                "goal {:?} lies outside the world",
                self.goal
            )));
        }
        Ok(())
    }
}

/// Search tree rooted at the configured start position
pub struct Tree<F> {
    config: TreeConfig,
    field: F,
    nodes: Vec<TreeNode>,
    root: Option<NodeId>,
    last: Option<NodeId>,
    rng: ChaChaRng,
}

impl<F> Tree<F> {
    /// Create a tree after validating `config`; the root is already in place
    pub fn new(config: TreeConfig, field: F) -> RoboticsResult<Self> {
        let rng = match config.seed {
            Some(seed) => ChaChaRng::seed_from_u64(seed),
            None => ChaChaRng::from_entropy(),
        };
        Self::with_rng(config, field, rng)
    }

    /// Create a tree that samples from a caller-supplied generator
    pub fn with_rng(config: TreeConfig, field: F, rng: ChaChaRng) -> RoboticsResult<Self> {
        config.validate()?;
        let mut tree = Tree {
            config,
            field,
            nodes: Vec::new(),
            root: None,
            last: None,
            rng,
        };
        tree.initialize();
        Ok(tree)
    }

    /// Drop every node and start over from a single root at the start position
    pub fn initialize(&mut self) {
        self.nodes.clear();
        self.nodes.push(TreeNode::root(self.config.start));
        self.root = Some(NodeId(0));
        self.last = self.root;
    }

    /// Replace the generator, e.g. to replay a run
    pub fn reseed(&mut self, seed: u64) {
        self.rng = ChaChaRng::seed_from_u64(seed);
    }

    /// Uniform sample over the world rectangle
    pub fn sample_random(&mut self) -> Option<Point2D> {
        let bounds = self.config.bounds;
        let x = Uniform::new_inclusive(0.0, bounds.width).sample(&mut self.rng);
        let y = Uniform::new_inclusive(0.0, bounds.height).sample(&mut self.rng);
        let point = Point2D::new(x, y);
        if bounds.contains(&point) {
            Some(point)
        } else {
            None
        }
    }

    pub fn distance(p: Point2D, q: Point2D) -> f64 {
        p.distance(&q)
    }

    /// Closest node to `point`; ties go to the earliest inserted node
    pub fn nearest(&self, point: Point2D) -> Option<NodeId> {
        self.nodes
            .iter()
            .position_min_by_key(|node| OrderedFloat(Self::distance(point, node.position)))
            .map(NodeId)
    }

    /// Every node strictly inside the neighbourhood radius of `point`, in insertion order
    pub fn near(&self, point: Point2D) -> Vec<NodeId> {
        let radius = self.near_radius();
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| Self::distance(point, node.position) < radius)
            .map(|(i, _)| NodeId(i))
            .collect()
    }

    /// Node in the neighbourhood of `point` minimising `cost + distance`.
    ///
    /// Returns `None` when nothing lies within the radius; callers then
    /// fall back to [`Tree::nearest`].
    pub fn min_cost_parent(&self, point: Point2D) -> Option<NodeId> {
        let radius = self.near_radius();
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, node)| {
                let d = Self::distance(point, node.position);
                if d < radius {
                    Some((i, node.cost + d))
                } else {
                    None
                }
            })
            .min_by_key(|&(_, cost)| OrderedFloat(cost))
            .map(|(i, _)| NodeId(i))
    }

    /// Position exactly one step from `from` toward `target`.
    ///
    /// `None` when `target` coincides with the node (no direction to move in)
    /// or when `from` is not in the tree.
    pub fn steer(&self, target: Point2D, from: NodeId) -> Option<Point2D> {
        let origin = self.nodes.get(from.0)?.position.to_vector();
        let direction = (target.to_vector() - origin).try_normalize(0.0)?;
        let point = Point2D::from(origin + direction * self.config.step_size);
        if point.is_finite() {
            Some(point)
        } else {
            None
        }
    }

    /// Attach a new node at `position` under `parent`.
    ///
    /// No collision check happens here.
    pub fn insert(&mut self, parent: NodeId, position: Point2D) -> RoboticsResult<NodeId> {
        let parent_node = self.nodes.get(parent.0).ok_or(RoboticsError::InvalidNode(parent.0))?;
        let cost = parent_node.cost + Self::distance(parent_node.position, position);

        let id = NodeId(self.nodes.len());
        self.nodes.push(TreeNode {
            position,
            parent: Some(parent),
            children: Vec::new(),
            cost,
        });
        self.nodes[parent.0].children.push(id);
        self.last = Some(id);
        Ok(id)
    }

    pub fn reached_goal(&self) -> bool {
        self.last
            .and_then(|id| self.nodes.get(id.0))
            .map_or(false, |node| {
                Self::distance(node.position, self.config.goal) < self.config.goal_threshold
            })
    }

    /// Release every node reachable from the root, children before parents.
    ///
    /// Returns the ids in release order. The tree is empty afterwards and a
    /// second call releases nothing; call `initialize` to plan again.
    pub fn teardown(&mut self) -> Vec<NodeId> {
        let root = match self.root.take() {
            Some(root) => root,
            None => return Vec::new(),
        };

        let mut released = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![(root, false)];
        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                released.push(id);
                continue;
            }
            stack.push((id, true));
            stack.extend(self.nodes[id.0].children.iter().rev().map(|&child| (child, false)));
        }

        self.nodes.clear();
        self.last = None;
        released
    }

    /// Backtrack parent links from `id`; the path runs root first
    pub fn path_to(&self, id: NodeId) -> Option<Path2D> {
        let mut points = Vec::new();
        let mut current = Some(id);
        while let Some(index) = current {
            let node = self.nodes.get(index.0)?;
            points.push(node.position);
            current = node.parent;
        }
        points.reverse();
        Some(Path2D::from_points(points))
    }

    /// Tree path to the last inserted node, once it is within the goal threshold
    pub fn path_to_goal(&self) -> Option<Path2D> {
        if !self.reached_goal() {
            return None;
        }
        self.last.and_then(|id| self.path_to(id))
    }

    pub fn set_step_size(&mut self, step_size: f64) {
        self.config.step_size = step_size;
    }

    pub fn set_max_iterations(&mut self, max_iter: usize) {
        self.config.max_iter = max_iter;
    }

    pub fn step_size(&self) -> f64 {
        self.config.step_size
    }

    pub fn max_iterations(&self) -> usize {
        self.config.max_iter
    }

    pub fn near_radius(&self) -> f64 {
        self.config.near_radius()
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn last_inserted(&self) -> Option<NodeId> {
        self.last
    }

    pub fn start(&self) -> Point2D {
        self.config.start
    }

    pub fn goal(&self) -> Point2D {
        self.config.goal
    }

    pub fn bounds(&self) -> WorldBounds {
        self.config.bounds
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn obstacles(&self) -> &F {
        &self.field
    }

    /// Is `ancestor` on the parent chain of `id` (or `id` itself)?
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(index) = current {
            if index == ancestor {
                return true;
            }
            current = self.nodes.get(index.0).and_then(|node| node.parent);
        }
        false
    }

    fn reparent(&mut self, id: NodeId, new_parent: NodeId) {
        if let Some(old_parent) = self.nodes[id.0].parent {
            self.nodes[old_parent.0].children.retain(|&child| child != id);
        }
        self.nodes[id.0].parent = Some(new_parent);
        self.nodes[new_parent.0].children.push(id);
        self.propagate_cost_to_leaves(id);
    }

    /// Recompute `cost` for `id` and every descendant from their parents
    fn propagate_cost_to_leaves(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(parent) = self.nodes[current.0].parent {
                let parent_node = &self.nodes[parent.0];
                let cost = parent_node.cost + Self::distance(parent_node.position, self.nodes[current.0].position);
                self.nodes[current.0].cost = cost;
            }
            stack.extend(self.nodes[current.0].children.iter().copied());
        }
    }
}

impl<F: ObstacleField> Tree<F> {
    /// Re-parent neighbours of `new_node` through it when that is cheaper
    /// and the connecting edge is free. Returns how many nodes moved.
    pub fn rewire(&mut self, new_node: NodeId, near: &[NodeId]) -> usize {
        let (new_position, new_cost) = match self.nodes.get(new_node.0) {
            Some(node) => (node.position, node.cost),
            None => return 0,
        };

        let mut rewired = 0;
        for &candidate in near {
            // an ancestor under the new node would close a cycle
            if candidate.0 >= self.nodes.len() || self.is_ancestor(candidate, new_node) {
                continue;
            }
            let node = &self.nodes[candidate.0];
            let through_new = new_cost + Self::distance(new_position, node.position);
            if through_new < node.cost && self.field.is_segment_free(new_position, node.position) {
                self.reparent(candidate, new_node);
                rewired += 1;
            }
        }
        rewired
    }
}

impl<F> Visualizable for Tree<F> {
    fn visualize(&self, vis: &mut Visualizer) {
        let edges: Vec<(Point2D, Point2D)> = self
            .nodes
            .iter()
            .filter_map(|node| {
                node.parent
                    .and_then(|parent| self.nodes.get(parent.0))
                    .map(|parent| (parent.position, node.position))
            })
            .collect();
        vis.set_x_range(0.0, self.config.bounds.width);
        vis.set_y_range(0.0, self.config.bounds.height);
        vis.plot_tree(&edges);
        vis.plot_start(self.config.start);
        vis.plot_goal(self.config.goal);
    }
}
