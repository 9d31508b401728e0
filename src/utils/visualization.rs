//! Visualization utilities for rrt_tree
//!
//! Provides a unified interface for plotting trees, obstacles and paths
//! using gnuplot. Plot calls are recorded and drawn onto a single set of
//! axes when the figure is shown or saved.

use std::f64::consts::PI;

use gnuplot::{AutoOption, AxesCommon, Caption, Color, Figure, LineWidth, PointSize, PointSymbol};

use crate::common::{Path2D, Point2D, RoboticsError, RoboticsResult};
use crate::path_planning::obstacles::{CircleObstacle, RectObstacle};

/// Color palette for consistent styling
pub mod colors {
    pub const BLACK: &str = "#000000";
    pub const RED: &str = "#FF0000";
    pub const GREEN: &str = "#00FF00";
    pub const BLUE: &str = "#0000FF";
    pub const GRAY: &str = "#808080";
    pub const LIGHT_GRAY: &str = "#AAAAAA";

    // Semantic colors
    pub const OBSTACLE: &str = BLACK;
    pub const INFLATION: &str = GRAY;
    pub const TREE: &str = LIGHT_GRAY;
    pub const START: &str = GREEN;
    pub const GOAL: &str = BLUE;
    pub const PATH: &str = RED;
}

/// Number of segments used to draw a circle
const CIRCLE_RESOLUTION: usize = 36;

/// Style for path rendering
#[derive(Debug, Clone)]
pub struct PathStyle {
    pub color: String,
    pub line_width: f64,
    pub caption: String,
}

impl PathStyle {
    pub fn new(color: &str, caption: &str) -> Self {
        Self {
            color: color.to_string(),
            line_width: 2.0,
            caption: caption.to_string(),
        }
    }

    pub fn with_line_width(mut self, width: f64) -> Self {
        self.line_width = width;
        self
    }
}

impl Default for PathStyle {
    fn default() -> Self {
        Self {
            color: colors::PATH.to_string(),
            line_width: 2.0,
            caption: "Path".to_string(),
        }
    }
}

/// Style for point rendering
#[derive(Debug, Clone)]
pub struct PointStyle {
    pub color: String,
    pub size: f64,
    pub symbol: char,
    pub caption: String,
}

impl PointStyle {
    pub fn new(color: &str, caption: &str) -> Self {
        Self {
            color: color.to_string(),
            size: 1.0,
            symbol: 'O',
            caption: caption.to_string(),
        }
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }
}

#[derive(Debug, Clone)]
enum Layer {
    Lines { x: Vec<f64>, y: Vec<f64>, style: PathStyle },
    Points { x: Vec<f64>, y: Vec<f64>, style: PointStyle },
}

/// Main visualizer struct
pub struct Visualizer {
    layers: Vec<Layer>,
    title: String,
    x_label: String,
    y_label: String,
    x_range: Option<(f64, f64)>,
    y_range: Option<(f64, f64)>,
    aspect_ratio: Option<f64>,
}

impl Visualizer {
    /// Create a new visualizer
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            title: String::new(),
            x_label: "X [m]".to_string(),
            y_label: "Y [m]".to_string(),
            x_range: None,
            y_range: None,
            aspect_ratio: Some(1.0),
        }
    }

    /// Set the plot title
    pub fn set_title(&mut self, title: &str) -> &mut Self {
        self.title = title.to_string();
        self
    }

    /// Set X axis range
    pub fn set_x_range(&mut self, min: f64, max: f64) -> &mut Self {
        self.x_range = Some((min, max));
        self
    }

    /// Set Y axis range
    pub fn set_y_range(&mut self, min: f64, max: f64) -> &mut Self {
        self.y_range = Some((min, max));
        self
    }

    /// Set aspect ratio (None for auto)
    pub fn set_aspect_ratio(&mut self, ratio: Option<f64>) -> &mut Self {
        self.aspect_ratio = ratio;
        self
    }

    /// Number of recorded plot layers
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Plot a path
    pub fn plot_path(&mut self, path: &Path2D, style: &PathStyle) -> &mut Self {
        self.layers.push(Layer::Lines {
            x: path.x_coords(),
            y: path.y_coords(),
            style: style.clone(),
        });
        self
    }

    /// Plot tree edges, one `(parent, child)` pair each
    pub fn plot_tree(&mut self, edges: &[(Point2D, Point2D)]) -> &mut Self {
        for (i, (from, to)) in edges.iter().enumerate() {
            let caption = if i == 0 { "Tree" } else { "" };
            self.layers.push(Layer::Lines {
                x: vec![from.x, to.x],
                y: vec![from.y, to.y],
                style: PathStyle::new(colors::TREE, caption).with_line_width(0.5),
            });
        }
        self
    }

    /// Plot circular obstacles and their inflation by the robot radius
    pub fn plot_circles(&mut self, obstacles: &[CircleObstacle], robot_radius: f64) -> &mut Self {
        for (i, obs) in obstacles.iter().enumerate() {
            let caption = if i == 0 { "Obstacles" } else { "" };
            let (x, y) = circle_outline(obs.center(), obs.radius);
            self.layers.push(Layer::Lines { x, y, style: PathStyle::new(colors::OBSTACLE, caption) });

            if robot_radius > 0.0 {
                let (x, y) = circle_outline(obs.center(), obs.radius + robot_radius);
                self.layers.push(Layer::Lines {
                    x,
                    y,
                    style: PathStyle::new(colors::INFLATION, "").with_line_width(0.5),
                });
            }
        }
        self
    }

    /// Plot rectangular obstacles
    pub fn plot_rects(&mut self, obstacles: &[RectObstacle]) -> &mut Self {
        for (i, obs) in obstacles.iter().enumerate() {
            let caption = if i == 0 { "Obstacles" } else { "" };
            self.layers.push(Layer::Lines {
                x: vec![obs.xmin, obs.xmax, obs.xmax, obs.xmin, obs.xmin],
                y: vec![obs.ymin, obs.ymin, obs.ymax, obs.ymax, obs.ymin],
                style: PathStyle::new(colors::OBSTACLE, caption),
            });
        }
        self
    }

    /// Plot a single point (start, goal, etc.)
    pub fn plot_point(&mut self, point: Point2D, style: &PointStyle) -> &mut Self {
        self.layers.push(Layer::Points {
            x: vec![point.x],
            y: vec![point.y],
            style: style.clone(),
        });
        self
    }

    /// Plot start position
    pub fn plot_start(&mut self, point: Point2D) -> &mut Self {
        self.plot_point(point, &PointStyle::new(colors::START, "Start").with_size(1.5))
    }

    /// Plot goal position
    pub fn plot_goal(&mut self, point: Point2D) -> &mut Self {
        self.plot_point(point, &PointStyle::new(colors::GOAL, "Goal").with_size(1.5))
    }

    /// Finalize and show the plot
    pub fn show(&self) -> RoboticsResult<()> {
        let mut figure = self.render();
        figure
            .show()
            .map(|_| ())
            .map_err(|e| RoboticsError::VisualizationError(e.to_string()))
    }

    /// Save plot to PNG file
    pub fn save_png(&self, path: &str, width: u32, height: u32) -> RoboticsResult<()> {
        let mut figure = self.render();
        figure
            .save_to_png(path, width, height)
            .map_err(|e| RoboticsError::VisualizationError(e.to_string()))
    }

    /// Save plot to SVG file
    pub fn save_svg(&self, path: &str) -> RoboticsResult<()> {
        let mut figure = self.render();
        figure
            .save_to_svg(path, 800, 800)
            .map_err(|e| RoboticsError::VisualizationError(e.to_string()))
    }

    fn render(&self) -> Figure {
        let mut figure = Figure::new();
        let axes = figure.axes2d();

        for layer in &self.layers {
            match layer {
                Layer::Lines { x, y, style } => {
                    axes.lines(x, y, &[
                        Caption(&style.caption),
                        Color(&style.color),
                        LineWidth(style.line_width),
                    ]);
                }
                Layer::Points { x, y, style } => {
                    axes.points(x, y, &[
                        Caption(&style.caption),
                        Color(&style.color),
                        PointSymbol(style.symbol),
                        PointSize(style.size),
                    ]);
                }
            }
        }

        if !self.title.is_empty() {
            axes.set_title(&self.title, &[]);
        }
        axes.set_x_label(&self.x_label, &[]);
        axes.set_y_label(&self.y_label, &[]);

        if let Some((min, max)) = self.x_range {
            axes.set_x_range(AutoOption::Fix(min), AutoOption::Fix(max));
        }
        if let Some((min, max)) = self.y_range {
            axes.set_y_range(AutoOption::Fix(min), AutoOption::Fix(max));
        }
        if let Some(ratio) = self.aspect_ratio {
            axes.set_aspect_ratio(AutoOption::Fix(ratio));
        }
        figure
    }
}

impl Default for Visualizer {
    fn default() -> Self {
        Self::new()
    }
}

fn circle_outline(center: Point2D, radius: f64) -> (Vec<f64>, Vec<f64>) {
    (0..=CIRCLE_RESOLUTION)
        .map(|i| {
            let theta = 2.0 * PI * i as f64 / CIRCLE_RESOLUTION as f64;
            (center.x + radius * theta.cos(), center.y + radius * theta.sin())
        })
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visualizer_creation() {
        let vis = Visualizer::new();
        assert!(vis.aspect_ratio.is_some());
        assert_eq!(vis.layer_count(), 0);
    }

    #[test]
    fn test_path_style() {
        let style = PathStyle::new(colors::RED, "Test Path")
            .with_line_width(3.0);
        assert_eq!(style.line_width, 3.0);
        assert_eq!(style.color, colors::RED);
    }

    #[test]
    fn test_plot_calls_record_layers() {
        let mut vis = Visualizer::new();
        let edges = vec![
            (Point2D::new(0.0, 0.0), Point2D::new(1.0, 0.0)),
            (Point2D::new(1.0, 0.0), Point2D::new(1.0, 1.0)),
        ];
        vis.plot_tree(&edges)
            .plot_circles(&[CircleObstacle::new(5.0, 5.0, 1.0)], 0.5)
            .plot_rects(&[RectObstacle::new(1.0, 2.0, 1.0, 2.0)])
            .plot_start(Point2D::origin());
        assert_eq!(vis.layer_count(), 2 + 2 + 1 + 1);
    }

    #[test]
    fn test_circle_outline_closed() {
        let (x, y) = circle_outline(Point2D::new(1.0, 2.0), 3.0);
        assert_eq!(x.len(), CIRCLE_RESOLUTION + 1);
        assert!((x[0] - x[CIRCLE_RESOLUTION]).abs() < 1e-9);
        assert!((y[0] - y[CIRCLE_RESOLUTION]).abs() < 1e-9);
        assert!(x.iter().zip(&y).all(|(px, py)| {
            (Point2D::new(*px, *py).distance(&Point2D::new(1.0, 2.0)) - 3.0).abs() < 1e-9
        }));
    }
}
