// Random tree path planning with cost-aware parent selection.
// Grows the tree one iteration at a time and plots the result.

use rrt_tree::common::{Point2D, Visualizable, WorldBounds};
use rrt_tree::path_planning::{CircleField, Extend, Tree, TreeConfig};
use rrt_tree::utils::{PathStyle, Visualizer};

const OUTPUT_DIR: &str = "img/path_planning";
const OUTPUT_PATH: &str = "img/path_planning/rrt_tree_result.svg";

fn main() {
    println!("RRT tree path planning start!!");

    // Obstacle list [x, y, radius]
    let obstacle_list = vec![
        (5.0, 5.0, 1.0),
        (3.0, 6.0, 2.0),
        (3.0, 8.0, 2.0),
        (3.0, 10.0, 2.0),
        (7.0, 5.0, 2.0),
        (9.0, 5.0, 2.0),
        (8.0, 10.0, 1.0),
        (12.0, 14.0, 1.5),
    ];
    let field = CircleField::from_tuples(obstacle_list, 0.3);

    let config = TreeConfig {
        bounds: WorldBounds::new(20.0, 20.0),
        start: Point2D::new(1.0, 1.0),
        goal: Point2D::new(6.0, 14.0),
        goal_threshold: 1.0,
        step_size: 1.0,
        max_iter: 3000,
        rewire: true,
        seed: Some(2024),
    };

    let mut tree = match Tree::new(config, field) {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("{}", e);
            return;
        }
    };

    let mut reached = None;
    for i in 0..tree.max_iterations() {
        if i % 100 == 0 {
            println!("Iter: {}, number of nodes: {}", i, tree.len());
        }
        match tree.extend() {
            Ok(Extend::Reached(id)) => {
                println!("Goal reached after {} iterations!", i + 1);
                reached = Some(id);
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("{}", e);
                return;
            }
        }
    }

    let mut vis = Visualizer::new();
    vis.set_title("RRT Tree Path Planning");
    tree.obstacles().visualize(&mut vis);
    tree.visualize(&mut vis);

    match reached.and_then(|id| tree.path_to(id)) {
        Some(path) => {
            println!("Found path with {} points, length {:.2}", path.len(), path.total_length());
            vis.plot_path(&path, &PathStyle::default());
        }
        None => println!("Cannot find path within {} iterations", tree.max_iterations()),
    }

    if let Err(e) = std::fs::create_dir_all(OUTPUT_DIR) {
        eprintln!("Failed to create {}: {}", OUTPUT_DIR, e);
    } else {
        match vis.save_svg(OUTPUT_PATH) {
            Ok(()) => println!("Plot saved to: {}", OUTPUT_PATH),
            Err(e) => eprintln!("{}", e),
        }
    }

    let released = tree.teardown();
    println!("Released {} nodes", released.len());
    println!("RRT tree path planning finish!!");
}
