use edgemaze_core::{CellCoord, CellFlow, Command, Direction, WallSide};
use edgemaze_system_flood_fill::{is_fully_reachable, FloodFill};
use edgemaze_world::{self as world, query, Maze};

fn analyzed(maze: &Maze) -> (edgemaze_core::DistanceField, edgemaze_core::DirectionField) {
    let mut engine = FloodFill::default();
    engine
        .compute(&query::maze_view(maze))
        .expect("maze snapshot should be valid")
}

fn toggle_target(maze: &mut Maze, column: u32, row: u32) {
    let mut events = Vec::new();
    world::apply(
        maze,
        Command::ToggleTarget {
            cell: CellCoord::new(column, row),
        },
        &mut events,
    );
}

fn toggle_wall(maze: &mut Maze, column: u32, row: u32, side: WallSide) {
    let mut events = Vec::new();
    world::apply(
        maze,
        Command::ToggleWall {
            cell: CellCoord::new(column, row),
            side,
        },
        &mut events,
    );
}

#[test]
fn single_cell_target_maze() {
    let mut maze = Maze::new(1, 1).expect("valid maze");
    toggle_target(&mut maze, 0, 0);

    let (distances, directions) = analyzed(&maze);
    assert_eq!(distances.distance(CellCoord::new(0, 0)), Some(0));
    assert_eq!(directions.flow(CellCoord::new(0, 0)), Some(CellFlow::Target));
    assert!(is_fully_reachable(&directions));
}

#[test]
fn two_row_column_points_up_at_the_target() {
    // 2 rows, 1 column, target on top.
    let mut maze = Maze::new(1, 2).expect("valid maze");
    toggle_target(&mut maze, 0, 0);

    let (distances, directions) = analyzed(&maze);
    assert_eq!(distances.distance(CellCoord::new(0, 1)), Some(1));
    assert_eq!(
        directions.flow(CellCoord::new(0, 1)),
        Some(CellFlow::Step(Direction::Up))
    );
}

#[test]
fn walled_off_corner_leaves_the_rest_unreachable() {
    // Target in the top-left corner, sealed behind its right and bottom edges.
    let mut maze = Maze::new(2, 2).expect("valid maze");
    toggle_target(&mut maze, 0, 0);
    toggle_wall(&mut maze, 1, 0, WallSide::Left);
    toggle_wall(&mut maze, 0, 1, WallSide::Top);

    let (distances, directions) = analyzed(&maze);
    assert_eq!(distances.distance(CellCoord::new(0, 0)), Some(0));
    for cell in [
        CellCoord::new(1, 0),
        CellCoord::new(0, 1),
        CellCoord::new(1, 1),
    ] {
        assert_eq!(distances.distance(cell), None, "cell {cell:?}");
        assert_eq!(directions.flow(cell), Some(CellFlow::Unreachable));
    }
    assert!(!is_fully_reachable(&directions));
}

#[test]
fn equidistant_targets_resolve_by_fixed_expansion_order() {
    // Targets in opposite corners; the center cell is two hops from both.
    let mut maze = Maze::new(3, 3).expect("valid maze");
    toggle_target(&mut maze, 0, 0);
    toggle_target(&mut maze, 2, 2);

    let (distances, directions) = analyzed(&maze);
    let center = CellCoord::new(1, 1);
    assert_eq!(distances.distance(center), Some(2));
    // The first row-major target (0,0) expands first, and its right-hand
    // frontier cell claims the center through the Down expansion, so the
    // center's next hop is Up.
    assert_eq!(directions.flow(center), Some(CellFlow::Step(Direction::Up)));
}

#[test]
fn no_targets_leaves_every_cell_unreachable() {
    let maze = Maze::new(3, 2).expect("valid maze");
    let (distances, directions) = analyzed(&maze);

    assert!(distances.cells().iter().all(Option::is_none));
    assert!(directions
        .cells()
        .iter()
        .all(|flow| *flow == CellFlow::Unreachable));
}

#[test]
fn next_hop_always_decreases_distance_by_one() {
    let maze = Maze::from_cell_codes(&[
        vec![0, 0, 2, 0, 1],
        vec![0, 4, 0, 6, 0],
        vec![1, 0, 2, 0, 0],
        vec![0, 6, 0, 4, 0],
    ])
    .expect("valid maze");

    let (distances, directions) = analyzed(&maze);
    let (columns, rows) = query::dimensions(&maze);

    for row in 0..rows {
        for column in 0..columns {
            let cell = CellCoord::new(column, row);
            match directions.flow(cell).expect("cell is in the field") {
                CellFlow::Target => assert_eq!(distances.distance(cell), Some(0)),
                CellFlow::Unreachable => assert_eq!(distances.distance(cell), None),
                CellFlow::Step(direction) => {
                    let next = cell.neighbor(direction).expect("hop stays inside the grid");
                    let here = distances.distance(cell).expect("reachable cell");
                    let there = distances.distance(next).expect("next hop is reachable");
                    assert_eq!(there + 1, here, "cell {cell:?}");
                }
            }
        }
    }
}

#[test]
fn unreachable_cells_match_exhaustive_connectivity() {
    // Wall codes split the grid; cross-check the fill against a brute-force
    // reachability search over the same adjacency.
    let maze = Maze::from_cell_codes(&[
        vec![0, 0, 2, 1],
        vec![0, 4, 6, 0],
        vec![0, 0, 2, 4],
    ])
    .expect("valid maze");

    let (distances, _) = analyzed(&maze);
    let view = query::maze_view(&maze);
    let (columns, rows) = query::dimensions(&maze);

    let mut connected = vec![false; (columns * rows) as usize];
    let mut stack = query::target_cells(&maze);
    for cell in &stack {
        connected[(cell.row() * columns + cell.column()) as usize] = true;
    }
    while let Some(cell) = stack.pop() {
        for (_, neighbor, passable) in view.neighbors(cell) {
            let index = (neighbor.row() * columns + neighbor.column()) as usize;
            if passable && !connected[index] {
                connected[index] = true;
                stack.push(neighbor);
            }
        }
    }

    for row in 0..rows {
        for column in 0..columns {
            let cell = CellCoord::new(column, row);
            let index = (row * columns + column) as usize;
            assert_eq!(
                distances.distance(cell).is_some(),
                connected[index],
                "cell {cell:?}"
            );
        }
    }
}

#[test]
fn recomputation_is_idempotent() {
    let maze = Maze::from_cell_codes(&[
        vec![1, 0, 0, 2],
        vec![0, 4, 2, 0],
        vec![0, 0, 0, 1],
    ])
    .expect("valid maze");

    let (first_distances, first_directions) = analyzed(&maze);
    let (second_distances, second_directions) = analyzed(&maze);

    assert_eq!(first_distances, second_distances);
    assert_eq!(first_directions, second_directions);
}

#[test]
fn mutation_and_recomputation_track_the_new_layout() {
    let mut maze = Maze::new(2, 1).expect("valid maze");
    toggle_target(&mut maze, 0, 0);

    let (_, directions) = analyzed(&maze);
    assert_eq!(
        directions.flow(CellCoord::new(1, 0)),
        Some(CellFlow::Step(Direction::Left))
    );

    toggle_wall(&mut maze, 1, 0, WallSide::Left);
    let (_, directions) = analyzed(&maze);
    assert_eq!(
        directions.flow(CellCoord::new(1, 0)),
        Some(CellFlow::Unreachable)
    );
}
