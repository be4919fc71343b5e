#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Multi-source flood-fill engine that builds distance and direction fields.
//!
//! The fill is a breadth-first search seeded from every target cell at once.
//! Because cells are claimed by whichever expansion reaches them first, the
//! result is fully determined by the row-major target seeding order and the
//! fixed Left/Right/Up/Down neighbor expansion order. Ties between
//! equidistant targets are therefore broken deterministically rather than
//! arbitrarily.

use std::collections::VecDeque;

use edgemaze_core::{
    CellCoord, CellFlow, DirectionField, DistanceField, InvalidMazeError, MazeView,
};

/// Flood-fill engine with reusable scratch space.
///
/// The visited buffer and queue persist between computations so repeated
/// analysis of a mutating maze does not reallocate. Each call is otherwise a
/// pure function of the snapshot it receives.
#[derive(Clone, Debug, Default)]
pub struct FloodFill {
    visited: Vec<bool>,
    queue: VecDeque<CellCoord>,
}

impl FloodFill {
    /// Computes the distance and direction fields for the provided snapshot.
    ///
    /// Fails before touching any cell when the snapshot has a zero-length
    /// axis. Cells the search never reaches keep `None` distance and
    /// [`CellFlow::Unreachable`] flow; a maze with no targets leaves every
    /// cell in that state.
    pub fn compute(
        &mut self,
        view: &MazeView<'_>,
    ) -> Result<(DistanceField, DirectionField), InvalidMazeError> {
        let (columns, rows) = view.dimensions();
        if columns == 0 || rows == 0 {
            return Err(InvalidMazeError::EmptyAxis { columns, rows });
        }

        let width = usize::try_from(columns).unwrap_or(0);
        let height = usize::try_from(rows).unwrap_or(0);
        let cell_count = width.checked_mul(height).unwrap_or(0);

        if self.visited.len() != cell_count {
            self.visited = vec![false; cell_count];
        } else {
            self.visited.fill(false);
        }
        self.queue.clear();

        let mut distances = DistanceField::new(columns, rows);
        let mut directions = DirectionField::new(columns, rows);

        // Seed order is row-major; it is half of the deterministic tie-break.
        for row in 0..rows {
            for column in 0..columns {
                let cell = CellCoord::new(column, row);
                if !view.is_target(cell) {
                    continue;
                }

                let Some(cell_index) = index(width, cell) else {
                    continue;
                };
                self.visited[cell_index] = true;
                distances.set(cell, 0);
                directions.set(cell, CellFlow::Target);
                self.queue.push_back(cell);
            }
        }

        while let Some(cell) = self.queue.pop_front() {
            let Some(current_distance) = distances.distance(cell) else {
                continue;
            };
            let next_distance = current_distance.saturating_add(1);

            for (direction, neighbor, passable) in view.neighbors(cell) {
                if !passable {
                    continue;
                }

                let Some(neighbor_index) = index(width, neighbor) else {
                    continue;
                };
                if self.visited[neighbor_index] {
                    continue;
                }

                self.visited[neighbor_index] = true;
                distances.set(neighbor, next_distance);
                directions.set(neighbor, CellFlow::Step(direction.opposite()));
                self.queue.push_back(neighbor);
            }
        }

        Ok((distances, directions))
    }
}

/// Reports whether every cell of the field can reach a target.
#[must_use]
pub fn is_fully_reachable(directions: &DirectionField) -> bool {
    directions
        .cells()
        .iter()
        .all(|flow| *flow != CellFlow::Unreachable)
}

fn index(width: usize, cell: CellCoord) -> Option<usize> {
    let column = usize::try_from(cell.column()).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    row.checked_mul(width)?.checked_add(column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgemaze_core::{CellState, Direction};

    fn view_of(cells: &[CellState], columns: u32, rows: u32) -> MazeView<'_> {
        MazeView::new(cells, columns, rows)
    }

    #[test]
    fn compute_sets_target_cells_to_zero() {
        let mut cells = vec![CellState::default(); 12];
        cells[7].set_target(true); // column 1, row 2 of a 3-wide grid

        let mut engine = FloodFill::default();
        let (distances, directions) = engine
            .compute(&view_of(&cells, 3, 4))
            .expect("valid maze");

        assert_eq!(distances.distance(CellCoord::new(1, 2)), Some(0));
        assert_eq!(
            directions.flow(CellCoord::new(1, 2)),
            Some(CellFlow::Target)
        );
        assert_eq!(distances.distance(CellCoord::new(1, 1)), Some(1));
        assert_eq!(distances.distance(CellCoord::new(1, 0)), Some(2));
        assert_eq!(distances.distance(CellCoord::new(0, 0)), Some(3));
    }

    #[test]
    fn compute_rejects_zero_dimensions() {
        let cells: Vec<CellState> = Vec::new();
        let mut engine = FloodFill::default();
        assert_eq!(
            engine.compute(&view_of(&cells, 0, 5)),
            Err(InvalidMazeError::EmptyAxis {
                columns: 0,
                rows: 5
            })
        );
    }

    #[test]
    fn walls_reroute_the_fill_around_blocked_edges() {
        // 1x3 column with the target on top and a wall across the middle edge.
        let mut cells = vec![CellState::default(); 3];
        cells[0].set_target(true);
        cells[1].set_wall(edgemaze_core::WallSide::Top, true);

        let mut engine = FloodFill::default();
        let (distances, directions) = engine
            .compute(&view_of(&cells, 1, 3))
            .expect("valid maze");

        assert_eq!(distances.distance(CellCoord::new(0, 0)), Some(0));
        assert_eq!(distances.distance(CellCoord::new(0, 1)), None);
        assert_eq!(distances.distance(CellCoord::new(0, 2)), None);
        assert_eq!(
            directions.flow(CellCoord::new(0, 1)),
            Some(CellFlow::Unreachable)
        );
        assert!(!is_fully_reachable(&directions));
    }

    #[test]
    fn next_hops_point_back_toward_the_source() {
        let mut cells = vec![CellState::default(); 2];
        cells[0].set_target(true);

        let mut engine = FloodFill::default();
        let (_, directions) = engine.compute(&view_of(&cells, 2, 1)).expect("valid maze");

        assert_eq!(
            directions.flow(CellCoord::new(1, 0)),
            Some(CellFlow::Step(Direction::Left))
        );
    }

    #[test]
    fn scratch_space_is_reused_across_grid_sizes() {
        let mut engine = FloodFill::default();

        let mut small = vec![CellState::default(); 1];
        small[0].set_target(true);
        let (distances, _) = engine.compute(&view_of(&small, 1, 1)).expect("valid maze");
        assert_eq!(distances.distance(CellCoord::new(0, 0)), Some(0));

        let mut large = vec![CellState::default(); 9];
        large[4].set_target(true);
        let (distances, _) = engine.compute(&view_of(&large, 3, 3)).expect("valid maze");
        assert_eq!(distances.distance(CellCoord::new(0, 0)), Some(2));
        assert_eq!(distances.distance(CellCoord::new(2, 2)), Some(2));
    }
}
