#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative maze state management for edgemaze.
//!
//! The editor adapter mutates the maze exclusively through [`apply`], which
//! confirms or rejects each [`Command`] with [`Event`] values. Analysis
//! systems never mutate; they read through the snapshot view exposed by
//! [`query::maze_view`]. Any mutation invalidates previously computed fields,
//! so callers re-run the flood fill after every accepted command.

use edgemaze_core::{
    AgentId, CellCoord, CellState, Command, Event, InvalidMazeError, MutationError, WallSide,
};

/// Authoritative rectangular grid of maze cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    columns: u32,
    rows: u32,
    cells: Vec<CellState>,
}

impl Maze {
    /// Creates an empty maze of the provided dimensions.
    ///
    /// Rejects grids with a zero-length axis; an empty maze is an error, not
    /// a degenerate value computations silently accept.
    pub fn new(columns: u32, rows: u32) -> Result<Self, InvalidMazeError> {
        if columns == 0 || rows == 0 {
            return Err(InvalidMazeError::EmptyAxis { columns, rows });
        }

        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Ok(Self {
            columns,
            rows,
            cells: vec![CellState::default(); capacity],
        })
    }

    /// Builds a maze from a matrix of integer cell codes.
    ///
    /// Any rectangular matrix is accepted regardless of how it was produced;
    /// ragged rows and empty axes are rejected before any cell is decoded.
    pub fn from_cell_codes(rows_of_codes: &[Vec<u32>]) -> Result<Self, InvalidMazeError> {
        let row_count = rows_of_codes.len();
        let column_count = rows_of_codes.first().map_or(0, Vec::len);

        if row_count == 0 || column_count == 0 {
            return Err(InvalidMazeError::EmptyAxis {
                columns: u32::try_from(column_count).unwrap_or(u32::MAX),
                rows: u32::try_from(row_count).unwrap_or(u32::MAX),
            });
        }

        for (row, codes) in rows_of_codes.iter().enumerate() {
            if codes.len() != column_count {
                return Err(InvalidMazeError::RaggedRow {
                    row,
                    expected: column_count,
                    found: codes.len(),
                });
            }
        }

        let mut cells = Vec::with_capacity(row_count * column_count);
        for codes in rows_of_codes {
            cells.extend(codes.iter().map(|&code| CellState::from_code(code)));
        }

        Ok(Self {
            columns: u32::try_from(column_count).unwrap_or(u32::MAX),
            rows: u32::try_from(row_count).unwrap_or(u32::MAX),
            cells,
        })
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }

    fn cell_mut(&mut self, cell: CellCoord) -> Option<&mut CellState> {
        self.index(cell).and_then(|index| self.cells.get_mut(index))
    }

    fn cell(&self, cell: CellCoord) -> Option<CellState> {
        self.index(cell).and_then(|index| self.cells.get(index).copied())
    }
}

/// Applies the provided command to the maze, mutating state deterministically.
///
/// Every mutation is confirmed or rejected through `out_events`; rejected
/// commands leave the maze untouched.
pub fn apply(maze: &mut Maze, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureGrid { columns, rows } => match Maze::new(columns, rows) {
            Ok(configured) => {
                *maze = configured;
                out_events.push(Event::GridConfigured { columns, rows });
            }
            Err(_) => out_events.push(Event::MutationRejected {
                cell: CellCoord::new(0, 0),
                reason: MutationError::EmptyGrid,
            }),
        },
        Command::ToggleTarget { cell } => match maze.cell_mut(cell) {
            Some(state) => {
                let present = !state.has_target();
                state.set_target(present);
                out_events.push(Event::TargetToggled { cell, present });
            }
            None => out_events.push(Event::MutationRejected {
                cell,
                reason: MutationError::OutOfBounds,
            }),
        },
        Command::ToggleWall { cell, side } => {
            let on_boundary = match side {
                WallSide::Left => cell.column() == 0,
                WallSide::Top => cell.row() == 0,
            };
            if on_boundary && maze.cell(cell).is_some() {
                out_events.push(Event::MutationRejected {
                    cell,
                    reason: MutationError::BoundaryWall,
                });
                return;
            }

            match maze.cell_mut(cell) {
                Some(state) => {
                    let present = !state.wall(side);
                    state.set_wall(side, present);
                    out_events.push(Event::WallToggled {
                        cell,
                        side,
                        present,
                    });
                }
                None => out_events.push(Event::MutationRejected {
                    cell,
                    reason: MutationError::OutOfBounds,
                }),
            }
        }
        Command::PlaceAgent { cell, agent } => {
            if agent.get() == 0 || agent.get() > AgentId::MAX_TAG {
                out_events.push(Event::MutationRejected {
                    cell,
                    reason: MutationError::InvalidAgent,
                });
                return;
            }

            match maze.cell_mut(cell) {
                Some(state) => {
                    state.set_occupant(Some(agent));
                    out_events.push(Event::AgentPlaced { cell, agent });
                }
                None => out_events.push(Event::MutationRejected {
                    cell,
                    reason: MutationError::OutOfBounds,
                }),
            }
        }
        Command::ClearAgent { cell } => match maze.cell_mut(cell) {
            Some(state) => match state.occupant() {
                Some(agent) => {
                    state.set_occupant(None);
                    out_events.push(Event::AgentCleared { cell, agent });
                }
                None => out_events.push(Event::MutationRejected {
                    cell,
                    reason: MutationError::VacantCell,
                }),
            },
            None => out_events.push(Event::MutationRejected {
                cell,
                reason: MutationError::OutOfBounds,
            }),
        },
    }
}

/// Query functions that provide read-only access to the maze state.
pub mod query {
    use super::Maze;
    use edgemaze_core::{AgentId, CellCoord, MazeView};

    /// Captures a snapshot view suitable for handing to the flood fill.
    #[must_use]
    pub fn maze_view(maze: &Maze) -> MazeView<'_> {
        MazeView::new(&maze.cells, maze.columns, maze.rows)
    }

    /// Provides the dimensions of the maze as `(columns, rows)`.
    #[must_use]
    pub fn dimensions(maze: &Maze) -> (u32, u32) {
        (maze.columns, maze.rows)
    }

    /// Enumerates the target cells in row-major order.
    ///
    /// This order seeds the flood-fill queue, so it is part of the engine's
    /// deterministic tie-break and must never change.
    #[must_use]
    pub fn target_cells(maze: &Maze) -> Vec<CellCoord> {
        scan(maze, |state| state.has_target())
    }

    /// Enumerates the occupied cells and their agents in row-major order.
    #[must_use]
    pub fn agent_cells(maze: &Maze) -> Vec<(AgentId, CellCoord)> {
        let mut agents = Vec::new();
        for row in 0..maze.rows {
            for column in 0..maze.columns {
                let cell = CellCoord::new(column, row);
                if let Some(agent) = maze.cell(cell).and_then(|state| state.occupant()) {
                    agents.push((agent, cell));
                }
            }
        }
        agents
    }

    /// Serializes the maze back into its matrix of integer cell codes.
    #[must_use]
    pub fn cell_codes(maze: &Maze) -> Vec<Vec<u32>> {
        let width = usize::try_from(maze.columns).unwrap_or(0);
        maze.cells
            .chunks(width.max(1))
            .map(|chunk| chunk.iter().map(|state| state.to_code()).collect())
            .collect()
    }

    fn scan(maze: &Maze, keep: impl Fn(&edgemaze_core::CellState) -> bool) -> Vec<CellCoord> {
        let mut matches = Vec::new();
        for row in 0..maze.rows {
            for column in 0..maze.columns {
                let cell = CellCoord::new(column, row);
                if maze.cell(cell).is_some_and(|state| keep(&state)) {
                    matches.push(cell);
                }
            }
        }
        matches
    }
}
