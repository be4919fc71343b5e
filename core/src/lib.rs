#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the edgemaze engine.
//!
//! This crate defines the message surface that connects the editor adapter,
//! the authoritative maze, and the pure analysis systems. Adapters submit
//! [`Command`] values describing desired mutations, the maze executes those
//! commands via its `apply` entry point and broadcasts [`Event`] values, and
//! analysis systems consume immutable [`MazeView`] snapshots, responding with
//! freshly computed distance, direction, and edge-mask fields.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Coordinate of the adjacent cell in the provided direction.
    ///
    /// Returns `None` when the step would leave the grid through the zero
    /// edge. Upper bounds are the concern of whichever view owns the grid
    /// dimensions.
    #[must_use]
    pub fn neighbor(self, direction: Direction) -> Option<Self> {
        match direction {
            Direction::Left => self.column.checked_sub(1).map(|column| Self::new(column, self.row)),
            Direction::Right => self.column.checked_add(1).map(|column| Self::new(column, self.row)),
            Direction::Up => self.row.checked_sub(1).map(|row| Self::new(self.column, row)),
            Direction::Down => self.row.checked_add(1).map(|row| Self::new(self.column, row)),
        }
    }

    /// Direction that steps from this cell into an orthogonally adjacent one.
    ///
    /// Returns `None` when the cells are not exactly one edge apart.
    #[must_use]
    pub fn direction_to(self, other: CellCoord) -> Option<Direction> {
        let column_diff = self.column.abs_diff(other.column);
        let row_diff = self.row.abs_diff(other.row);

        if column_diff + row_diff != 1 {
            return None;
        }

        if column_diff == 1 {
            if other.column > self.column {
                Some(Direction::Right)
            } else {
                Some(Direction::Left)
            }
        } else if other.row > self.row {
            Some(Direction::Down)
        } else {
            Some(Direction::Up)
        }
    }
}

/// Cardinal directions along which cells connect to their neighbors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
}

impl Direction {
    /// Fixed neighbor expansion order used by the flood fill.
    ///
    /// Distance ties are broken by whichever expansion claims a cell first,
    /// so this order is part of the engine's observable behavior.
    pub const FLOOD_ORDER: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Direction that undoes a step in this direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }
}

/// Unique identifier assigned to an agent occupying a maze cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(u32);

impl AgentId {
    /// Largest tag value representable in the cell wire code.
    ///
    /// Occupant tags live in bits 3 and above of a cell code, so the tag
    /// itself must leave three bits of headroom.
    pub const MAX_TAG: u32 = u32::MAX >> 3;

    /// Creates a new agent identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Sides of a cell on which a wall bit is stored.
///
/// Each interior edge is stored exactly once, on the cell to the right of or
/// below it. The right edge of a cell is therefore the left wall of its right
/// neighbor, and the bottom edge is the top wall of the cell below.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallSide {
    /// Edge between this cell and its left neighbor.
    Left,
    /// Edge between this cell and the cell above.
    Top,
}

const TARGET_BIT: u32 = 1;
const WALL_LEFT_BIT: u32 = 1 << 1;
const WALL_TOP_BIT: u32 = 1 << 2;
const OCCUPANT_SHIFT: u32 = 3;

/// Complete state of a single maze cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CellState {
    target: bool,
    wall_left: bool,
    wall_top: bool,
    occupant: Option<AgentId>,
}

impl CellState {
    /// Decodes a cell from its integer wire code.
    ///
    /// Bit 0 marks a target, bit 1 a left wall, bit 2 a top wall, and the
    /// remaining high bits carry the occupant tag, where zero means vacant.
    #[must_use]
    pub fn from_code(code: u32) -> Self {
        let tag = code >> OCCUPANT_SHIFT;
        Self {
            target: code & TARGET_BIT != 0,
            wall_left: code & WALL_LEFT_BIT != 0,
            wall_top: code & WALL_TOP_BIT != 0,
            occupant: if tag > 0 { Some(AgentId::new(tag)) } else { None },
        }
    }

    /// Encodes the cell back into its integer wire code.
    #[must_use]
    pub fn to_code(&self) -> u32 {
        let mut code = 0;
        if self.target {
            code |= TARGET_BIT;
        }
        if self.wall_left {
            code |= WALL_LEFT_BIT;
        }
        if self.wall_top {
            code |= WALL_TOP_BIT;
        }
        let tag = self.occupant.map_or(0, |agent| agent.get().min(AgentId::MAX_TAG));
        code | (tag << OCCUPANT_SHIFT)
    }

    /// Reports whether the cell is a flood-fill destination.
    #[must_use]
    pub const fn has_target(&self) -> bool {
        self.target
    }

    /// Reports whether the edge to the left neighbor is blocked.
    #[must_use]
    pub const fn wall_left(&self) -> bool {
        self.wall_left
    }

    /// Reports whether the edge to the cell above is blocked.
    #[must_use]
    pub const fn wall_top(&self) -> bool {
        self.wall_top
    }

    /// Agent occupying the cell, if any. Occupants never affect pathfinding;
    /// they only select which cells act as path start points.
    #[must_use]
    pub const fn occupant(&self) -> Option<AgentId> {
        self.occupant
    }

    /// Overwrites the target marker.
    pub fn set_target(&mut self, present: bool) {
        self.target = present;
    }

    /// Overwrites the wall bit on the provided side.
    pub fn set_wall(&mut self, side: WallSide, present: bool) {
        match side {
            WallSide::Left => self.wall_left = present,
            WallSide::Top => self.wall_top = present,
        }
    }

    /// Reads the wall bit on the provided side.
    #[must_use]
    pub const fn wall(&self, side: WallSide) -> bool {
        match side {
            WallSide::Left => self.wall_left,
            WallSide::Top => self.wall_top,
        }
    }

    /// Overwrites the occupant marker.
    pub fn set_occupant(&mut self, occupant: Option<AgentId>) {
        self.occupant = occupant;
    }
}

/// Commands that express all permissible maze mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Replaces the maze with an empty grid of the provided dimensions.
    ConfigureGrid {
        /// Number of cell columns laid out in the grid.
        columns: u32,
        /// Number of cell rows laid out in the grid.
        rows: u32,
    },
    /// Flips the target marker of a cell.
    ToggleTarget {
        /// Cell whose target marker should flip.
        cell: CellCoord,
    },
    /// Flips a wall bit of a cell.
    ToggleWall {
        /// Cell that stores the wall bit.
        cell: CellCoord,
        /// Side of the cell the wall guards.
        side: WallSide,
    },
    /// Places an agent marker on a cell, replacing any previous occupant.
    PlaceAgent {
        /// Cell the agent should occupy.
        cell: CellCoord,
        /// Identifier of the agent being placed.
        agent: AgentId,
    },
    /// Removes the agent marker from a cell.
    ClearAgent {
        /// Cell whose occupant should be removed.
        cell: CellCoord,
    },
}

/// Events broadcast by the maze after processing commands.
///
/// Every accepted mutation invalidates any distance or direction field the
/// caller may still hold; the engine recomputes from scratch rather than
/// patching fields incrementally.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the grid was replaced with new dimensions.
    GridConfigured {
        /// Number of cell columns in the new grid.
        columns: u32,
        /// Number of cell rows in the new grid.
        rows: u32,
    },
    /// Confirms that a cell's target marker flipped.
    TargetToggled {
        /// Cell whose marker flipped.
        cell: CellCoord,
        /// Marker state after the toggle.
        present: bool,
    },
    /// Confirms that a cell's wall bit flipped.
    WallToggled {
        /// Cell that stores the wall bit.
        cell: CellCoord,
        /// Side of the cell the wall guards.
        side: WallSide,
        /// Wall state after the toggle.
        present: bool,
    },
    /// Confirms that an agent marker was placed.
    AgentPlaced {
        /// Cell the agent occupies.
        cell: CellCoord,
        /// Identifier of the placed agent.
        agent: AgentId,
    },
    /// Confirms that an agent marker was removed.
    AgentCleared {
        /// Cell the agent vacated.
        cell: CellCoord,
        /// Identifier of the removed agent.
        agent: AgentId,
    },
    /// Reports that a mutation request was rejected.
    MutationRejected {
        /// Cell named by the rejected command.
        cell: CellCoord,
        /// Specific reason the mutation failed.
        reason: MutationError,
    },
}

/// Reasons a mutation request may be rejected by the maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MutationError {
    /// The named cell lies outside the grid.
    OutOfBounds,
    /// The requested grid has a zero-length axis.
    EmptyGrid,
    /// The wall toggle names a grid boundary edge, which is always blocked.
    BoundaryWall,
    /// The agent tag is zero or too large for the cell wire code.
    InvalidAgent,
    /// The cell holds no agent marker to clear.
    VacantCell,
}

/// Read-only snapshot view over a dense row-major grid of cell states.
///
/// The borrow pins the underlying maze for the duration of a computation, so
/// the engine always observes a consistent snapshot.
#[derive(Clone, Copy, Debug)]
pub struct MazeView<'a> {
    cells: &'a [CellState],
    columns: u32,
    rows: u32,
}

impl<'a> MazeView<'a> {
    /// Captures a new view backed by the provided cell slice.
    #[must_use]
    pub fn new(cells: &'a [CellState], columns: u32, rows: u32) -> Self {
        Self {
            cells,
            columns,
            rows,
        }
    }

    /// Provides the dimensions of the underlying grid as `(columns, rows)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// State of the provided cell, if it lies within the grid.
    #[must_use]
    pub fn cell(&self, cell: CellCoord) -> Option<CellState> {
        self.index(cell).and_then(|index| self.cells.get(index).copied())
    }

    /// Reports whether the cell is a flood-fill destination.
    #[must_use]
    pub fn is_target(&self, cell: CellCoord) -> bool {
        self.cell(cell).is_some_and(|state| state.has_target())
    }

    /// Reports whether an agent can step from `from` in the given direction.
    ///
    /// False when the step leaves the grid or the shared edge is walled.
    /// Grid boundary edges are blocked regardless of stored wall bits.
    #[must_use]
    pub fn can_move(&self, from: CellCoord, direction: Direction) -> bool {
        let Some(state) = self.cell(from) else {
            return false;
        };

        match direction {
            Direction::Left => from.column() > 0 && !state.wall_left(),
            Direction::Up => from.row() > 0 && !state.wall_top(),
            Direction::Right => from
                .neighbor(Direction::Right)
                .and_then(|neighbor| self.cell(neighbor))
                .is_some_and(|neighbor| !neighbor.wall_left()),
            Direction::Down => from
                .neighbor(Direction::Down)
                .and_then(|neighbor| self.cell(neighbor))
                .is_some_and(|neighbor| !neighbor.wall_top()),
        }
    }

    /// Enumerates the in-grid compass neighbors of a cell together with
    /// whether the shared edge is passable.
    ///
    /// Neighbors are yielded in the fixed [`Direction::FLOOD_ORDER`].
    pub fn neighbors(
        &self,
        cell: CellCoord,
    ) -> impl Iterator<Item = (Direction, CellCoord, bool)> + 'a {
        let view = *self;
        Direction::FLOOD_ORDER.into_iter().filter_map(move |direction| {
            let neighbor = cell.neighbor(direction)?;
            if view.index(neighbor).is_none() {
                return None;
            }
            Some((direction, neighbor, view.can_move(cell, direction)))
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
}

/// Dense per-cell shortest hop-counts to the nearest target.
///
/// `None` marks a cell no sequence of unblocked moves connects to a target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistanceField {
    columns: u32,
    rows: u32,
    cells: Vec<Option<u32>>,
}

impl DistanceField {
    /// Creates a field of the provided dimensions with every cell unreachable.
    #[must_use]
    pub fn new(columns: u32, rows: u32) -> Self {
        Self {
            columns,
            rows,
            cells: vec![None; cell_capacity(columns, rows)],
        }
    }

    /// Provides the dimensions of the field as `(columns, rows)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Shortest hop-count recorded for the cell, if it is reachable.
    #[must_use]
    pub fn distance(&self, cell: CellCoord) -> Option<u32> {
        index_in(self.columns, self.rows, cell)
            .and_then(|index| self.cells.get(index).copied().flatten())
    }

    /// Records the hop-count for a cell. Out-of-grid cells are ignored.
    pub fn set(&mut self, cell: CellCoord, distance: u32) {
        if let Some(index) = index_in(self.columns, self.rows, cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = Some(distance);
            }
        }
    }

    /// Dense distances stored in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Option<u32>] {
        &self.cells
    }
}

/// Per-cell routing value produced by the flood fill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellFlow {
    /// No sequence of unblocked moves connects the cell to any target.
    Unreachable,
    /// The cell is itself a destination.
    Target,
    /// Next hop along a shortest path toward the nearest target.
    Step(Direction),
}

impl CellFlow {
    /// Single-character boundary encoding used by renderers and text dumps.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Unreachable => ' ',
            Self::Target => 'X',
            Self::Step(Direction::Left) => '<',
            Self::Step(Direction::Right) => '>',
            Self::Step(Direction::Up) => '^',
            Self::Step(Direction::Down) => 'v',
        }
    }
}

/// Dense per-cell next-hop directions toward the nearest target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectionField {
    columns: u32,
    rows: u32,
    cells: Vec<CellFlow>,
}

impl DirectionField {
    /// Creates a field of the provided dimensions with every cell unreachable.
    #[must_use]
    pub fn new(columns: u32, rows: u32) -> Self {
        Self {
            columns,
            rows,
            cells: vec![CellFlow::Unreachable; cell_capacity(columns, rows)],
        }
    }

    /// Provides the dimensions of the field as `(columns, rows)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Routing value recorded for the cell, if it lies within the field.
    #[must_use]
    pub fn flow(&self, cell: CellCoord) -> Option<CellFlow> {
        index_in(self.columns, self.rows, cell).and_then(|index| self.cells.get(index).copied())
    }

    /// Records the routing value for a cell. Out-of-grid cells are ignored.
    pub fn set(&mut self, cell: CellCoord, flow: CellFlow) {
        if let Some(index) = index_in(self.columns, self.rows, cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = flow;
            }
        }
    }

    /// Dense routing values stored in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[CellFlow] {
        &self.cells
    }
}

/// Record of which compass edges of a cell carry at least one merged path.
///
/// Bit assignment follows the renderer's line-sprite index contract:
/// up = 1, left = 2, down = 4, right = 8, yielding the fifteen non-zero
/// sprite values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeMask(u8);

impl EdgeMask {
    /// Mask with no edges marked.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Marks the edge leaving the cell in the provided direction.
    pub fn insert(&mut self, direction: Direction) {
        self.0 |= Self::bit(direction);
    }

    /// Reports whether the edge in the provided direction is marked.
    #[must_use]
    pub const fn contains(self, direction: Direction) -> bool {
        self.0 & Self::bit(direction) != 0
    }

    /// Combines two masks with bitwise OR.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Reports whether no edge is marked.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Raw 4-bit value in the range `0..=15`, consumed by renderers.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    const fn bit(direction: Direction) -> u8 {
        match direction {
            Direction::Up => 1,
            Direction::Left => 2,
            Direction::Down => 4,
            Direction::Right => 8,
        }
    }
}

/// Dense per-cell edge masks produced by the path merger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeMaskGrid {
    columns: u32,
    rows: u32,
    cells: Vec<EdgeMask>,
}

impl EdgeMaskGrid {
    /// Creates a grid of the provided dimensions with every mask empty.
    #[must_use]
    pub fn new(columns: u32, rows: u32) -> Self {
        Self {
            columns,
            rows,
            cells: vec![EdgeMask::empty(); cell_capacity(columns, rows)],
        }
    }

    /// Provides the dimensions of the grid as `(columns, rows)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Mask recorded for the cell; empty for out-of-grid coordinates.
    #[must_use]
    pub fn mask(&self, cell: CellCoord) -> EdgeMask {
        index_in(self.columns, self.rows, cell)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(EdgeMask::empty())
    }

    /// Marks the edge leaving the cell in the provided direction.
    pub fn insert(&mut self, cell: CellCoord, direction: Direction) {
        if let Some(index) = index_in(self.columns, self.rows, cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                slot.insert(direction);
            }
        }
    }

    /// Dense masks stored in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[EdgeMask] {
        &self.cells
    }
}

fn cell_capacity(columns: u32, rows: u32) -> usize {
    let capacity_u64 = u64::from(columns) * u64::from(rows);
    usize::try_from(capacity_u64).unwrap_or(0)
}

fn index_in(columns: u32, rows: u32, cell: CellCoord) -> Option<usize> {
    if cell.column() < columns && cell.row() < rows {
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(columns).ok()?;
        Some(row * width + column)
    } else {
        None
    }
}

/// Reasons a maze fails validation before any computation starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum InvalidMazeError {
    /// One of the grid axes has zero length.
    #[error("maze must have at least one column and one row, got {columns}x{rows}")]
    EmptyAxis {
        /// Number of columns in the rejected grid.
        columns: u32,
        /// Number of rows in the rejected grid.
        rows: u32,
    },
    /// A row of the input matrix disagrees with the first row's width.
    #[error("maze row {row} holds {found} cells, expected {expected}")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Cell count established by the first row.
        expected: usize,
        /// Cell count actually present in the offending row.
        found: usize,
    },
}

/// Reasons path reconstruction fails for a start cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PathTraceError {
    /// No target is reachable from the start cell. Recoverable; the path
    /// merger skips such starts instead of aborting the whole merge.
    #[error("no target is reachable from cell {cell:?}")]
    UnreachableCell {
        /// Start cell whose flow is unreachable.
        cell: CellCoord,
    },
    /// The distance field did not strictly decrease along a traced hop.
    /// Never expected on a correctly computed field; exists to surface
    /// computation bugs rather than runtime conditions.
    #[error("direction field is inconsistent at cell {cell:?}: distance did not decrease")]
    InconsistentField {
        /// Cell at which the invariant broke.
        cell: CellCoord,
    },
}
