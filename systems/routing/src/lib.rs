#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Path reconstruction and multi-path merging over computed flow fields.
//!
//! [`trace`] follows the direction field from a start cell to the target it
//! drains into. [`merge`] traces a whole set of agent starts and folds the
//! resulting paths into a per-cell edge mask the renderer turns into
//! connected line segments.

use edgemaze_core::{
    CellCoord, CellFlow, DirectionField, DistanceField, EdgeMaskGrid, PathTraceError,
};

/// Reconstructs the shortest path from `start` to the nearest target.
///
/// The returned sequence begins with `start` and ends with the target cell.
/// Each hop follows the direction field and must strictly decrease the
/// recorded distance; a violation means the fields are internally
/// inconsistent and aborts with [`PathTraceError::InconsistentField`].
pub fn trace(
    distances: &DistanceField,
    directions: &DirectionField,
    start: CellCoord,
) -> Result<Vec<CellCoord>, PathTraceError> {
    let mut current = start;
    let mut flow = match directions.flow(current) {
        None | Some(CellFlow::Unreachable) => {
            return Err(PathTraceError::UnreachableCell { cell: start });
        }
        Some(flow) => flow,
    };

    let mut path = vec![current];
    while let CellFlow::Step(direction) = flow {
        let here = distances
            .distance(current)
            .ok_or(PathTraceError::InconsistentField { cell: current })?;
        let next = current
            .neighbor(direction)
            .ok_or(PathTraceError::InconsistentField { cell: current })?;
        let there = distances
            .distance(next)
            .ok_or(PathTraceError::InconsistentField { cell: next })?;
        if there >= here {
            return Err(PathTraceError::InconsistentField { cell: next });
        }

        flow = directions
            .flow(next)
            .ok_or(PathTraceError::InconsistentField { cell: next })?;
        if flow == CellFlow::Unreachable {
            return Err(PathTraceError::InconsistentField { cell: next });
        }

        path.push(next);
        current = next;
    }

    Ok(path)
}

/// Traces every start cell and merges the paths into one edge-mask grid.
///
/// Starts whose cell cannot reach a target are skipped rather than failing
/// the whole merge. For each traversed edge both endpoint cells record the
/// edge, so adjacent line sprites join seamlessly across the cell boundary;
/// overlapping paths combine by bitwise OR instead of stacking.
pub fn merge(
    distances: &DistanceField,
    directions: &DirectionField,
    starts: &[CellCoord],
) -> Result<EdgeMaskGrid, PathTraceError> {
    let (columns, rows) = directions.dimensions();
    let mut masks = EdgeMaskGrid::new(columns, rows);

    for &start in starts {
        let path = match trace(distances, directions, start) {
            Ok(path) => path,
            Err(PathTraceError::UnreachableCell { .. }) => continue,
            Err(error) => return Err(error),
        };

        for pair in path.windows(2) {
            let direction = pair[0]
                .direction_to(pair[1])
                .ok_or(PathTraceError::InconsistentField { cell: pair[0] })?;
            masks.insert(pair[0], direction);
            masks.insert(pair[1], direction.opposite());
        }
    }

    Ok(masks)
}
