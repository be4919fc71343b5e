#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives the edgemaze analysis engine.

mod maze_io;
mod share;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use edgemaze_core::{CellCoord, DirectionField, DistanceField, EdgeMaskGrid};
use edgemaze_system_flood_fill::{is_fully_reachable, FloodFill};
use edgemaze_system_routing::merge;
use edgemaze_world::{query, Maze};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::share::MazeSnapshot;

#[derive(Parser)]
#[command(name = "edgemaze", about = "Analyze edge-walled grid mazes.")]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Flood-fill a maze file and print its direction field.
    Analyze {
        /// Maze file holding one row of integer cell codes per line.
        file: PathBuf,
        /// Also print the distance field.
        #[arg(long)]
        distances: bool,
        /// Also print the merged agent-path edge masks.
        #[arg(long)]
        paths: bool,
    },
    /// Generate a deterministic random maze file.
    Generate {
        /// Number of cell columns in the generated grid.
        #[arg(long)]
        columns: u32,
        /// Number of cell rows in the generated grid.
        #[arg(long)]
        rows: u32,
        /// Seed for the deterministic generator.
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Probability that an interior edge carries a wall.
        #[arg(long, default_value_t = 0.25)]
        wall_density: f64,
        /// Number of target cells to place.
        #[arg(long, default_value_t = 1)]
        targets: u32,
        /// File the generated maze is written to.
        output: PathBuf,
    },
    /// Print a single-line share string for a maze file.
    Share {
        /// Maze file to encode.
        file: PathBuf,
    },
    /// Decode a share string back into a maze file.
    Import {
        /// Share string produced by the `share` subcommand.
        payload: String,
        /// File the decoded maze is written to.
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    match Cli::parse().command {
        CliCommand::Analyze {
            file,
            distances,
            paths,
        } => run_analyze(&file, distances, paths),
        CliCommand::Generate {
            columns,
            rows,
            seed,
            wall_density,
            targets,
            output,
        } => run_generate(columns, rows, seed, wall_density, targets, &output),
        CliCommand::Share { file } => run_share(&file),
        CliCommand::Import { payload, output } => run_import(&payload, &output),
    }
}

fn run_analyze(file: &Path, show_distances: bool, show_paths: bool) -> Result<()> {
    let maze = maze_io::load_maze(file)?;
    let mut engine = FloodFill::default();
    let (distances, directions) = engine.compute(&query::maze_view(&maze))?;

    print!("{}", render_directions(&directions));
    println!(
        "fully reachable: {}",
        if is_fully_reachable(&directions) {
            "yes"
        } else {
            "no"
        }
    );

    if show_distances {
        println!();
        print!("{}", render_distances(&distances));
    }

    if show_paths {
        let starts: Vec<CellCoord> = query::agent_cells(&maze)
            .into_iter()
            .map(|(_, cell)| cell)
            .collect();
        let masks = merge(&distances, &directions, &starts)?;
        println!();
        print!("{}", render_masks(&masks));
    }

    Ok(())
}

fn run_generate(
    columns: u32,
    rows: u32,
    seed: u64,
    wall_density: f64,
    targets: u32,
    output: &Path,
) -> Result<()> {
    let maze = generate_maze(columns, rows, seed, wall_density, targets)?;
    maze_io::save_maze(output, &maze)
}

fn run_share(file: &Path) -> Result<()> {
    let maze = maze_io::load_maze(file)?;
    let (columns, rows) = query::dimensions(&maze);
    let snapshot = MazeSnapshot {
        columns,
        rows,
        codes: query::cell_codes(&maze).into_iter().flatten().collect(),
    };
    println!("{}", snapshot.encode());
    Ok(())
}

fn run_import(payload: &str, output: &Path) -> Result<()> {
    let snapshot = MazeSnapshot::decode(payload).context("could not decode share string")?;
    let width = usize::try_from(snapshot.columns).context("grid width overflows this platform")?;
    let codes: Vec<Vec<u32>> = snapshot
        .codes
        .chunks(width)
        .map(<[u32]>::to_vec)
        .collect();
    let maze = Maze::from_cell_codes(&codes).context("share string holds an invalid grid")?;
    maze_io::save_maze(output, &maze)
}

fn generate_maze(
    columns: u32,
    rows: u32,
    seed: u64,
    wall_density: f64,
    targets: u32,
) -> Result<Maze> {
    if columns == 0 || rows == 0 {
        bail!("generated maze needs at least one column and one row");
    }
    if !(0.0..=1.0).contains(&wall_density) {
        bail!("wall density must lie between 0.0 and 1.0");
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let width = usize::try_from(columns).context("grid width overflows this platform")?;
    let height = usize::try_from(rows).context("grid height overflows this platform")?;
    let mut codes = vec![vec![0u32; width]; height];

    for (row, row_codes) in codes.iter_mut().enumerate() {
        for (column, code) in row_codes.iter_mut().enumerate() {
            if column > 0 && rng.gen_bool(wall_density) {
                *code |= 2;
            }
            if row > 0 && rng.gen_bool(wall_density) {
                *code |= 4;
            }
        }
    }

    let cell_count = u64::from(columns) * u64::from(rows);
    let target_count = u64::from(targets).min(cell_count);
    let mut placed = 0;
    while placed < target_count {
        let column = rng.gen_range(0..width);
        let row = rng.gen_range(0..height);
        if codes[row][column] & 1 == 0 {
            codes[row][column] |= 1;
            placed += 1;
        }
    }

    Ok(Maze::from_cell_codes(&codes).expect("generated grid is rectangular by construction"))
}

fn render_directions(directions: &DirectionField) -> String {
    let (columns, rows) = directions.dimensions();
    let mut text = String::new();
    for row in 0..rows {
        for column in 0..columns {
            let glyph = directions
                .flow(CellCoord::new(column, row))
                .map_or(' ', |flow| flow.glyph());
            text.push(glyph);
        }
        text.push('\n');
    }
    text
}

fn render_distances(distances: &DistanceField) -> String {
    let (columns, rows) = distances.dimensions();
    let width = distances
        .cells()
        .iter()
        .flatten()
        .max()
        .map_or(1, |max| max.to_string().len());

    let mut text = String::new();
    for row in 0..rows {
        for column in 0..columns {
            if column > 0 {
                text.push(' ');
            }
            match distances.distance(CellCoord::new(column, row)) {
                Some(distance) => text.push_str(&format!("{distance:>width$}")),
                None => text.push_str(&format!("{:>width$}", "-")),
            }
        }
        text.push('\n');
    }
    text
}

fn render_masks(masks: &EdgeMaskGrid) -> String {
    let (columns, rows) = masks.dimensions();
    let mut text = String::new();
    for row in 0..rows {
        for column in 0..columns {
            let bits = masks.mask(CellCoord::new(column, row)).bits();
            text.push_str(&format!("{bits:x}"));
        }
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgemaze_core::{CellFlow, Direction};

    #[test]
    fn generation_is_deterministic_for_the_same_seed() {
        let first = generate_maze(6, 4, 7, 0.3, 2).expect("valid maze");
        let second = generate_maze(6, 4, 7, 0.3, 2).expect("valid maze");
        assert_eq!(first, second);
    }

    #[test]
    fn generation_places_the_requested_targets() {
        let maze = generate_maze(5, 5, 1, 0.2, 3).expect("valid maze");
        assert_eq!(query::target_cells(&maze).len(), 3);
    }

    #[test]
    fn generation_caps_targets_at_the_cell_count() {
        let maze = generate_maze(2, 1, 0, 0.0, 99).expect("valid maze");
        assert_eq!(query::target_cells(&maze).len(), 2);
    }

    #[test]
    fn generation_rejects_invalid_parameters() {
        assert!(generate_maze(0, 3, 0, 0.2, 1).is_err());
        assert!(generate_maze(3, 3, 0, 1.5, 1).is_err());
    }

    #[test]
    fn rendered_direction_grid_uses_boundary_glyphs() {
        let mut directions = DirectionField::new(2, 1);
        directions.set(CellCoord::new(0, 0), CellFlow::Target);
        directions.set(CellCoord::new(1, 0), CellFlow::Step(Direction::Left));
        assert_eq!(render_directions(&directions), "X<\n");
    }

    #[test]
    fn rendered_distance_grid_marks_unreachable_cells() {
        let mut distances = DistanceField::new(3, 1);
        distances.set(CellCoord::new(0, 0), 0);
        distances.set(CellCoord::new(1, 0), 12);
        assert_eq!(render_distances(&distances), " 0 12  -\n");
    }

    #[test]
    fn rendered_masks_are_hex_digits() {
        let mut masks = EdgeMaskGrid::new(2, 1);
        masks.insert(CellCoord::new(0, 0), Direction::Right);
        masks.insert(CellCoord::new(0, 0), Direction::Up);
        masks.insert(CellCoord::new(1, 0), Direction::Left);
        assert_eq!(render_masks(&masks), "92\n");
    }
}
