use std::{fmt::Write as _, fs, path::Path};

use anyhow::{bail, Context, Result};
use edgemaze_world::{query, Maze};

/// Loads a maze from a whitespace-separated integer matrix file.
pub(crate) fn load_maze(path: &Path) -> Result<Maze> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("could not read maze file {}", path.display()))?;
    let codes = parse_cell_codes(&text)
        .with_context(|| format!("could not parse maze file {}", path.display()))?;
    Maze::from_cell_codes(&codes)
        .with_context(|| format!("maze file {} is not a valid grid", path.display()))
}

/// Saves a maze as a whitespace-separated integer matrix file.
pub(crate) fn save_maze(path: &Path, maze: &Maze) -> Result<()> {
    fs::write(path, format_cell_codes(&query::cell_codes(maze)))
        .with_context(|| format!("could not write maze file {}", path.display()))
}

/// Parses the text matrix into rows of integer cell codes.
///
/// Blank lines are ignored so hand-edited files may end with a newline or
/// separate sections visually. Every value must be a non-negative integer;
/// rectangularity is enforced later by the maze itself.
pub(crate) fn parse_cell_codes(text: &str) -> Result<Vec<Vec<u32>>> {
    let mut rows = Vec::new();
    for (line_number, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let mut row = Vec::new();
        for token in line.split_whitespace() {
            let code: u32 = match token.parse() {
                Ok(code) => code,
                Err(_) => bail!(
                    "line {}: '{token}' is not a non-negative integer cell code",
                    line_number + 1
                ),
            };
            row.push(code);
        }
        rows.push(row);
    }
    Ok(rows)
}

fn format_cell_codes(rows: &[Vec<u32>]) -> String {
    let mut text = String::new();
    for row in rows {
        for (index, code) in row.iter().enumerate() {
            if index > 0 {
                text.push(' ');
            }
            let _ = write!(text, "{code}");
        }
        text.push('\n');
    }
    text
}
