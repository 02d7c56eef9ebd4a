//! Level Loading
//!
//! Levels are CSV files: one grid row per line, each cell an integer tile
//! code. This is the format the level editor saves as `level{n}.csv`.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::game::grid::{GridError, TileGrid};

/// Level loading errors.
#[derive(Debug, Error)]
pub enum LevelError {
    /// The file could not be read.
    #[error("failed to read level {path}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A cell is not an integer.
    #[error("line {line}, column {column}: {value:?} is not a tile code")]
    Parse {
        /// 1-based line number
        line: usize,
        /// 1-based column number
        column: usize,
        /// Offending text
        value: String,
    },

    /// The codes do not form a valid grid.
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Conventional file name for level `n`.
pub fn level_file_name(n: u32) -> String {
    format!("level{n}.csv")
}

/// Parse CSV text into rows of codes without validating them.
fn parse_codes(text: &str) -> Result<Vec<Vec<i32>>, LevelError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            line.split(',')
                .enumerate()
                .map(|(j, cell)| {
                    let cell = cell.trim();
                    cell.parse::<i32>().map_err(|_| LevelError::Parse {
                        line: i + 1,
                        column: j + 1,
                        value: cell.to_string(),
                    })
                })
                .collect()
        })
        .collect()
}

/// Parse a level from CSV text.
pub fn parse_level(text: &str, tile_size: f32) -> Result<TileGrid, LevelError> {
    let codes = parse_codes(text)?;
    Ok(TileGrid::from_codes(&codes, tile_size)?)
}

/// Load a level file.
pub fn load_level(path: impl AsRef<Path>, tile_size: f32) -> Result<TileGrid, LevelError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| LevelError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let grid = parse_level(&text, tile_size)?;
    debug!(path = %path.display(), rows = grid.rows(), cols = grid.cols(), "Level loaded");
    Ok(grid)
}

/// Render a grid back to CSV text.
pub fn format_level(grid: &TileGrid) -> String {
    let mut out = String::new();
    for row in grid.to_codes() {
        let line: Vec<String> = row.iter().map(i32::to_string).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::grid::Tile;

    const SAMPLE: &str = "-1,-1,1,-1\n6,2,-1,4\n-1,3,-1,5\n";

    #[test]
    fn test_parse_sample() {
        let grid = parse_level(SAMPLE, 25.0).unwrap();
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 4);
        assert_eq!(grid.tile_at(1, 0), Ok(Tile::SpawnMarker));
        assert_eq!(grid.tile_at(2, 3), Ok(Tile::Finish));
    }

    #[test]
    fn test_parse_tolerates_whitespace_and_blank_lines() {
        let grid = parse_level(" -1, 1\r\n\n 5 ,-1\n\n", 25.0).unwrap();
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.tile_at(1, 0), Ok(Tile::Finish));
    }

    #[test]
    fn test_parse_error_location() {
        let err = parse_level("-1,-1\n-1,x\n", 25.0).unwrap_err();
        match err {
            LevelError::Parse { line, column, value } => {
                assert_eq!((line, column), (2, 2));
                assert_eq!(value, "x");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_grid_errors_surface() {
        assert!(matches!(
            parse_level("-1,-1\n-1\n", 25.0),
            Err(LevelError::Grid(GridError::RaggedRow { .. }))
        ));
        assert!(matches!(parse_level("", 25.0), Err(LevelError::Grid(GridError::EmptyGrid))));
        assert!(matches!(
            parse_level("-1,7\n", 25.0),
            Err(LevelError::Grid(GridError::UnknownTileCode { code: 7, .. }))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = load_level("/nonexistent/level99.csv", 25.0).unwrap_err();
        assert!(matches!(err, LevelError::Io { .. }));
    }

    #[test]
    fn test_format_matches_editor_output() {
        let grid = parse_level(SAMPLE, 25.0).unwrap();
        assert_eq!(format_level(&grid), SAMPLE);
        assert_eq!(level_file_name(3), "level3.csv");
    }
}
