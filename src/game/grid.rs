//! Tile Grid
//!
//! Static terrain plus the mutable power-up cells. The grid is the sole
//! owner of terrain state; agents only hold coordinates into it.

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::core::vec2::Vec2;
use crate::game::collision::Rect;

/// Tile code as stored in level files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i8)]
pub enum Tile {
    /// Nothing here
    Empty = -1,
    /// Solid wall, agents bounce off
    Obstacle = 1,
    /// Single-use kill power-up
    KillPowerUp = 2,
    /// Teleporter entry
    TeleportEntry = 3,
    /// Teleporter exit
    TeleportExit = 4,
    /// Finish line
    Finish = 5,
    /// Agent spawn marker (consumed at initialization)
    SpawnMarker = 6,
}

impl Tile {
    /// Get tile from its level code.
    pub fn from_code(code: i32) -> Option<Tile> {
        match code {
            -1 => Some(Tile::Empty),
            1 => Some(Tile::Obstacle),
            2 => Some(Tile::KillPowerUp),
            3 => Some(Tile::TeleportEntry),
            4 => Some(Tile::TeleportExit),
            5 => Some(Tile::Finish),
            6 => Some(Tile::SpawnMarker),
            _ => None,
        }
    }

    /// Level code for this tile.
    #[inline]
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Grid construction and addressing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// A cell outside the grid was addressed.
    #[error("tile ({row}, {col}) is outside the {rows}x{cols} grid")]
    InvalidGridReference {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// The grid has no cells.
    #[error("grid has no cells")]
    EmptyGrid,

    /// A row has a different width than the first row.
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A cell holds a code that is not a known tile.
    #[error("unknown tile code {code} at ({row}, {col})")]
    UnknownTileCode { row: usize, col: usize, code: i32 },
}

/// Fixed-size row-major tile grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileGrid {
    rows: usize,
    cols: usize,
    tile_size: f32,
    cells: Vec<Tile>,
}

impl TileGrid {
    /// Build a grid from rows of level codes.
    ///
    /// Dimensions are fixed from here on.
    pub fn from_codes(codes: &[Vec<i32>], tile_size: f32) -> Result<Self, GridError> {
        let rows = codes.len();
        let cols = codes.first().map(Vec::len).unwrap_or(0);
        if rows == 0 || cols == 0 {
            return Err(GridError::EmptyGrid);
        }

        let mut cells = Vec::with_capacity(rows * cols);
        for (row, line) in codes.iter().enumerate() {
            if line.len() != cols {
                return Err(GridError::RaggedRow {
                    row,
                    expected: cols,
                    found: line.len(),
                });
            }
            for (col, &code) in line.iter().enumerate() {
                let tile = Tile::from_code(code)
                    .ok_or(GridError::UnknownTileCode { row, col, code })?;
                cells.push(tile);
            }
        }

        Ok(Self { rows, cols, tile_size, cells })
    }

    /// Create a grid filled with empty tiles.
    pub fn empty(rows: usize, cols: usize, tile_size: f32) -> Result<Self, GridError> {
        if rows == 0 || cols == 0 {
            return Err(GridError::EmptyGrid);
        }
        Ok(Self {
            rows,
            cols,
            tile_size,
            cells: vec![Tile::Empty; rows * cols],
        })
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Edge length of one tile in world units.
    #[inline]
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// World extent covered by the grid (width, height).
    pub fn world_size(&self) -> Vec2 {
        Vec2::new(
            self.cols as f32 * self.tile_size,
            self.rows as f32 * self.tile_size,
        )
    }

    fn index(&self, row: usize, col: usize) -> Result<usize, GridError> {
        if row >= self.rows || col >= self.cols {
            return Err(GridError::InvalidGridReference {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(row * self.cols + col)
    }

    /// Tile at (row, col).
    pub fn tile_at(&self, row: usize, col: usize) -> Result<Tile, GridError> {
        let idx = self.index(row, col)?;
        Ok(self.cells[idx])
    }

    /// Overwrite the tile at (row, col).
    pub fn set_tile(&mut self, row: usize, col: usize, tile: Tile) -> Result<(), GridError> {
        let idx = self.index(row, col)?;
        self.cells[idx] = tile;
        Ok(())
    }

    /// All cells holding `tile`, in row-major scan order.
    pub fn find_tiles_with_code(&self, tile: Tile) -> Vec<(usize, usize)> {
        self.cells()
            .filter(|&(_, _, t)| t == tile)
            .map(|(row, col, _)| (row, col))
            .collect()
    }

    /// Iterate `(row, col, tile)` in row-major scan order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Tile)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, &tile)| (idx / cols, idx % cols, tile))
    }

    /// World-space top-left corner of a cell.
    #[inline]
    pub fn tile_origin(&self, row: usize, col: usize) -> Vec2 {
        Vec2::new(col as f32 * self.tile_size, row as f32 * self.tile_size)
    }

    /// World-space bounding box of a cell.
    #[inline]
    pub fn tile_rect(&self, row: usize, col: usize) -> Rect {
        Rect::new(self.tile_origin(row, col), self.tile_size, self.tile_size)
    }

    /// Cells whose bounding box overlaps `rect`, in row-major order.
    pub fn overlapping_cells(&self, rect: &Rect) -> Vec<(usize, usize, Tile)> {
        self.cells()
            .filter(|&(row, col, _)| rect.overlaps(&self.tile_rect(row, col)))
            .collect()
    }

    /// Replace every spawn marker with an empty tile.
    ///
    /// Returns the marker coordinates in scan order.
    pub fn take_spawn_markers(&mut self) -> Vec<(usize, usize)> {
        let markers = self.find_tiles_with_code(Tile::SpawnMarker);
        for &(row, col) in &markers {
            self.cells[row * self.cols + col] = Tile::Empty;
        }
        markers
    }

    /// Rows of level codes (the grid's on-disk shape).
    pub fn to_codes(&self) -> Vec<Vec<i32>> {
        self.cells
            .chunks(self.cols)
            .map(|row| row.iter().map(|t| t.code()).collect())
            .collect()
    }
}
