//! Map layouts.

use serde::{Deserialize, Serialize};

use crate::catalogue::Definition;

/// Terrain layout of a single map.
///
/// `rows` holds one string per row, one character per tile:
/// `#` wall, `.` floor, `~` water, `+` door.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapDefinition {
    pub id: String,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub rows: Vec<String>,
}

/// Shape errors detected by [`MapDefinition::validate`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    #[error("expected {expected} rows, found {found}")]
    RowCount { expected: u32, found: usize },

    #[error("row {row} has width {found}, expected {expected}")]
    RowWidth { row: usize, expected: u32, found: usize },

    #[error("unknown tile {tile:?} at row {row}, column {column}")]
    UnknownTile { row: usize, column: usize, tile: char },
}

impl MapDefinition {
    const TILES: [char; 4] = ['#', '.', '~', '+'];

    /// Checks that the rows match the declared dimensions and only use known tiles.
    pub fn validate(&self) -> Result<(), MapError> {
        if self.rows.len() != self.height as usize {
            return Err(MapError::RowCount {
                expected: self.height,
                found: self.rows.len(),
            });
        }

        for (row, line) in self.rows.iter().enumerate() {
            let width = line.chars().count();
            if width != self.width as usize {
                return Err(MapError::RowWidth {
                    row,
                    expected: self.width,
                    found: width,
                });
            }
            if let Some((column, tile)) = line
                .chars()
                .enumerate()
                .find(|(_, tile)| !Self::TILES.contains(tile))
            {
                return Err(MapError::UnknownTile { row, column, tile });
            }
        }

        Ok(())
    }

    /// Number of walkable tiles (floor and doors).
    pub fn walkable_tiles(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|row| row.chars())
            .filter(|tile| matches!(tile, '.' | '+'))
            .count()
    }
}

impl Definition for MapDefinition {
    const KIND: &'static str = "maps";

    fn id(&self) -> &str {
        &self.id
    }
}
