/// Static tile grid: lookup, contents classification and the
/// one-way-aware solidity predicate.
///
/// ## Coordinates
///
/// World space is pixels with y growing upward. Grid row 0 is the bottom
/// row, so a map written top-down in source is flipped on load.
/// Lookups floor by the 16 px pitch. The map is walled on every side, so a
/// legal actor never probes outside it; an out-of-range lookup is a bug in
/// the caller and panics.

use std::fmt;

use thiserror::Error;

use super::corner::{HALF_EXTENT, SLOP};
use super::entity::Vec2;
use super::tile::{Contents, TileKind};

pub const TILE_SIZE: f32 = 16.0;
pub const MAP_DIM: usize = 16;

/// The compiled-in playfield, top row first.
pub const BUILTIN_MAP: [&str; MAP_DIM] = [
    "################",
    "#......l......f#",
    "#......l......f#",
    "#######l##....f#",
    "#......l......f#",
    "#......l......f#",
    "#......l......f#",
    "#.....111#####f#",
    "#.....11######f#",
    "#....111######f#",
    "#.1....11#####f#",
    "#.............f#",
    "###########..###",
    "#wwwwwwwwwwwwww#",
    "#wwwwwwwwwwwwww#",
    "################",
];

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("map must have {} rows, found {found}", MAP_DIM)]
    RowCount { found: usize },
    #[error("map row {row} must be {} tiles wide, found {found}", MAP_DIM)]
    RowWidth { row: usize, found: usize },
    #[error("unknown tile {ch:?} at row {row}, column {col}")]
    UnknownTile { row: usize, col: usize, ch: char },
}

/// Where the actor was and where it is trying to go this tick.
/// One-way tiles need both to decide whether they block.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sweep {
    pub prev: Vec2,
    pub next: Vec2,
}

impl Sweep {
    pub fn new(prev: Vec2, next: Vec2) -> Self {
        Sweep { prev, next }
    }

    /// A sweep that did not move (used for post-move contact queries).
    pub fn at_rest(pos: Vec2) -> Self {
        Sweep { prev: pos, next: pos }
    }
}

/// Distance from `edge` up to the next grid line strictly above it.
#[inline]
pub fn gap_to_next_line(edge: f32) -> f32 {
    ((edge / TILE_SIZE).floor() + 1.0) * TILE_SIZE - edge
}

/// Distance from `edge` down to the grid line at or below it.
#[inline]
pub fn gap_to_prev_line(edge: f32) -> f32 {
    edge - (edge / TILE_SIZE).floor() * TILE_SIZE
}

/// Does a box edge moving from `prev` to `next` along one axis cross the
/// far boundary of the tile it lands in, coming from the +axis side?
///
/// `u` is the trailing edge before the move, `v` after. The tile line is the
/// upper boundary of the tile containing `v`; the edge must start at or
/// beyond `line - SLOP` and end at or below `line`.
fn crosses_line(prev: f32, next: f32) -> bool {
    let u = prev - HALF_EXTENT;
    let v = next - HALF_EXTENT;
    let line = ((v / TILE_SIZE).floor() + 1.0) * TILE_SIZE;
    u >= v && u >= line - SLOP && v <= line
}

fn grid_index(coord: f32) -> Option<usize> {
    let i = (coord / TILE_SIZE).floor();
    if i >= 0.0 && i < MAP_DIM as f32 {
        Some(i as usize)
    } else {
        None
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileMap {
    /// `cells[row][col]`, row 0 at the bottom.
    cells: [[TileKind; MAP_DIM]; MAP_DIM],
}

impl TileMap {
    /// Parse a map written top row first, one char per tile.
    pub fn from_rows(rows: &[&str]) -> Result<Self, MapError> {
        if rows.len() != MAP_DIM {
            return Err(MapError::RowCount { found: rows.len() });
        }
        let mut cells = [[TileKind::Empty; MAP_DIM]; MAP_DIM];
        for (listed, text) in rows.iter().enumerate() {
            let width = text.chars().count();
            if width != MAP_DIM {
                return Err(MapError::RowWidth { row: listed, found: width });
            }
            let row = MAP_DIM - 1 - listed;
            for (col, ch) in text.chars().enumerate() {
                cells[row][col] = TileKind::from_char(ch)
                    .ok_or(MapError::UnknownTile { row: listed, col, ch })?;
            }
        }
        Ok(TileMap { cells })
    }

    pub fn builtin() -> Result<Self, MapError> {
        TileMap::from_rows(&BUILTIN_MAP)
    }

    /// Tile at grid coordinates (row 0 = bottom).
    #[inline]
    pub fn cell(&self, col: usize, row: usize) -> TileKind {
        self.cells[row][col]
    }

    /// Tile containing the world point `p`.
    ///
    /// # Panics
    /// If `p` lies outside the grid.
    #[inline]
    pub fn tile_at(&self, p: Vec2) -> TileKind {
        match (grid_index(p.x), grid_index(p.y)) {
            (Some(col), Some(row)) => self.cells[row][col],
            _ => panic!("tile lookup outside the map at ({}, {})", p.x, p.y),
        }
    }

    /// Contents flags at the world point `p`.
    #[inline]
    pub fn classify(&self, p: Vec2) -> Contents {
        self.tile_at(p).contents()
    }

    /// Should the point `p` block the actor moving along `sweep` right now?
    ///
    ///   - `#` always blocks.
    ///   - `1` blocks only when the actor's bottom edge crosses the tile's
    ///     top line downward this tick (land from above, jump through from
    ///     below or the side).
    ///   - `l` applies the same test on x: it blocks only when the left edge
    ///     crosses the tile's right line moving left.
    pub fn is_solid_at(&self, p: Vec2, sweep: Sweep) -> bool {
        match self.tile_at(p) {
            TileKind::Solid => true,
            TileKind::OneWayPlatform => crosses_line(sweep.prev.y, sweep.next.y),
            TileKind::Ladder => crosses_line(sweep.prev.x, sweep.next.x),
            _ => false,
        }
    }
}

impl fmt::Display for TileMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..MAP_DIM).rev() {
            let line: String = self.cells[row].iter().map(|t| t.to_char()).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Map builders for tests.
#[cfg(test)]
pub mod fixtures {
    use super::*;

    /// A walled, otherwise empty room with `tiles` placed at
    /// `(col, row, char)`, row 0 at the bottom.
    pub fn room_with(tiles: &[(usize, usize, char)]) -> TileMap {
        let mut rows: Vec<Vec<char>> = (0..MAP_DIM)
            .map(|r| {
                (0..MAP_DIM)
                    .map(|c| {
                        if r == 0 || r == MAP_DIM - 1 || c == 0 || c == MAP_DIM - 1 {
                            '#'
                        } else {
                            '.'
                        }
                    })
                    .collect()
            })
            .collect();
        for &(col, row, ch) in tiles {
            // `rows` is listed top-down
            rows[MAP_DIM - 1 - row][col] = ch;
        }
        let text: Vec<String> = rows.into_iter().map(|r| r.into_iter().collect()).collect();
        let refs: Vec<&str> = text.iter().map(|s| s.as_str()).collect();
        TileMap::from_rows(&refs).unwrap()
    }

    pub fn empty_room() -> TileMap {
        room_with(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn builtin_map_parses_and_is_walled() {
        let map = TileMap::builtin().unwrap();
        for i in 0..MAP_DIM {
            assert_eq!(map.cell(i, 0), TileKind::Solid);
            assert_eq!(map.cell(i, MAP_DIM - 1), TileKind::Solid);
            assert_eq!(map.cell(0, i), TileKind::Solid);
            assert_eq!(map.cell(MAP_DIM - 1, i), TileKind::Solid);
        }
    }

    #[test]
    fn builtin_rows_are_flipped_so_water_is_low() {
        let map = TileMap::builtin().unwrap();
        assert_eq!(map.cell(5, 1), TileKind::Water);
        assert_eq!(map.cell(5, 2), TileKind::Water);
        assert_eq!(map.cell(2, 5), TileKind::OneWayPlatform);
        assert_eq!(map.cell(7, 12), TileKind::Ladder);
        assert_eq!(map.cell(14, 8), TileKind::Field);
    }

    #[test]
    fn spawn_tile_is_open() {
        let map = TileMap::builtin().unwrap();
        let spawn = crate::domain::entity::SPAWN;
        assert_eq!(map.tile_at(spawn), TileKind::Empty);
    }

    #[test]
    fn tile_at_floors_world_coordinates() {
        let map = room_with(&[(3, 2, 'w')]);
        assert_eq!(map.tile_at(Vec2::new(48.0, 32.0)), TileKind::Water);
        assert_eq!(map.tile_at(Vec2::new(63.99, 47.99)), TileKind::Water);
        assert_eq!(map.tile_at(Vec2::new(64.0, 32.0)), TileKind::Empty);
        assert_eq!(map.tile_at(Vec2::new(47.99, 32.0)), TileKind::Empty);
    }

    #[test]
    #[should_panic(expected = "outside the map")]
    fn tile_at_out_of_bounds_panics() {
        empty_room().tile_at(Vec2::new(-0.5, 20.0));
    }

    #[test]
    #[should_panic(expected = "outside the map")]
    fn tile_at_past_top_panics() {
        empty_room().tile_at(Vec2::new(20.0, 256.0));
    }

    #[test]
    fn classify_flags() {
        let map = room_with(&[(2, 2, 'w'), (3, 2, 'l'), (4, 2, 'f'), (5, 2, '1')]);
        assert_eq!(map.classify(Vec2::new(8.0, 8.0)), Contents::SOLID);
        assert_eq!(map.classify(Vec2::new(40.0, 40.0)), Contents::WATER);
        assert_eq!(map.classify(Vec2::new(56.0, 40.0)), Contents::LADDER);
        assert_eq!(map.classify(Vec2::new(72.0, 40.0)), Contents::FIELD);
        assert_eq!(map.classify(Vec2::new(88.0, 40.0)), Contents::NONE);
    }

    #[test]
    fn parse_errors() {
        let mut rows: Vec<&str> = BUILTIN_MAP.to_vec();
        rows.pop();
        assert_eq!(TileMap::from_rows(&rows), Err(MapError::RowCount { found: 15 }));

        let mut rows: Vec<&str> = BUILTIN_MAP.to_vec();
        rows[4] = "#.....";
        assert_eq!(
            TileMap::from_rows(&rows),
            Err(MapError::RowWidth { row: 4, found: 6 })
        );

        let mut rows: Vec<&str> = BUILTIN_MAP.to_vec();
        rows[2] = "#......X......f#";
        assert_eq!(
            TileMap::from_rows(&rows),
            Err(MapError::UnknownTile { row: 2, col: 7, ch: 'X' })
        );
    }

    #[test]
    fn map_errors_describe_the_problem() {
        assert_eq!(
            MapError::RowCount { found: 15 }.to_string(),
            "map must have 16 rows, found 15"
        );
        assert_eq!(
            MapError::RowWidth { row: 4, found: 6 }.to_string(),
            "map row 4 must be 16 tiles wide, found 6"
        );
        let err: Box<dyn std::error::Error> =
            Box::new(MapError::UnknownTile { row: 2, col: 7, ch: 'X' });
        assert_eq!(err.to_string(), "unknown tile 'X' at row 2, column 7");
    }

    #[test]
    fn display_round_trips_builtin() {
        let map = TileMap::builtin().unwrap();
        let text = map.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, BUILTIN_MAP.to_vec());
    }

    #[test]
    fn grid_gaps() {
        assert_eq!(gap_to_next_line(62.9375), 1.0625);
        assert_eq!(gap_to_next_line(64.0), 16.0);
        assert_eq!(gap_to_prev_line(35.0), 3.0);
        assert_eq!(gap_to_prev_line(32.0), 0.0);
    }

    // ── one-way solidity ──

    #[test]
    fn solid_tile_always_blocks() {
        let map = empty_room();
        let p = Vec2::new(8.0, 8.0);
        assert!(map.is_solid_at(p, Sweep::at_rest(Vec2::new(50.0, 50.0))));
    }

    #[test]
    fn platform_blocks_when_landing_from_above() {
        // platform tile spans y 80..96
        let map = room_with(&[(2, 5, '1')]);
        let probe = Vec2::new(36.0, 93.0);
        let sweep = Sweep::new(Vec2::new(40.0, 102.0), Vec2::new(40.0, 97.0));
        assert!(map.is_solid_at(probe, sweep));
    }

    #[test]
    fn platform_passes_when_rising_from_below() {
        let map = room_with(&[(2, 5, '1')]);
        let probe = Vec2::new(36.0, 83.0);
        let sweep = Sweep::new(Vec2::new(40.0, 82.0), Vec2::new(40.0, 87.0));
        assert!(!map.is_solid_at(probe, sweep));
    }

    #[test]
    fn platform_passes_when_entering_from_the_side() {
        // bottom edge already below the slop line before the move
        let map = room_with(&[(2, 5, '1')]);
        let probe = Vec2::new(36.0, 88.0);
        let sweep = Sweep::new(Vec2::new(30.0, 92.0), Vec2::new(40.0, 92.0));
        assert!(!map.is_solid_at(probe, sweep));
    }

    #[test]
    fn platform_holds_a_resting_actor() {
        // bottom edge parked at line - slop, pulled down by one tick of gravity
        let map = room_with(&[(2, 5, '1')]);
        let rest_y = 96.0 - SLOP + HALF_EXTENT;
        let sweep = Sweep::new(Vec2::new(40.0, rest_y), Vec2::new(40.0, rest_y - 1.0));
        assert!(map.is_solid_at(Vec2::new(36.0, rest_y - 1.0 - HALF_EXTENT), sweep));
        assert!(map.is_solid_at(
            Vec2::new(36.0, rest_y - HALF_EXTENT),
            Sweep::at_rest(Vec2::new(40.0, rest_y)),
        ));
    }

    #[test]
    fn ladder_blocks_only_moving_left_across_its_right_face() {
        // ladder tile spans x 48..64
        let map = room_with(&[(3, 3, 'l')]);
        let probe = Vec2::new(62.0, 56.0);
        let leftward = Sweep::new(Vec2::new(69.0, 56.0), Vec2::new(66.0, 56.0));
        assert!(map.is_solid_at(probe, leftward));
        let rightward = Sweep::new(Vec2::new(63.0, 56.0), Vec2::new(66.0, 56.0));
        assert!(!map.is_solid_at(probe, rightward));
    }

    #[test]
    fn open_kinds_never_block() {
        let map = room_with(&[(2, 2, 'w'), (3, 2, 'f')]);
        let sweep = Sweep::new(Vec2::new(50.0, 60.0), Vec2::new(50.0, 40.0));
        assert!(!map.is_solid_at(Vec2::new(40.0, 40.0), sweep));
        assert!(!map.is_solid_at(Vec2::new(56.0, 40.0), sweep));
        assert!(!map.is_solid_at(Vec2::new(80.0, 40.0), sweep));
    }
}
