//! Text rendering of tiles and boards for terminals.
//!
//! Every canvas cell is two columns wide, so a tile rendered at scale `n`
//! is `2 * n + 2` columns wide including its frame.

use std::f64::consts::FRAC_1_SQRT_2;

use crate::{Board, Position, RotatedTile, Side, SideSet, TileSide, TileView};

const BLANK: &str = "  ";
const CITY: &str = "🏠";
const CLOISTER: &str = "⛪";
const CROSSROADS: &str = "╳╳";
const PENDANT: &str = "🛡️ ";
const ROAD_HORIZONTAL: &str = "══";
const ROAD_VERTICAL: &str = "││";

const BORDER_HORIZONTAL: &str = "━━";
const BORDER_HORIZONTAL_ROAD: &str = "┥┝";
const BORDER_VERTICAL: &str = "┃";
const BORDER_VERTICAL_ROAD: &str = "╪";

/// Border junctions, indexed by which of the four cells around the junction
/// hold a tile: `bottom_right + 2 * bottom_left + 4 * top_right + 8 * top_left`.
const JUNCTIONS: [char; 16] = [
    ' ', '┏', '┓', '┳', '┗', '┣', '╋', '╋', '┛', '╋', '┫', '╋', '┻', '╋', '╋', '╋',
];

// Cells on the bisector between an occupied and a missing wall are outside
// the city, with or without this margin. It only keeps rounding noise in the
// two distances from letting such a cell in.
const EPSILON: f64 = 1e-9;

/// A scale x scale grid of double-width cells.
type Canvas = Vec<Vec<&'static str>>;

/// Renders tiles and boards to lines of text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConsoleRenderer {
    scale: usize,
}

impl Default for ConsoleRenderer {
    fn default() -> Self {
        Self { scale: 7 }
    }
}

impl ConsoleRenderer {
    /// `scale` is the number of cells along each side of a tile.
    ///
    /// Any scale is accepted, but only odd scales of at least 3 look right.
    pub fn new(scale: usize) -> Self {
        Self { scale }
    }

    pub fn scale(&self) -> usize {
        self.scale
    }

    /// The index of the center row and column.
    fn midway(&self) -> usize {
        self.scale.saturating_sub(1) / 2
    }

    /// Renders a single tile with its frame.
    pub fn render_tile<T: TileView>(&self, tile: &T) -> Vec<String> {
        self.render_tile_with_label(tile, "┏")
    }

    /// Like [`Self::render_tile()`], with `label` in place of the top left
    /// corner of the frame.
    pub fn render_tile_with_label<T: TileView>(&self, tile: &T, label: &str) -> Vec<String> {
        let border = |side: Side| {
            let midway = if tile.side(side) == TileSide::Road {
                BORDER_HORIZONTAL_ROAD
            } else {
                BORDER_HORIZONTAL
            };
            self.repeat_with_midway(BORDER_HORIZONTAL, midway)
        };
        let wall = |side: Side, i: usize| {
            if i == self.midway() && tile.side(side) == TileSide::Road {
                BORDER_VERTICAL_ROAD
            } else {
                BORDER_VERTICAL
            }
        };

        let mut lines = Vec::with_capacity(self.scale + 2);
        lines.push(format!("{}{}┓", label, border(Side::North)));
        for (i, row) in self.render_tile_contents(tile).into_iter().enumerate() {
            lines.push(format!("{}{}{}", wall(Side::West, i), row, wall(Side::East, i)));
        }
        lines.push(format!("┗{}┛", border(Side::South)));
        lines
    }

    /// Renders all tiles on the board, and numbers the empty cells in
    /// `positions` starting from 1.
    ///
    /// The rendered area covers the board and every position. Trailing
    /// whitespace is removed from each line.
    pub fn render_board(&self, board: &Board, positions: &[Position]) -> Vec<String> {
        let mut area = board.bbox();
        for &(row, col) in positions {
            area.update(row, col);
        }
        let (height, width) = (area.height(), area.width());
        let blank = BLANK.repeat(self.scale);
        let at = |row: i32, col: i32| board.get(row, col);

        let mut canvas = Vec::new();
        // Every tile row is preceded by its top border, and the last row is
        // followed by the bottom border of the board.
        for k in 0..=height {
            let row_no = area.row_min + k as i32;
            let has_contents = k < height;
            let mut lines = vec![String::new(); if has_contents { self.scale + 1 } else { 1 }];

            for k2 in 0..=width {
                let col_no = area.col_min + k2 as i32;
                let above_left = at(row_no - 1, col_no - 1);
                let above = at(row_no - 1, col_no);
                let left = at(row_no, col_no - 1);
                let current = at(row_no, col_no);

                let junction = usize::from(current.is_some())
                    + 2 * usize::from(left.is_some())
                    + 4 * usize::from(above.is_some())
                    + 8 * usize::from(above_left.is_some());
                lines[0].push(JUNCTIONS[junction]);

                let above_wall = if above.is_some() || current.is_some() {
                    BORDER_HORIZONTAL
                } else {
                    BLANK
                };
                let above_wall_midway = if faces_road(above, Side::South)
                    || faces_road(current, Side::North)
                {
                    BORDER_HORIZONTAL_ROAD
                } else {
                    above_wall
                };
                lines[0].push_str(&self.repeat_with_midway(above_wall, above_wall_midway));

                if !has_contents {
                    continue;
                }

                let left_wall = if left.is_some() || current.is_some() {
                    BORDER_VERTICAL
                } else {
                    " "
                };
                let left_wall_midway =
                    if faces_road(left, Side::East) || faces_road(current, Side::West) {
                        BORDER_VERTICAL_ROAD
                    } else {
                        left_wall
                    };

                let contents = match current {
                    Some(tile) => Some(self.render_tile_contents(tile)),
                    None => positions
                        .iter()
                        .position(|&position| position == (row_no, col_no))
                        .map(|idx| self.number_tile(idx + 1)),
                };
                for i in 0..self.scale {
                    let line = &mut lines[i + 1];
                    line.push_str(if i == self.midway() {
                        left_wall_midway
                    } else {
                        left_wall
                    });
                    line.push_str(contents.as_ref().map_or(&blank, |rows| &rows[i]));
                }
            }

            canvas.extend(lines.into_iter().map(|line| line.trim_end().to_owned()));
        }
        canvas
    }

    /// Draws the inside of a tile: roads, then the crossroads and cloister
    /// markers, then the cities on top.
    fn render_tile_contents<T: TileView>(&self, tile: &T) -> Vec<String> {
        let scale = self.scale;
        let midway = self.midway();
        let mut canvas: Canvas = vec![vec![BLANK; scale]; scale];

        for road in tile.roads() {
            let start_from = if road.is_straight() { midway } else { midway + 1 };
            for side in road.sides() {
                let (rows, cols, glyph) = match side {
                    Side::North => (0..midway, midway..midway + 1, ROAD_VERTICAL),
                    Side::East => (midway..midway + 1, start_from..scale, ROAD_HORIZONTAL),
                    Side::South => (start_from..scale, midway..midway + 1, ROAD_VERTICAL),
                    Side::West => (midway..midway + 1, 0..midway, ROAD_HORIZONTAL),
                };
                for row in rows {
                    for col in cols.clone() {
                        set(&mut canvas, row, col, glyph);
                    }
                }
            }
        }

        if tile.roads().len() >= 3 {
            set(&mut canvas, midway, midway, CROSSROADS);
        }
        if tile.cloister() {
            set(&mut canvas, midway, midway, CLOISTER);
        }

        for city in tile.cities() {
            let walls = city.walls;
            let missing = !walls;
            let mut corner_walls = walls.into_iter();
            let is_corner = match (corner_walls.next(), corner_walls.next(), corner_walls.next()) {
                (Some(a), Some(b), None) => a.is_adjacent_to(b),
                _ => false,
            };

            for row in 0..scale {
                let y = cell_center(row, scale);
                for col in 0..scale {
                    let x = cell_center(col, scale);
                    let inside = if walls.len() == 1 {
                        min_distance(walls, y, x) <= FRAC_1_SQRT_2
                    } else if is_corner {
                        min_distance(walls, y, x) + EPSILON < min_distance(missing, y, x)
                    } else {
                        // The city joins opposite sides
                        min_distance(missing, y, x) > FRAC_1_SQRT_2
                    };
                    if inside {
                        canvas[row][col] = CITY;
                    }
                }
            }

            if city.pendant {
                self.add_pendant(&mut canvas, walls);
            }
        }

        canvas.into_iter().map(|row| row.concat()).collect()
    }

    /// Puts a shield into the corner between two adjacent walls, or else
    /// next to the first wall.
    fn add_pendant(&self, canvas: &mut Canvas, walls: SideSet) {
        let Some(sides) = Side::ALL
            .into_iter()
            .map(|side| SideSet::from_iter([side, side.rotate(Side::East)]))
            .find(|&corner| (corner & walls) == corner)
            .or_else(|| walls.first().map(|side| SideSet::new().insert(side)))
        else {
            return;
        };

        let coordinate = |start: Side, end: Side| {
            if sides.contains(start) {
                0
            } else if sides.contains(end) {
                self.scale.saturating_sub(1)
            } else {
                self.midway()
            }
        };
        let row = coordinate(Side::North, Side::South);
        let col = coordinate(Side::West, Side::East);
        set(canvas, row, col, PENDANT);
    }

    /// A blank tile with `number` in its center.
    fn number_tile(&self, number: usize) -> Vec<String> {
        let label = number.to_string();
        let padded = format!("{:>1$}", label, self.scale + label.len() / 2);
        let number_row = format!("{:<1$}", padded, 2 * self.scale);
        let blank = BLANK.repeat(self.scale);
        (0..self.scale)
            .map(|i| {
                if i == self.midway() {
                    number_row.clone()
                } else {
                    blank.clone()
                }
            })
            .collect()
    }

    /// `edge` repeated once per cell, with `midway` in the center cell.
    fn repeat_with_midway(&self, edge: &str, midway: &str) -> String {
        (0..self.scale)
            .map(|i| if i == self.midway() { midway } else { edge })
            .collect()
    }
}

fn faces_road(tile: Option<&RotatedTile>, side: Side) -> bool {
    tile.is_some_and(|tile| tile.side(side) == TileSide::Road)
}

/// Maps a cell index to `-0.5..0.5`, the center of the tile being 0.
fn cell_center(idx: usize, scale: usize) -> f64 {
    (idx as f64 + 0.5) / scale as f64 - 0.5
}

/// The distance from `(y, x)` to the closest of the points just outside the
/// middle of each side. Infinite for an empty set.
fn min_distance(sides: SideSet, y: f64, x: f64) -> f64 {
    sides
        .into_iter()
        .map(|side| {
            let (d_row, d_col) = side.offset();
            (x - f64::from(d_col)).hypot(y - f64::from(d_row))
        })
        .fold(f64::INFINITY, f64::min)
}

fn set(canvas: &mut Canvas, row: usize, col: usize, glyph: &'static str) {
    if let Some(cell) = canvas.get_mut(row).and_then(|cells| cells.get_mut(col)) {
        *cell = glyph;
    }
}
