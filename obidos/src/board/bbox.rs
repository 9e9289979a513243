/// A 2D area represented by a min + max coordinate pair.
///
/// The two coordinates form an _inclusive_ 2D range, i.e. unlike in a
/// half-open range, it's possible for a point with `row == row_max`
/// to be contained in the area.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub row_min: i32,
    pub col_min: i32,
    pub row_max: i32,
    pub col_max: i32,
}

impl BoundingBox {
    pub fn contains(&self, row: i32, col: i32) -> bool {
        row >= self.row_min && col >= self.col_min && row <= self.row_max && col <= self.col_max
    }

    pub fn singleton(row: i32, col: i32) -> Self {
        Self {
            row_min: row,
            col_min: col,
            row_max: row,
            col_max: col,
        }
    }

    /// Expands the bounding box to cover point `(row, col)`.
    pub fn update(&mut self, row: i32, col: i32) {
        self.row_min = self.row_min.min(row);
        self.row_max = self.row_max.max(row);
        self.col_min = self.col_min.min(col);
        self.col_max = self.col_max.max(col);
    }

    pub fn height(&self) -> usize {
        (self.row_max - self.row_min + 1) as usize
    }

    pub fn width(&self) -> usize {
        (self.col_max - self.col_min + 1) as usize
    }
}
