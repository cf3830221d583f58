/// Mapping between a logical surface (the 800×600 playfield, an editor
/// canvas) and the block of terminal cells it is drawn into.

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Top-left cell of the drawing area.
    pub col: u16,
    pub row: u16,
    /// Size of the drawing area in cells.
    pub cols: u16,
    pub rows: u16,
    /// Size of the logical surface.
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(col: u16, row: u16, cols: u16, rows: u16, width: f32, height: f32) -> Self {
        Self {
            col,
            row,
            cols: cols.max(1),
            rows: rows.max(1),
            width,
            height,
        }
    }

    fn cell_w(&self) -> f32 {
        self.width / self.cols as f32
    }

    fn cell_h(&self) -> f32 {
        self.height / self.rows as f32
    }

    /// Cell holding a logical point, clamped into the area.
    pub fn to_cell(&self, x: f32, y: f32) -> (u16, u16) {
        let c = (x / self.cell_w()).floor().clamp(0.0, (self.cols - 1) as f32) as u16;
        let r = (y / self.cell_h()).floor().clamp(0.0, (self.rows - 1) as f32) as u16;
        (self.col + c, self.row + r)
    }

    /// Number of cells a logical length spans horizontally (at least one).
    pub fn span_cols(&self, w: f32) -> u16 {
        ((w / self.cell_w()).round() as u16).max(1)
    }

    pub fn span_rows(&self, h: f32) -> u16 {
        ((h / self.cell_h()).round() as u16).max(1)
    }

    pub fn contains_cell(&self, col: u16, row: u16) -> bool {
        col >= self.col && col < self.col + self.cols && row >= self.row && row < self.row + self.rows
    }

    /// Logical point at the centre of a terminal cell, or `None` outside.
    pub fn to_logical(&self, col: u16, row: u16) -> Option<(f32, f32)> {
        if !self.contains_cell(col, row) {
            return None;
        }
        Some(self.to_logical_clamped(col, row))
    }

    /// Like `to_logical`, but cells outside the area snap to its edge.
    /// Used for drags that leave the canvas.
    pub fn to_logical_clamped(&self, col: u16, row: u16) -> (f32, f32) {
        let c = col.saturating_sub(self.col).min(self.cols - 1);
        let r = row.saturating_sub(self.row).min(self.rows - 1);
        (
            (c as f32 + 0.5) * self.cell_w(),
            (r as f32 + 0.5) * self.cell_h(),
        )
    }

    /// Logical point for the upper (`half == 0`) or lower half of a cell,
    /// for half-block rendering.
    pub fn half_cell_logical(&self, c: u16, r: u16, half: u16) -> (f32, f32) {
        let sub_h = self.cell_h() / 2.0;
        (
            (c as f32 + 0.5) * self.cell_w(),
            r as f32 * self.cell_h() + (half as f32 + 0.5) * sub_h,
        )
    }
}
