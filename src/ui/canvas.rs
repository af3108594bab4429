/// Plane → terminal cell geometry.
///
/// Pure math, no terminal I/O, so it can be unit tested.
///
/// ## Aspect
///
/// Terminal cells are roughly twice as tall as they are wide, so one
/// plane unit spans twice as many columns as rows. The viewport is kept
/// odd-sized in both directions so the origin falls on an exact cell:
///
///   rows = 2k + 1,  cols = 2 * rows - 1
///
/// ## Coordinates
///
/// Cell coordinates are signed (`i32`) while rasterizing so that lines can
/// leave the canvas and be clipped per cell by `Viewport::contains`.

use glam::DVec2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Screen column of the canvas' left edge
    pub left: usize,
    /// Screen row of the canvas' top edge
    pub top: usize,
    pub cols: usize,
    pub rows: usize,
    /// Plane half-width shown: [-extent, extent] on both axes
    pub extent: f64,
}

impl Viewport {
    /// Largest square-looking canvas that fits in `avail_cols × avail_rows`.
    /// Returns None when not even a 3×5 canvas fits.
    pub fn fit(left: usize, top: usize, avail_cols: usize, avail_rows: usize, extent: f64) -> Option<Self> {
        let mut rows = avail_rows.min((avail_cols + 1) / 2);
        if rows % 2 == 0 {
            rows = rows.saturating_sub(1);
        }
        if rows < 3 {
            return None;
        }
        Some(Viewport { left, top, cols: 2 * rows - 1, rows, extent })
    }

    /// Map a plane point to a (signed) screen cell.
    pub fn to_cell(&self, p: DVec2) -> (i32, i32) {
        let span = 2.0 * self.extent;
        let fx = (p.x + self.extent) / span * (self.cols - 1) as f64;
        let fy = (self.extent - p.y) / span * (self.rows - 1) as f64;
        (
            self.left as i32 + fx.round().clamp(-1e6, 1e6) as i32,
            self.top as i32 + fy.round().clamp(-1e6, 1e6) as i32,
        )
    }

    /// Screen cell of the plane origin.
    pub fn origin(&self) -> (i32, i32) {
        self.to_cell(DVec2::ZERO)
    }

    pub fn contains(&self, (x, y): (i32, i32)) -> bool {
        x >= self.left as i32
            && y >= self.top as i32
            && x < (self.left + self.cols) as i32
            && y < (self.top + self.rows) as i32
    }

    /// Cells of tick mark `unit` on the x axis and on the y axis.
    pub fn axis_ticks(&self, unit: i32) -> ((i32, i32), (i32, i32)) {
        let u = unit as f64;
        (self.to_cell(DVec2::new(u, 0.0)), self.to_cell(DVec2::new(0.0, u)))
    }
}

/// Cells on the segment from `a` to `b`, both ends included (Bresenham).
pub fn line_cells(a: (i32, i32), b: (i32, i32)) -> Vec<(i32, i32)> {
    let (mut x, mut y) = a;
    let dx = (b.0 - a.0).abs();
    let dy = -(b.1 - a.1).abs();
    let sx = if a.0 < b.0 { 1 } else { -1 };
    let sy = if a.1 < b.1 { 1 } else { -1 };
    let mut err = dx + dy;
    let mut cells = Vec::with_capacity((dx - dy + 1) as usize);

    loop {
        cells.push((x, y));
        if (x, y) == b {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
    cells
}

/// Screen-space angle (radians, counter-clockwise, 0 = right) of the
/// segment a→b, correcting for tall cells.
fn screen_angle(a: (i32, i32), b: (i32, i32)) -> f64 {
    let dx = (b.0 - a.0) as f64;
    let dy = -((b.1 - a.1) as f64) * 2.0;
    dy.atan2(dx)
}

/// Stroke character for a segment: ─ ╱ │ ╲
pub fn stroke_glyph(a: (i32, i32), b: (i32, i32)) -> char {
    if a == b {
        return '•';
    }
    let deg = screen_angle(a, b).to_degrees().rem_euclid(180.0);
    match deg {
        d if d < 22.5 || d >= 157.5 => '─',
        d if d < 67.5 => '╱',
        d if d < 112.5 => '│',
        _ => '╲',
    }
}

/// Arrowhead character pointing along a→b.
pub fn head_glyph(a: (i32, i32), b: (i32, i32)) -> char {
    if a == b {
        return '•';
    }
    const HEADS: [char; 8] = ['→', '↗', '↑', '↖', '←', '↙', '↓', '↘'];
    let deg = screen_angle(a, b).to_degrees().rem_euclid(360.0);
    let sector = ((deg + 22.5) / 45.0).floor() as usize % 8;
    HEADS[sector]
}

/// A horizontal slider gauge: `width` cells starting at (x, y).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Gauge {
    pub x: usize,
    pub y: usize,
    pub width: usize,
}

impl Gauge {
    /// Column of the knob for a value at `fraction` (0..=1) of the range.
    pub fn knob_col(&self, fraction: f64) -> usize {
        if self.width <= 1 {
            return self.x;
        }
        self.x + (fraction.clamp(0.0, 1.0) * (self.width - 1) as f64).round() as usize
    }

    /// Fraction of the range under a screen cell, if the cell is on the gauge.
    pub fn fraction_at(&self, col: usize, row: usize) -> Option<f64> {
        if row != self.y || col < self.x || col >= self.x + self.width {
            return None;
        }
        if self.width <= 1 {
            return Some(0.0);
        }
        Some((col - self.x) as f64 / (self.width - 1) as f64)
    }
}
