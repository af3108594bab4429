/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// Screen layout:
///
///   row 0      title bar (level / score)
///   row 2..    canvas (left)          readout panel (right)
///   last row   key help
///
/// The canvas draws, back to front: grid and axes, basis vectors, scaled
/// components, the parallelogram, the player vector, the target vector,
/// then the success banner and hint box on top.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use glam::DVec2;

use crate::domain::combination::{Coefficients, Slot};
use crate::sim::session::Session;
use super::canvas::{self, Gauge, Viewport};
use super::hud::{HintDisplay, Hud};

// ── Palette ──

const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };
const COLOR_PLAYER: Color = Color::Rgb { r: 255, g: 107, b: 107 };
const COLOR_TARGET: Color = Color::Rgb { r: 78, g: 205, b: 196 };
const COLOR_BASIS: [Color; 2] = [
    Color::Rgb { r: 255, g: 246, b: 109 },
    Color::Rgb { r: 255, g: 140, b: 66 },
];
const COLOR_COMBINATION: Color = Color::Rgb { r: 168, g: 230, b: 207 };
// #E8E8E8 at ~30% over the background
const COLOR_GRID: Color = Color::Rgb { r: 85, g: 85, b: 94 };
const COLOR_AXIS: Color = Color::Rgb { r: 150, g: 150, b: 160 };
const COLOR_TEXT: Color = Color::Rgb { r: 220, g: 220, b: 230 };
const COLOR_DIM: Color = Color::Rgb { r: 120, g: 120, b: 140 };

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: BASE_BG };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Set a glyph at a signed position, keeping the existing background.
    fn plot(&mut self, (x, y): (i32, i32), ch: char, fg: Color) {
        if x < 0 || y < 0 {
            return;
        }
        let bg = self.get(x as usize, y as usize).bg;
        self.set(x as usize, y as usize, Cell { ch, fg, bg });
    }

    /// Write a string at (x, y) with given colors. Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (cx, ch) in (x..).zip(s.chars()) {
            if cx >= self.width { break; }
            self.set(cx, y, Cell { ch, fg, bg });
        }
    }
}

// ── Layout ──

const HUD_ROW: usize = 0;
const CANVAS_ROW: usize = 2;
const CANVAS_LEFT: usize = 1;
const PANEL_W: usize = 36;
const PANEL_GAP: usize = 3;
const GAUGE_W: usize = 25;
/// Panel rows besides the level description: Level, Score, three blanks,
/// the combination heading and formula, Player, Target, Distance.
const PANEL_FIXED_LINES: usize = 10;

/// Where things landed in the last frame; used for mouse hit-testing.
#[derive(Clone, Copy, Debug)]
struct Layout {
    view: Viewport,
    panel: bool,
    gauges: Option<[Gauge; 2]>,
}

/// Row of the a1 gauge (a2 sits just below), one blank row under the
/// panel text. `None` when the pair would reach the help line.
fn gauge_row(panel_lines: usize, term_h: usize) -> Option<usize> {
    let y = CANVAS_ROW + panel_lines + 1;
    (y + 1 < term_h.saturating_sub(1)).then_some(y)
}

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    extent: f64,
    layout: Option<Layout>,
    last_level: Option<u32>,
}

impl Renderer {
    pub fn new(extent: f64) -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            extent,
            layout: None,
            last_level: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            SetBackgroundColor(BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Which slider (and where along it) is under a screen cell.
    pub fn gauge_hit(&self, col: u16, row: u16) -> Option<(Slot, f64)> {
        let gauges = self.layout?.gauges?;
        [Slot::First, Slot::Second]
            .into_iter()
            .zip(gauges)
            .find_map(|(slot, g)| g.fraction_at(col as usize, row as usize).map(|f| (slot, f)))
    }

    pub fn render(&mut self, session: &Session, hud: &Hud) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.invalidate()?;
        }

        // New level → clear for clean transition
        if self.last_level != Some(session.level()) {
            self.invalidate()?;
            self.last_level = Some(session.level());
        }

        self.front.clear();
        self.layout = self.compute_layout(PANEL_FIXED_LINES + session.description().lines().count());

        self.compose_title(session);
        match self.layout {
            Some(layout) => {
                self.compose_canvas(&layout.view, session);
                self.compose_overlays(&layout.view, hud);
                if layout.panel {
                    self.compose_panel(&layout.view, layout.gauges.as_ref(), session);
                }
            }
            None => {
                self.front.put_str(CANVAS_LEFT, CANVAS_ROW, "Terminal too small", COLOR_TEXT, BASE_BG);
            }
        }
        self.compose_help();

        // Diff and emit
        self.flush_diff()?;

        // Swap: current front becomes next back
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    fn invalidate(&mut self) -> io::Result<()> {
        self.back.cells.fill(Cell::INVALID);
        queue!(self.writer, SetBackgroundColor(BASE_BG), Clear(ClearType::All))
    }

    fn compute_layout(&self, panel_lines: usize) -> Option<Layout> {
        let avail_rows = self.term_h.saturating_sub(CANVAS_ROW + 2);
        let with_panel = self.term_w > PANEL_W + PANEL_GAP + CANVAS_LEFT + 10;
        let avail_cols = if with_panel {
            self.term_w - PANEL_W - PANEL_GAP - CANVAS_LEFT
        } else {
            self.term_w.saturating_sub(CANVAS_LEFT)
        };
        let view = Viewport::fit(CANVAS_LEFT, CANVAS_ROW, avail_cols, avail_rows, self.extent)?;

        let gauges = if with_panel { gauge_row(panel_lines, self.term_h) } else { None }.map(|y| {
            let x = view.left + view.cols + PANEL_GAP + 4;
            [Gauge { x, y, width: GAUGE_W }, Gauge { x, y: y + 1, width: GAUGE_W }]
        });
        Some(Layout { view, panel: with_panel, gauges })
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Set explicit base colors at start of frame.
        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                // Position cursor if needed
                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }

                // Set colors only if changed
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.ch))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Title / help ──

    fn compose_title(&mut self, s: &Session) {
        self.front.put_str(1, HUD_ROW, "VECTOR SPACE ADVENTURE", COLOR_TARGET, BASE_BG);
        let status = format!("Level {}   Score {}", s.level(), s.score());
        let x = self.term_w.saturating_sub(status.chars().count() + 1);
        self.front.put_str(x, HUD_ROW, &status, COLOR_TEXT, BASE_BG);
    }

    fn compose_help(&mut self) {
        if self.term_h == 0 { return; }
        let help = "←/→ a1  ↓/↑ a2  Shift ×10  [N]ext  [R]eset  [H]int  [Q]uit";
        self.front.put_str(1, self.term_h - 1, help, COLOR_DIM, BASE_BG);
    }

    // ── Canvas ──

    fn compose_canvas(&mut self, view: &Viewport, s: &Session) {
        self.compose_grid(view);

        let basis = s.basis();
        let coefs = s.coefficients();
        let origin = view.origin();

        // Basis vectors
        for (i, slot) in [Slot::First, Slot::Second].into_iter().enumerate() {
            let v = basis.vector(slot);
            self.draw_arrow(view, origin, view.to_cell(v), COLOR_BASIS[i], Stroke::Solid);
            self.draw_label(view, v * 1.1, if i == 0 { "v1" } else { "v2" }, COLOR_BASIS[i]);
        }

        // Scaled components and the parallelogram they span
        let (s1, s2) = basis.components(coefs);
        let player = s.player();
        let show1 = coefs.a1.abs() > 0.1;
        let show2 = coefs.a2.abs() > 0.1;
        if show1 {
            self.draw_arrow(view, origin, view.to_cell(s1), COLOR_BASIS[0], Stroke::Dashed);
        }
        if show2 {
            self.draw_arrow(view, origin, view.to_cell(s2), COLOR_BASIS[1], Stroke::Dashed);
        }
        if show1 && show2 {
            let tip = view.to_cell(player);
            self.draw_segment(view, view.to_cell(s1), tip, '·', COLOR_COMBINATION);
            self.draw_segment(view, view.to_cell(s2), tip, '·', COLOR_COMBINATION);
        }

        // Player, then target on top
        self.draw_arrow(view, origin, view.to_cell(player), COLOR_PLAYER, Stroke::Solid);
        self.draw_arrow(view, origin, view.to_cell(s.target()), COLOR_TARGET, Stroke::Solid);
        self.draw_label(view, player * 1.1, "Player", COLOR_PLAYER);
        self.draw_label(view, s.target() * 1.1, "Target", COLOR_TARGET);
    }

    fn compose_grid(&mut self, view: &Viewport) {
        let origin = view.origin();
        let ext = view.extent.floor() as i32;

        // Integer lattice points
        for gx in -ext..=ext {
            for gy in -ext..=ext {
                let c = view.to_cell(DVec2::new(gx as f64, gy as f64));
                if view.contains(c) {
                    self.front.plot(c, '·', COLOR_GRID);
                }
            }
        }

        // Axes
        let left = (view.left as i32, origin.1);
        let right = ((view.left + view.cols - 1) as i32, origin.1);
        let top = (origin.0, view.top as i32);
        let bottom = (origin.0, (view.top + view.rows - 1) as i32);
        self.draw_segment(view, left, right, '─', COLOR_AXIS);
        self.draw_segment(view, top, bottom, '│', COLOR_AXIS);
        for unit in (-ext..=ext).filter(|u| *u != 0) {
            let (on_x, on_y) = view.axis_ticks(unit);
            if view.contains(on_x) { self.front.plot(on_x, '┼', COLOR_AXIS); }
            if view.contains(on_y) { self.front.plot(on_y, '┼', COLOR_AXIS); }
        }
        self.front.plot(origin, '┼', COLOR_AXIS);
    }

    fn draw_segment(&mut self, view: &Viewport, a: (i32, i32), b: (i32, i32), ch: char, fg: Color) {
        let dotted = ch == '·';
        for (i, c) in canvas::line_cells(a, b).into_iter().enumerate() {
            if dotted && i % 2 == 1 { continue; }
            if view.contains(c) {
                self.front.plot(c, ch, fg);
            }
        }
    }

    fn draw_arrow(&mut self, view: &Viewport, from: (i32, i32), to: (i32, i32), fg: Color, stroke: Stroke) {
        let cells = canvas::line_cells(from, to);
        let body = canvas::stroke_glyph(from, to);
        let last = cells.len() - 1;
        for (i, c) in cells.into_iter().enumerate() {
            if !view.contains(c) { continue; }
            if i == last {
                self.front.plot(c, canvas::head_glyph(from, to), fg);
            } else if i > 0 && !(stroke == Stroke::Dashed && i % 2 == 1) {
                self.front.plot(c, body, fg);
            }
        }
    }

    fn draw_label(&mut self, view: &Viewport, at: DVec2, text: &str, fg: Color) {
        let c = view.to_cell(at);
        if !view.contains(c) { return; }
        let room = view.left + view.cols - c.0 as usize;
        let text: String = text.chars().take(room).collect();
        let (x, y) = (c.0 as usize, c.1 as usize);
        let bg = self.front.get(x, y).bg;
        self.front.put_str(x, y, &text, fg, bg);
    }

    // ── Overlays ──

    fn compose_overlays(&mut self, view: &Viewport, hud: &Hud) {
        if let Some(text) = hud.banner() {
            let row = view.to_cell(DVec2::new(0.0, 5.0)).1;
            self.draw_boxed(view, row, &text, Color::Rgb { r: 20, g: 120, b: 40 }, Color::Rgb { r: 170, g: 235, b: 170 });
        }
        if let Some(hint) = hud.hint() {
            let bg = match hint {
                HintDisplay::Solution(_) => Color::Rgb { r: 255, g: 235, b: 80 },
                HintDisplay::NotRepresentable => Color::Rgb { r: 255, g: 170, b: 60 },
            };
            let row = view.to_cell(DVec2::new(0.0, -5.0)).1;
            self.draw_boxed(view, row, &hint.text(), Color::Black, bg);
        }
    }

    /// Centered text on a solid background strip.
    fn draw_boxed(&mut self, view: &Viewport, row: i32, text: &str, fg: Color, bg: Color) {
        if row < view.top as i32 || row >= (view.top + view.rows) as i32 { return; }
        let padded = format!(" {} ", text);
        let w = padded.chars().count().min(view.cols);
        let x = view.left + (view.cols - w) / 2;
        let clipped: String = padded.chars().take(w).collect();
        self.front.put_str(x, row as usize, &clipped, fg, bg);
    }

    // ── Readout panel ──

    fn compose_panel(&mut self, view: &Viewport, gauges: Option<&[Gauge; 2]>, s: &Session) {
        let x = view.left + view.cols + PANEL_GAP;
        let mut y = CANVAS_ROW;
        let coefs = s.coefficients();
        let player = s.player();

        let mut line = |fb: &mut FrameBuffer, text: &str, fg: Color| {
            fb.put_str(x, y, text, fg, BASE_BG);
            y += 1;
        };

        line(&mut self.front, &format!("Level: {}", s.level()), COLOR_TEXT);
        line(&mut self.front, &format!("Score: {}", s.score()), COLOR_TEXT);
        line(&mut self.front, "", COLOR_TEXT);
        for desc in s.description().lines() {
            line(&mut self.front, desc, COLOR_COMBINATION);
        }
        line(&mut self.front, "", COLOR_TEXT);
        line(&mut self.front, "Linear Combination:", COLOR_TEXT);
        line(&mut self.front, &combination_text(coefs), COLOR_TEXT);
        line(&mut self.front, "", COLOR_TEXT);
        line(&mut self.front, &format!("Player: ({:.1}, {:.1})", player.x, player.y), COLOR_PLAYER);
        line(&mut self.front, &format!("Target: ({:.1}, {:.1})", s.target().x, s.target().y), COLOR_TARGET);
        line(&mut self.front, &format!("Distance: {:.2}", s.distance()), COLOR_TEXT);

        let Some(gauges) = gauges else { return };
        let range = s.range();
        for (i, slot) in [Slot::First, Slot::Second].into_iter().enumerate() {
            let g = gauges[i];
            let value = coefs.get(slot);
            let label = if i == 0 { "a1" } else { "a2" };
            self.front.put_str(x, g.y, label, COLOR_BASIS[i], BASE_BG);
            let zero = g.knob_col(range.fraction(0.0));
            for col in g.x..g.x + g.width {
                let ch = if col == zero { '┼' } else { '─' };
                self.front.set(col, g.y, Cell { ch, fg: COLOR_DIM, bg: BASE_BG });
            }
            self.front.set(g.knob_col(range.fraction(value)), g.y, Cell { ch: '●', fg: COLOR_BASIS[i], bg: BASE_BG });
            self.front.put_str(g.x + g.width + 1, g.y, &format!("{:+.1}", value), COLOR_TEXT, BASE_BG);
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Stroke {
    Solid,
    Dashed,
}

/// "a1 x v1 + a2 x v2" with one decimal.
fn combination_text(c: Coefficients) -> String {
    format!("{:.1} x v1 + {:.1} x v2", c.a1, c.a2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::event::SessionEvent;

    #[test]
    fn combination_text_one_decimal() {
        assert_eq!(combination_text(Coefficients::new(2.0, -0.26)), "2.0 x v1 + -0.3 x v2");
    }

    #[test]
    fn frame_buffer_clips_writes() {
        let mut fb = FrameBuffer::new(4, 2);
        fb.put_str(2, 0, "abc", Color::White, BASE_BG);
        assert_eq!(fb.get(2, 0).ch, 'a');
        assert_eq!(fb.get(3, 0).ch, 'b');
        fb.plot((-1, 0), 'x', Color::White);
        fb.plot((9, 9), 'x', Color::White);
        assert_eq!(fb.get(0, 0).ch, ' ');
    }

    #[test]
    fn gauges_sit_below_panel_text() {
        // two-line description: panel text ends on row 13
        assert_eq!(gauge_row(PANEL_FIXED_LINES + 2, 40), Some(15));
        assert_eq!(gauge_row(PANEL_FIXED_LINES + 3, 40), Some(16));
    }

    #[test]
    fn gauges_never_reach_help_line() {
        let lines = PANEL_FIXED_LINES + 2;
        assert_eq!(gauge_row(lines, 18), Some(15));
        assert_eq!(gauge_row(lines, 17), None);
        for term_h in 0..60 {
            if let Some(y) = gauge_row(lines, term_h) {
                assert!(y + 1 < term_h - 1, "a2 gauge on help row at height {term_h}");
            }
        }
    }

    fn row_text(fb: &FrameBuffer, y: usize) -> String {
        (0..fb.width).map(|x| fb.get(x, y).ch).collect()
    }

    #[test]
    fn overlays_stay_inside_canvas() {
        let mut hud = Hud::new(40);
        hud.absorb(&[SessionEvent::HintUnavailable]);

        // extent 3: the hint row (y = -5) falls below the canvas
        let mut r = Renderer::new(3.0);
        r.front.resize(40, 20);
        let view = Viewport::fit(1, 2, 40, 9, 3.0).unwrap();
        r.compose_overlays(&view, &hud);
        for y in 0..20 {
            assert!(!row_text(&r.front, y).contains("Hint"), "overlay drawn on row {y}");
        }

        let mut r = Renderer::new(6.0);
        r.front.resize(40, 20);
        let view = Viewport::fit(1, 2, 40, 9, 6.0).unwrap();
        r.compose_overlays(&view, &hud);
        let hits: Vec<usize> = (0..20).filter(|&y| row_text(&r.front, y).contains("Hint")).collect();
        assert_eq!(hits.len(), 1);
        assert!(hits[0] >= view.top && hits[0] < view.top + view.rows);
    }

    #[test]
    fn plot_keeps_background() {
        let mut fb = FrameBuffer::new(3, 1);
        fb.set(1, 0, Cell { ch: ' ', fg: Color::White, bg: Color::Yellow });
        fb.plot((1, 0), '→', Color::Red);
        let c = fb.get(1, 0);
        assert_eq!((c.ch, c.fg, c.bg), ('→', Color::Red, Color::Yellow));
    }
}
