use std::{fmt, io::Write};

use crossterm::{
    cursor, queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};
use unicode_truncate::UnicodeTruncateStr;

use crate::maze::{Grid, RandomSource, Step};

const PURPLE: Color = Color::Rgb {
    r: 124,
    g: 57,
    b: 212,
};
const RED: Color = Color::Rgb {
    r: 212,
    g: 57,
    b: 57,
};

/// What occupies one position of the glyph lattice.
///
/// A `cols x rows` maze is drawn on a `(2 * cols + 1) x (2 * rows + 1)` lattice:
/// cell interiors sit at odd/odd positions, the walls between them at odd/even
/// positions and wall corners at even/even positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Wall,
    Unvisited,
    Visited,
    /// The cell the carver touched this tick
    Frontier,
    /// A removed wall between two cells
    Passage,
}

impl Glyph {
    /// The width of each glyph when rendered, in character widths.
    pub const WIDTH: u16 = 2;
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let styled_symbol = match self {
            Glyph::Wall => "██".with(Color::White),
            Glyph::Unvisited => "  ".on(Color::Black),
            Glyph::Visited | Glyph::Passage => "  ".on(PURPLE),
            Glyph::Frontier => "  ".on(RED),
        };

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                styled_symbol.content().width(),
                Glyph::WIDTH as usize,
                "Each glyph must occupy exactly two character widths."
            );
        }

        write!(f, "{}", styled_symbol)
    }
}

/// Size of the glyph lattice for a grid, as `(width, height)` in glyphs.
pub fn lattice_size<R: RandomSource>(grid: &Grid<R>) -> (u16, u16) {
    (grid.cols() * 2 + 1, grid.rows() * 2 + 1)
}

/// Glyph at lattice position `(x, y)`. `frontier` is the cell to highlight, if any.
pub fn glyph_at<R: RandomSource>(
    grid: &Grid<R>,
    x: u16,
    y: u16,
    frontier: Option<(u16, u16)>,
) -> Glyph {
    let (col, row) = (x / 2, y / 2);
    match (x % 2, y % 2) {
        (1, 1) => match grid.cell((col, row)) {
            Some(_) if frontier == Some((col, row)) => Glyph::Frontier,
            Some(cell) if cell.is_visited() => Glyph::Visited,
            Some(_) => Glyph::Unvisited,
            None => Glyph::Wall,
        },
        // Wall to the left of (col, row)
        (0, 1) if col > 0 => wall_or_passage(grid.has_wall_between((col - 1, row), (col, row))),
        // Wall above (col, row)
        (1, 0) if row > 0 => wall_or_passage(grid.has_wall_between((col, row - 1), (col, row))),
        // Corners and the outer border
        _ => Glyph::Wall,
    }
}

fn wall_or_passage(wall: Option<bool>) -> Glyph {
    match wall {
        Some(false) => Glyph::Passage,
        _ => Glyph::Wall,
    }
}

/// Lattice position of a cell's interior.
fn cell_position(coord: (u16, u16)) -> (u16, u16) {
    (coord.0 * 2 + 1, coord.1 * 2 + 1)
}

/// Draws the grid to a terminal, either in full or only where a step changed it.
pub struct Renderer<W: Write> {
    out: W,
    /// Terminal dimensions (columns, rows)
    term_size: (u16, u16),
    /// Cell highlighted by the last drawn step
    frontier: Option<(u16, u16)>,
}

impl<W: Write> Renderer<W> {
    /// Number of terminal rows below the maze reserved for the status line.
    pub const NUM_STATUS_ROWS: u16 = 1;

    pub fn new(out: W, term_size: (u16, u16)) -> Self {
        Self {
            out,
            term_size,
            frontier: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn frontier(&self) -> Option<(u16, u16)> {
        self.frontier
    }

    /// Forget the highlighted cell. Call this when the maze is replaced.
    pub fn clear_frontier(&mut self) {
        self.frontier = None;
    }

    pub fn resize(&mut self, term_width: u16, term_height: u16) {
        tracing::debug!("[render] terminal resized to {}x{}", term_width, term_height);
        self.term_size = (term_width, term_height);
    }

    /// Terminal size needed to show the grid and the status line.
    pub fn required_size<R: RandomSource>(grid: &Grid<R>) -> (u16, u16) {
        let (width, height) = lattice_size(grid);
        (
            width.saturating_mul(Glyph::WIDTH),
            height.saturating_add(Self::NUM_STATUS_ROWS),
        )
    }

    pub fn fits<R: RandomSource>(&self, grid: &Grid<R>) -> bool {
        let (width, height) = Self::required_size(grid);
        self.term_size.0 >= width && self.term_size.1 >= height
    }

    /// Clear the screen and draw every glyph, or a resize message if the
    /// terminal is too small.
    pub fn draw_full<R: RandomSource>(
        &mut self,
        grid: &Grid<R>,
        status: &str,
    ) -> std::io::Result<()> {
        queue!(self.out, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;

        if !self.fits(grid) {
            let (width, height) = Self::required_size(grid);
            let msg = format!(
                "Terminal size is too small ({}x{}) for a {}x{} maze, which needs {}x{}. Please resize the terminal.\r\n",
                self.term_size.0,
                self.term_size.1,
                grid.cols(),
                grid.rows(),
                width,
                height
            );
            queue!(
                self.out,
                style::PrintStyledContent(msg.with(Color::Yellow).attribute(Attribute::Bold)),
                style::PrintStyledContent(
                    "Press Esc to exit...\r\n"
                        .with(Color::Blue)
                        .attribute(Attribute::Bold)
                )
            )?;
            return self.out.flush();
        }

        let (width, height) = lattice_size(grid);
        for y in 0..height {
            queue!(self.out, cursor::MoveTo(0, y))?;
            for x in 0..width {
                queue!(self.out, style::Print(glyph_at(grid, x, y, self.frontier)))?;
            }
        }
        self.draw_status(grid, status)
    }

    /// Redraw only the cells touched by `step` and the previously highlighted cell.
    pub fn draw_step<R: RandomSource>(
        &mut self,
        grid: &Grid<R>,
        step: Step,
        status: &str,
    ) -> std::io::Result<()> {
        let previous = self.frontier;
        self.frontier = if grid.is_finished() {
            None
        } else {
            step.frontier()
        };

        if !self.fits(grid) {
            return Ok(());
        }

        let mut positions = Vec::with_capacity(4);
        if let Some(coord) = previous {
            positions.push(cell_position(coord));
        }
        match step {
            Step::Carved { from, to } => {
                let (a, b) = (cell_position(from), cell_position(to));
                positions.extend([a, b, ((a.0 + b.0) / 2, (a.1 + b.1) / 2)]);
            }
            Step::Backtracked { from } => positions.push(cell_position(from)),
            Step::Idle => {}
        }

        for (x, y) in positions {
            queue!(
                self.out,
                cursor::MoveTo(x * Glyph::WIDTH, y),
                style::Print(glyph_at(grid, x, y, self.frontier))
            )?;
        }
        self.draw_status(grid, status)
    }

    fn draw_status<R: RandomSource>(
        &mut self,
        grid: &Grid<R>,
        status: &str,
    ) -> std::io::Result<()> {
        let (_, height) = lattice_size(grid);
        let (status, _) = status.unicode_truncate(self.term_size.0 as usize);
        queue!(
            self.out,
            cursor::MoveTo(0, height),
            terminal::Clear(ClearType::CurrentLine),
            style::PrintStyledContent(status.with(Color::Cyan).attribute(Attribute::Bold)),
        )?;
        self.out.flush()
    }
}
