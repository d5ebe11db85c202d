use std::fmt::{self, Write as _};
use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor, Stylize};
use crossterm::terminal::{Clear, ClearType};

use crate::grid::Board;
use crate::viewport::{self, Viewport};

/// Used when stdout is not attached to a terminal.
const FALLBACK_TERM_SIZE: (u16, u16) = (80, 24);

/// Number of fields in the status bar.
const STATUS_FIELDS: usize = 5;

/// Write the glyphs of every row inside `view`, each followed by `row_end`.
/// Both the terminal and the snapshot output go through here, so the cell text
/// is identical between them.
pub fn write_rows<W: fmt::Write>(board: &Board, view: Viewport, row_end: &str, out: &mut W) -> fmt::Result {
    for y in view.rows() {
        let row = &board.row(y)[view.cols()];
        for cell in row {
            out.write_char(cell.glyph())?;
        }
        out.write_str(row_end)?;
    }
    Ok(())
}

/// Rows inside `view`, joined by newlines.
pub fn frame_text(board: &Board, view: Viewport) -> String {
    let mut s = String::with_capacity((view.w * 3 + 1) * view.h);
    // Writing into a String cannot fail.
    let _ = write_rows(board, view, "\n", &mut s);
    s.pop();
    s
}

/// Columns x rows available for the board. The last terminal row is kept for
/// the status bar.
pub fn display_size() -> (usize, usize) {
    let (cols, rows) = crossterm::terminal::size().unwrap_or(FALLBACK_TERM_SIZE);
    (cols as usize, (rows as usize).saturating_sub(1))
}

/// `-i-` prefix used for the startup and exit messages.
pub fn info_tag() -> String {
    format!("{}", "-i-".bold().green())
}

/// Timings shown under each frame, in seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatusBar {
    pub generation: u64,
    pub step: f64,
    pub render: f64,
    pub frame: f64,
}

impl StatusBar {
    pub fn fps(&self) -> f64 {
        1.0 / self.frame
    }

    /// Plain text of the bar, each field centered in `term_w / 5` columns.
    pub fn text(&self, term_w: usize) -> String {
        let col = term_w / STATUS_FIELDS;
        let fields = [
            format!("generation [{:6}]", self.generation),
            format!("gen time [{:.03}]", self.step),
            format!("print time [{:.03}]", self.render),
            format!("frame time [{:.03}]", self.frame),
            format!("fps [{:.03}]", self.fps()),
        ];
        let mut s = String::new();
        for f in &fields {
            let _ = write!(s, "{f:^col$}");
        }
        s
    }
}

/// Draws the centered viewport of each generation to a terminal.
pub struct TerminalSink<W: Write> {
    out: W,
    size: Option<(usize, usize)>,
}

impl<W: Write> TerminalSink<W> {
    /// Follow the size of the attached terminal, re-read on every frame.
    pub fn new(out: W) -> Self {
        Self { out, size: None }
    }

    /// Pin the display size instead of querying the terminal.
    pub fn with_size(out: W, cols: usize, rows: usize) -> Self {
        Self {
            out,
            size: Some((cols, rows)),
        }
    }

    pub fn size(&self) -> (usize, usize) {
        self.size.unwrap_or_else(display_size)
    }

    /// Clear the screen and draw the part of `board` that fits the display.
    pub fn draw_board(&mut self, board: &Board) -> io::Result<Viewport> {
        let (tw, th) = self.size();
        let view = viewport::select(board.width(), board.height(), tw, th);
        queue!(
            self.out,
            Clear(ClearType::All),
            MoveTo(0, 0),
            Print(frame_text(board, view)),
            Print("\n")
        )?;
        Ok(view)
    }

    pub fn draw_status(&mut self, status: &StatusBar) -> io::Result<()> {
        let (tw, _) = self.size();
        queue!(
            self.out,
            SetAttribute(Attribute::Bold),
            SetForegroundColor(Color::Green),
            Print(status.text(tw)),
            SetAttribute(Attribute::Reset),
            ResetColor
        )?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::life::tests::board;

    #[test]
    fn test_frame_text_uncropped() {
        let b = board(&["o..", ".o."]);
        assert_eq!(frame_text(&b, Viewport::full(3, 2)), "█  \n █ ");
    }

    #[test]
    fn test_frame_text_cropped_to_center() {
        let b = board(&[
            ".....",
            ".ooo.",
            ".o.o.",
            ".ooo.",
            ".....",
        ]);
        let view = viewport::select(5, 5, 3, 3);
        assert_eq!(frame_text(&b, view), "███\n█ █\n███");
    }

    #[test]
    fn test_row_terminator() {
        let b = board(&["o.", ".o"]);
        let mut s = String::new();
        write_rows(&b, Viewport::full(2, 2), "e\n", &mut s).unwrap();
        assert_eq!(s, "█ e\n █e\n");
    }

    #[test]
    fn test_empty_view_renders_nothing() {
        let b = board(&["oo", "oo"]);
        assert_eq!(frame_text(&b, viewport::select(2, 2, 0, 0)), "");
    }

    #[test]
    fn test_sink_crops_to_pinned_size() {
        let b = board(&["o...o", ".....", "..o..", ".....", "o...o"]);
        let mut sink = TerminalSink::with_size(Vec::new(), 1, 1);
        let view = sink.draw_board(&b).unwrap();
        assert_eq!(view, Viewport { x0: 2, y0: 2, w: 1, h: 1 });
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert!(out.ends_with("█\n"));
        assert!(!out.contains(" █"));
    }

    #[test]
    fn test_status_bar_fields() {
        let bar = StatusBar {
            generation: 12,
            step: 0.0125,
            render: 0.002,
            frame: 0.5,
        };
        let text = bar.text(100);
        assert_eq!(text.chars().count(), 100);
        assert!(text.contains("generation [    12]"));
        assert!(text.contains("gen time [0.013]") || text.contains("gen time [0.012]"));
        assert!(text.contains("fps [2.000]"));
    }

    #[test]
    fn test_status_bar_is_styled() {
        let bar = StatusBar {
            generation: 1,
            step: 0.0,
            render: 0.0,
            frame: 1.0,
        };
        let mut sink = TerminalSink::with_size(Vec::new(), 50, 10);
        sink.draw_status(&bar).unwrap();
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert!(out.starts_with("\u{1b}["));
        assert!(out.contains("fps [1.000]"));
    }
}
