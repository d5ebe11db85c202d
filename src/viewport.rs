use std::ops::Range;

/// Window of the board that is actually drawn: offset `(x0, y0)`, size `w` x `h`.
/// Always lies inside the board it was selected for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub x0: usize,
    pub y0: usize,
    pub w: usize,
    pub h: usize,
}

impl Viewport {
    /// The whole board, uncropped.
    pub fn full(grid_w: usize, grid_h: usize) -> Self {
        Self {
            x0: 0,
            y0: 0,
            w: grid_w,
            h: grid_h,
        }
    }

    #[inline]
    pub fn cols(&self) -> Range<usize> {
        self.x0..self.x0 + self.w
    }

    #[inline]
    pub fn rows(&self) -> Range<usize> {
        self.y0..self.y0 + self.h
    }
}

/// Center `requested` inside `size` along one axis. Returns `(offset, len)`.
#[inline]
fn center_axis(size: usize, requested: usize) -> (usize, usize) {
    if requested >= size {
        (0, size)
    } else {
        ((size - requested) / 2, requested)
    }
}

/// Pick the centered window of a `grid_w` x `grid_h` board that fits a
/// `term_w` x `term_h` display. Axes larger than the display are cropped
/// symmetrically (floor on the leading side); smaller ones are shown whole.
pub fn select(grid_w: usize, grid_h: usize, term_w: usize, term_h: usize) -> Viewport {
    let (x0, w) = center_axis(grid_w, term_w);
    let (y0, h) = center_axis(grid_h, term_h);
    Viewport { x0, y0, w, h }
}
