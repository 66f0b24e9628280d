//! Text rendering of a staggered board
//!
//! Each cell is one glyph. Cells are laid out in half-width steps so the
//! stagger shows: vertical-edge boards print one line per row,
//! horizontal-edge boards one column pair per column.

use hexgrid_core::{GridMode, HexCoord, Layout};

/// Position of a cell on the text grid as `(line, column)`
fn text_position(layout: &Layout, coord: HexCoord) -> (usize, usize) {
    let (along, across) = match layout.mode() {
        GridMode::VerticalEdge => (coord.col, coord.row),
        GridMode::HorizontalEdge => (coord.row, coord.col),
    };
    // half widths from the left (or top) edge
    let offset = (2 * along - across) as usize;
    match layout.mode() {
        GridMode::VerticalEdge => (across as usize, offset),
        GridMode::HorizontalEdge => (offset, 2 * across as usize),
    }
}

/// Render every on-map cell with the glyph chosen by `glyph`
pub fn render<F>(layout: &Layout, glyph: F) -> String
where
    F: Fn(HexCoord) -> char,
{
    let mut lines: Vec<Vec<char>> = Vec::new();
    for coord in layout.coords() {
        let (line, column) = text_position(layout, coord);
        if lines.len() <= line {
            lines.resize(line + 1, Vec::new());
        }
        let row = &mut lines[line];
        if row.len() <= column {
            row.resize(column + 1, ' ');
        }
        row[column] = glyph(coord);
    }

    let mut out = String::new();
    for line in lines {
        out.extend(line);
        out.push('\n');
    }
    out
}

/// Single character for a small number, `+` when it does not fit
pub fn digit(value: i32) -> char {
    match u32::try_from(value) {
        Ok(v) if v < 10 => char::from_digit(v, 10).unwrap_or('+'),
        Ok(_) => '+',
        Err(_) => '-',
    }
}
