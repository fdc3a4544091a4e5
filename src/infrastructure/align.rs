//! Elastic column alignment for struct field lines
//!
//! Rows are lists of cells. Every cell except the last one of a row belongs
//! to a column; a column block is a run of consecutive rows that all have a
//! cell in that column, and each block is as wide as its widest cell plus
//! one space. Blocks made only of empty cells collapse to zero width.

const PADDING: usize = 1;

/// Align rows of cells into padded lines.
pub fn align(rows: &[Vec<String>]) -> Vec<String> {
    let mut table = Table {
        rows,
        widths: Vec::new(),
        out: vec![String::new(); rows.len()],
    };
    table.format(0, rows.len());
    table.out
}

fn cell_width(cell: &str) -> usize {
    cell.chars().count()
}

struct Table<'a> {
    rows: &'a [Vec<String>],
    widths: Vec<usize>,
    out: Vec<String>,
}

impl<'a> Table<'a> {
    fn has_column(&self, row: usize, column: usize) -> bool {
        column + 1 < self.rows[row].len()
    }

    fn format(&mut self, mut line0: usize, line1: usize) {
        let column = self.widths.len();
        let mut this = line0;

        while this < line1 {
            if !self.has_column(this, column) {
                this += 1;
                continue;
            }

            // rows before the block don't reach this column
            self.write_lines(line0, this);
            line0 = this;

            let mut width = 0;
            let mut discardable = true;
            while this < line1 && self.has_column(this, column) {
                let w = cell_width(&self.rows[this][column]);
                width = width.max(w + PADDING);
                if w > 0 {
                    discardable = false;
                }
                this += 1;
            }
            if discardable {
                width = 0;
            }

            self.widths.push(width);
            self.format(line0, this);
            self.widths.pop();
            line0 = this;
        }

        self.write_lines(line0, line1);
    }

    fn write_lines(&mut self, line0: usize, line1: usize) {
        for i in line0..line1 {
            let out = &mut self.out[i];
            for (j, cell) in self.rows[i].iter().enumerate() {
                out.push_str(cell);
                if let Some(&width) = self.widths.get(j) {
                    let pad = width.saturating_sub(cell_width(cell));
                    out.extend(std::iter::repeat(' ').take(pad));
                }
            }
        }
    }
}
