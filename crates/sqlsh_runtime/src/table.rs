//! ASCII table formatter.
//!
//! ```text
//! +----+-------+
//! | id | name  |
//! +----+-------+
//! |  1 | Alice |
//! |  2 | Bob   |
//! +----+-------+
//! ```
//!
//! Column widths are the widest of the header and the cells, capped at 50
//! characters; longer cells are cut and end in `...`. Numbers are
//! right-aligned, everything else left-aligned, NULL prints as `NULL`.
//!
//! Output can be split into pages. Every page is a complete table with its own
//! header, and a pager callback runs between pages and may stop the output.

use std::fmt::Write as _;
use std::io::{self, Write};

use sqlsh_driver::Row;

const MAX_COLUMN_WIDTH: usize = 50;
const ELLIPSIS: &str = "...";

/// Answer of the pager between two pages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageAction {
    /// Print the next page.
    Continue,
    /// Drop the remaining rows.
    Abort,
}

struct Cell {
    text: String,
    numeric: bool,
}

/// A formatted table ready for output.
pub struct TableFormatter {
    headers: Vec<String>,
    widths: Vec<usize>,
    rows: Vec<Vec<Cell>>,
}

impl TableFormatter {
    /// Formats typed rows under the given headers.
    #[must_use]
    pub fn new(headers: Vec<String>, rows: &[Row]) -> Self {
        let mut widths: Vec<usize> = headers.iter().map(|h| width_of(h).max(1)).collect();

        let rows: Vec<Vec<Cell>> = rows
            .iter()
            .map(|row| {
                (0..headers.len())
                    .map(|i| {
                        let cell = row.get(i).map_or_else(
                            || Cell {
                                text: String::new(),
                                numeric: false,
                            },
                            |value| Cell {
                                text: value.to_string(),
                                numeric: value.is_numeric(),
                            },
                        );
                        widths[i] = widths[i].max(width_of(&cell.text));
                        cell
                    })
                    .collect()
            })
            .collect();

        for width in &mut widths {
            *width = (*width).min(MAX_COLUMN_WIDTH);
        }

        Self {
            headers,
            widths,
            rows,
        }
    }

    /// Formats plain text rows, as used by the help screen.
    #[must_use]
    pub fn from_text(headers: &[&str], rows: &[(&str, &str)]) -> Self {
        let rows: Vec<Row> = rows
            .iter()
            .map(|(a, b)| vec![(*a).into(), (*b).into()])
            .collect();
        Self::new(headers.iter().map(ToString::to_string).collect(), &rows)
    }

    /// Number of data rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Renders the whole table as one page.
    #[must_use]
    pub fn render(&self) -> String {
        self.render_page(&self.rows)
    }

    /// Writes the table in pages of `page_length` rows, calling `pager`
    /// between pages.
    ///
    /// # Errors
    ///
    /// Returns any error from writing to `out`.
    pub fn write_paged(
        &self,
        out: &mut dyn Write,
        page_length: usize,
        pager: &mut dyn FnMut() -> PageAction,
    ) -> io::Result<()> {
        if self.rows.is_empty() {
            return out.write_all(self.render().as_bytes());
        }

        let mut pages = self.rows.chunks(page_length.max(1)).peekable();
        while let Some(page) = pages.next() {
            out.write_all(self.render_page(page).as_bytes())?;
            if pages.peek().is_some() {
                out.flush()?;
                if pager() == PageAction::Abort {
                    break;
                }
            }
        }
        Ok(())
    }

    fn render_page(&self, rows: &[Vec<Cell>]) -> String {
        let mut output = String::new();

        self.write_separator(&mut output);
        self.write_header_row(&mut output);
        self.write_separator(&mut output);
        for row in rows {
            self.write_data_row(&mut output, row);
        }
        self.write_separator(&mut output);

        output
    }

    fn write_separator(&self, output: &mut String) {
        output.push('+');
        for width in &self.widths {
            output.push_str(&"-".repeat(width + 2));
            output.push('+');
        }
        output.push('\n');
    }

    fn write_header_row(&self, output: &mut String) {
        output.push('|');
        for (header, &width) in self.headers.iter().zip(&self.widths) {
            let _ = write!(output, " {:<width$} |", truncate(header, width));
        }
        output.push('\n');
    }

    fn write_data_row(&self, output: &mut String, row: &[Cell]) {
        output.push('|');
        for (cell, &width) in row.iter().zip(&self.widths) {
            let text = truncate(&cell.text, width);
            if cell.numeric {
                let _ = write!(output, " {text:>width$} |");
            } else {
                let _ = write!(output, " {text:<width$} |");
            }
        }
        output.push('\n');
    }
}

fn width_of(text: &str) -> usize {
    text.chars().count()
}

fn truncate(text: &str, width: usize) -> String {
    if width_of(text) <= width {
        return text.to_string();
    }
    if width <= ELLIPSIS.len() {
        return text.chars().take(width).collect();
    }
    let mut cut: String = text.chars().take(width - ELLIPSIS.len()).collect();
    cut.push_str(ELLIPSIS);
    cut
}
