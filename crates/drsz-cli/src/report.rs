//! Plain-text results table.
//!
//! Columns are `Name`, `Size`, `Last_Modified`, left-aligned and separated
//! by at least five spaces. Only completed records are listed; failed ones
//! are reported separately as errors.

use drsz_core::export::format_timestamp;
use drsz_core::DirectoryRecord;
use std::fmt::Write;

const COLUMN_GAP: usize = 5;
const HEADER: [&str; 3] = ["Name", "Size", "Last_Modified"];

pub fn render_table(records: &[DirectoryRecord]) -> String {
    let rows: Vec<[String; 3]> = records
        .iter()
        .filter(|r| r.is_completed())
        .map(|r| {
            [
                r.name(),
                r.size_string(),
                format_timestamp(r.last_modified()),
            ]
        })
        .collect();

    let mut widths = HEADER.map(str::len);
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    out.push('\n');
    push_row(&mut out, &HEADER, &widths);
    for row in &rows {
        let cells = [row[0].as_str(), row[1].as_str(), row[2].as_str()];
        push_row(&mut out, &cells, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[&str; 3], widths: &[usize; 3]) {
    let _ = write!(
        out,
        "{:<w0$}{:<w1$}{}",
        cells[0],
        cells[1],
        cells[2],
        w0 = widths[0] + COLUMN_GAP,
        w1 = widths[1] + COLUMN_GAP,
    );
    // No trailing padding on the last column.
    let trimmed = out.trim_end_matches(' ').len();
    out.truncate(trimmed);
    out.push('\n');
}
