//! Column-aligned text tables.

use console::measure_text_width;

/// A borderless table with left-aligned columns.
///
/// Cell widths are measured without ANSI styling, so styled cells line up.
#[derive(Debug)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Add a row; missing cells render empty, extra cells are dropped.
    pub fn add_row<S: Into<String>>(&mut self, row: impl IntoIterator<Item = S>) {
        let mut row: Vec<String> = row.into_iter().map(Into::into).collect();
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| measure_text_width(h)).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(measure_text_width(cell));
            }
        }
        widths
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(render_row(&self.headers, &widths));
        lines.push(
            widths
                .iter()
                .map(|w| "─".repeat(*w))
                .collect::<Vec<_>>()
                .join("  "),
        );
        for row in &self.rows {
            lines.push(render_row(row, &widths));
        }
        lines.join("\n")
    }
}

fn render_row(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::new();
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        line.push_str(cell);
        if i + 1 < cells.len() {
            let pad = width.saturating_sub(measure_text_width(cell));
            line.push_str(&" ".repeat(pad));
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aligns_columns() {
        let mut table = Table::new(&["Asset", "Status"]);
        table.add_row(["Backend", "running"]);
        table.add_row(["WebApp", "webserver not started"]);
        let rendered = table.render();
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines[0], "Asset    Status");
        assert_eq!(lines[2], "Backend  running");
        assert_eq!(lines[3], "WebApp   webserver not started");
    }

    #[test]
    fn short_rows_are_padded() {
        let mut table = Table::new(&["A", "B", "C"]);
        table.add_row(["x"]);
        assert!(!table.is_empty());
        assert_eq!(table.render().lines().nth(2), Some("x     "));
    }

    #[test]
    fn styled_cells_measure_visible_width() {
        let mut table = Table::new(&["Name", "Status"]);
        table.add_row(["\u{1b}[32mok\u{1b}[0m".to_string(), "done".to_string()]);
        let rendered = table.render();
        assert!(rendered.lines().nth(2).unwrap().ends_with("    done"));
    }
}
