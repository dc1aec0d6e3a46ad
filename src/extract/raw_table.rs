// src/extract/raw_table.rs

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Node, Selector};

static ROW_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("tr selector"));

#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    /// Column names, one per column, trimmed.
    pub headers: Vec<String>,
    /// Body rows, each padded to `headers.len()` cells.
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn width(&self) -> usize {
        self.headers.len()
    }

    /// Cells of column `idx`, top to bottom.
    pub fn column(&self, idx: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(idx).map(String::as_str).unwrap_or(""))
    }
}

struct GridCell {
    text: String,
    is_header: bool,
}

/// Parse a `<table>` fragment into a header row plus body rows.
///
/// Leading rows made only of `<th>` cells form the header; with several of them
/// each column's header is its distinct texts joined by a space. Without any,
/// the first row is the header. `colspan` and `rowspan` are expanded so every
/// row lines up with the header.
pub fn parse_table(table_html: &str) -> RawTable {
    let fragment = Html::parse_fragment(table_html);
    let grid = expand_spans(&fragment);

    let header_rows = grid
        .iter()
        .take_while(|row| !row.is_empty() && row.iter().all(|c| c.is_header))
        .count()
        .max(1)
        .min(grid.len());

    let width = grid.iter().map(Vec::len).max().unwrap_or(0);

    let mut headers = vec![String::new(); width];
    for (col, header) in headers.iter_mut().enumerate() {
        let mut parts: Vec<&str> = Vec::new();
        for row in &grid[..header_rows] {
            if let Some(cell) = row.get(col) {
                let text = cell.text.as_str();
                if !text.is_empty() && parts.last() != Some(&text) {
                    parts.push(text);
                }
            }
        }
        *header = parts.join(" ").trim().to_string();
    }

    let rows = grid[header_rows..]
        .iter()
        .map(|row| {
            let mut cells: Vec<String> = row.iter().map(|c| c.text.clone()).collect();
            cells.resize(width, String::new());
            cells
        })
        .collect();

    RawTable { headers, rows }
}

/// Lay the table's cells out on a rectangular grid.
fn expand_spans(fragment: &Html) -> Vec<Vec<GridCell>> {
    // per column: (rows still covered, text, header flag) carried down by rowspan
    let mut carried: Vec<Option<(usize, String, bool)>> = Vec::new();
    let mut grid = Vec::new();

    for tr in fragment.select(&ROW_SELECTOR) {
        let mut out: Vec<GridCell> = Vec::new();
        let mut col = 0;

        let take_carried = |col: usize, carried: &mut Vec<Option<(usize, String, bool)>>| {
            let slot = carried.get_mut(col)?;
            let (left, text, is_header) = slot.as_mut()?;
            let cell = GridCell {
                text: text.clone(),
                is_header: *is_header,
            };
            *left -= 1;
            if *left == 0 {
                *slot = None;
            }
            Some(cell)
        };

        for cell in tr
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|el| matches!(el.value().name(), "th" | "td"))
        {
            while let Some(c) = take_carried(col, &mut carried) {
                out.push(c);
                col += 1;
            }

            let text = cell_text(&cell);
            let is_header = cell.value().name() == "th";
            let colspan = span_attr(&cell, "colspan");
            let rowspan = span_attr(&cell, "rowspan");

            for _ in 0..colspan {
                if rowspan > 1 {
                    if carried.len() <= col {
                        carried.resize(col + 1, None);
                    }
                    carried[col] = Some((rowspan - 1, text.clone(), is_header));
                }
                out.push(GridCell {
                    text: text.clone(),
                    is_header,
                });
                col += 1;
            }
        }

        // trailing columns still covered from rows above
        while col < carried.len() {
            if let Some(c) = take_carried(col, &mut carried) {
                out.push(c);
            } else if carried[col + 1..].iter().any(Option::is_some) {
                out.push(GridCell {
                    text: String::new(),
                    is_header: false,
                });
            } else {
                break;
            }
            col += 1;
        }

        grid.push(out);
    }

    grid
}

fn span_attr(cell: &ElementRef<'_>, name: &str) -> usize {
    cell.value()
        .attr(name)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(1)
}

/// Concatenated text of a cell with `<br>` read as a space and whitespace collapsed.
fn cell_text(cell: &ElementRef<'_>) -> String {
    let mut raw = String::new();
    for node in cell.descendants() {
        match node.value() {
            Node::Text(text) => raw.push_str(text),
            Node::Element(el) if el.name() == "br" => raw.push(' '),
            _ => {}
        }
    }
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
