//! Table rendering utilities for CLI outputs.

use crate::utils::formatting::{pad_left, pad_right, truncate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

pub struct Column {
    pub header: String,
    pub max_width: usize,
    pub align: Align,
}

impl Column {
    pub fn left(header: &str, max_width: usize) -> Self {
        Self {
            header: header.to_string(),
            max_width,
            align: Align::Left,
        }
    }

    pub fn right(header: &str, max_width: usize) -> Self {
        Self {
            header: header.to_string(),
            max_width,
            align: Align::Right,
        }
    }
}

pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Width of each column: the widest cell, capped at `max_width`.
    fn widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                let widest = self
                    .rows
                    .iter()
                    .filter_map(|r| r.get(i))
                    .map(|c| unicode_width::UnicodeWidthStr::width(c.as_str()))
                    .chain(std::iter::once(col.header.len()))
                    .max()
                    .unwrap_or(0);
                widest.min(col.max_width)
            })
            .collect()
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let mut out = String::new();

        let cell = |text: &str, col: &Column, width: usize| {
            let text = truncate(text, width);
            match col.align {
                Align::Left => pad_right(&text, width),
                Align::Right => pad_left(&text, width),
            }
        };

        // Header
        let header: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(col, w)| cell(&col.header, col, *w))
            .collect();
        out.push_str(header.join("  ").trim_end());
        out.push('\n');

        // Rows
        for row in &self.rows {
            let line: Vec<String> = self
                .columns
                .iter()
                .zip(&widths)
                .enumerate()
                .map(|(i, (col, w))| cell(row.get(i).map(String::as_str).unwrap_or(""), col, *w))
                .collect();
            out.push_str(line.join("  ").trim_end());
            out.push('\n');
        }

        out
    }
}
