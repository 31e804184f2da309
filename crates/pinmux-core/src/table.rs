//! Pin table loading.
//!
//! A pin table is a comma-separated text file. The first line is a title
//! and is always discarded. Every other line starts with a keyword:
//!
//! ```text
//! Pin,PTA3,ADC0_SE3,PTA3,FTM0_CH1
//! Alias,D10,PTC2
//! Default,FTM0_CH1,PTA3
//! ClockInfo,ADC0,SIM->SCGC6,SIM_SCGC6_ADC0_MASK
//! ```
//!
//! Rows are sorted once by their pin-name column (field 1) using natural
//! order, then grouped by keyword.

use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::natural::natural_cmp;

/// Field delimiter.
pub const DELIMITER: char = ',';

/// Classification of a row by its leading keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RowKind {
    Pin,
    Alias,
    Default,
    ClockInfo,
    Unrecognized,
}

impl RowKind {
    /// Classify a keyword. Anything unknown is `Unrecognized`.
    pub fn classify(keyword: &str) -> Self {
        match keyword {
            "Pin" => RowKind::Pin,
            "Alias" => RowKind::Alias,
            "Default" => RowKind::Default,
            "ClockInfo" => RowKind::ClockInfo,
            _ => RowKind::Unrecognized,
        }
    }

    /// Keyword as written in the table.
    pub fn keyword(&self) -> &'static str {
        match self {
            RowKind::Pin => "Pin",
            RowKind::Alias => "Alias",
            RowKind::Default => "Default",
            RowKind::ClockInfo => "ClockInfo",
            RowKind::Unrecognized => "unrecognized",
        }
    }
}

/// One row of the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    /// 1-based source line number.
    pub line: usize,
    pub kind: RowKind,
    pub fields: Vec<String>,
}

impl Row {
    /// Split a raw line into a row.
    ///
    /// Fields are trimmed and trailing empty fields dropped, so
    /// `ClockInfo,ADC0,SIM->SCGC6,` has three fields.
    pub fn parse(line: usize, text: &str) -> Self {
        let mut fields: Vec<String> = text
            .split(DELIMITER)
            .map(|f| f.trim().to_string())
            .collect();
        while fields.last().is_some_and(|f| f.is_empty()) {
            fields.pop();
        }
        let kind = fields
            .first()
            .map(|k| RowKind::classify(k))
            .unwrap_or(RowKind::Unrecognized);
        Row { line, kind, fields }
    }

    /// Field at `index`, if present.
    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    /// The sort key (field 1), absent for rows with fewer than 2 fields.
    pub fn key(&self) -> Option<&str> {
        if self.fields.len() < 2 {
            None
        } else {
            self.field(1)
        }
    }
}

/// A loaded, sorted pin table.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Table {
    rows: Vec<Row>,
}

impl Table {
    /// Parse table text.
    ///
    /// Rows without a sortable key order before all others and are then
    /// dropped. The sort is stable, so rows with equal keys keep their file
    /// order.
    pub fn parse(text: &str) -> Self {
        let mut rows: Vec<Row> = text
            .lines()
            .enumerate()
            .skip(1)
            .map(|(i, line)| Row::parse(i + 1, line))
            .collect();

        rows.sort_by(|a, b| match (a.key(), b.key()) {
            (None, None) => std::cmp::Ordering::Equal,
            (None, Some(_)) => std::cmp::Ordering::Less,
            (Some(_), None) => std::cmp::Ordering::Greater,
            (Some(ka), Some(kb)) => natural_cmp(ka, kb),
        });
        rows.retain(|row| row.key().is_some());

        log::debug!("loaded {} table rows", rows.len());
        Table { rows }
    }

    /// Read and parse a table file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    /// All sortable rows in sorted order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Rows of one kind, in sorted order.
    pub fn rows_of(&self, kind: RowKind) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(move |row| row.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
