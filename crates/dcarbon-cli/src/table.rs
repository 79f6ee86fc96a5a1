//! Terminal tables rendered through Arrow's pretty printer.
//!
//! Every column is Utf8; cells are formatted before they get here. An empty
//! cell becomes a null so the printer leaves it blank.

use std::sync::Arc;

use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;

pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. Short rows are padded with blanks.
    pub fn push(&mut self, mut cells: Vec<String>) {
        cells.resize(self.headers.len(), String::new());
        self.rows.push(cells);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn to_batch(&self) -> anyhow::Result<RecordBatch> {
        let fields: Vec<Field> = self
            .headers
            .iter()
            .map(|h| Field::new(h, DataType::Utf8, true))
            .collect();
        let columns: Vec<ArrayRef> = (0..self.headers.len())
            .map(|col| {
                let values: StringArray = self
                    .rows
                    .iter()
                    .map(|row| Some(row[col].as_str()).filter(|s| !s.is_empty()))
                    .collect();
                Arc::new(values) as ArrayRef
            })
            .collect();
        let schema = Arc::new(Schema::new(fields));
        Ok(RecordBatch::try_new(schema, columns)?)
    }

    pub fn render(&self) -> anyhow::Result<String> {
        if self.is_empty() {
            return Ok("(no rows)".to_string());
        }
        Ok(pretty_format_batches(&[self.to_batch()?])?.to_string())
    }

    pub fn print(&self) -> anyhow::Result<()> {
        println!("{}", self.render()?);
        Ok(())
    }
}
