use std::io::Write;

use anyhow::Result;
use clap::ValueEnum;
use retailprices_lib::{ColumnSpec, ProjectedRow};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::Table;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Markdown,
    Csv,
    Tsv,
    Json,
}

/// Writes `rows` under a `columns` header in the requested format.
pub fn render<W: Write>(
    format: OutputFormat,
    columns: &ColumnSpec,
    rows: &[ProjectedRow],
    out: &mut W,
) -> Result<()> {
    match format {
        OutputFormat::Table => write_table(columns, rows, out),
        OutputFormat::Markdown => write_markdown(columns, rows, out),
        OutputFormat::Csv => write_delimited(columns, rows, b',', out),
        OutputFormat::Tsv => write_delimited(columns, rows, b'\t', out),
        OutputFormat::Json => write_json(columns, rows, out),
    }
}

fn build_table(columns: &ColumnSpec, rows: &[ProjectedRow]) -> Table {
    let mut builder = Builder::default();
    builder.push_record(columns.iter().map(str::to_string));
    for row in rows {
        builder.push_record(row.texts());
    }
    builder.build()
}

// -- Table output --

pub fn write_table<W: Write>(columns: &ColumnSpec, rows: &[ProjectedRow], out: &mut W) -> Result<()> {
    writeln!(out, "{}", build_table(columns, rows))?;
    Ok(())
}

// -- Markdown output --

pub fn write_markdown<W: Write>(
    columns: &ColumnSpec,
    rows: &[ProjectedRow],
    out: &mut W,
) -> Result<()> {
    let mut table = build_table(columns, rows);
    table.with(Style::markdown());
    writeln!(out, "{}", table)?;
    Ok(())
}

// -- CSV / TSV output --

pub fn write_delimited<W: Write>(
    columns: &ColumnSpec,
    rows: &[ProjectedRow],
    delimiter: u8,
    out: &mut W,
) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(out);
    wtr.write_record(columns.iter())?;
    for row in rows {
        wtr.write_record(row.texts())?;
    }
    wtr.flush()?;
    Ok(())
}

// -- JSON output --

/// Serializes one row as an object whose keys follow the column order.
struct JsonRow<'a> {
    columns: &'a [String],
    cells: &'a [Value],
}

impl Serialize for JsonRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, cell) in self.columns.iter().zip(self.cells) {
            map.serialize_entry(column, cell)?;
        }
        map.end()
    }
}

pub fn write_json<W: Write>(columns: &ColumnSpec, rows: &[ProjectedRow], out: &mut W) -> Result<()> {
    let rows: Vec<JsonRow<'_>> = rows
        .iter()
        .map(|row| JsonRow {
            columns: columns.names(),
            cells: row.cells(),
        })
        .collect();
    serde_json::to_writer_pretty(&mut *out, &rows)?;
    writeln!(out)?;
    Ok(())
}
