//! CSV export and import of team and conference tables.
//!
//! Every written value is quoted with embedded quotes doubled. The reader
//! accepts bare fields too; quoted fields may span lines and contain commas.

use std::io::{Read, Write};

use courtside_roster::{Conference, Field, RosterLayout, TeamRow};

use crate::{Error, Result};

/// Leading team columns that are not editable fields.
pub const TEAM_KEY_COLUMNS: [&str; 2] = ["index", "offset_hex"];

/// Conference table header.
pub const CONFERENCE_HEADER: [&str; 2] = ["offset_hex", "name"];

/// Header of the team table for `layout`.
pub fn team_header(layout: &RosterLayout) -> Vec<&'static str> {
    TEAM_KEY_COLUMNS
        .into_iter()
        .chain(layout.fields().iter().map(|field| field.label()))
        .collect()
}

/// Write decoded team rows as CSV.
pub fn write_team_table<W: Write>(
    mut writer: W,
    layout: &RosterLayout,
    rows: &[TeamRow],
) -> Result<()> {
    writeln!(writer, "{}", team_header(layout).join(","))?;
    for (index, row) in rows.iter().enumerate() {
        let mut values = vec![
            index.to_string(),
            format!("{:#x}", layout.teams.record_base(index)),
        ];
        values.extend(
            layout
                .fields()
                .iter()
                .map(|&field| row.get(field).unwrap_or_default().to_owned()),
        );
        write_record(&mut writer, &values)?;
    }
    Ok(())
}

/// Write the conference table as CSV.
pub fn write_conference_table<W: Write>(mut writer: W, conferences: &[Conference]) -> Result<()> {
    writeln!(writer, "{}", CONFERENCE_HEADER.join(","))?;
    for conference in conferences {
        write_record(
            &mut writer,
            &[format!("{:#x}", conference.offset), conference.name.text.clone()],
        )?;
    }
    Ok(())
}

/// Parse a team table written by [`write_team_table`] (or edited by hand).
///
/// Columns are matched by header name, so their order does not matter. When
/// an `index` column is present, rows must appear in index order.
pub fn read_team_table<R: Read>(mut reader: R) -> Result<Vec<TeamRow>> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;

    let mut records = parse_records(&input)?.into_iter();
    let header = records
        .next()
        .ok_or_else(|| Error::tabular(1, "missing header row"))?;
    let columns = TeamColumns::from_header(&header)?;

    records
        .enumerate()
        .map(|(position, record)| columns.row(position, &record))
        .collect()
}

/// Write one record with every value quoted.
pub fn write_record<W: Write, S: AsRef<str>>(writer: &mut W, values: &[S]) -> Result<()> {
    let line: Vec<String> = values.iter().map(|value| quote(value.as_ref())).collect();
    writeln!(writer, "{}", line.join(","))?;
    Ok(())
}

/// Quote a CSV value.
pub fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// A parsed CSV record and the line it starts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub line: usize,
    pub fields: Vec<String>,
}

/// Split CSV text into records. Blank lines are skipped.
pub fn parse_records(input: &str) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut line = 1;
    let mut record_line = 1;
    let mut in_quotes = false;
    let mut quoted = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() && !quoted => {
                in_quotes = true;
                quoted = true;
            }
            '"' => return Err(Error::tabular(line, "unexpected quote in unquoted field")),
            ',' => {
                fields.push(std::mem::take(&mut field));
                quoted = false;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                fields.push(std::mem::take(&mut field));
                quoted = false;
                push_record(&mut records, record_line, std::mem::take(&mut fields));
                line += 1;
                record_line = line;
            }
            _ if quoted => return Err(Error::tabular(line, "text after closing quote")),
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(Error::tabular(record_line, "unterminated quoted field"));
    }
    if quoted || !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        push_record(&mut records, record_line, fields);
    }

    Ok(records)
}

fn push_record(records: &mut Vec<Record>, line: usize, fields: Vec<String>) {
    if fields.len() == 1 && fields[0].is_empty() {
        return;
    }
    records.push(Record { line, fields });
}

/// Column positions of a team table header.
struct TeamColumns {
    index: Option<usize>,
    fields: Vec<(Field, usize)>,
    width: usize,
}

impl TeamColumns {
    fn from_header(header: &Record) -> Result<Self> {
        let position = |name: &str| header.fields.iter().position(|column| column.trim() == name);

        let mut fields = Vec::with_capacity(Field::EXTENDED.len());
        for field in Field::TEXT {
            let column = position(field.label()).ok_or_else(|| {
                Error::tabular(header.line, format!("missing column {:?}", field.label()))
            })?;
            fields.push((field, column));
        }
        if let Some(column) = position(Field::Conference.label()) {
            fields.push((Field::Conference, column));
        }

        Ok(Self {
            index: position("index"),
            fields,
            width: header.fields.len(),
        })
    }

    fn row(&self, position: usize, record: &Record) -> Result<TeamRow> {
        if record.fields.len() != self.width {
            return Err(Error::tabular(
                record.line,
                format!("expected {} columns, found {}", self.width, record.fields.len()),
            ));
        }

        if let Some(column) = self.index {
            let index = record.fields[column].trim();
            if index.parse::<usize>().ok() != Some(position) {
                return Err(Error::tabular(
                    record.line,
                    format!("row index {index:?} out of order, expected {position}"),
                ));
            }
        }

        let mut row = TeamRow::default();
        for &(field, column) in &self.fields {
            row.set(field, record.fields[column].clone());
        }
        Ok(row)
    }
}
