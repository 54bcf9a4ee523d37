use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use csv::{QuoteStyle, WriterBuilder};

use crate::error::Result;
use crate::record::REPORT_COLUMNS;

/// UTF-8 byte-order mark, expected by spreadsheet tools opening the file.
const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// Write the report to a named file: BOM, header row, then every joined row
/// with every field quoted.
pub fn write_report_file(path: &Path, rows: &[Vec<String>]) -> Result<()> {
    let file = File::create(path)?;
    write_report(BufWriter::new(file), rows, true)
}

/// Write the report to an arbitrary writer.
///
/// With `headers` set, the output starts with the BOM and the column header
/// row (the file path). Without it, only the data rows are emitted; the
/// standard-output path omits both.
pub fn write_report<W: Write>(mut out: W, rows: &[Vec<String>], headers: bool) -> Result<()> {
    if headers {
        out.write_all(UTF8_BOM)?;
    }

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(out);

    if headers {
        writer.write_record(REPORT_COLUMNS)?;
    }
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}
