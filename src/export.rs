use crate::config::ExportOptions;
use crate::error::HarvestError;
use crate::results::Dataset;
use crate::utils::export_file_name;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

/// Byte-order mark so spreadsheet tools detect UTF-8 when opening the CSV
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const SEP: char = ',';

/* ---------------- CSV ---------------- */

fn needs_quotes(field: &str) -> bool {
    field.contains(SEP) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV row to any writer
pub fn write_row<W: Write>(mut w: W, row: &[&str]) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first { write!(w, "{}", SEP)?; } else { first = false; }
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

/// Full report contents: BOM, header row, then one row per record.
///
/// Output depends only on its inputs, so exporting the same dataset twice
/// produces identical bytes.
pub fn to_csv_bytes(dataset: &Dataset, headers: &[String; 2]) -> Vec<u8> {
    let mut buf: Vec<u8> = UTF8_BOM.to_vec();

    // Writing into a Vec cannot fail
    let _ = write_row(&mut buf, &[headers[0].as_str(), headers[1].as_str()]);
    for record in dataset {
        let _ = write_row(&mut buf, &[record.title.as_str(), record.published.as_str()]);
    }

    buf
}

/// Write the report as `<output_dir>/<prefix>_<date>.csv` and return its path
pub fn write_csv(
    dataset: &Dataset,
    export: &ExportOptions,
    date: &str,
) -> Result<PathBuf, HarvestError> {
    if !export.output_dir.as_os_str().is_empty() {
        fs::create_dir_all(&export.output_dir).map_err(|source| HarvestError::Export {
            path: export.output_dir.clone(),
            source,
        })?;
    }

    let path = export
        .output_dir
        .join(export_file_name(&export.file_prefix, date));
    let contents = to_csv_bytes(dataset, &export.headers);

    fs::write(&path, contents).map_err(|source| HarvestError::Export {
        path: path.clone(),
        source,
    })?;

    ::log::info!("Wrote {} records to {}", dataset.len(), path.display());
    Ok(path)
}

/* ---------------- Preview ---------------- */

/// First `limit` records, one `"<published> | <title>"` line each
pub fn preview(dataset: &Dataset, limit: usize) -> String {
    dataset
        .iter()
        .take(limit)
        .map(|r| format!("{} | {}", r.published, r.title))
        .collect::<Vec<_>>()
        .join("\n")
}
