// Delimited text import (CSV, TSV, semicolon and pipe separated)

use icp_recon::{RawCell, RawTable, ReconError, Role};

/// Decode bytes and parse them as a delimited table with a header row.
pub fn read_table(bytes: &[u8], role: Role) -> Result<RawTable, ReconError> {
    let content = decode_to_utf8(bytes);
    let delimiter = sniff_delimiter(&content);
    parse_table(&content, delimiter, role)
}

/// Decode as UTF-8 (BOM stripped); fall back to Windows-1252, which is what
/// Excel writes for "CSV" on most Western locales.
pub fn decode_to_utf8(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            decoded.into_owned()
        }
    }
}

/// Detect the most likely field delimiter by checking consistency across the first few lines.
///
/// For each candidate (tab, semicolon, comma, pipe), count fields per line. The delimiter
/// that produces the most consistent field count (>1 field) wins.
fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).take(10).collect();

    if sample_lines.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        if counts.first().copied().unwrap_or(0) <= 1 {
            continue;
        }

        // More consistent lines wins; more columns breaks ties
        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

fn parse_table(content: &str, delimiter: u8, role: Role) -> Result<RawTable, ReconError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = reader.records();
    let headers: Vec<String> = match records.next() {
        Some(record) => record
            .map_err(|e| ReconError::Read { role, detail: e.to_string() })?
            .iter()
            .map(|h| h.trim().to_string())
            .collect(),
        None => {
            return Err(ReconError::Read {
                role,
                detail: "file is empty (no header row)".into(),
            })
        }
    };

    let mut rows = Vec::new();
    for record in records {
        let record = record.map_err(|e| ReconError::Read { role, detail: e.to_string() })?;
        rows.push(
            record
                .iter()
                .map(|field| {
                    if field.trim().is_empty() {
                        RawCell::Empty
                    } else {
                        RawCell::Text(field.to_string())
                    }
                })
                .collect(),
        );
    }

    Ok(RawTable::new(headers, rows))
}
