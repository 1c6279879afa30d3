use crate::domain::model::{IncidenceMatrix, UpsetSummary};
use crate::utils::error::{Result, UpsetError};
use serde::Serialize;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

/// Writes the matrix as a delimited table: an empty index header cell
/// followed by the set names, then `item,1,0,...` per row.
pub fn to_delimited(matrix: &IncidenceMatrix, delimiter: u8) -> Result<Vec<u8>> {
    if matrix.is_empty() {
        return Err(UpsetError::NoData {
            action: "save".to_string(),
        });
    }

    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    writer.write_record(std::iter::once("").chain(matrix.set_names().iter().map(String::as_str)))?;
    for (item, row) in matrix.rows() {
        writer.write_record(
            std::iter::once(item).chain(row.iter().map(|member| if *member { "1" } else { "0" })),
        )?;
    }

    writer
        .into_inner()
        .map_err(|e| UpsetError::IoError(e.into_error()))
}

/// Reads a table produced by [`to_delimited`].
pub fn from_delimited(data: &[u8], delimiter: u8) -> Result<IncidenceMatrix> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    if headers.len() < 2 {
        return Err(UpsetError::MalformedMatrix {
            line: 1,
            reason: "header needs an index column and at least one set".to_string(),
        });
    }
    let set_names: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();

    let mut items = Vec::new();
    let mut cells = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let line = index + 2;
        if record.len() != headers.len() {
            return Err(UpsetError::MalformedMatrix {
                line,
                reason: format!("expected {} fields, found {}", headers.len(), record.len()),
            });
        }

        let row = record
            .iter()
            .skip(1)
            .map(|cell| parse_cell(cell, line))
            .collect::<Result<Vec<bool>>>()?;
        items.push(record[0].to_string());
        cells.push(row);
    }

    Ok(IncidenceMatrix {
        set_names,
        items,
        cells,
    })
}

fn parse_cell(cell: &str, line: usize) -> Result<bool> {
    match cell.trim() {
        "1" | "true" | "True" => Ok(true),
        "0" | "false" | "False" => Ok(false),
        other => Err(UpsetError::MalformedMatrix {
            line,
            reason: format!("'{}' is not a membership value", other),
        }),
    }
}

#[derive(Serialize)]
struct SummaryDocument<'a> {
    generated_at: String,
    #[serde(flatten)]
    summary: &'a UpsetSummary,
}

pub fn summary_json(summary: &UpsetSummary) -> Result<Vec<u8>> {
    let document = SummaryDocument {
        generated_at: chrono::Utc::now().to_rfc3339(),
        summary,
    };
    Ok(serde_json::to_vec_pretty(&document)?)
}

/// Packs `(file name, contents)` pairs into a ZIP archive.
pub fn bundle_zip(files: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

    for (name, data) in files {
        zip.start_file::<_, ()>(name.as_str(), FileOptions::default())?;
        zip.write_all(data)?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{SetCollection, SetInput, SortBy};

    fn sample() -> IncidenceMatrix {
        let inputs = vec![SetInput::new("A", ["x", "y"]), SetInput::new("B", ["y", "z"])];
        IncidenceMatrix::derive(&SetCollection::from_inputs(&inputs).unwrap())
    }

    #[test]
    fn test_to_delimited_csv_layout() {
        let csv = String::from_utf8(to_delimited(&sample(), b',').unwrap()).unwrap();

        assert_eq!(csv, ",A,B\nx,1,0\ny,1,1\nz,0,1\n");
    }

    #[test]
    fn test_to_delimited_tsv_layout() {
        let tsv = String::from_utf8(to_delimited(&sample(), b'\t').unwrap()).unwrap();

        assert_eq!(tsv.lines().next(), Some("\tA\tB"));
        assert_eq!(tsv.lines().nth(2), Some("y\t1\t1"));
    }

    #[test]
    fn test_delimited_round_trip() {
        let inputs = vec![
            SetInput::new("Set, with comma", ["a \"quoted\" item", "plain"]),
            SetInput::new("Other", ["plain", "x,y"]),
        ];
        let matrix = IncidenceMatrix::derive(&SetCollection::from_inputs(&inputs).unwrap());

        let bytes = to_delimited(&matrix, b',').unwrap();
        let read_back = from_delimited(&bytes, b',').unwrap();

        assert_eq!(read_back, matrix);
    }

    #[test]
    fn test_to_delimited_rejects_empty_matrix() {
        let err = to_delimited(&IncidenceMatrix::default(), b',').unwrap_err();

        assert!(matches!(err, UpsetError::NoData { .. }));
    }

    #[test]
    fn test_from_delimited_rejects_bad_cells() {
        let err = from_delimited(b",A\nx,2\n", b',').unwrap_err();
        assert!(matches!(err, UpsetError::MalformedMatrix { line: 2, .. }));

        let err = from_delimited(b",A,B\nx,1\n", b',').unwrap_err();
        assert!(matches!(err, UpsetError::MalformedMatrix { line: 2, .. }));

        let err = from_delimited(b"only\n", b',').unwrap_err();
        assert!(matches!(err, UpsetError::MalformedMatrix { line: 1, .. }));
    }

    #[test]
    fn test_from_delimited_accepts_boolean_words() {
        let matrix = from_delimited(b",A,B\nx,True,false\n", b',').unwrap();

        assert_eq!(matrix.row(0), Some(&[true, false][..]));
    }

    #[test]
    fn test_summary_json_fields() {
        let summary = crate::core::intersections::summarize(&sample(), SortBy::Cardinality);

        let json: serde_json::Value = serde_json::from_slice(&summary_json(&summary).unwrap()).unwrap();

        assert!(json["generated_at"].is_string());
        assert_eq!(json["item_count"].as_u64(), Some(3));
        assert_eq!(json["set_names"], serde_json::json!(["A", "B"]));
        assert_eq!(json["set_order"], serde_json::json!([0, 1]));
        assert_eq!(json["intersections"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_bundle_zip_entries() {
        let files = vec![
            ("upset_matrix.csv".to_string(), b",A\nx,1\n".to_vec()),
            ("upset_plot.png".to_string(), vec![0u8; 8]),
        ];

        let bytes = bundle_zip(&files).unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();

        assert_eq!(archive.len(), 2);
        let mut csv = String::new();
        std::io::Read::read_to_string(&mut archive.by_name("upset_matrix.csv").unwrap(), &mut csv)
            .unwrap();
        assert_eq!(csv, ",A\nx,1\n");
    }
}
