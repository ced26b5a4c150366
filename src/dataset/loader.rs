//! CSV table loading and label/feature column selection.

use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use ndarray::{Array2, Axis};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("dataset has no rows")]
    Empty,
    #[error("column '{column}' not found (available: {available})")]
    MissingColumn { column: String, available: String },
    #[error("no feature columns left after removing label and identifier")]
    NoFeatures,
    #[error("non-numeric value '{value}' in column '{column}' at row {row}")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },
    #[error("label column '{column}' must hold exactly two distinct values, found {values:?}")]
    NotBinary { column: String, values: Vec<String> },
    #[error("class '{class_id}' has {count} row(s); a stratified split needs at least 2")]
    ClassTooSmall { class_id: String, count: usize },
}

/// Raw CSV contents: header names plus trimmed string cells.
#[derive(Debug, Clone)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Which columns are excluded from the features.
#[derive(Debug, Clone, Copy)]
pub struct FeatureSelection<'a> {
    pub label_column: &'a str,
    pub id_column: Option<&'a str>,
}

/// Numeric features with binary class indices.
#[derive(Debug, Clone)]
pub struct LabeledMatrix {
    /// Feature column names in file order.
    pub feature_names: Vec<String>,
    /// `rows x features` matrix.
    pub x: Array2<f64>,
    /// The two distinct label values, sorted.
    pub classes: Vec<String>,
    /// Class index per row, aligned with `x`.
    pub y: Vec<usize>,
}

impl Table {
    /// Read a CSV file with a header row.
    pub fn from_path(path: &Path) -> Result<Self, DatasetError> {
        let reader = reader_builder().from_path(path)?;
        Self::from_csv(reader)
    }

    /// Read CSV text with a header row from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        Self::from_csv(reader_builder().from_reader(reader))
    }

    fn from_csv<R: Read>(mut reader: csv::Reader<R>) -> Result<Self, DatasetError> {
        let headers = reader.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(Self { headers, rows })
    }

    pub fn column_index(&self, name: &str) -> Result<usize, DatasetError> {
        self.headers
            .iter()
            .position(|header| header == name)
            .ok_or_else(|| DatasetError::MissingColumn {
                column: name.to_string(),
                available: self.headers.join(", "),
            })
    }

    /// Split the table into a numeric feature matrix and binary labels.
    ///
    /// The label and identifier columns never reach the feature matrix.
    pub fn select(&self, selection: FeatureSelection<'_>) -> Result<LabeledMatrix, DatasetError> {
        if self.rows.is_empty() {
            return Err(DatasetError::Empty);
        }
        let label_idx = self.column_index(selection.label_column)?;
        let id_idx = selection
            .id_column
            .map(|name| self.column_index(name))
            .transpose()?;
        let feature_idx: Vec<usize> = (0..self.headers.len())
            .filter(|&idx| idx != label_idx && Some(idx) != id_idx)
            .collect();
        if feature_idx.is_empty() {
            return Err(DatasetError::NoFeatures);
        }

        let mut x = Array2::<f64>::zeros((self.rows.len(), feature_idx.len()));
        for (row_idx, (row, mut out)) in self.rows.iter().zip(x.axis_iter_mut(Axis(0))).enumerate() {
            for (slot, &col) in out.iter_mut().zip(&feature_idx) {
                let cell = row[col].as_str();
                *slot = parse_numeric(cell).ok_or_else(|| DatasetError::NonNumeric {
                    column: self.headers[col].clone(),
                    row: row_idx + 1,
                    value: cell.to_string(),
                })?;
            }
        }

        let labels: Vec<&str> = self.rows.iter().map(|row| row[label_idx].as_str()).collect();
        let (classes, y) = encode_labels(&labels);
        if classes.len() != 2 {
            return Err(DatasetError::NotBinary {
                column: selection.label_column.to_string(),
                values: classes,
            });
        }

        Ok(LabeledMatrix {
            feature_names: feature_idx.iter().map(|&idx| self.headers[idx].clone()).collect(),
            x,
            classes,
            y,
        })
    }
}

impl LabeledMatrix {
    pub fn n_rows(&self) -> usize {
        self.x.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    /// Copy out the rows at `indices` together with their labels.
    pub fn subset(&self, indices: &[usize]) -> (Array2<f64>, Vec<usize>) {
        let x = self.x.select(Axis(0), indices);
        let y = indices.iter().map(|&idx| self.y[idx]).collect();
        (x, y)
    }
}

fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.has_headers(true).trim(csv::Trim::All);
    builder
}

fn parse_numeric(cell: &str) -> Option<f64> {
    cell.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Distinct classes in ascending order plus the class index of every label.
///
/// When every label parses as a number, labels are compared by value, so `1`
/// and `1.0` are the same class; each class is then named by its shortest
/// numeric form. Otherwise labels are compared as text.
fn encode_labels(labels: &[&str]) -> (Vec<String>, Vec<usize>) {
    let numeric: Option<Vec<f64>> = labels
        .iter()
        .map(|label| label.parse::<f64>().ok().filter(|value| value.is_finite()))
        .collect();
    match numeric {
        Some(values) => {
            // `+ 0.0` folds -0.0 into 0.0.
            let values: Vec<f64> = values.into_iter().map(|value| value + 0.0).collect();
            let mut distinct = values.clone();
            distinct.sort_by(f64::total_cmp);
            distinct.dedup();
            let y = values
                .iter()
                .map(|value| distinct.partition_point(|class| class < value))
                .collect();
            (distinct.iter().map(|value| value.to_string()).collect(), y)
        }
        None => {
            let distinct: Vec<&str> = labels
                .iter()
                .copied()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();
            let y = labels
                .iter()
                .map(|label| distinct.partition_point(|class| class < label))
                .collect();
            (distinct.into_iter().map(str::to_string).collect(), y)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(text: &str) -> Table {
        Table::from_reader(text.as_bytes()).unwrap()
    }

    #[test]
    fn label_and_id_columns_are_excluded_from_features() {
        let t = table("name,a,status,b\nx1,1.0,0,2\nx2,3.5,1,4\n");
        let m = t
            .select(FeatureSelection {
                label_column: "status",
                id_column: Some("name"),
            })
            .unwrap();
        assert_eq!(m.feature_names, vec!["a", "b"]);
        assert_eq!(m.n_features(), 2);
        assert_eq!(m.x.row(1).to_vec(), vec![3.5, 4.0]);
        assert_eq!(m.classes, vec!["0", "1"]);
        assert_eq!(m.y, vec![0, 1]);
    }

    #[test]
    fn numeric_labels_sort_by_value() {
        let t = table("f,y\n1,10\n2,9\n3,10\n");
        let m = t
            .select(FeatureSelection {
                label_column: "y",
                id_column: None,
            })
            .unwrap();
        assert_eq!(m.classes, vec!["9", "10"]);
        assert_eq!(m.y, vec![1, 0, 1]);
    }

    #[test]
    fn integer_and_float_spellings_share_a_class() {
        let t = table("f,y\n1,0\n2,1\n3,1.0\n4,0.0\n5,-0\n");
        let m = t
            .select(FeatureSelection {
                label_column: "y",
                id_column: None,
            })
            .unwrap();
        assert_eq!(m.classes, vec!["0", "1"]);
        assert_eq!(m.y, vec![0, 1, 1, 0, 0]);
    }

    #[test]
    fn text_labels_keep_their_spelling() {
        let t = table("f,y\n1,yes\n2,no\n3,yes\n");
        let m = t
            .select(FeatureSelection {
                label_column: "y",
                id_column: None,
            })
            .unwrap();
        assert_eq!(m.classes, vec!["no", "yes"]);
        assert_eq!(m.y, vec![1, 0, 1]);
    }

    #[test]
    fn non_numeric_feature_reports_column_and_row() {
        let t = table("f1,f2,Outcome\n1,2,0\n3,abc,1\n");
        let err = t
            .select(FeatureSelection {
                label_column: "Outcome",
                id_column: None,
            })
            .unwrap_err();
        match err {
            DatasetError::NonNumeric { column, row, value } => {
                assert_eq!(column, "f2");
                assert_eq!(row, 2);
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn missing_label_column_lists_available_columns() {
        let t = table("f1,f2\n1,2\n");
        let err = t
            .select(FeatureSelection {
                label_column: "Outcome",
                id_column: None,
            })
            .unwrap_err();
        assert!(err.to_string().contains("f1, f2"));
    }

    #[test]
    fn single_class_is_not_binary() {
        let t = table("f,y\n1,1\n2,1\n");
        let err = t
            .select(FeatureSelection {
                label_column: "y",
                id_column: None,
            })
            .unwrap_err();
        assert!(matches!(err, DatasetError::NotBinary { .. }));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = Table::from_reader("a,b\n1,2\n3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DatasetError::Csv(_)));
    }
}
