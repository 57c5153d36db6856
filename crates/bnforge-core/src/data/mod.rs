//! Tabular data consumed by the scores.
//!
//! A [`DataFrame`] stores named `f64` columns of equal length. A `NaN` entry
//! marks a missing value; rows with a missing value in any of the columns a
//! computation needs are skipped by that computation only.

mod cross_validation;
mod holdout;

use std::collections::HashMap;

use crate::error::{BnForgeError, Result};

pub use cross_validation::CrossValidation;
pub use holdout::HoldOut;

/// Column-oriented table of continuous observations.
#[derive(Debug, Clone, PartialEq)]
pub struct DataFrame {
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
    index: HashMap<String, usize>,
    num_rows: usize,
}

impl DataFrame {
    /// Builds a frame from `(name, values)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`BnForgeError::InvalidData`] on duplicate names or columns of
    /// different lengths.
    pub fn new<N: Into<String>>(columns: Vec<(N, Vec<f64>)>) -> Result<Self> {
        let mut names = Vec::with_capacity(columns.len());
        let mut values = Vec::with_capacity(columns.len());
        let mut index = HashMap::with_capacity(columns.len());
        let mut num_rows = None;

        for (name, column) in columns {
            let name = name.into();
            match num_rows {
                None => num_rows = Some(column.len()),
                Some(n) if n != column.len() => {
                    return Err(BnForgeError::InvalidData(format!(
                        "column {name} has {} rows, expected {n}",
                        column.len()
                    )));
                }
                Some(_) => {}
            }
            if index.insert(name.clone(), names.len()).is_some() {
                return Err(BnForgeError::InvalidData(format!(
                    "duplicate column name {name}"
                )));
            }
            names.push(name);
            values.push(column);
        }

        Ok(Self {
            names,
            columns: values,
            index,
            num_rows: num_rows.unwrap_or(0),
        })
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Column names in insertion order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.index.get(name).map(|&i| self.columns[i].as_slice())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn has_columns<S: AsRef<str>>(&self, names: &[S]) -> bool {
        names.iter().all(|n| self.has_column(n.as_ref()))
    }

    /// Indices of the rows where none of `names` is missing.
    ///
    /// Unknown column names make every row invalid.
    pub fn complete_rows<S: AsRef<str>>(&self, names: &[S]) -> Vec<usize> {
        let mut cols = Vec::with_capacity(names.len());
        for name in names {
            match self.column(name.as_ref()) {
                Some(c) => cols.push(c),
                None => return Vec::new(),
            }
        }
        (0..self.num_rows)
            .filter(|&row| cols.iter().all(|c| !c[row].is_nan()))
            .collect()
    }

    /// Number of rows with no missing value among `variable` and `evidence`.
    pub fn valid_rows<S: AsRef<str>>(&self, variable: &str, evidence: &[S]) -> usize {
        let mut names: Vec<&str> = Vec::with_capacity(evidence.len() + 1);
        names.push(variable);
        names.extend(evidence.iter().map(AsRef::as_ref));
        self.complete_rows(&names).len()
    }

    /// A new frame holding the given rows, in the given order.
    pub fn take_rows(&self, rows: &[usize]) -> DataFrame {
        let columns = self
            .columns
            .iter()
            .map(|c| rows.iter().map(|&r| c[r]).collect())
            .collect();
        DataFrame {
            names: self.names.clone(),
            columns,
            index: self.index.clone(),
            num_rows: rows.len(),
        }
    }
}
