//! Data
//!
//! The tabular container consumed by the tree engine and the cross-validator.
use crate::errors::CanopyError;
use crate::utils::validate_float_parameter;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Row major numeric table whose last column is the label.
///
/// The values are owned in a single contiguous buffer, which keeps rows
/// cheap to copy when deriving subsets, shuffles and folds.
///
/// ```
/// use canopy::DataFrame;
///
/// let df = DataFrame::new(vec![1.0, 2.0, 0.0, 3.0, 4.0, 1.0], 2, 3).unwrap();
/// assert_eq!(df.n_features(), 2);
/// assert_eq!(df.labels(), vec![0.0, 1.0]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FrameParts")]
pub struct DataFrame {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

/// Deserialized fields, checked by `DataFrame::new` before use.
#[derive(Deserialize)]
struct FrameParts {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl TryFrom<FrameParts> for DataFrame {
    type Error = CanopyError;

    fn try_from(parts: FrameParts) -> Result<Self, Self::Error> {
        DataFrame::new(parts.data, parts.rows, parts.cols)
    }
}

impl DataFrame {
    /// Create a new DataFrame from row major values.
    ///
    /// * `data` - The raw values, `rows * cols` of them, row after row.
    /// * `rows` - Number of rows.
    /// * `cols` - Number of columns, including the label column.
    pub fn new(data: Vec<f64>, rows: usize, cols: usize) -> Result<Self, CanopyError> {
        if cols < 2 {
            return Err(CanopyError::InvalidShape(format!(
                "at least 2 columns (one feature and the label) are required, {} provided",
                cols
            )));
        }
        if data.len() != rows * cols {
            return Err(CanopyError::InvalidShape(format!(
                "expected {} values for {} rows and {} columns, {} provided",
                rows * cols,
                rows,
                cols,
                data.len()
            )));
        }
        Ok(DataFrame { data, rows, cols })
    }

    /// Create a new DataFrame from a list of rows of identical width.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, CanopyError> {
        let cols = rows.first().map(|r| r.len()).unwrap_or(2);
        let n_rows = rows.len();
        let mut data = Vec::with_capacity(n_rows * cols);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != cols {
                return Err(CanopyError::InvalidShape(format!(
                    "row {} has {} values, expected {}",
                    i,
                    row.len(),
                    cols
                )));
            }
            data.extend(row);
        }
        DataFrame::new(data, n_rows, cols)
    }

    /// An empty frame with the given width.
    pub fn empty(cols: usize) -> Result<Self, CanopyError> {
        DataFrame::new(Vec::new(), 0, cols)
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns, including the label.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of feature columns.
    pub fn n_features(&self) -> usize {
        self.cols - 1
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Get a single value.
    ///
    /// * `i` - The ith row of the data to get.
    /// * `j` - the jth column of the data to get.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[self.item_index(i, j)]
    }

    #[inline]
    fn item_index(&self, i: usize, j: usize) -> usize {
        i * self.cols + j
    }

    /// A full row, label included.
    pub fn row(&self, i: usize) -> &[f64] {
        let start = self.item_index(i, 0);
        &self.data[start..start + self.cols]
    }

    /// The feature values of a row.
    pub fn features(&self, i: usize) -> &[f64] {
        &self.row(i)[..self.n_features()]
    }

    /// The label of a row.
    #[inline]
    pub fn label(&self, i: usize) -> f64 {
        self.get(i, self.cols - 1)
    }

    /// Copy of a column.
    pub fn col(&self, j: usize) -> Vec<f64> {
        (0..self.rows).map(|i| self.get(i, j)).collect()
    }

    /// Copy of the label column.
    pub fn labels(&self) -> Vec<f64> {
        self.col(self.cols - 1)
    }

    /// A new frame holding the given rows, in the given order.
    pub fn subset(&self, index: &[usize]) -> DataFrame {
        let mut data = Vec::with_capacity(index.len() * self.cols);
        for i in index {
            data.extend_from_slice(self.row(*i));
        }
        DataFrame {
            data,
            rows: index.len(),
            cols: self.cols,
        }
    }

    /// Seeded Fisher-Yates permutation of all rows.
    pub fn shuffle(&self, seed: u64) -> DataFrame {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut index: Vec<usize> = (0..self.rows).collect();
        index.shuffle(&mut rng);
        self.subset(&index)
    }

    /// Draw rows at random.
    ///
    /// * `n` - Number of rows to draw, `None` draws as many rows as the frame holds.
    /// * `seed` - Seed of the generator, the same seed yields the same rows.
    /// * `replace` - Draw with replacement.
    pub fn sample(&self, n: Option<usize>, seed: u64, replace: bool) -> Result<DataFrame, CanopyError> {
        let n = n.unwrap_or(self.rows);
        if replace {
            if self.rows == 0 && n > 0 {
                return Err(CanopyError::InsufficientData(
                    "cannot sample rows from an empty frame".to_string(),
                ));
            }
            let mut rng = StdRng::seed_from_u64(seed);
            let index: Vec<usize> = (0..n).map(|_| rng.gen_range(0..self.rows)).collect();
            return Ok(self.subset(&index));
        }
        if n > self.rows {
            return Err(CanopyError::InsufficientData(format!(
                "cannot sample {} rows without replacement from {} rows",
                n, self.rows
            )));
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let mut index: Vec<usize> = (0..self.rows).collect();
        index.shuffle(&mut rng);
        index.truncate(n);
        Ok(self.subset(&index))
    }

    /// Stack frames of identical width on top of each other.
    pub fn concat(frames: &[&DataFrame]) -> Result<DataFrame, CanopyError> {
        let cols = match frames.first() {
            Some(f) => f.cols,
            None => {
                return Err(CanopyError::InvalidShape(
                    "at least one frame is required to concatenate".to_string(),
                ))
            }
        };
        let mut data = Vec::with_capacity(frames.iter().map(|f| f.data.len()).sum());
        let mut rows = 0;
        for f in frames {
            if f.cols != cols {
                return Err(CanopyError::InvalidShape(format!(
                    "cannot concatenate frames with {} and {} columns",
                    cols, f.cols
                )));
            }
            data.extend_from_slice(&f.data);
            rows += f.rows;
        }
        Ok(DataFrame { data, rows, cols })
    }

    /// Shuffle the rows and split them in a training and a test frame.
    ///
    /// * `test_size` - Proportion of rows that go to the test frame, rounded to the nearest row.
    /// * `seed` - Seed used for the shuffle.
    pub fn train_test_split(&self, test_size: f64, seed: u64) -> Result<(DataFrame, DataFrame), CanopyError> {
        validate_float_parameter(test_size, 0.0, 1.0, "test_size")?;
        let shuffled = self.shuffle(seed);
        let n_test = (test_size * self.rows as f64).round() as usize;
        let n_train = self.rows - n_test.min(self.rows);
        let train: Vec<usize> = (0..n_train).collect();
        let test: Vec<usize> = (n_train..self.rows).collect();
        Ok((shuffled.subset(&train), shuffled.subset(&test)))
    }
}

impl fmt::Display for DataFrame {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut val = String::new();
        for i in 0..self.rows {
            for j in 0..self.cols {
                val.push_str(self.get(i, j).to_string().as_str());
                if j == (self.cols - 1) {
                    val.push('\n');
                } else {
                    val.push(' ');
                }
            }
        }
        write!(f, "{}", val)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> DataFrame {
        // Row i holds (i, 10 * i, i % 2).
        let rows = (0..10).map(|i| vec![i as f64, 10.0 * i as f64, (i % 2) as f64]).collect();
        DataFrame::from_rows(rows).unwrap()
    }

    #[test]
    fn test_shape_checks() {
        assert!(DataFrame::new(vec![1.0, 2.0, 3.0], 1, 3).is_ok());
        assert!(matches!(
            DataFrame::new(vec![1.0, 2.0], 2, 1),
            Err(CanopyError::InvalidShape(_))
        ));
        assert!(matches!(
            DataFrame::new(vec![1.0, 2.0, 3.0], 2, 2),
            Err(CanopyError::InvalidShape(_))
        ));
        assert!(DataFrame::from_rows(vec![vec![1.0, 2.0], vec![1.0]]).is_err());
        let empty = DataFrame::empty(3).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.n_features(), 2);
    }

    #[test]
    fn test_accessors() {
        let df = frame();
        assert_eq!(df.rows(), 10);
        assert_eq!(df.cols(), 3);
        assert_eq!(df.get(3, 1), 30.0);
        assert_eq!(df.row(4), &[4.0, 40.0, 0.0]);
        assert_eq!(df.features(5), &[5.0, 50.0]);
        assert_eq!(df.label(5), 1.0);
        assert_eq!(df.col(0), (0..10).map(|i| i as f64).collect::<Vec<_>>());
        assert_eq!(df.labels().iter().sum::<f64>(), 5.0);
    }

    #[test]
    fn test_subset_and_concat() {
        let df = frame();
        let a = df.subset(&[2, 0]);
        let b = df.subset(&[9]);
        assert_eq!(a.row(0), df.row(2));
        assert_eq!(a.row(1), df.row(0));
        let c = DataFrame::concat(&[&a, &b]).unwrap();
        assert_eq!(c.rows(), 3);
        assert_eq!(c.row(2), df.row(9));

        let narrow = DataFrame::new(vec![1.0, 2.0], 1, 2).unwrap();
        assert!(DataFrame::concat(&[&a, &narrow]).is_err());
        assert!(DataFrame::concat(&[]).is_err());
    }

    #[test]
    fn test_shuffle_is_seeded_permutation() {
        let df = frame();
        let s1 = df.shuffle(42);
        let s2 = df.shuffle(42);
        assert_eq!(s1, s2);
        let mut ids: Vec<usize> = s1.col(0).iter().map(|v| *v as usize).collect();
        ids.sort();
        assert_eq!(ids, (0..10).collect::<Vec<_>>());
        // Rows move as a whole.
        for i in 0..s1.rows() {
            assert_eq!(s1.get(i, 1), 10.0 * s1.get(i, 0));
        }
    }

    #[test]
    fn test_sample() {
        let df = frame();
        let all = df.sample(None, 7, false).unwrap();
        assert_eq!(all, df.shuffle(7));
        let some = df.sample(Some(4), 7, false).unwrap();
        assert_eq!(some.rows(), 4);
        assert!(df.sample(Some(11), 7, false).is_err());
        let boot = df.sample(Some(25), 7, true).unwrap();
        assert_eq!(boot.rows(), 25);
        assert_eq!(boot, df.sample(Some(25), 7, true).unwrap());
        assert!(DataFrame::empty(3).unwrap().sample(Some(1), 7, true).is_err());
    }

    #[test]
    fn test_train_test_split() {
        let df = frame();
        let (train, test) = df.train_test_split(0.2, 42).unwrap();
        assert_eq!(train.rows(), 8);
        assert_eq!(test.rows(), 2);
        let mut ids: Vec<usize> = train.col(0).iter().chain(test.col(0).iter()).map(|v| *v as usize).collect();
        ids.sort();
        assert_eq!(ids, (0..10).collect::<Vec<_>>());
        assert!(df.train_test_split(1.5, 42).is_err());
    }

    #[test]
    fn test_deserialize_checks_shape() {
        let df = frame();
        let json = serde_json::to_string(&df).unwrap();
        assert_eq!(serde_json::from_str::<DataFrame>(&json).unwrap(), df);
        assert!(serde_json::from_str::<DataFrame>(r#"{"data":[],"rows":0,"cols":0}"#).is_err());
        assert!(serde_json::from_str::<DataFrame>(r#"{"data":[1.0,2.0,3.0],"rows":2,"cols":2}"#).is_err());
        let empty = serde_json::from_str::<DataFrame>(r#"{"data":[],"rows":0,"cols":3}"#).unwrap();
        assert_eq!(empty.n_features(), 2);
    }
}
