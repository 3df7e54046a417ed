use crate::data::DataFrame;

/// One train/validation pair of a k-fold split.
#[derive(Debug, Clone)]
pub struct Fold {
    /// Position of the validation block in the shuffled data.
    pub index: usize,
    pub train: DataFrame,
    pub validation: DataFrame,
}

/// Sizes of the `k` validation blocks of `n` rows.
///
/// The first `n % k` blocks get one extra row.
pub fn fold_sizes(n: usize, k: usize) -> Vec<usize> {
    if k == 0 {
        return Vec::new();
    }
    let base = n / k;
    let remainder = n % k;
    (0..k).map(|i| base + usize::from(i < remainder)).collect()
}

/// Shuffle `data` with `seed` and cut it in `k` contiguous validation blocks.
///
/// The training frame of a fold holds every other block, in order.
pub fn create_k_folds(data: &DataFrame, k: usize, seed: u64) -> Vec<Fold> {
    let shuffled = data.shuffle(seed);
    let n = shuffled.rows();
    let mut folds = Vec::with_capacity(k);
    let mut start = 0;
    for (index, size) in fold_sizes(n, k).into_iter().enumerate() {
        let end = start + size;
        let validation: Vec<usize> = (start..end).collect();
        let train: Vec<usize> = (0..start).chain(end..n).collect();
        folds.push(Fold {
            index,
            train: shuffled.subset(&train),
            validation: shuffled.subset(&validation),
        });
        start = end;
    }
    folds
}
