//! Normalized edit-distance similarity between two text fragments.

/// Levenshtein distance over Unicode scalar values, full DP matrix.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut matrix = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in matrix[0].iter_mut().enumerate() {
        *cell = j;
    }

    for i in 1..=a.len() {
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            matrix[i][j] = (matrix[i - 1][j] + 1)
                .min(matrix[i][j - 1] + 1)
                .min(matrix[i - 1][j - 1] + cost);
        }
    }

    matrix[a.len()][b.len()]
}

/// Similarity in `[0, 1]`: `(max_len - distance) / max_len`.
///
/// Two empty strings are identical (`1.0`); empty against non-empty is `0.0`.
pub fn score(a: &str, b: &str) -> f64 {
    let len_a = a.chars().count();
    let len_b = b.chars().count();
    if len_a == 0 || len_b == 0 {
        return if len_a == len_b { 1.0 } else { 0.0 };
    }
    let max_len = len_a.max(len_b);
    let distance = edit_distance(a, b);
    (max_len - distance) as f64 / max_len as f64
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
