/// Number of stored elements for one `num_atoms x num_atoms` symmetric matrix
/// kept as its upper triangle (diagonal included).
#[inline]
pub const fn elements_per_slice(num_atoms: usize) -> usize {
    num_atoms * (num_atoms + 1) / 2
}

/// Maps the unordered residue pair `(i, j)` to its offset inside one packed
/// upper-triangular slice.
///
/// The pair is normalized so that `i <= j` before indexing, which makes
/// `offset(n, i, j) == offset(n, j, i)`. For a fixed `num_atoms` the mapping is a
/// bijection from `{(i, j) : 0 <= i <= j < num_atoms}` onto
/// `0..elements_per_slice(num_atoms)`, enumerated row by row.
///
/// Bounds are the caller's responsibility; see
/// [`CorrelationDataset::value`](super::dataset::CorrelationDataset::value) for the
/// checked accessor.
#[inline]
pub const fn offset(num_atoms: usize, i: usize, j: usize) -> usize {
    let (i, j) = if i > j { (j, i) } else { (i, j) };
    // Rows before `i` hold n + (n-1) + ... + (n-i+1) = n*i - i*(i-1)/2 entries.
    // Written as i*(i-1)/2 with `i = 0` guarded, since usize cannot go negative.
    let preceding = if i == 0 { 0 } else { num_atoms * i - i * (i - 1) / 2 };
    preceding + (j - i)
}
