//! Small combinatorial helpers.

/// All k-subsets of `items`, in lexicographic order of positions.
pub(crate) fn combinations<T: Copy>(items: &[T], k: usize) -> Vec<Vec<T>> {
    let n = items.len();
    if k > n || k == 0 {
        return Vec::new();
    }
    let mut idxs: Vec<usize> = (0..k).collect();
    let mut out = Vec::new();
    loop {
        out.push(idxs.iter().map(|&i| items[i]).collect());
        // Rightmost position that can still advance.
        let Some(i) = (0..k).rev().find(|&i| idxs[i] != i + n - k) else {
            break;
        };
        idxs[i] += 1;
        for j in i + 1..k {
            idxs[j] = idxs[j - 1] + 1;
        }
    }
    out
}

/// Binomial coefficient, used to size candidate searches in tests and logs.
pub(crate) fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    (0..k).fold(1usize, |acc, i| acc * (n - i) / (i + 1))
}
