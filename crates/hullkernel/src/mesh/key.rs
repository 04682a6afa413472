use std::fmt;

/// Order-independent integer identity of a simplex given by vertex indices.
///
/// The sorted indices are read as digits in base `base` (normally the number of
/// points), so distinct index sets below `base` never collide. `u128` keeps up
/// to four digits exact for any realistic point count.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SimplexKey(pub u128);

impl SimplexKey {
    pub fn new(indices: &[usize], base: usize) -> Self {
        debug_assert!(indices.len() <= 4, "keys cover simplices up to 4 vertices");
        debug_assert!(indices.iter().all(|&i| i < base.max(1)));
        let mut sorted = [0usize; 4];
        let n = indices.len().min(4);
        sorted[..n].copy_from_slice(&indices[..n]);
        sorted[..n].sort_unstable();
        let base = base.max(1) as u128;
        Self(sorted[..n].iter().fold(0u128, |acc, &i| acc * base + i as u128))
    }
}

impl fmt::Debug for SimplexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SimplexKey({:#x})", self.0)
    }
}
