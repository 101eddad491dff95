use crate::primitives::RandomnessRegistry;

use super::Result;

/// Generate a random permutation of `0..g` using Fisher-Yates, drawing from
/// the named randomness source. `perm[i]` is the original position whose
/// element now sits at position `i`.
pub fn random_permutation(g: usize, rand_name: &str, registry: &mut RandomnessRegistry) -> Result<Vec<usize>> {
    let mut pi: Vec<usize> = (0..g).collect();
    for i in 1..g {
        let j = registry.next_below(rand_name, (i + 1) as u64)? as usize;
        pi.swap(i, j);
    }
    Ok(pi)
}

/// Invert a permutation: `inverse[perm[i]] == i`.
pub fn inverse_permutation(perm: &[usize]) -> Vec<usize> {
    let mut inv = vec![0usize; perm.len()];
    for (i, &p) in perm.iter().enumerate() {
        inv[p] = i;
    }
    inv
}

/// Apply `perm` to `x`: the element at `perm[i]` in `x` ends up at position
/// `i` in the result.
pub fn apply_permutation<T: Clone>(perm: &[usize], x: &[T]) -> Vec<T> {
    perm.iter().map(|&p| x[p].clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_inverse() {
        let mut reg = RandomnessRegistry::new();
        reg.init("test_random_permutation", None);
        let n = 10;
        let x: Vec<usize> = (0..n).collect();
        for _ in 1..5 {
            let perm = random_permutation(n, "test_random_permutation", &mut reg).unwrap();
            let mut sorted = perm.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, (0..n).collect::<Vec<_>>());
            let perm_inv = inverse_permutation(&perm);
            let y = apply_permutation(&perm, &x);
            let z = apply_permutation(&perm_inv, &y);
            assert_eq!(z, x);
        }
    }

    #[test]
    fn distinct_permutations_are_likely_distinct() {
        let mut reg = RandomnessRegistry::new();
        reg.init("test_random_permutation", None);
        let perm1 = random_permutation(100, "test_random_permutation", &mut reg).unwrap();
        let perm2 = random_permutation(100, "test_random_permutation", &mut reg).unwrap();
        assert_ne!(perm1, perm2);
    }

    #[test]
    fn single_element_permutation_is_identity() {
        let mut reg = RandomnessRegistry::new();
        reg.init("s", None);
        assert_eq!(random_permutation(1, "s", &mut reg).unwrap(), vec![0]);
        assert_eq!(random_permutation(0, "s", &mut reg).unwrap(), Vec::<usize>::new());
    }
}
