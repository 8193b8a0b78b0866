//! Property-based tests for the linear algebra, the barrier searches and the tensor
//! construction.
//!
//! Sizes are kept small enough that both barrier engines finish quickly on every case.

use gf2barrier::{
    barrier_best_first, barrier_exhaustive, energy, enumerate_codewords, null_space_basis,
    row_reduce, syndrome, tensor_codeword, tensor_parity_check, BarrierEngine, BitMatrix,
    BitVector, Landscape, SearchConfig, StoreKind,
};
use proptest::prelude::*;

/// A random `rows × cols` matrix with `rows` in `1..=max_rows` and `cols` in `1..=max_cols`.
fn matrix(max_rows: usize, max_cols: usize) -> impl Strategy<Value = BitMatrix> {
    (1..=max_rows, 1..=max_cols).prop_flat_map(|(rows, cols)| {
        prop::collection::vec(prop::collection::vec(0u8..=1, cols), rows)
            .prop_map(|entries| BitMatrix::from_rows(&entries).unwrap())
    })
}

/// A matrix together with an arbitrary state of matching length.
fn matrix_and_state(
    max_rows: usize,
    max_cols: usize,
) -> impl Strategy<Value = (BitMatrix, BitVector)> {
    matrix(max_rows, max_cols).prop_flat_map(|h| {
        let n = h.cols();
        (Just(h), prop::collection::vec(any::<bool>(), n))
            .prop_map(|(h, bits)| (h, BitVector::from_bool_vec(&bits)))
    })
}

/// Peak energy of the walk that sets the bits of `target` from left to right.
fn greedy_walk_peak(h: &BitMatrix, target: &BitVector) -> usize {
    let mut x = BitVector::zeros(target.len());
    let mut peak = energy(h, &x).unwrap();
    for i in target.support() {
        x.flip(i);
        peak = peak.max(energy(h, &x).unwrap());
    }
    peak
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_rref_is_idempotent(h in matrix(6, 10)) {
        let rref = row_reduce(&h);
        let again = row_reduce(&rref.matrix);
        prop_assert_eq!(&again.matrix, &rref.matrix);
        prop_assert_eq!(&again.pivots, &rref.pivots);
        prop_assert_eq!(again.rank, rref.rank);
        prop_assert_eq!(rref.rank, h.rank());
        prop_assert!(rref.rank <= h.rows().min(h.cols()));
        for r in rref.rank..h.rows() {
            prop_assert!(rref.matrix.row(r).is_zero());
        }
    }

    #[test]
    fn prop_codewords_form_the_null_space(h in matrix(6, 10)) {
        let words = enumerate_codewords(&h).unwrap();
        prop_assert_eq!(words.len(), 1usize << (h.cols() - h.rank()));
        prop_assert!(words.contains(&BitVector::zeros(h.cols())));
        prop_assert!(words.windows(2).all(|w| w[0] < w[1]));
        for w in &words {
            prop_assert_eq!(energy(&h, w), Ok(0));
        }
        for a in words.iter().take(16) {
            for b in words.iter().take(16) {
                prop_assert!(words.binary_search(&(a ^ b)).is_ok());
            }
        }
        prop_assert_eq!(null_space_basis(&h).len(), h.cols() - h.rank());
    }

    #[test]
    fn prop_landscape_matches_energy((h, x) in matrix_and_state(8, 12)) {
        let land = Landscape::new(&h);
        let mut s = land.syndrome_of(&BitVector::zeros(h.cols()));
        let mut y = BitVector::zeros(h.cols());
        for i in x.support() {
            y.flip(i);
            let e = land.flip(&mut s, i);
            prop_assert_eq!(Ok(e), energy(&h, &y));
        }
        prop_assert_eq!(Ok(s), syndrome(&h, &x));
    }

    #[test]
    fn prop_engines_agree((h, target) in matrix_and_state(6, 9)) {
        let a = barrier_best_first(&h, &target).unwrap();
        for store in [StoreKind::Hash, StoreKind::Dense] {
            let config = SearchConfig::default().with_store(store);
            for engine in [BarrierEngine::BestFirst, BarrierEngine::Exhaustive] {
                let e = engine.barrier(&h, &target, &config);
                prop_assert_eq!(e, Ok(a), "{:?} with {:?}", engine, store);
            }
        }
        prop_assert!(a >= energy(&h, &target).unwrap());
        prop_assert!(a <= greedy_walk_peak(&h, &target));
        prop_assert!(a <= h.rows());
    }

    #[test]
    fn prop_engines_agree_on_codewords(h in matrix(5, 9)) {
        let hash = SearchConfig::default().with_store(StoreKind::Hash);
        for word in enumerate_codewords(&h).unwrap() {
            let e = barrier_best_first(&h, &word);
            prop_assert_eq!(&barrier_exhaustive(&h, &word), &e);
            prop_assert_eq!(&BarrierEngine::BestFirst.barrier(&h, &word, &hash), &e);
            prop_assert_eq!(&BarrierEngine::Exhaustive.barrier(&h, &word, &hash), &e);
        }
    }

    #[test]
    fn prop_zero_target_has_zero_barrier(h in matrix(8, 30)) {
        let zero = BitVector::zeros(h.cols());
        prop_assert_eq!(barrier_best_first(&h, &zero), Ok(0));
        prop_assert_eq!(barrier_exhaustive(&h, &zero), Ok(0));
    }

    #[test]
    fn prop_tensor_of_codewords_is_a_codeword(h1 in matrix(4, 5), h2 in matrix(4, 5)) {
        let h3 = tensor_parity_check(&h1, &h2);
        prop_assert_eq!(h3.rows(), h1.rows() * h2.cols() + h1.cols() * h2.rows());
        prop_assert_eq!(h3.cols(), h1.cols() * h2.cols());
        for c1 in enumerate_codewords(&h1).unwrap() {
            for c2 in enumerate_codewords(&h2).unwrap() {
                let c3 = tensor_codeword(&c1, &c2);
                prop_assert_eq!(c3.weight(), c1.weight() * c2.weight());
                prop_assert_eq!(energy(&h3, &c3), Ok(0));
            }
        }
    }
}
