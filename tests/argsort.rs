//! Correctness tests for argsort: permutation validity, value ordering
//! through the indices, untouched input, and the NaN comparison path.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use simdsort::{argsort, argsort_into};

const BOUNDARY_SIZES: &[usize] = &[0, 1, 2, 7, 8, 9, 63, 64, 65, 127, 128, 129, 1000, 4096];

fn assert_permutation(indices: &[i64], n: usize) {
    assert_eq!(indices.len(), n);
    let mut seen = vec![false; n];
    for &idx in indices {
        assert!(
            (0..n as i64).contains(&idx),
            "index {idx} outside 0..{n}"
        );
        assert!(!seen[idx as usize], "index {idx} appears twice");
        seen[idx as usize] = true;
    }
}

fn assert_ordered_through<T: PartialOrd + Copy>(values: &[T], indices: &[i64]) {
    for pair in indices.windows(2) {
        let a = values[pair[0] as usize];
        let b = values[pair[1] as usize];
        assert!(a <= b, "values out of order through indices");
    }
}

#[test]
fn test_argsort_example_from_docs() {
    assert_eq!(argsort(&[30, 10, 20]), vec![1, 2, 0]);
}

#[test]
fn test_argsort_boundary_sizes() {
    let mut rng = StdRng::seed_from_u64(0xA55);
    for &n in BOUNDARY_SIZES {
        println!("argsorting {n} random i32 values");
        let values: Vec<i32> = (0..n).map(|_| rng.random_range(-1000..1000)).collect();
        let indices = argsort(&values);
        assert_permutation(&indices, n);
        assert_ordered_through(&values, &indices);
    }
}

#[test]
fn test_argsort_does_not_mutate_values() {
    let mut rng = StdRng::seed_from_u64(9);
    let values: Vec<f64> = (0..5000).map(|_| rng.random_range(-1.0..1.0)).collect();
    let snapshot = values.clone();
    let indices = argsort(&values);
    assert_eq!(values, snapshot);
    assert_permutation(&indices, 5000);
    assert_ordered_through(&values, &indices);
}

#[test]
fn test_argsort_adversarial_patterns() {
    let n = 30_000usize;
    let patterns: Vec<(&str, Vec<i64>)> = vec![
        ("ascending", (0..n as i64).collect()),
        ("descending", (0..n as i64).rev().collect()),
        ("all-equal", vec![5; n]),
        ("few-distinct", (0..n as i64).map(|i| i % 3).collect()),
    ];
    for (name, values) in patterns {
        println!("argsorting adversarial pattern: {name}");
        let indices = argsort(&values);
        assert_permutation(&indices, n);
        assert_ordered_through(&values, &indices);
    }
}

#[test]
fn test_argsort_into_caller_buffer() {
    let values: Vec<u32> = vec![9, 1, 8, 2, 7, 3, 6, 4, 5, 0];
    let mut indices: Vec<i64> = (0..values.len() as i64).collect();
    argsort_into(&values, &mut indices);
    assert_eq!(indices, vec![9, 1, 3, 5, 7, 8, 6, 4, 2, 0]);
}

#[test]
fn test_argsort_with_nans_routes_them_last() {
    let mut rng = StdRng::seed_from_u64(0xBAD);
    for &n in &[16usize, 100, 2000] {
        let mut values: Vec<f32> = (0..n).map(|_| rng.random_range(-50.0..50.0)).collect();
        values[0] = f32::NAN;
        values[n / 2] = f32::NAN;
        values[n - 1] = f32::NAN;

        let indices = argsort(&values);
        assert_permutation(&indices, n);

        let (head, tail) = indices.split_at(n - 3);
        assert!(head.iter().all(|&i| !values[i as usize].is_nan()));
        assert!(tail.iter().all(|&i| values[i as usize].is_nan()));
        for pair in head.windows(2) {
            assert!(values[pair[0] as usize] <= values[pair[1] as usize]);
        }
    }
}

#[test]
fn test_argsort_with_type_extremes_stays_a_bijection() {
    // Arrays full of the type maximum tie with the network's padding fill;
    // every genuine index must still appear exactly once.
    for &n in &[5usize, 63, 64, 65, 500] {
        let mut values = vec![i64::MAX; n];
        values[n / 2] = i64::MIN;
        let indices = argsort(&values);
        assert_permutation(&indices, n);
        assert_eq!(indices[0], n as i64 / 2, "size {n}: minimum must sort first");

        let values = vec![f32::INFINITY; n];
        let indices = argsort(&values);
        assert_permutation(&indices, n);
    }
}

#[test]
fn test_argsort_all_types_agree_with_comparison_sort() {
    let mut rng = StdRng::seed_from_u64(0xC0DE);
    let n = 777usize;

    let values: Vec<i16> = (0..n).map(|_| rng.random()).collect();
    let indices = argsort(&values);
    assert_permutation(&indices, n);
    assert_ordered_through(&values, &indices);

    let values: Vec<u64> = (0..n).map(|_| rng.random()).collect();
    let indices = argsort(&values);
    assert_permutation(&indices, n);
    assert_ordered_through(&values, &indices);

    let values: Vec<f32> = (0..n).map(|_| rng.random_range(-1e3..1e3)).collect();
    let indices = argsort(&values);
    assert_permutation(&indices, n);
    assert_ordered_through(&values, &indices);
}
