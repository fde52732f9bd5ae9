//! Correctness tests for select and argselect: the k-th order statistic
//! lands at position k with every element before/after it no larger/smaller.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use simdsort::{argselect, select};

fn check_selected(data: &[i32], k: usize) {
    let kth = data[k];
    for (i, &v) in data.iter().enumerate() {
        if i < k {
            assert!(v <= kth, "index {i}: {v} > selected {kth}");
        } else if i > k {
            assert!(v >= kth, "index {i}: {v} < selected {kth}");
        }
    }
}

#[test]
fn test_select_example_from_docs() {
    let mut data = vec![7, 2, 9, 4, 1];
    select(&mut data, 2);
    assert_eq!(data[2], 4);
    assert!(data[0] <= 4 && data[1] <= 4);
    assert!(data[3] >= 4 && data[4] >= 4);
}

#[test]
fn test_select_every_rank_small() {
    let mut rng = StdRng::seed_from_u64(0x51);
    let data: Vec<i32> = (0..300).map(|_| rng.random_range(-100..100)).collect();
    let mut expected = data.clone();
    expected.sort_unstable();

    for k in 0..data.len() {
        let mut scratch = data.clone();
        select(&mut scratch, k);
        assert_eq!(scratch[k], expected[k], "rank {k}");
        check_selected(&scratch, k);
    }
}

#[test]
fn test_select_large_and_extreme_ranks() {
    let mut rng = StdRng::seed_from_u64(0x52);
    let n = 100_000usize;
    let data: Vec<i32> = (0..n).map(|_| rng.random()).collect();
    let mut expected = data.clone();
    expected.sort_unstable();

    for k in [0usize, 1, n / 2, n - 2, n - 1] {
        let mut scratch = data.clone();
        select(&mut scratch, k);
        assert_eq!(scratch[k], expected[k], "rank {k}");
        check_selected(&scratch, k);
    }
}

#[test]
fn test_select_preserves_multiset() {
    let mut rng = StdRng::seed_from_u64(0x53);
    let data: Vec<i32> = (0..10_000).map(|_| rng.random_range(-20..20)).collect();
    let mut sorted_before = data.clone();
    sorted_before.sort_unstable();

    let mut scratch = data;
    select(&mut scratch, 5000);
    scratch.sort_unstable();
    assert_eq!(scratch, sorted_before);
}

#[test]
fn test_select_adversarial_patterns() {
    let n = 20_000;
    let patterns: Vec<Vec<i32>> = vec![
        (0..n).collect(),
        (0..n).rev().collect(),
        vec![3; n as usize],
        (0..n).map(|i| i % 5).collect(),
    ];
    for data in patterns {
        let mut expected = data.clone();
        expected.sort_unstable();
        let k = data.len() / 3;
        let mut scratch = data;
        select(&mut scratch, k);
        assert_eq!(scratch[k], expected[k]);
        check_selected(&scratch, k);
    }
}

#[test]
fn test_select_floats_with_nans() {
    let mut data = vec![3.5f32, f32::NAN, -1.0, 2.0, f32::NAN, 0.5, 9.0];
    // Five real values; rank 2 of the full slice is 2.0 once NaNs sit at
    // the tail as the largest elements.
    select(&mut data, 2);
    assert_eq!(data[2], 2.0);
    let nan_count = data.iter().filter(|v| v.is_nan()).count();
    assert_eq!(nan_count, 2);
}

#[test]
fn test_argselect_matches_select() {
    let mut rng = StdRng::seed_from_u64(0x54);
    let n = 5000usize;
    let values: Vec<i64> = (0..n).map(|_| rng.random_range(-1000..1000)).collect();
    let snapshot = values.clone();
    let mut expected = values.clone();
    expected.sort_unstable();

    for k in [0usize, 17, n / 2, n - 1] {
        let indices = argselect(&values, k);
        assert_eq!(values, snapshot, "argselect must not mutate values");

        let mut seen = vec![false; n];
        for &idx in &indices {
            assert!(!seen[idx as usize]);
            seen[idx as usize] = true;
        }

        let kth = values[indices[k] as usize];
        assert_eq!(kth, expected[k], "rank {k}");
        for (i, &idx) in indices.iter().enumerate() {
            let v = values[idx as usize];
            if i < k {
                assert!(v <= kth);
            } else if i > k {
                assert!(v >= kth);
            }
        }
    }
}

#[test]
fn test_argselect_with_nans() {
    let values = vec![1.0f64, f64::NAN, -3.0, 7.0, 0.0];
    let indices = argselect(&values, 1);
    // Real values sorted: -3.0, 0.0, 1.0, 7.0, NaN; rank 1 is 0.0.
    assert_eq!(values[indices[1] as usize], 0.0);
}
