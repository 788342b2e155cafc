//! Property tests: range and consistency invariants that hold for every
//! valid communication matrix.

use commstats_core::engine::{Metric, StatisticsEngine};
use proptest::prelude::*;

/// Square matrices of dimension 1..12 with non-negative costs and no
/// all-zero row.
fn arb_rows() -> impl Strategy<Value = Vec<Vec<f64>>> {
    (1_usize..12)
        .prop_flat_map(|n| prop::collection::vec(prop::collection::vec(0.0_f64..1000.0, n), n))
        .prop_map(|mut rows| {
            for (i, row) in rows.iter_mut().enumerate() {
                if row.iter().sum::<f64>() == 0.0 {
                    row[i] = 1.0;
                }
            }
            rows
        })
}

fn arb_engine() -> impl Strategy<Value = StatisticsEngine> {
    arb_rows().prop_map(|rows| {
        StatisticsEngine::from_rows(rows).expect("generated matrix is valid")
    })
}

const EPS: f64 = 1e-9;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn scalar_ranges(e in arb_engine()) {
        prop_assert!(e.communication_amount() >= 0.0);
        prop_assert!(e.communication_heterogeneity() >= 0.0);
        prop_assert!(e.communication_heterogeneity_v2() >= 0.0);
        prop_assert!(e.communication_balance() >= -EPS);

        let cbv2 = e.communication_balance_v2();
        prop_assert!((-EPS..1.0).contains(&cbv2), "CBv2 = {}", cbv2);

        let cc = e.communication_centrality();
        prop_assert!((0.0..=1.0).contains(&cc), "CC = {}", cc);
    }

    #[test]
    fn fractions_never_exceed_one(e in arb_engine(), k in 1_i64..16) {
        if e.dim() >= 2 {
            let nbc = e.neighbor_communication_fraction().expect("n >= 2");
            prop_assert!(nbc <= 1.0 + EPS && nbc >= -EPS, "NBC = {}", nbc);
        }
        let sp = e.split_fraction(k).expect("k >= 1");
        prop_assert!(sp <= 1.0 + EPS && sp >= -EPS, "SP({}) = {}", k, sp);
    }

    #[test]
    fn heterogeneity_v2_is_scaled_down_by_ten_thousand(e in arb_engine()) {
        let ch = e.communication_heterogeneity();
        let ch_v2 = e.communication_heterogeneity_v2();
        let expected = ch / 10_000.0;
        prop_assert!(
            (ch_v2 - expected).abs() <= EPS * expected.max(1.0),
            "CHv2 = {}, CH / 10^4 = {}", ch_v2, expected
        );
    }

    #[test]
    fn split_with_k_equal_to_n_is_zero(e in arb_engine()) {
        let n = i64::try_from(e.dim()).expect("small dimension");
        let sp = e.split_fraction(n).expect("k = n");
        prop_assert!(sp.abs() < EPS, "SP(n) = {}", sp);
    }

    #[test]
    fn split_with_k_above_n_is_one(e in arb_engine(), extra in 1_i64..8) {
        let n = i64::try_from(e.dim()).expect("small dimension");
        prop_assert_eq!(e.split_fraction(n + extra).expect("k > n"), 1.0);
    }

    #[test]
    fn split_shrinks_along_nested_divisors(e in arb_engine()) {
        let n = i64::try_from(e.dim()).expect("small dimension");
        let divisors: Vec<i64> = (1..=n).filter(|d| n % d == 0).collect();
        let sp_n = e.split_fraction(n).expect("k = n");

        for &d in &divisors {
            let sp_d = e.split_fraction(d).expect("divisor of n");
            prop_assert!(sp_n <= sp_d + EPS, "SP({}) = {} > SP({}) = {}", n, sp_n, d, sp_d);

            for &k in divisors.iter().filter(|&&k| d % k == 0) {
                let sp_k = e.split_fraction(k).expect("divisor of d");
                prop_assert!(sp_d <= sp_k + EPS, "SP({}) = {} > SP({}) = {}", d, sp_d, k, sp_k);
            }
        }
    }

    #[test]
    fn queries_are_idempotent(e in arb_engine()) {
        for metric in Metric::standard_set(&[1, 2, 3, 4]) {
            let first = e.evaluate(metric);
            let second = e.evaluate(metric);
            match (first, second) {
                (Ok(a), Ok(b)) => prop_assert_eq!(a.to_bits(), b.to_bits(), "{}", metric),
                (Err(a), Err(b)) => prop_assert_eq!(a, b),
                (a, b) => prop_assert!(false, "{}: {:?} vs {:?}", metric, a, b),
            }
        }
    }

    #[test]
    fn non_positive_k_always_fails(e in arb_engine(), k in i64::MIN..=0) {
        prop_assert!(e.split_fraction(k).is_err());
    }
}
