use benchplot::aes::Aes;
use benchplot::plot::Point;
use benchplot::projection::Key;
use benchplot::scale::ordinal_scale;
use benchplot::stats;
use benchplot::transform::summarize;
use benchplot::value::{Kinds, Value};
use proptest::prelude::*;
use std::cmp::Ordering;

fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[a-c]{0,2}".prop_map(|s| Value::discrete(Key::single(".name", &s))),
        (-1e6f64..1e6).prop_map(Value::continuous),
        Just(Value::default()),
    ]
}

/// A value projected through a leaf field such as `/size`: always discrete,
/// and also numeric when the text parses.
fn leaf_value_strategy() -> impl Strategy<Value = Value> {
    "[0-9]{1,2}|[a-b]{1,2}".prop_map(|s| {
        let mut v = Value::discrete(Key::single("/size", &s));
        if let Ok(val) = s.parse::<f64>() {
            v.kinds |= Kinds::CONTINUOUS;
            v.val = val;
        }
        v
    })
}

/// Values that can share one aesthetic: projected independent variables,
/// or dependent-variable measurements (with or without a summary).
fn aes_values_strategy(len: usize) -> impl Strategy<Value = Vec<Value>> {
    prop_oneof![
        proptest::collection::vec(leaf_value_strategy(), len),
        proptest::collection::vec(
            (-1e6f64..1e6, any::<bool>()).prop_map(|(val, summary)| {
                let mut v = Value::continuous(val);
                if summary {
                    v.kinds |= Kinds::SUMMARY;
                }
                v
            }),
            len,
        ),
    ]
}

fn make_point(x: f64, color: &str, y: f64) -> Point {
    let mut pt = Point::default();
    pt.set(Aes::X, Value::continuous(x));
    pt.set(Aes::Color, Value::discrete(Key::single(".name", color)));
    pt.set(Aes::Y, Value::continuous(y));
    pt
}

proptest! {
    #[test]
    fn prop_compare_is_antisymmetric(a in value_strategy(), b in value_strategy()) {
        prop_assert_eq!(a.compare(&a), Ordering::Equal);
        prop_assert_eq!(a.compare(&b), b.compare(&a).reverse());
    }

    #[test]
    fn prop_compare_is_transitive(
        a in value_strategy(),
        b in value_strategy(),
        c in value_strategy(),
    ) {
        if a.compare(&b) != Ordering::Greater && b.compare(&c) != Ordering::Greater {
            prop_assert_ne!(a.compare(&c), Ordering::Greater);
        }
    }

    #[test]
    fn prop_compare_is_transitive_within_an_aesthetic(values in aes_values_strategy(3)) {
        let (a, b, c) = (&values[0], &values[1], &values[2]);
        prop_assert_eq!(a.compare(b), b.compare(a).reverse());
        if a.compare(b) != Ordering::Greater && b.compare(c) != Ordering::Greater {
            prop_assert_ne!(a.compare(c), Ordering::Greater);
        }
    }

    #[test]
    fn prop_aes_values_sort_consistently(values in aes_values_strategy(12)) {
        let mut sorted = values.clone();
        sorted.sort_by(|a, b| a.compare(b));
        for pair in sorted.windows(2) {
            prop_assert_ne!(pair[0].compare(&pair[1]), Ordering::Greater);
        }
    }

    #[test]
    fn prop_ordinal_scale_is_dense(values in proptest::collection::vec(value_strategy(), 1..30)) {
        let points: Vec<Point> = values
            .iter()
            .map(|v| {
                let mut pt = Point::default();
                pt.set(Aes::Color, v.clone());
                pt
            })
            .collect();
        let scale = ordinal_scale(&points, Aes::Color);

        let mut seen = vec![false; scale.bound()];
        for pt in &points {
            seen[scale.index_of(pt)] = true;
        }
        prop_assert!(seen.into_iter().all(|s| s));

        // Positions follow value order.
        for pair in scale.values().windows(2) {
            prop_assert_eq!(pair[0].compare(&pair[1]), Ordering::Less);
        }
    }

    #[test]
    fn prop_summarize_is_idempotent(
        samples in proptest::collection::vec((0..3u8, 0..2u8, 0.0f64..100.0), 1..40),
    ) {
        let points: Vec<Point> = samples
            .iter()
            .map(|&(x, c, y)| make_point(x as f64, if c == 0 { "a" } else { "b" }, y))
            .collect();
        let once = summarize(&points, Aes::Y, 0.95).unwrap();
        prop_assert!(once.len() <= 6);
        for pt in &once {
            prop_assert!(pt.get(Aes::Y).is(Kinds::CONTINUOUS | Kinds::SUMMARY));
        }
        let twice = summarize(&once, Aes::Y, 0.95).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_summary_brackets_median(
        sample in proptest::collection::vec(-1e3f64..1e3, 1..60),
        confidence in 0.5f64..0.99,
    ) {
        let s = stats::summarize(&sample, confidence);
        prop_assert_eq!(s.center, stats::median(&sample));
        if s.has_range() {
            prop_assert!(s.lo <= s.center && s.center <= s.hi);
        } else {
            prop_assert_eq!(s.lo, f64::NEG_INFINITY);
            prop_assert_eq!(s.hi, f64::INFINITY);
        }
    }
}
