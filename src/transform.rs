// Point transforms: confidence summaries and baseline comparison

use crate::aes::Aes;
use crate::error::{PlotError, Result};
use crate::plot::{point_kinds, Plot, Point};
use crate::stats;
use crate::value::{Kinds, Value};
use std::collections::HashMap;
use std::hash::Hash;

/// A named transform applied to the whole plot after all records are added.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    Summarize,
    Compare,
}

impl Transform {
    pub const ALL: [Transform; 2] = [Transform::Summarize, Transform::Compare];

    pub fn name(self) -> &'static str {
        match self {
            Transform::Summarize => "summarize",
            Transform::Compare => "compare",
        }
    }

    pub fn doc(self) -> &'static str {
        match self {
            Transform::Summarize => "collapse repeated measurements into a median and confidence interval",
            Transform::Compare => "normalize each value against the first color at the same position",
        }
    }

    pub fn from_name(name: &str) -> Result<Transform> {
        Transform::ALL
            .into_iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| PlotError::UnknownTransform(name.to_string()))
    }
}

impl Plot {
    /// Apply a named transform. Both operate on the dependent variable.
    pub fn apply(&mut self, transform: Transform, confidence: f64) -> Result<()> {
        let dv = self
            .dv_aes()
            .ok_or(PlotError::NoValueAes(transform.name()))?;
        match transform {
            Transform::Summarize => self.transform_summarize(dv, confidence),
            Transform::Compare => self.transform_compare(Aes::Color, dv),
        }
    }

    pub fn transform_summarize(&mut self, aes: Aes, confidence: f64) -> Result<()> {
        self.points = summarize(&self.points, aes, confidence)?;
        Ok(())
    }

    pub fn transform_compare(&mut self, compare_aes: Aes, ratio_aes: Aes) -> Result<()> {
        self.points = compare(&self.points, compare_aes, ratio_aes)?;
        Ok(())
    }
}

/// Group points that differ only in `aes` and replace each group with a
/// single point whose `aes` is a summary of the group.
///
/// `aes` must be numeric on every point. Already-summarized points are
/// returned unchanged.
pub fn summarize(points: &[Point], aes: Aes, confidence: f64) -> Result<Vec<Point>> {
    let kinds = point_kinds(points, aes);
    if kinds.contains(Kinds::SUMMARY) {
        return Ok(points.to_vec());
    }
    if !kinds.contains(Kinds::CONTINUOUS) {
        return Err(PlotError::NonNumeric { op: "summarize", aes });
    }

    let groups = group_by(points, |pt| {
        let mut key = pt.clone();
        key.set(aes, Value::default());
        key
    });

    // Keep it a ratio if the input is.
    let out_kinds = Kinds::CONTINUOUS | Kinds::SUMMARY | (kinds & Kinds::RATIO);

    let out = groups
        .into_iter()
        .map(|(_, group)| {
            let summary = stats::summarize(&sample(&group, aes), confidence);
            let mut pt = group[0].clone();
            pt.set(
                aes,
                Value {
                    kinds: out_kinds,
                    val: summary.center,
                    summary: Some(summary),
                    ..Default::default()
                },
            );
            pt
        })
        .collect();
    Ok(out)
}

/// Normalize `ratio_aes` against a baseline value of `compare_aes`.
///
/// Points are ordered by `compare_aes` and the first value becomes the
/// baseline for the whole set. Within every combination of the other
/// aesthetics, each non-baseline value of `compare_aes` yields one point
/// whose `ratio_aes` is its median over the baseline's median. Combinations
/// with no baseline are dropped.
pub fn compare(points: &[Point], compare_aes: Aes, ratio_aes: Aes) -> Result<Vec<Point>> {
    if points.is_empty() {
        return Ok(Vec::new());
    }
    if !point_kinds(points, ratio_aes).contains(Kinds::CONTINUOUS) {
        return Err(PlotError::NonNumeric {
            op: "compare",
            aes: ratio_aes,
        });
    }

    // Sort up-front; grouping keeps the order.
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.get(compare_aes).compare(b.get(compare_aes)));
    let baseline = sorted[0].get(compare_aes).clone();

    let groups = group_by(&sorted, |pt| {
        let mut key = pt.clone();
        key.set(compare_aes, Value::default());
        key.set(ratio_aes, Value::default());
        key
    });

    let mut out = Vec::new();
    for (_, group) in groups {
        let by_compare = group_by(&group, |pt| pt.get(compare_aes).clone());

        let Some((_, base_pts)) = by_compare.iter().find(|(v, _)| *v == baseline) else {
            tracing::debug!(baseline = %baseline, "dropping group without baseline");
            continue;
        };
        let base_median = stats::median(&sample(base_pts, ratio_aes));

        for (cmp_val, pts) in &by_compare {
            if *cmp_val == baseline {
                continue;
            }
            let ratio = stats::median(&sample(pts, ratio_aes)) / base_median;

            let mut cmp_val = cmp_val.clone();
            cmp_val.kinds |= Kinds::RATIO;
            cmp_val.denom = baseline.key.clone();

            let mut pt = pts[0].clone();
            pt.set(compare_aes, cmp_val);
            pt.set(
                ratio_aes,
                Value {
                    kinds: Kinds::CONTINUOUS | Kinds::RATIO,
                    val: ratio,
                    ..Default::default()
                },
            );
            out.push(pt);
        }
    }

    Ok(out)
}

/// Numeric values of `aes` across `points`.
fn sample(points: &[Point], aes: Aes) -> Vec<f64> {
    points
        .iter()
        .map(|pt| {
            let val = pt.get(aes);
            if !val.is(Kinds::CONTINUOUS) {
                panic!("non-continuous {}", aes);
            }
            val.val
        })
        .collect()
}

/// Group `items` by `key`, keeping groups in order of first appearance and
/// items in their original order within a group.
pub(crate) fn group_by<T: Clone, K: Eq + Hash + Clone>(
    items: &[T],
    key: impl Fn(&T) -> K,
) -> Vec<(K, Vec<T>)> {
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<T>)> = Vec::new();
    for item in items {
        let k = key(item);
        match index.get(&k) {
            Some(&i) => groups[i].1.push(item.clone()),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, vec![item.clone()]));
            }
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::Config;
    use crate::projection::{Field, Key, Projection};

    fn label(s: &str) -> Value {
        Value::discrete(Key::single(".name", s))
    }

    fn make_point(x: f64, color: &str, y: f64) -> Point {
        let mut pt = Point::default();
        pt.set(Aes::X, Value::continuous(x));
        pt.set(Aes::Color, label(color));
        pt.set(Aes::Y, Value::continuous(y));
        pt
    }

    #[test]
    fn test_group_by_keeps_first_seen_order() {
        let groups = group_by(&[3, 1, 3, 2, 1, 3], |v| *v);
        let keys: Vec<i32> = groups.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![3, 1, 2]);
        assert_eq!(groups[0].1, vec![3, 3, 3]);
        // The last element is not lost.
        let groups = group_by(&[1], |v| *v);
        assert_eq!(groups, vec![(1, vec![1])]);
    }

    #[test]
    fn test_summarize_one_point_per_combination() {
        let pts = vec![
            make_point(1.0, "a", 10.0),
            make_point(1.0, "a", 12.0),
            make_point(2.0, "a", 20.0),
            make_point(1.0, "b", 5.0),
            make_point(1.0, "a", 11.0),
        ];
        let out = summarize(&pts, Aes::Y, 0.95).unwrap();
        assert_eq!(out.len(), 3);

        let y = out[0].get(Aes::Y);
        assert!(y.is(Kinds::CONTINUOUS | Kinds::SUMMARY));
        assert_eq!(y.val, 11.0);
        let summary = y.summary.unwrap();
        assert_eq!(summary.center, 11.0);
        assert_eq!(summary.lo, f64::NEG_INFINITY);

        assert_eq!(out[1].get(Aes::X).val, 2.0);
        assert_eq!(out[2].get(Aes::Color), &label("b"));
    }

    #[test]
    fn test_summarize_is_idempotent() {
        let pts = vec![make_point(1.0, "a", 10.0), make_point(1.0, "a", 12.0)];
        let once = summarize(&pts, Aes::Y, 0.95).unwrap();
        let twice = summarize(&once, Aes::Y, 0.95).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_summarize_keeps_ratio() {
        let mut pts = vec![make_point(1.0, "a", 1.5)];
        pts[0].get_mut(Aes::Y).kinds |= Kinds::RATIO;
        let out = summarize(&pts, Aes::Y, 0.95).unwrap();
        assert!(out[0].get(Aes::Y).is(Kinds::RATIO | Kinds::SUMMARY));
    }

    #[test]
    fn test_summarize_requires_numeric() {
        let pts = vec![make_point(1.0, "a", 10.0)];
        let err = summarize(&pts, Aes::Color, 0.95).unwrap_err();
        assert_eq!(
            err,
            PlotError::NonNumeric {
                op: "summarize",
                aes: Aes::Color
            }
        );
        assert_eq!(err.to_string(), "summarize: color data must be numeric");
    }

    #[test]
    fn test_compare_against_first_value() {
        let pts = vec![
            make_point(1.0, "B", 14.0),
            make_point(1.0, "A", 10.0),
            make_point(1.0, "C", 5.0),
            make_point(1.0, "B", 16.0),
        ];
        let out = compare(&pts, Aes::Color, Aes::Y).unwrap();
        assert_eq!(out.len(), 2);

        let b = &out[0];
        assert_eq!(b.get(Aes::Color).values_string(), "B vs A");
        assert!(b.get(Aes::Color).is(Kinds::DISCRETE | Kinds::RATIO));
        assert!(b.get(Aes::Y).is(Kinds::CONTINUOUS | Kinds::RATIO));
        assert_eq!(b.get(Aes::Y).val, 1.5);

        let c = &out[1];
        assert_eq!(c.get(Aes::Color).values_string(), "C vs A");
        assert_eq!(c.get(Aes::Y).val, 0.5);
    }

    #[test]
    fn test_compare_drops_groups_without_baseline() {
        let pts = vec![
            make_point(1.0, "A", 10.0),
            make_point(1.0, "B", 20.0),
            // x=2 has no "A" measurement.
            make_point(2.0, "B", 30.0),
            make_point(2.0, "C", 30.0),
        ];
        let out = compare(&pts, Aes::Color, Aes::Y).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].get(Aes::X).val, 1.0);
        assert_eq!(out[0].get(Aes::Y).val, 2.0);
    }

    #[test]
    fn test_compare_empty_and_non_numeric() {
        assert!(compare(&[], Aes::Color, Aes::Y).unwrap().is_empty());
        let pts = vec![make_point(1.0, "A", 10.0)];
        assert!(compare(&pts, Aes::X, Aes::Color).is_err());
    }

    #[test]
    fn test_apply_requires_value_aes() {
        let mut c = Config::new();
        c.set_iv(Aes::X, Projection::fields(vec![Field::Name]));
        let mut plot = Plot::new(&c).unwrap();
        assert_eq!(
            plot.apply(Transform::Compare, 0.95).unwrap_err(),
            PlotError::NoValueAes("compare")
        );
        assert_eq!(
            plot.apply(Transform::Summarize, 0.95).unwrap_err(),
            PlotError::NoValueAes("summarize")
        );
    }

    #[test]
    fn test_transform_from_name() {
        assert_eq!(Transform::from_name("compare").unwrap(), Transform::Compare);
        assert_eq!(Transform::from_name("summarize").unwrap(), Transform::Summarize);
        assert_eq!(
            Transform::from_name("smooth").unwrap_err(),
            PlotError::UnknownTransform("smooth".to_string())
        );
    }
}
