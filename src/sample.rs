//! Sequence sampling over index ranges.
//!
//! Sampling is fail-soft, unlike verification: an index where evaluation
//! fails records its error and sampling continues, so one domain error does
//! not blank an entire visualization.

crate::prelude!();

use expr::EvalError;
use formula::Formula;

/// One sampled point: an index paired with its evaluation outcome.
pub type Point = (Idx, Result<Int, EvalError>);

/// A materialized slice of a sequence over an inclusive index range.
///
/// Points are stored in ascending index order, one per index of the range.
/// Samples are never mutated; changing the range or the formula means
/// sampling again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    /// The points, in ascending index order.
    points: Vec<Point>,
}
impl Sample {
    /// The points, in ascending index order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Number of sampled indices.
    pub fn len(&self) -> usize {
        self.points.len()
    }
    /// True if the sample is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The outcome at some index of the sampled range.
    pub fn value_at(&self, idx: Idx) -> Option<&Result<Int, EvalError>> {
        let first = self.points.first()?.0;
        self.points.get(idx.checked_sub(first)?).map(|(_, res)| res)
    }

    /// Largest successful value of the sample.
    pub fn max_value(&self) -> Option<&Int> {
        self.points
            .iter()
            .filter_map(|(_, res)| res.as_ref().ok())
            .max()
    }
    /// Smallest successful value of the sample.
    pub fn min_value(&self) -> Option<&Int> {
        self.points
            .iter()
            .filter_map(|(_, res)| res.as_ref().ok())
            .min()
    }
}
impl fmt::Display for Sample {
    /// One `index | value` row per point; failed indices are marked with `!`
    /// and never dropped.
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        for (pos, (idx, res)) in self.points.iter().enumerate() {
            if pos > 0 {
                writeln!(fmt)?;
            }
            match res {
                Ok(val) => write!(fmt, "{: >4} | {}", idx, val)?,
                Err(e) => write!(fmt, "{: >4} | !{}", idx, e)?,
            }
        }
        Ok(())
    }
}
impl<'a> IntoIterator for &'a Sample {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;
    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Samples `formula` over the inclusive range `[from, to]`.
///
/// Fails if `from > to`. Each call is independent and side-effect-free;
/// callers re-sample whenever their range changes.
///
/// # Examples
///
/// ```rust
/// # use indukt::{formula::Formula, prelude::Int, sample};
/// let naturals = Formula::compile("n * (n + 1) / 2").unwrap();
/// let sample = sample::sample(&naturals, 1, 5).unwrap();
/// let values: Vec<_> = sample
///     .points()
///     .iter()
///     .map(|(_, res)| res.clone().unwrap())
///     .collect();
/// assert_eq!(values, vec![1, 3, 6, 10, 15].into_iter().map(Int::from).collect::<Vec<_>>());
/// ```
pub fn sample(formula: &Formula, from: Idx, to: Idx) -> Res<Sample> {
    if from > to {
        bail!("illegal sampling range [{}, {}]", from, to)
    }
    let mut points = Vec::with_capacity(to - from + 1);
    for idx in from..=to {
        points.push((idx, formula.eval(idx)));
    }
    Ok(Sample { points })
}
