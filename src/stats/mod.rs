//! Summary statistics over per-node value sequences

pub mod power_law;

use std::cmp::Ordering;

use itertools::Itertools;
use statrs::statistics::Statistics;

/// A value `top()` knows how to print
pub trait TopValue: Copy + PartialOrd {
    fn render(&self, accuracy: usize) -> String;
}

macro_rules! integer_top_value {
    ($($t:ty),*) => {
        $(impl TopValue for $t {
            fn render(&self, _accuracy: usize) -> String {
                self.to_string()
            }
        })*
    };
}

integer_top_value!(u32, u64, usize, i32, i64);

impl TopValue for f64 {
    fn render(&self, accuracy: usize) -> String {
        format!("{:.*}", accuracy, self)
    }
}

/// The `nelem` largest values, descending, joined with `", "`.
///
/// Integers print as integers, floats with `accuracy` decimals. An empty
/// sequence prints `nan`.
pub fn top<T: TopValue>(values: &[T], nelem: usize, accuracy: usize) -> String {
    if values.is_empty() {
        return "nan".to_string();
    }

    values
        .iter()
        .copied()
        .sorted_by(|a, b| b.partial_cmp(a).unwrap_or(Ordering::Equal))
        .take(nelem)
        .map(|v| v.render(accuracy))
        .join(", ")
}

/// `top()` for edge weights and strengths: when every value is a whole
/// number they print as integers, otherwise as floats
pub fn top_weights(values: &[f64], nelem: usize, accuracy: usize) -> String {
    let whole = values
        .iter()
        .all(|v| v.fract() == 0.0 && v.abs() < i64::MAX as f64);
    if whole {
        let integers: Vec<i64> = values.iter().map(|&v| v as i64).collect();
        top(&integers, nelem, accuracy)
    } else {
        top(values, nelem, accuracy)
    }
}

/// Arithmetic mean; NaN for an empty sequence
pub fn mean(values: &[f64]) -> f64 {
    values.mean()
}

/// Population standard deviation; NaN for an empty sequence
pub fn std_dev(values: &[f64]) -> f64 {
    values.population_std_dev()
}

/// Values of `per_node` at the given nodes
pub fn gather<T: Copy>(per_node: &[T], members: &[u32]) -> Vec<T> {
    members.iter().map(|&node| per_node[node as usize]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_of_empty_is_nan() {
        let empty: [f64; 0] = [];
        assert_eq!(top(&empty, 5, 10), "nan");
        let empty: [u32; 0] = [];
        assert_eq!(top(&empty, 5, 10), "nan");
    }

    #[test]
    fn whole_weights_print_as_integers() {
        assert_eq!(top_weights(&[3.0, 9.0, 1.0], 5, 10), "9, 3, 1");
        assert_eq!(top_weights(&[3.0, 0.5], 5, 2), "3.00, 0.50");
        assert_eq!(top_weights(&[], 5, 10), "nan");
    }

    #[test]
    fn top_integers_descending() {
        assert_eq!(top(&[3u32, 9, 1, 7, 5, 8, 2], 5, 10), "9, 8, 7, 5, 3");
        assert_eq!(top(&[4usize, 2], 5, 10), "4, 2");
    }

    #[test]
    fn top_floats_fixed_accuracy() {
        assert_eq!(top(&[0.5, 0.25, 1.0], 2, 3), "1.000, 0.500");
        assert_eq!(top(&[1.0 / 3.0], 5, 10), "0.3333333333");
    }

    #[test]
    fn mean_and_population_std_dev() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((mean(&values) - 5.0).abs() < 1e-12);
        assert!((std_dev(&values) - 2.0).abs() < 1e-12);
        assert!(mean(&[]).is_nan());
    }

    #[test]
    fn gather_picks_members() {
        assert_eq!(gather(&[10, 20, 30], &[2, 0]), vec![30, 10]);
    }
}
