//! Descriptive statistics over interval sequences

use serde::{Serialize, Serializer};

/// Arithmetic mean with an explicit "no data" value.
///
/// An empty input produces [`Mean::Zero`], which serializes as the integer
/// `0`. Any non-empty input produces [`Mean::Value`], serialized as a float
/// even when the mean happens to be `0.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mean {
    Zero,
    Value(f64),
}

impl Mean {
    /// Numeric value, with `Zero` mapped to `0.0`
    pub fn as_f64(&self) -> f64 {
        match self {
            Mean::Zero => 0.0,
            Mean::Value(value) => *value,
        }
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Mean::Zero)
    }
}

impl Serialize for Mean {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Mean::Zero => serializer.serialize_u64(0),
            Mean::Value(value) => serializer.serialize_f64(*value),
        }
    }
}

/// Arithmetic mean of a sequence of intervals (sum divided by count).
pub fn mean<I>(values: I) -> Mean
where
    I: IntoIterator<Item = i64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0i64, 0usize), |(sum, count), value| (sum + value, count + 1));

    if count == 0 {
        Mean::Zero
    } else {
        Mean::Value(sum as f64 / count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_empty_is_exact_zero() {
        let result = mean(Vec::new());
        assert_eq!(result, Mean::Zero);
        assert!(result.is_zero());
        assert_ne!(result, Mean::Value(0.0));
    }

    #[test]
    fn test_mean_values() {
        assert_eq!(mean(vec![1, 2, 3]), Mean::Value(2.0));
        assert_eq!(
            mean(vec![123, 234, 345, 456, 567, 678, 789, 890]),
            Mean::Value(510.25)
        );
    }

    #[test]
    fn test_mean_of_ranges() {
        for n in 1..200i64 {
            let expected = (n - 1) as f64 / 2.0;
            assert_eq!(mean(0..n), Mean::Value(expected), "range 0..{}", n);
        }
    }

    #[test]
    fn test_mean_of_values_summing_to_zero_is_float() {
        let result = mean(vec![-5, 5]);
        assert_eq!(result, Mean::Value(0.0));
        assert!(!result.is_zero());
    }

    #[test]
    fn test_mean_serialization_distinguishes_zero() {
        assert_eq!(serde_json::to_string(&Mean::Zero).unwrap(), "0");
        assert_eq!(serde_json::to_string(&Mean::Value(0.0)).unwrap(), "0.0");
        assert_eq!(serde_json::to_string(&mean(vec![1, 2])).unwrap(), "1.5");
    }

    #[test]
    fn test_as_f64() {
        assert_eq!(Mean::Zero.as_f64(), 0.0);
        assert_eq!(Mean::Value(42.5).as_f64(), 42.5);
    }
}
