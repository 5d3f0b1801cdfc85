//! Descriptive statistics over small slices of stat values.
//!
//! Values compare exactly. The source data is small decimal-quantized numbers;
//! arbitrary floating-point data would need an epsilon here.

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Middle value; the average of the two middle values for even counts.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Competition rank ("1224"): one plus the number of strictly greater values.
pub fn competition_rank(value: f64, population: &[f64]) -> usize {
    1 + population.iter().filter(|other| **other > value).count()
}

pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn median_handles_odd_and_even_counts() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn mean_of_empty_is_none() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[1.0, 2.0, 6.0]), Some(3.0));
    }

    #[test]
    fn ties_share_competition_rank() {
        let population = [90.0, 80.0, 80.0, 70.0];
        assert_eq!(competition_rank(90.0, &population), 1);
        assert_eq!(competition_rank(80.0, &population), 2);
        assert_eq!(competition_rank(70.0, &population), 4);
    }

    #[test]
    fn rounding_keeps_one_decimal() {
        assert_eq!(round_one_decimal(400.04), 400.0);
        assert_eq!(round_one_decimal(12.36), 12.4);
        assert_eq!(round_one_decimal(-3.25), -3.3);
    }
}
