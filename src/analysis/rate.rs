use crate::domain::Sample;

/// First-difference rate of change per `interval` (e.g. per hour).
///
/// Index 0 is `0.0`. An index whose sample or predecessor is missing is
/// `None`, as is every index when `interval` is not positive.
pub fn rate_of_change(series: &[Sample], interval: f64) -> Vec<Sample> {
    if series.is_empty() {
        return Vec::new();
    }
    if !(interval > 0.0) {
        return vec![None; series.len()];
    }

    std::iter::once(Some(0.0))
        .chain(series.windows(2).map(|pair| match (pair[0], pair[1]) {
            (Some(prev), Some(next)) => Some((next - prev) / interval),
            _ => None,
        }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_difference() {
        let series = vec![Some(20.0), Some(21.0), Some(20.5), None, Some(22.0)];
        let rate = rate_of_change(&series, 0.5);
        assert_eq!(rate, vec![Some(0.0), Some(2.0), Some(-1.0), None, None]);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(rate_of_change(&[], 1.0).is_empty());
        assert_eq!(rate_of_change(&[Some(1.0), Some(2.0)], 0.0), vec![None, None]);
    }
}
