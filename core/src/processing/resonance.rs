use crate::prelude::PeakSelection;
use std::cmp::Ordering;

/// Indices whose value equals the maximum of the closed window
/// `[i - min_distance, i + min_distance]`, ascending.
///
/// Only indices in `[min_distance, len - min_distance)` are scanned. Plateaus
/// are not collapsed: every index on a flat top is reported.
pub fn find_peaks(values: &[f64], min_distance: usize) -> Vec<usize> {
    let required = min_distance.saturating_mul(2).saturating_add(1);
    if values.len() < required {
        return Vec::new();
    }

    (min_distance..values.len() - min_distance)
        .filter(|&idx| {
            let candidate = values[idx];
            values[idx - min_distance..=idx + min_distance]
                .iter()
                .all(|&value| value <= candidate)
        })
        .collect()
}

/// Picks the two peaks used for the resonance-spacing estimate.
///
/// `values` is the curve the peaks were found on. The returned pair is always
/// in ascending index order.
pub fn select_pair(
    values: &[f64],
    peaks: &[usize],
    selection: PeakSelection,
) -> Option<(usize, usize)> {
    if peaks.len() < 2 {
        return None;
    }
    match selection {
        PeakSelection::FirstTwo => Some((peaks[0], peaks[1])),
        PeakSelection::Deepest => {
            let mut ranked = peaks.to_vec();
            ranked.sort_by(|&a, &b| {
                values[b]
                    .partial_cmp(&values[a])
                    .unwrap_or(Ordering::Equal)
                    .then(a.cmp(&b))
            });
            let (first, second) = (ranked[0], ranked[1]);
            Some((first.min(second), first.max(second)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_input_has_no_peaks() {
        for min_distance in 1..6 {
            let values = vec![1.0; 2 * min_distance];
            assert!(find_peaks(&values, min_distance).is_empty());
        }
        assert!(find_peaks(&[], 1).is_empty());
    }

    #[test]
    fn unimodal_curve_has_single_peak() {
        let values: Vec<f64> = (0..31).map(|i| -((i as f64) - 17.0).powi(2)).collect();
        assert_eq!(find_peaks(&values, 10), vec![17]);
    }

    #[test]
    fn peak_outside_scan_range_is_ignored() {
        let values: Vec<f64> = (0..31).map(|i| -((i as f64) - 3.0).powi(2)).collect();
        assert!(find_peaks(&values, 10).is_empty());
    }

    #[test]
    fn plateau_reports_every_index() {
        let values = [0.0, 1.0, 5.0, 5.0, 5.0, 1.0, 0.0];
        assert_eq!(find_peaks(&values, 1), vec![2, 3, 4]);
    }

    #[test]
    fn separated_peaks_are_ascending() {
        let values: Vec<f64> = (0..40i32)
            .map(|i| -f64::from((i - 12).abs().min((i - 30).abs())))
            .collect();
        assert_eq!(find_peaks(&values, 5), vec![12, 30]);
    }

    #[test]
    fn first_two_keeps_index_order() {
        let values = [0.0, 1.0, 0.0, 9.0, 0.0, 4.0, 0.0];
        assert_eq!(
            select_pair(&values, &[1, 3, 5], PeakSelection::FirstTwo),
            Some((1, 3))
        );
    }

    #[test]
    fn deepest_picks_highest_values() {
        let values = [0.0, 1.0, 0.0, 9.0, 0.0, 4.0, 0.0];
        assert_eq!(
            select_pair(&values, &[1, 3, 5], PeakSelection::Deepest),
            Some((3, 5))
        );
    }

    #[test]
    fn single_peak_has_no_pair() {
        assert_eq!(select_pair(&[1.0], &[0], PeakSelection::FirstTwo), None);
    }
}
