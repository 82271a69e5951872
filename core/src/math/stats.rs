pub struct StatsHelper;

impl StatsHelper {
    pub fn mean(values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }

    pub fn min(values: &[f64]) -> Option<f64> {
        values.iter().copied().reduce(f64::min)
    }

    pub fn max(values: &[f64]) -> Option<f64> {
        values.iter().copied().reduce(f64::max)
    }

    /// Index of the smallest value; the first one wins on ties.
    pub fn argmin(values: &[f64]) -> Option<usize> {
        values
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (idx, &value)| match best {
                Some((_, current)) if current <= value => best,
                _ => Some((idx, value)),
            })
            .map(|(idx, _)| idx)
    }
}
