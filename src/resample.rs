/// Resample a series of samples taken at irregular time intervals into a fixed number of bins.
/// Use a dumb 'max' strategy that simply takes the maximum value in each bin.
///
/// Timestamps are epoch milliseconds. A sample lands in a bin when
/// `bin_start < t <= bin_end`; the very first bin also takes `t == start`
/// so a document's first snapshot is not lost.
pub fn resample(
    samples: &[f64],
    timestamps: &[i64],
    start: i64,
    end: i64,
    num_bins: usize,
) -> Vec<Option<f64>> {
    if samples.is_empty() || timestamps.is_empty() || num_bins == 0 || end < start {
        return Vec::new();
    }

    let mut result = vec![None; num_bins];
    let total = (end - start) as f64;
    let bin_duration = total / num_bins as f64;

    for (i, bin) in result.iter_mut().enumerate() {
        let bin_start = start as f64 + bin_duration * i as f64;
        let bin_end = bin_start + bin_duration;

        let mut max_value: Option<f64> = None;
        for (&timestamp, &sample) in timestamps.iter().zip(samples) {
            let t = timestamp as f64;
            let inside = (t > bin_start && t <= bin_end) || (i == 0 && t == bin_start);
            if inside {
                max_value = Some(max_value.map_or(sample, |m| m.max(sample)));
            }
        }
        *bin = max_value;
    }
    result
}
