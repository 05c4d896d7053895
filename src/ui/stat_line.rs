use crate::{dump::ProcessSummary, ui::state::UiState};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    macros::*,
    prelude::*,
    style::Stylize,
    widgets::*,
};

/// One process-level figure across the whole document, as a sparkline.
#[derive(Debug)]
pub struct SingleStat<'a> {
    name: String,
    unit: String,
    history: Vec<f64>,
    max: f64,
    timestamps: Vec<i64>,
    ui: &'a UiState,
}

impl SingleStat<'_> {
    /// Value at the chart cursor, or the latest one.
    fn current(&self) -> f64 {
        self.history
            .get(self.ui.selection.cursor)
            .or(self.history.last())
            .copied()
            .unwrap_or(0.0)
    }
}

pub fn split_stats<'a>(
    ui: &'a UiState,
    summaries: &[ProcessSummary],
) -> (SingleStat<'a>, SingleStat<'a>) {
    let timestamps: Vec<i64> = summaries.iter().map(|s| s.timestamp).collect();
    let cpu: Vec<f64> = summaries.iter().map(|s| s.cpu_usage).collect();
    let heap: Vec<f64> = summaries.iter().map(|s| s.heap_alloc_mb()).collect();
    let cpu_history = SingleStat {
        name: "CPU".to_string(),
        unit: "%".to_string(),
        max: cpu.iter().copied().fold(0.0, f64::max),
        history: cpu,
        timestamps: timestamps.clone(),
        ui,
    };
    let heap_history = SingleStat {
        name: "Heap".to_string(),
        unit: "MB/s".to_string(),
        max: heap.iter().copied().fold(0.0, f64::max),
        history: heap,
        timestamps,
        ui,
    };
    (cpu_history, heap_history)
}

impl<'a> Widget for &SingleStat<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [_, history, _, label, current, _] =
            horizontal![==1, *=1, ==1, ==6, ==10, ==5].areas(area);
        Text::from(self.name.clone() + ":").render(label, buf);
        ratatui::macros::line![
            span![format!("{:.1}", self.current())],
            span![format!(" {:<4}", self.unit.clone())].fg(self.ui.theme.primary_background)
        ]
        .alignment(Alignment::Right)
        .render(current, buf);
        let (Some(start), Some(end)) = (self.timestamps.first(), self.timestamps.last()) else {
            return;
        };
        // Sparkline bars are integers; scale so the peak maps to 100.
        let scale = if self.max > 0.0 { 100.0 / self.max } else { 0.0 };
        let resampled: Vec<Option<u64>> = crate::resample::resample(
            &self.history,
            &self.timestamps,
            *start,
            *end,
            history.width as usize,
        )
        .iter()
        .map(|o| o.map(|v| (v.max(0.0) * scale).round() as u64))
        .collect();
        Sparkline::default()
            .data(&resampled)
            .max(100)
            .absent_value_symbol("_")
            .fg(self.ui.theme.primary)
            .render(history, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(timestamp: i64, cpu: f64, heap_mb: f64) -> ProcessSummary {
        ProcessSummary {
            timestamp,
            cpu_usage: cpu,
            heap_alloc_rate: heap_mb * 1_048_576.0,
            threads: vec![],
        }
    }

    #[test]
    fn splits_cpu_and_heap() {
        let ui = UiState::default();
        let data = vec![summary(0, 10.0, 2.0), summary(1_000, 30.0, 1.0)];
        let (cpu, heap) = split_stats(&ui, &data);
        assert_eq!(cpu.history, [10.0, 30.0]);
        assert_eq!(cpu.max, 30.0);
        assert_eq!(heap.history, [2.0, 1.0]);
        assert_eq!(heap.max, 2.0);
        assert_eq!(heap.unit, "MB/s");
    }

    #[test]
    fn current_follows_cursor() {
        let mut ui = UiState::default();
        let data = vec![summary(0, 10.0, 2.0), summary(1_000, 30.0, 1.0)];
        ui.selection.cursor = 0;
        let (cpu, _) = split_stats(&ui, &data);
        assert_eq!(cpu.current(), 10.0);
    }

    #[test]
    fn renders_label_and_value() {
        let ui = UiState::default();
        let data = vec![summary(0, 10.0, 2.0), summary(1_000, 30.0, 1.0)];
        let (cpu, _) = split_stats(&ui, &data);
        let area = Rect::new(0, 0, 40, 1);
        let mut buf = Buffer::empty(area);
        (&cpu).render(area, &mut buf);
        let text: String = (0..area.width)
            .map(|x| buf[(x, 0)].symbol().to_string())
            .collect();
        assert!(text.contains("CPU:"), "{}", text);
        assert!(text.contains("10.0"), "{}", text);
    }
}
