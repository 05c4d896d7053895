use crate::{
    dump::ProcessSummary,
    timeline::{bounds, cpu_series, format_clock, heap_series},
    ui::{state::UiState, theme::Theme},
};
use ratatui::{
    buffer::Buffer, layout::Rect, macros::line as rline, prelude::*, style::Stylize, widgets::*,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Cpu,
    HeapAlloc,
}

impl Metric {
    fn title(&self) -> &'static str {
        match self {
            Metric::Cpu => " CPU Usage ",
            Metric::HeapAlloc => " Heap Allocation Rate ",
        }
    }

    fn unit(&self) -> &'static str {
        match self {
            Metric::Cpu => "%",
            Metric::HeapAlloc => "MB/s",
        }
    }

    fn series(&self, summaries: &[ProcessSummary]) -> Vec<(f64, f64)> {
        match self {
            Metric::Cpu => cpu_series(summaries),
            Metric::HeapAlloc => heap_series(summaries),
        }
    }
}

/// Line chart of one process-level metric over the document.
///
/// ```"not rust"
/// ╭ CPU Usage ─ 10:15:12 51.9% ─────────────────╮
/// │ %                                           │
/// │ 57.09┤      •••                             │
/// │      │   •••   ••••                         │
/// │  0.00┼──────────────────────────────────    │
/// │      10:15:02        10:15:42               │
/// ╰─────────────────────────────────────────────╯
/// ```
pub struct ChartWidget<'a> {
    pub metric: Metric,
    pub summaries: &'a [ProcessSummary],
    pub focussed: bool,
    pub ui: &'a UiState,
}

impl ChartWidget<'_> {
    fn cursor_line(&self, series: &[(f64, f64)]) -> Line<'_> {
        match series.get(self.ui.selection.cursor) {
            Some((x, y)) => rline![
                " ",
                format_clock(*x as i64).fg(self.ui.theme.foreground),
                " ",
                format!("{:.2}{}", y, self.metric.unit()).fg(self.ui.theme.accent),
                " "
            ],
            None => Line::default(),
        }
    }

    fn brush_indicator(&self) -> Span<'_> {
        const FRAMES: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];
        if self.ui.selection.is_selecting() {
            Span::from(format!(" {} selecting ", FRAMES[self.ui.step_of_8_in_1_second()]))
                .fg(self.ui.theme.accent)
        } else {
            Span::from("")
        }
    }

    fn empty_indicator(&self) -> &'static str {
        const FRAMES: [&str; 4] = ["◑", "◒", "◐", "◓"];
        FRAMES[self.ui.step_of_4_in_1_second()]
    }
}

impl Widget for ChartWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_color = match self.focussed {
            true => self.ui.theme.accent,
            false => self.ui.theme.primary_background,
        };
        let series = self.metric.series(self.summaries);
        let border = Block::bordered()
            .title_top(rline![self.metric.title().fg(self.ui.theme.primary)])
            .title_top(self.cursor_line(&series))
            .title_top(rline![self.brush_indicator()].right_aligned())
            .border_style(Style::default().bg(self.ui.theme.surface).fg(border_color))
            .bg(self.ui.theme.surface)
            .border_type(BorderType::Rounded);
        let inner = border.inner(area);
        border.render(area, buf);

        if series.is_empty() {
            let text = Text::from(format!("{} No Data", self.empty_indicator()));
            let area = inner.centered(
                Constraint::Length(text.width() as u16),
                Constraint::Length(1),
            );
            text.render(area, buf);
            return;
        }

        let selected: Vec<(f64, f64)> = series
            .iter()
            .enumerate()
            .filter(|(i, _)| self.ui.selection.covers(self.summaries, *i))
            .map(|(_, p)| *p)
            .collect();
        let cursor: Vec<(f64, f64)> = series
            .get(self.ui.selection.cursor)
            .into_iter()
            .copied()
            .collect();

        let base_style = Style::default()
            .bg(self.ui.theme.surface)
            .fg(self.ui.theme.foreground);
        let mut datasets = vec![
            Dataset::default()
                .name(self.metric.unit())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(base_style.fg(self.ui.theme.secondary))
                .data(&series),
        ];
        if !selected.is_empty() {
            datasets.push(
                Dataset::default()
                    .marker(symbols::Marker::Braille)
                    .graph_type(GraphType::Scatter)
                    .style(base_style.fg(Theme::darken(self.ui.theme.accent, 0.2)))
                    .data(&selected),
            );
        }
        datasets.push(
            Dataset::default()
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(base_style.fg(self.ui.theme.accent))
                .data(&cursor),
        );

        let ([x_min, x_max], [y_min, y_max]) = bounds(&series);
        let x_axis = Axis::default()
            .style(base_style)
            .bounds([x_min, x_max])
            .labels([
                rline![format_clock(x_min as i64)],
                rline![format_clock(((x_min + x_max) / 2.0) as i64)],
                rline![format_clock(x_max as i64)],
            ]);
        let y_axis = Axis::default()
            .title(self.metric.unit())
            .style(base_style)
            .bounds([y_min, y_max])
            .labels([
                rline![format!("{:.2}", y_min)],
                rline![format!("{:.2}", (y_min + y_max) / 2.0)],
                rline![format!("{:.2}", y_max)],
            ]);
        Chart::new(datasets)
            .x_axis(x_axis)
            .y_axis(y_axis)
            .style(base_style)
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dump::parse_document;

    fn buffer_text(buf: &Buffer) -> String {
        let area = buf.area;
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn renders_title_and_cursor_value() {
        let summaries = parse_document(include_str!("../../testdata/ttop.txt"));
        let mut ui = UiState::default();
        ui.selection.cursor = 1;
        let area = Rect::new(0, 0, 80, 12);
        let mut buf = Buffer::empty(area);
        ChartWidget {
            metric: Metric::Cpu,
            summaries: &summaries,
            focussed: true,
            ui: &ui,
        }
        .render(area, &mut buf);
        let text = buffer_text(&buf);
        assert!(text.contains("CPU Usage"), "{}", text);
        assert!(text.contains("51.90%"), "{}", text);
    }

    #[test]
    fn heap_chart_is_in_megabytes() {
        let summaries = parse_document(include_str!("../../testdata/ttop.txt"));
        let mut ui = UiState::default();
        ui.selection.cursor = 0;
        let area = Rect::new(0, 0, 80, 12);
        let mut buf = Buffer::empty(area);
        ChartWidget {
            metric: Metric::HeapAlloc,
            summaries: &summaries,
            focussed: false,
            ui: &ui,
        }
        .render(area, &mut buf);
        let text = buffer_text(&buf);
        assert!(text.contains("234.00MB/s"), "{}", text);
    }

    #[test]
    fn empty_document_says_so() {
        let ui = UiState::default();
        let area = Rect::new(0, 0, 40, 6);
        let mut buf = Buffer::empty(area);
        ChartWidget {
            metric: Metric::Cpu,
            summaries: &[],
            focussed: false,
            ui: &ui,
        }
        .render(area, &mut buf);
        assert!(buffer_text(&buf).contains("No Data"));
    }
}
