use crate::{
    config::ViewerConfig,
    dump::Document,
    ui::{
        chart::{ChartWidget, Metric},
        debug::DebugWidget,
        stat_line::split_stats,
        state::{Focussable, Mode, UiState},
        thread_table::ThreadTableWidget,
    },
};
use ratatui::{
    buffer::Buffer, layout::Rect, macros::line as rline, macros::*, prelude::*, widgets::*,
};
use tui_logger::*;

pub struct DashboardWidget<'a> {
    pub ui: &'a UiState,
    pub document: &'a Document,
    pub config: &'a ViewerConfig,
}

impl DashboardWidget<'_> {
    fn header(&self, area: Rect, buf: &mut Buffer) {
        const FRAMES: [&str; 8] = ["⠁", "⠂", "⠄", "⡀", "⢀", "⠠", "⠐", "⠈"];
        let watch = match self.document.is_watched() {
            true => Span::from(format!(" {} watching ", FRAMES[self.ui.step_of_8_in_2_second()]))
                .fg(self.ui.theme.success),
            false => Span::from(" not watching ").fg(self.ui.theme.primary_background),
        };
        let report = self.document.report();
        let dropped = match report.dropped_blocks() {
            0 => Span::from(""),
            n => Span::from(format!(" {} blocks dropped ", n)).fg(self.ui.theme.warning),
        };
        let [file_rect, stats_rect] = horizontal![*=3, *=2].areas(area);
        rline![
            format!(" {} snapshots ", report.summaries.len()),
            dropped,
            watch,
            Span::from(self.document.file_path.display().to_string()).fg(self.ui.theme.primary)
        ]
        .render(file_rect, buf);

        let (cpu, heap) = split_stats(self.ui, self.document.summaries());
        let [cpu_rect, heap_rect] = horizontal![*=1, *=1].areas(stats_rect);
        (&cpu).render(cpu_rect, buf);
        (&heap).render(heap_rect, buf);
    }

    fn chart(&self, metric: Metric, focus: Focussable) -> ChartWidget<'_> {
        ChartWidget {
            metric,
            summaries: self.document.summaries(),
            focussed: self.ui.focus == focus,
            ui: self.ui,
        }
    }
}

impl<'a> Widget for &mut DashboardWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        let [header_rect, window_rect, log_rect] = vertical![==1, >=5, ==10].areas(area);

        let panel_style = Style::default()
            .bg(self.ui.theme.surface)
            .fg(self.ui.theme.foreground);
        let main_style = Style::default()
            .bg(self.ui.theme.background)
            .fg(self.ui.theme.foreground);
        Block::new().style(main_style).render(header_rect, buf);
        self.header(header_rect, buf);

        let main_rect = if self.ui.debug {
            let [main_rect, panel_rect] = horizontal![>=5, >=30].areas(window_rect);
            DebugWidget {
                ui: self.ui,
                config: self.config,
                diagnostics: self.document.diagnostics(),
            }
            .render(panel_rect, buf);
            main_rect
        } else {
            window_rect
        };

        let border_color = match self.ui.focus {
            Focussable::Logs => self.ui.theme.accent,
            _ => self.ui.theme.foreground,
        };
        TuiLoggerSmartWidget::default()
            .style_error(panel_style.fg(self.ui.theme.error))
            .style_debug(panel_style)
            .style_warn(panel_style.fg(self.ui.theme.warning))
            .style_trace(panel_style)
            .style_info(panel_style)
            .style(panel_style)
            .border_style(panel_style.fg(border_color))
            .output_separator(':')
            .output_timestamp(Some("%H:%M:%S".to_string()))
            .output_level(Some(TuiLoggerLevelOutput::Abbreviated))
            .output_target(true)
            .output_file(false)
            .output_line(false)
            .state(&self.ui.logger_state)
            .render(log_rect, buf);

        Block::new().style(main_style).render(main_rect, buf);

        if self.ui.mode == Mode::Zoom {
            let metric = match self.ui.focus {
                Focussable::HeapChart => Metric::HeapAlloc,
                _ => Metric::Cpu,
            };
            self.chart(metric, self.ui.focus)
                .render(main_rect.inner(Margin::new(1, 1)), buf);
            return;
        }

        let [charts_rect, table_rect] = vertical![==12, >=6].spacing(1).areas(main_rect);
        let [cpu_rect, heap_rect] = horizontal![*=1, *=1]
            .spacing(1)
            .horizontal_margin(1)
            .areas(charts_rect);
        self.chart(Metric::Cpu, Focussable::CpuChart)
            .render(cpu_rect, buf);
        self.chart(Metric::HeapAlloc, Focussable::HeapChart)
            .render(heap_rect, buf);
        ThreadTableWidget {
            summaries: self.document.summaries(),
            focussed: self.ui.focus == Focussable::Threads,
            ui: self.ui,
        }
        .render(table_rect.inner(Margin::new(1, 0)), buf);
    }
}
