use ratatui::{prelude::*, widgets::*};

use crate::{
    config::ViewerConfig,
    dump::Diagnostic,
    ui::state::{Focussable, UiState},
};

/// UI state, effective settings and the parse diagnostics of the current document.
pub struct DebugWidget<'a> {
    pub ui: &'a UiState,
    pub config: &'a ViewerConfig,
    pub diagnostics: &'a [Diagnostic],
}

impl Widget for DebugWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let debug = &self.ui;
        let border_color = match self.ui.focus {
            Focussable::Debug => self.ui.theme.accent,
            _ => self.ui.theme.foreground,
        };
        let panel_style = Style::default()
            .bg(self.ui.theme.surface)
            .fg(self.ui.theme.foreground);

        let dump = format!("{debug:#?}\n{:#?}", self.config);
        let mut lines: Vec<Line> = dump.lines().map(Line::from).collect();
        lines.push(Line::default());
        if self.diagnostics.is_empty() {
            lines.push(Line::from("No diagnostics").fg(self.ui.theme.success));
        } else {
            lines.push(
                Line::from(format!("{} diagnostics", self.diagnostics.len()))
                    .fg(self.ui.theme.warning),
            );
            lines.extend(self.diagnostics.iter().map(|d| {
                let color = match d.kind.drops_block() {
                    true => self.ui.theme.error,
                    false => self.ui.theme.warning,
                };
                Line::from(d.to_string()).fg(color)
            }));
        }

        Paragraph::new(lines)
            .block(
                Block::bordered()
                    .title("Debug")
                    .title_alignment(Alignment::Left)
                    .border_style(Style::default().fg(border_color))
                    .border_type(BorderType::Rounded),
            )
            .alignment(HorizontalAlignment::Left)
            .wrap(Wrap { trim: false })
            .style(panel_style)
            .render(area, buf);
    }
}
