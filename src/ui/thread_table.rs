use crate::{
    dump::{ProcessSummary, rate::BYTES_PER_MB},
    table::{SortField, ThreadRow, range_label, rows_for},
    timeline::format_timestamp,
    ui::state::UiState,
};
use ratatui::{
    buffer::Buffer, layout::Rect, macros::line as rline, prelude::*, style::Stylize, widgets::*,
};

/// Threads of the latest snapshot, or of the selected range, one page at a time.
pub struct ThreadTableWidget<'a> {
    pub summaries: &'a [ProcessSummary],
    pub focussed: bool,
    pub ui: &'a UiState,
}

impl ThreadTableWidget<'_> {
    fn header(&self) -> Row<'_> {
        let cells = SortField::ALL.iter().enumerate().map(|(i, field)| {
            let mut title = format!("{} {}", i + 1, field.title());
            if *field == self.ui.sort.field {
                title = format!("{} {}", title, self.ui.sort.direction.arrow());
                Cell::from(title).fg(self.ui.theme.accent)
            } else {
                Cell::from(title).fg(self.ui.theme.primary)
            }
        });
        Row::new(cells).bold()
    }

    fn row<'r>(&self, index: usize, row: &ThreadRow<'r>) -> Row<'r> {
        let bg = if index % 2 == 1 {
            self.ui.theme.stripe(self.ui.theme_name)
        } else {
            self.ui.theme.surface
        };
        Row::new([
            Cell::from(format_timestamp(row.timestamp)),
            Cell::from(row.thread.id.as_str()),
            Cell::from(row.thread.name.as_str()),
            Cell::from(row.thread.state.as_str()),
            Cell::from(format!("{:.2}%", row.thread.cpu_usage)),
            Cell::from(format!("{:.2} MB/s", row.thread.alloc_rate / BYTES_PER_MB)),
        ])
        .bg(bg)
    }
}

impl Widget for ThreadTableWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let range = self.ui.selection.range();
        let mut rows = rows_for(self.summaries, range);
        self.ui.sort.sort(&mut rows);
        let total_pages = self.ui.pager.total_pages(rows.len());
        let page = self.ui.pager.slice(&rows);

        let border_color = match self.focussed {
            true => self.ui.theme.accent,
            false => self.ui.theme.primary_background,
        };
        let mut border = Block::bordered()
            .title_top(rline![" Thread Details ".fg(self.ui.theme.primary)])
            .title_top(rline![
                " Showing threads for: ",
                range_label(self.summaries, range).fg(self.ui.theme.foreground),
                " "
            ])
            .border_style(Style::default().bg(self.ui.theme.surface).fg(border_color))
            .bg(self.ui.theme.surface)
            .border_type(BorderType::Rounded);
        if total_pages > 1 {
            border = border.title_bottom(
                rline![format!(" Page {} of {} ", self.ui.pager.page, total_pages)]
                    .right_aligned(),
            );
        }
        let inner = border.inner(area);
        border.render(area, buf);

        if page.is_empty() {
            let text = Text::from("No Threads");
            let area = inner.centered(
                Constraint::Length(text.width() as u16),
                Constraint::Length(1),
            );
            text.render(area, buf);
            return;
        }

        let widths = [
            Constraint::Length(21),
            Constraint::Length(12),
            Constraint::Fill(1),
            Constraint::Length(10),
            Constraint::Length(13),
            Constraint::Length(19),
        ];
        let body: Vec<Row> = page
            .iter()
            .enumerate()
            .map(|(i, row)| self.row(i, row))
            .collect();
        let table = Table::new(body, widths)
            .header(self.header())
            .column_spacing(1)
            .style(
                Style::default()
                    .bg(self.ui.theme.surface)
                    .fg(self.ui.theme.foreground),
            );
        Widget::render(table, inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dump::parse_document, table::Pager, timeline::TimeRange};

    fn render(ui: &UiState, summaries: &[ProcessSummary]) -> String {
        let area = Rect::new(0, 0, 140, 12);
        let mut buf = Buffer::empty(area);
        ThreadTableWidget {
            summaries,
            focussed: true,
            ui,
        }
        .render(area, &mut buf);
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
    fn latest_snapshot_without_threads() {
        let summaries = parse_document(include_str!("../../testdata/ttop.txt"));
        let ui = UiState::default();
        let text = render(&ui, &summaries);
        assert!(text.contains("No Threads"), "{}", text);
    }

    #[test]
    fn range_rows_sorted_and_paged() {
        let summaries = parse_document(include_str!("../../testdata/ttop.txt"));
        let mut ui = UiState::default();
        ui.pager = Pager::new(3);
        ui.selection = {
            let mut sel = crate::timeline::Selection::default();
            sel.toggle(&summaries);
            sel.end(summaries.len());
            sel.toggle(&summaries);
            sel
        };
        assert_eq!(
            ui.selection.range(),
            Some(&TimeRange::new(1_710_411_302_123, 1_710_411_342_131))
        );
        let text = render(&ui, &summaries);
        assert!(text.contains("Page 1 of 3"), "{}", text);
        assert!(text.contains("22.10%"), "{}", text);
        assert!(text.contains("CPU Usage ▼"), "{}", text);
        assert!(!text.contains("Attach Listener"), "lowest cpu is on a later page");
    }
}
