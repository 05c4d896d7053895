use std::{fmt::Debug, time::Instant};

use crate::{
    config::{ThemeName, ViewerConfig},
    event::TICK_FPS,
    table::{Pager, SortField, SortOrder},
    timeline::Selection,
    ui::theme::Theme,
};
use tui_logger::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focussable {
    CpuChart,
    HeapChart,
    Threads,
    Logs,
    Debug,
}

/// The main UI mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Charts, thread table and logs
    Dashboard,
    /// The focussed chart fills the window
    Zoom,
}

pub struct UiState {
    pub tick: f64,
    pub time: Instant,
    pub theme: Theme,
    pub theme_name: ThemeName,
    pub focus: Focussable,
    pub mode: Mode,
    pub debug: bool,
    pub selection: Selection,
    pub sort: SortOrder,
    pub pager: Pager,
    pub logger_state: TuiWidgetState,
}

impl Debug for UiState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiState")
            .field("tick", &self.tick)
            .field("time", &self.time)
            .field("theme", &self.theme_name)
            .field("mode", &self.mode)
            .field("focus", &self.focus)
            .field("selection", &self.selection)
            .field("sort", &self.sort)
            .field("pager", &self.pager)
            .finish()
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new(&ViewerConfig::default())
    }
}

impl UiState {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            logger_state: TuiWidgetState::new(),
            tick: Default::default(),
            time: Instant::now(),
            theme: Theme::named(config.theme),
            theme_name: config.theme,
            mode: Mode::Dashboard,
            focus: Focussable::CpuChart,
            debug: false,
            selection: Selection::default(),
            sort: SortOrder {
                field: config.sort_field,
                direction: config.sort_direction,
            },
            pager: Pager::new(config.page_size),
        }
    }

    pub fn tick(&mut self) {
        self.tick += 1.0;
        if self.tick > 2.0 * TICK_FPS {
            self.tick = 0.0;
            self.time = Instant::now();
        }
    }

    pub fn step_of_8_in_1_second(&self) -> usize {
        (self.tick * 8.0 / TICK_FPS) as usize % 8
    }

    pub fn step_of_4_in_1_second(&self) -> usize {
        (self.tick * 4.0 / TICK_FPS) as usize % 4
    }

    pub fn step_of_8_in_2_second(&self) -> usize {
        (self.tick * 4.0 / TICK_FPS) as usize % 8
    }

    pub fn toggle_debug(&mut self) {
        self.debug = !self.debug;
        if !self.debug && self.focus == Focussable::Debug {
            self.focus = Focussable::CpuChart;
        }
    }

    pub fn toggle_theme(&mut self) {
        self.theme_name = match self.theme_name {
            ThemeName::Dark => ThemeName::Light,
            ThemeName::Light => ThemeName::Dark,
        };
        self.theme = Theme::named(self.theme_name);
    }

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            Focussable::CpuChart => Focussable::HeapChart,
            Focussable::HeapChart => Focussable::Threads,
            Focussable::Threads => Focussable::Logs,
            Focussable::Logs if self.debug => Focussable::Debug,
            Focussable::Logs | Focussable::Debug => Focussable::CpuChart,
        };
        self.leave_zoom_unless_chart();
    }

    pub fn focus_prev(&mut self) {
        self.focus = match self.focus {
            Focussable::CpuChart if self.debug => Focussable::Debug,
            Focussable::CpuChart => Focussable::Logs,
            Focussable::HeapChart => Focussable::CpuChart,
            Focussable::Threads => Focussable::HeapChart,
            Focussable::Logs => Focussable::Threads,
            Focussable::Debug => Focussable::Logs,
        };
        self.leave_zoom_unless_chart();
    }

    pub fn chart_focussed(&self) -> bool {
        matches!(self.focus, Focussable::CpuChart | Focussable::HeapChart)
    }

    pub fn toggle_zoom(&mut self) {
        if self.mode == Mode::Zoom {
            self.mode = Mode::Dashboard;
        } else if self.chart_focussed() {
            self.mode = Mode::Zoom;
        }
    }

    fn leave_zoom_unless_chart(&mut self) {
        if !self.chart_focussed() {
            self.mode = Mode::Dashboard;
        }
    }

    /// Change the sort column; the table goes back to its first page.
    pub fn sort_by(&mut self, field: SortField) {
        self.sort.select(field);
        self.pager.reset();
    }

    /// A new parse invalidates the range and the page.
    pub fn document_loaded(&mut self, snapshots: usize) {
        self.selection.reset(snapshots);
        self.pager.reset();
    }
}
