pub mod chart;
pub mod dashboard;
pub mod debug;
pub mod stat_line;
pub mod state;
pub mod theme;
pub mod thread_table;
