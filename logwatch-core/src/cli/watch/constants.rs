/// Entries shown per breakdown line.
pub const TOP_N: usize = 3;

/// Alert lines kept in memory for the dashboard; the file keeps them all.
pub const HISTORY_CAPACITY: usize = 50;

pub const HIDE_CURSOR: &str = "\x1b[?25l";
pub const SHOW_CURSOR: &str = "\x1b[?25h";
pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";
