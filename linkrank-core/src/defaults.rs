// Default values shared by the library and the CLI

/// Id-indexed adjacency storage grows by this many slots at a time
pub const DEFAULT_GROWTH_RATE: usize = 20_000;

/// Default verbosity for `-l` (0 = silent, 1 = info, 2 = debug, 3 = trace)
pub const DEFAULT_LOG_LEVEL: u8 = 2;

/// Ingestion logs a progress line every this many edges
pub const PROGRESS_REPORT_STEP: usize = 10_000;
