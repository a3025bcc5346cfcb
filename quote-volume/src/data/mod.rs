pub mod aggregator;
pub mod loader;
pub mod parser;
pub mod top_n;
pub mod types;

pub use aggregator::DailyAggregator;
pub use loader::{read_symbol, DataLoader, Dataset, LoaderError, SkippedFile, DEFAULT_FILE_PREFIX};
pub use parser::{LineKind, ParseError, QuoteLine, DEFAULT_MARKER};
pub use top_n::{TopVolumes, TOP_CONTRACTS};
pub use types::{DayRecord, OptionRecord, OptionSide};
