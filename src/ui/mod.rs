pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{artifact, deferred, dim, error, header, info, is_quiet, section, skipped, success, summary_row, warn};
pub use table::{candidates_table, stats_table, CandidateRow, TableBuilder};
pub use theme::{theme, Theme};
