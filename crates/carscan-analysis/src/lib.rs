pub mod clean;
pub mod stats;
pub mod summary;

pub use clean::{clean, clean_record, CleanOutcome, CleaningReport, RangeFilters};
pub use stats::NumericSummary;
pub use summary::{
    summarize, summarize_at, AnalysisSummary, Completeness, Correlations, GroupMeans,
    PriceSegments, RankedCount, RecordCounts, YearRange,
};
