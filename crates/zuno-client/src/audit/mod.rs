pub mod cadence;
pub mod cancel;
pub mod cost;
pub mod date;
pub mod normalize;
pub mod policy;
pub mod recurring;
pub mod sample;
pub mod summary;
pub mod types;

pub use cadence::{FrequencyLabel, RiskLevel};
pub use cost::{CostStrategy, FlatRateEstimator, MonthlyCostEstimator, ObservedAverageEstimator};
pub use normalize::{GroupKey, GroupScope, MerchantNormalization};
pub use recurring::{
    CandidateDetection, CandidateSort, RecurrenceCandidate, SkipReason, SkippedTransaction,
    detect_candidates, partition_transactions, sort_candidates,
};
pub use summary::{AuditSummary, summarize, summarize_with};
pub use types::{AuditWindow, Merchant, Price, Product, Transaction};
