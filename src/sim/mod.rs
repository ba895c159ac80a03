/// One-time milestones and their unlock rules.
pub mod achievement;
pub mod engine;
/// Grid event detection.
pub mod event;
pub mod kpi;
/// Hourly load model.
pub mod load;
pub mod policy;
pub mod presenter;
pub mod pricing;
pub mod types;
