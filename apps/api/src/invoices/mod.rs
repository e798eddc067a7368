pub mod aggregator;
pub mod handlers;
pub mod timesheet;
