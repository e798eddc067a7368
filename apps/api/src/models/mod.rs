pub mod invoice;
pub mod party;
pub mod rates;
pub mod timesheet;
