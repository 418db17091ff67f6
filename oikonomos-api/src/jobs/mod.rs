pub mod month_closing;
pub mod recurring_bills;

pub use month_closing::MonthClosingJob;
pub use recurring_bills::RecurringBillsJob;
