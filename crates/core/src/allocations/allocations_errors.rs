use chrono::NaiveDate;
use thiserror::Error;

/// Business-rule violations raised by allocation writes.
#[derive(Debug, Error)]
pub enum AllocationError {
    #[error("Allocation rejected: {}", .0.join("; "))]
    Rejected(Vec<String>),

    #[error("Client {client_id} is {status} and cannot receive new allocations")]
    ClientNotActive { client_id: String, status: String },

    #[error("Allocation {0} has already been ended")]
    AlreadyEnded(String),

    #[error("End date {end_date} is before start date {start_date}")]
    EndBeforeStart {
        start_date: NaiveDate,
        end_date: NaiveDate,
    },

    #[error("End date {end_date} is in the future (today is {today})")]
    EndInFuture { end_date: NaiveDate, today: NaiveDate },
}

impl From<AllocationError> for String {
    fn from(error: AllocationError) -> Self {
        error.to_string()
    }
}
