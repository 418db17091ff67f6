use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Outcome of a batch job run
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, PartialEq)]
pub struct JobReport {
    pub job: String,
    pub users_processed: usize,
    pub records_created: usize,
    pub records_skipped: usize,
    pub notifications_sent: usize,
    pub errors: Vec<String>,
}

impl JobReport {
    pub fn new(job: &str) -> Self {
        Self {
            job: job.to_string(),
            ..Default::default()
        }
    }
}
