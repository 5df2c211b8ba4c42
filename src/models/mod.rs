pub mod submission;

pub use submission::{NewSubmission, Snapshot, Submission};
