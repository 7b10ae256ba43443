pub mod list_uploads;

pub use list_uploads::{ListUploadsQuery, UploadHistoryEntry};
