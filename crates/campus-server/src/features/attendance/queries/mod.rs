//! Attendance queries (read operations)

pub mod my_records;
pub mod report;
pub mod sheet;

pub use my_records::MyRecordsError;
pub use report::ClassReportError;
pub use sheet::AttendanceSheetError;
