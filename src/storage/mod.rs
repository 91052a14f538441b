//!  Storage is organized through [log_store::CsvLogStore].
//!  The basic idea is:
//!   - There is a single append-only CSV file with a `Date,Time,Task` header.
//!   - Every saved task becomes one row, insertion order is chronological order.
//!   - The file is opened, locked and closed for every operation, no handle is kept around.

pub mod entities;
pub mod log_store;
