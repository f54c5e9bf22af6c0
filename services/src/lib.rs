//! The attendance engine: session lifecycle, scan validation, bulk
//! reconciliation and ledger reads, layered over the `db` entities.

pub mod access;
pub mod attendance_bulk_service;
pub mod attendance_record_service;
pub mod attendance_scan_service;
pub mod attendance_session_service;
pub mod error;

#[cfg(test)]
pub(crate) mod test_support;
