pub mod activity;
pub mod attendance_record;
pub mod attendance_session;
pub mod attendance_session_scan;
pub mod enrollment;
pub mod user;

pub use activity::Entity as Activity;
pub use attendance_record::Entity as AttendanceRecord;
pub use attendance_session::Entity as AttendanceSession;
pub use attendance_session_scan::Entity as AttendanceSessionScan;
pub use enrollment::Entity as Enrollment;
pub use user::Entity as User;
