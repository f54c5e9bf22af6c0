pub mod m202610010001_create_users;
pub mod m202610010002_create_activities;
pub mod m202610010003_create_enrollments;
pub mod m202610010004_create_attendance_sessions;
pub mod m202610010005_create_attendance_records;
