mod members_test;
mod records_test;
mod scan_test;
mod sessions_test;
