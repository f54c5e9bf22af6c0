pub mod app;
pub mod seed;

pub use app::{bearer, make_test_app, send};
pub use seed::Directory;
