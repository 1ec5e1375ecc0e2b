pub mod student_db;

pub use student_db::*;
