pub mod student_api;
