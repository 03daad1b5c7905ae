pub mod admin;
pub mod serve;
pub mod teacher;



#[cfg(test)]
#[path = "teacher_test.rs"]
mod teacher_test;
