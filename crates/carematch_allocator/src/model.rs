pub mod assignment_program;
pub mod objective;
