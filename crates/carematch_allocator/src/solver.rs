pub mod allocation_result;
pub mod allocator;
pub mod assignment_solver;
pub mod error;
pub mod greedy_solver;
pub mod milp_solver;
pub mod solve_status;
pub mod solver_params;
