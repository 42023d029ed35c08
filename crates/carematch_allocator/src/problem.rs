pub mod allocation_problem;
pub mod helper;
pub mod hospital;
pub mod location;
pub mod skill;
pub mod travel_cost_matrix;
pub mod validation;
