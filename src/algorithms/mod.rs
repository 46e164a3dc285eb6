pub mod common;
pub mod distance_matrix;
pub mod mass;
pub mod stamp;
