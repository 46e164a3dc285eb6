pub mod backend;
pub mod batch;
pub mod distance_metric;
pub mod error;
pub mod matrix_profile;
