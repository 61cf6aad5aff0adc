pub mod classifier;
pub mod flash;
pub mod response_model;
