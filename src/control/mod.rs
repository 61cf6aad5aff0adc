pub mod button;
pub mod control_model;
