pub mod console;
pub mod memory;
pub mod page_model;
