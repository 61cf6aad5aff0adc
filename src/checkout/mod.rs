pub mod context;
pub mod orchestrator;
pub mod plan;
pub mod settings;
