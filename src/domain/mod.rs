pub mod error;
pub mod llm_config;

// Partner registry types
pub mod registry;
