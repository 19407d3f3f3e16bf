pub mod settings;
pub mod device;
pub mod llm;
