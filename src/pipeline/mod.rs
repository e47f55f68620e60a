pub mod llm;
pub mod bulk_import;
