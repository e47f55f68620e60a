pub mod detection;
pub mod engine;
pub mod helpers;
pub mod interactions;
pub mod messages;
pub mod normalize;
pub mod parser;
pub mod reference;
mod reference_data;
pub mod types;
pub mod validator;
pub mod viability;

pub use engine::FormulaEngine;
pub use reference::{KnowledgeBase, ReferenceData};
pub use types::{
    AlertSeverity, AlertType, CustomActive, DrugInteraction, FormulationAnalysis,
    FormulationType, ParsedActive, ReferenceError, SafetyAlert, ViabilityNote,
};
