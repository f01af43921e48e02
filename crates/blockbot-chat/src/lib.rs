//! Dialogue flow controller for BlockBot.
//!
//! Routes each user turn to the identity-verification, fund-transfer or
//! contract-parameter flow, or to the text-generation fallback, and keeps
//! the append-only conversation log.

pub mod classifier;
pub mod error;
pub mod flow;
pub mod generator;
pub mod log;
pub mod orchestrator;
pub mod response;
pub mod types;

pub use classifier::IntentClassifier;
pub use error::ChatError;
pub use flow::{
    ConfirmationVerifier, ContractDraft, ContractFlow, ContractOutcome, ContractRequest,
    DocumentKind, DocumentStatus, FlowStore, IdentityFlow, KycDocument, TransferFlow,
    TransferOutcome, TransferReceipt, TransferStatus,
};
pub use generator::{
    build_generator, DisabledGenerator, GeminiGenerator, GenerationError, ScriptedGenerator,
    TextGenerator,
};
pub use log::ConversationLog;
pub use orchestrator::DialogueController;
pub use response::FallbackResponder;
pub use types::{FlowKind, FlowSelector, FlowSteps, PresetTopic, Role, Turn, TurnInput};
