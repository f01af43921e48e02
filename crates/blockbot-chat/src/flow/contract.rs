//! Token-contract parameter collection.
//!
//! Collects name, symbol, total supply and features one turn at a time,
//! then hands a [`ContractRequest`] back to the controller, which asks the
//! text-generation backend for the contract source.

use serde::{Deserialize, Serialize};

const PROMPT_NAME: &str = "Let's create a smart contract. What should be the name of your token?";
const PROMPT_SYMBOL: &str = "Great! Now, what should be the symbol of your token?";
const PROMPT_SUPPLY: &str = "Excellent. What should be the total supply of your token?";
const PROMPT_FEATURES: &str =
    "Almost done. What features would you like to include? (e.g., mintable, burnable, pausable)";

/// Fields gathered so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractDraft {
    pub name: String,
    pub symbol: String,
    pub total_supply: String,
    pub features: Vec<String>,
}

/// Everything needed to ask for an ERC-20 style contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractRequest {
    pub name: String,
    pub symbol: String,
    pub total_supply: String,
    pub features: Vec<String>,
}

impl ContractRequest {
    /// Prompt sent to the text-generation backend.
    pub fn prompt(&self) -> String {
        let features = if self.features.is_empty() {
            "none".to_string()
        } else {
            self.features.join(", ")
        };
        format!(
            "Generate a Solidity smart contract for an ERC20 token with the following specifications:\n\
             - Token Name: {}\n\
             - Token Symbol: {}\n\
             - Total Supply: {}\n\
             - Features: {}\n\n\
             Provide the complete contract code and a brief explanation of its functionality.",
            self.name, self.symbol, self.total_supply, features
        )
    }
}

/// Result of advancing the contract flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractOutcome {
    /// Ask the user for the next field.
    Prompt(String),
    /// All fields collected; the flow is back at step 0.
    Generate(ContractRequest),
}

/// State of the contract-parameter flow.
#[derive(Debug, Clone, Default)]
pub struct ContractFlow {
    step: u8,
    draft: ContractDraft,
}

impl ContractFlow {
    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn draft(&self) -> &ContractDraft {
        &self.draft
    }

    /// Advance the flow by one user message.
    pub fn advance(&mut self, message: &str) -> ContractOutcome {
        let message = message.trim();
        match self.step {
            0 => {
                self.draft = ContractDraft::default();
                self.step = 1;
                tracing::info!("Contract drafting started");
                ContractOutcome::Prompt(PROMPT_NAME.to_string())
            }
            1 => {
                self.draft.name = message.to_string();
                self.step = 2;
                ContractOutcome::Prompt(PROMPT_SYMBOL.to_string())
            }
            2 => {
                self.draft.symbol = message.to_string();
                self.step = 3;
                ContractOutcome::Prompt(PROMPT_SUPPLY.to_string())
            }
            3 => {
                self.draft.total_supply = message.to_string();
                self.step = 4;
                ContractOutcome::Prompt(PROMPT_FEATURES.to_string())
            }
            _ => {
                self.draft.features = split_features(message);
                self.step = 0;
                tracing::info!(
                    features = self.draft.features.len(),
                    "Contract parameters collected"
                );
                ContractOutcome::Generate(ContractRequest {
                    name: self.draft.name.clone(),
                    symbol: self.draft.symbol.clone(),
                    total_supply: self.draft.total_supply.clone(),
                    features: self.draft.features.clone(),
                })
            }
        }
    }

    pub(crate) fn abandon(&mut self) {
        self.step = 0;
        self.draft = ContractDraft::default();
    }
}

/// Split a comma-separated feature list, trimming entries and dropping
/// empty ones. Order is kept; duplicates are kept.
fn split_features(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect()
}
