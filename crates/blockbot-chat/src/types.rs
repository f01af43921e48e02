//! Shared types for the dialogue controller.

use std::fmt;
use std::str::FromStr;

use blockbot_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ChatError;

// =============================================================================
// Turns
// =============================================================================

/// Author of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One message in the conversation log. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    pub created_at: Timestamp,
}

impl Turn {
    pub(crate) fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            created_at: Timestamp::now(),
        }
    }
}

// =============================================================================
// Preset topics
// =============================================================================

/// Fixed set of topic shortcuts a front-end can submit instead of free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PresetTopic {
    SmartContracts,
    ConsensusMechanisms,
    Cryptocurrencies,
    DeFi,
    Nfts,
    BlockchainScalability,
    Tokenomics,
    CryptoWallets,
    MiningAndStaking,
    BlockchainUseCases,
    StartKyc,
    TransferFunds,
}

impl PresetTopic {
    /// All topics in display order.
    pub const ALL: [PresetTopic; 12] = [
        PresetTopic::SmartContracts,
        PresetTopic::ConsensusMechanisms,
        PresetTopic::Cryptocurrencies,
        PresetTopic::DeFi,
        PresetTopic::Nfts,
        PresetTopic::BlockchainScalability,
        PresetTopic::Tokenomics,
        PresetTopic::CryptoWallets,
        PresetTopic::MiningAndStaking,
        PresetTopic::BlockchainUseCases,
        PresetTopic::StartKyc,
        PresetTopic::TransferFunds,
    ];

    /// The text submitted as the user turn when this topic is selected.
    pub fn label(&self) -> &'static str {
        match self {
            PresetTopic::SmartContracts => "Smart Contracts",
            PresetTopic::ConsensusMechanisms => "Consensus Mechanisms",
            PresetTopic::Cryptocurrencies => "Cryptocurrencies",
            PresetTopic::DeFi => "DeFi",
            PresetTopic::Nfts => "NFTs",
            PresetTopic::BlockchainScalability => "Blockchain Scalability",
            PresetTopic::Tokenomics => "Tokenomics",
            PresetTopic::CryptoWallets => "Crypto Wallets",
            PresetTopic::MiningAndStaking => "Mining and Staking",
            PresetTopic::BlockchainUseCases => "Blockchain Use Cases",
            PresetTopic::StartKyc => "Start KYC",
            PresetTopic::TransferFunds => "Transfer Funds",
        }
    }

    /// Case-insensitive lookup by label.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for PresetTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PresetTopic {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| ChatError::UnknownTopic(s.to_string()))
    }
}

/// Input accepted by [`crate::DialogueController::handle_turn`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnInput {
    /// Free text typed by the user.
    Text(String),
    /// A preset topic selection, submitted as if its label were typed.
    Topic(PresetTopic),
}

impl TurnInput {
    pub fn text(s: impl Into<String>) -> Self {
        TurnInput::Text(s.into())
    }

    /// The message the upload collaborator submits for a selected file.
    pub fn upload(file_name: &str) -> Self {
        TurnInput::Text(format!("upload document {}", file_name.trim()))
    }

    /// Text that will be recorded as the user turn.
    pub fn message(&self) -> &str {
        match self {
            TurnInput::Text(s) => s.trim(),
            TurnInput::Topic(t) => t.label(),
        }
    }

    pub fn is_topic(&self) -> bool {
        matches!(self, TurnInput::Topic(_))
    }
}

impl From<&str> for TurnInput {
    fn from(s: &str) -> Self {
        TurnInput::Text(s.to_string())
    }
}

impl From<String> for TurnInput {
    fn from(s: String) -> Self {
        TurnInput::Text(s)
    }
}

impl From<PresetTopic> for TurnInput {
    fn from(t: PresetTopic) -> Self {
        TurnInput::Topic(t)
    }
}

// =============================================================================
// Flow selection
// =============================================================================

/// The three stateful flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowKind {
    Identity,
    Transfer,
    Contract,
}

/// Classifier verdict: which handler owns the current message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowSelector {
    Identity,
    Contract,
    /// Fixed informational answer; not a flow, no state change.
    Consensus,
    Transfer,
    /// No flow claims the message; the fallback responder answers.
    Fallback,
}

impl FlowSelector {
    /// The stateful flow behind this selector, if any.
    pub fn flow(&self) -> Option<FlowKind> {
        match self {
            FlowSelector::Identity => Some(FlowKind::Identity),
            FlowSelector::Contract => Some(FlowKind::Contract),
            FlowSelector::Transfer => Some(FlowKind::Transfer),
            FlowSelector::Consensus | FlowSelector::Fallback => None,
        }
    }
}

/// Snapshot of the current step of every flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowSteps {
    pub identity: u8,
    pub transfer: u8,
    pub contract: u8,
}

impl FlowSteps {
    /// Number of flows currently in progress. Never more than one.
    pub fn active_count(&self) -> usize {
        [self.identity, self.transfer, self.contract]
            .iter()
            .filter(|s| **s > 0)
            .count()
    }

    /// The flow in progress, if any.
    pub fn active(&self) -> Option<FlowKind> {
        if self.identity > 0 {
            Some(FlowKind::Identity)
        } else if self.contract > 0 {
            Some(FlowKind::Contract)
        } else if self.transfer > 0 {
            Some(FlowKind::Transfer)
        } else {
            None
        }
    }
}
