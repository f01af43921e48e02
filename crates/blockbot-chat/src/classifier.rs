//! Intent classification.
//!
//! Decides which handler owns an incoming message, given the message text
//! and the current step of every flow. Rules are checked in a fixed order
//! and the first match wins:
//!
//! 1. identity flow in progress, or the message mentions "kyc"
//! 2. contract flow in progress, or the message mentions "smart contract"
//! 3. the message mentions "consensus" (fixed answer, no flow)
//! 4. transfer flow in progress, or the message mentions "transfer funds"
//! 5. fallback responder

use crate::types::{FlowSelector, FlowSteps};

const IDENTITY_KEYWORD: &str = "kyc";
const CONTRACT_KEYWORD: &str = "smart contract";
const CONSENSUS_KEYWORD: &str = "consensus";
const TRANSFER_KEYWORD: &str = "transfer funds";

/// Rule-based, stateless intent classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntentClassifier;

impl IntentClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify a message against the current flow steps.
    ///
    /// Pure: the same arguments always give the same answer.
    pub fn classify(&self, message: &str, steps: FlowSteps) -> FlowSelector {
        let lower = message.to_lowercase();

        if steps.identity > 0 || lower.contains(IDENTITY_KEYWORD) {
            return FlowSelector::Identity;
        }

        if steps.contract > 0 || lower.contains(CONTRACT_KEYWORD) {
            return FlowSelector::Contract;
        }

        // Checked before an in-progress transfer: answers without touching it.
        if lower.contains(CONSENSUS_KEYWORD) {
            return FlowSelector::Consensus;
        }

        if steps.transfer > 0 || lower.contains(TRANSFER_KEYWORD) {
            return FlowSelector::Transfer;
        }

        FlowSelector::Fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idle() -> FlowSteps {
        FlowSteps::default()
    }

    fn classify(message: &str, steps: FlowSteps) -> FlowSelector {
        IntentClassifier::new().classify(message, steps)
    }

    // ---- Keyword triggers ----

    #[test]
    fn test_kyc_triggers_identity() {
        assert_eq!(classify("I want to do KYC", idle()), FlowSelector::Identity);
        assert_eq!(classify("Start KYC", idle()), FlowSelector::Identity);
    }

    #[test]
    fn test_smart_contract_triggers_contract() {
        assert_eq!(
            classify("Help me write a Smart Contract", idle()),
            FlowSelector::Contract
        );
        assert_eq!(classify("Smart Contracts", idle()), FlowSelector::Contract);
    }

    #[test]
    fn test_consensus_is_one_shot() {
        assert_eq!(
            classify("Consensus Mechanisms", idle()),
            FlowSelector::Consensus
        );
    }

    #[test]
    fn test_transfer_funds_triggers_transfer() {
        assert_eq!(classify("Transfer Funds", idle()), FlowSelector::Transfer);
        assert_eq!(
            classify("please transfer funds to bob", idle()),
            FlowSelector::Transfer
        );
    }

    #[test]
    fn test_transfer_requires_full_phrase() {
        assert_eq!(classify("transfer", idle()), FlowSelector::Fallback);
        assert_eq!(classify("funds", idle()), FlowSelector::Fallback);
    }

    #[test]
    fn test_unmatched_goes_to_fallback() {
        assert_eq!(classify("What is DeFi?", idle()), FlowSelector::Fallback);
        assert_eq!(classify("", idle()), FlowSelector::Fallback);
    }

    // ---- Priority ordering ----

    #[test]
    fn test_kyc_beats_smart_contract() {
        assert_eq!(
            classify("kyc before my smart contract", idle()),
            FlowSelector::Identity
        );
    }

    #[test]
    fn test_smart_contract_beats_consensus() {
        assert_eq!(
            classify("smart contract consensus", idle()),
            FlowSelector::Contract
        );
    }

    #[test]
    fn test_consensus_beats_transfer_keyword() {
        assert_eq!(
            classify("transfer funds by consensus", idle()),
            FlowSelector::Consensus
        );
    }

    // ---- In-progress flows ----

    #[test]
    fn test_identity_in_progress_claims_everything() {
        let steps = FlowSteps {
            identity: 1,
            ..idle()
        };
        assert_eq!(classify("hello", steps), FlowSelector::Identity);
        assert_eq!(classify("smart contract", steps), FlowSelector::Identity);
        assert_eq!(classify("consensus", steps), FlowSelector::Identity);
    }

    #[test]
    fn test_contract_in_progress_claims_plain_text() {
        let steps = FlowSteps {
            contract: 2,
            ..idle()
        };
        assert_eq!(classify("MTK", steps), FlowSelector::Contract);
        assert_eq!(classify("consensus", steps), FlowSelector::Contract);
        // Rule 1 still precedes an in-progress contract
        assert_eq!(classify("kyc", steps), FlowSelector::Identity);
    }

    #[test]
    fn test_transfer_in_progress_yields_to_consensus() {
        let steps = FlowSteps {
            transfer: 1,
            ..idle()
        };
        assert_eq!(classify("alice", steps), FlowSelector::Transfer);
        assert_eq!(classify("consensus", steps), FlowSelector::Consensus);
        assert_eq!(classify("smart contract", steps), FlowSelector::Contract);
    }

    // ---- Purity ----

    #[test]
    fn test_classify_is_idempotent() {
        let classifier = IntentClassifier::new();
        let steps = FlowSteps {
            transfer: 3,
            ..idle()
        };
        let first = classifier.classify("0xabc", steps);
        let second = classifier.classify("0xabc", steps);
        assert_eq!(first, second);
        assert_eq!(steps.transfer, 3);
    }

    #[test]
    fn test_unicode_message() {
        assert_eq!(
            classify("Qu'est-ce que la KYC ? \u{00e9}t\u{00e9}", idle()),
            FlowSelector::Identity
        );
    }
}
