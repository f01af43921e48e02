//! Fixed replies and the text-generation fallback.

use std::sync::Arc;
use std::time::Duration;

use crate::flow::ContractRequest;
use crate::generator::{GenerationError, TextGenerator};

/// First assistant turn of a session.
pub const WELCOME_MESSAGE: &str = "Welcome to BlockBot!

I'm your blockchain and cryptocurrency expert. I can help you with:
- Generating and explaining smart contracts in Solidity
- Clarifying blockchain concepts and terminology
- Guiding you through blockchain transactions
- Assisting with crypto portfolio management
- Answering questions about blockchain technology and cryptocurrencies
- Completing KYC verification process
- Transferring funds securely

What would you like to know about blockchain technology?";

/// Answer for any message mentioning consensus.
pub const CONSENSUS_ANSWER: &str = "Consensus mechanisms are protocols that ensure all nodes in a blockchain network agree on the validity of transactions. Popular mechanisms include:

1. Proof of Work (PoW)
2. Proof of Stake (PoS)
3. Delegated Proof of Stake (DPoS)

Would you like to learn more about any specific consensus mechanism?";

pub const FALLBACK_APOLOGY: &str = "I apologize, but I encountered an error while processing your request. Please try again or select a specific blockchain topic.";

pub const CONTRACT_APOLOGY: &str = "I apologize, but I encountered an error while generating the smart contract. Please try again with different specifications.";

/// Wrap a free-form question in the assistant's domain framing.
pub fn framing_prompt(message: &str) -> String {
    format!(
        "As a blockchain expert, provide a detailed but concise response to this question about blockchain technology: \"{}\". Focus on accuracy and clarity.",
        message
    )
}

/// Calls the text-generation backend with a timeout and turns every failure
/// into a fixed apology.
#[derive(Clone)]
pub struct FallbackResponder {
    generator: Arc<dyn TextGenerator>,
    timeout: Duration,
}

impl FallbackResponder {
    pub fn new(generator: Arc<dyn TextGenerator>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    /// Answer a message no flow claimed.
    pub async fn respond(&self, message: &str) -> String {
        self.generate_or(&framing_prompt(message), FALLBACK_APOLOGY)
            .await
    }

    /// Ask for contract source text built from collected parameters.
    pub async fn generate_contract(&self, request: &ContractRequest) -> String {
        self.generate_or(&request.prompt(), CONTRACT_APOLOGY).await
    }

    /// Generate with the configured timeout.
    pub async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        match tokio::time::timeout(self.timeout, self.generator.generate(prompt)).await {
            Ok(result) => result,
            Err(_) => Err(GenerationError::Timeout(self.timeout.as_secs())),
        }
    }

    async fn generate_or(&self, prompt: &str, apology: &str) -> String {
        match self.generate(prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    generator = self.generator.name(),
                    error = %e,
                    "Text generation failed"
                );
                apology.to_string()
            }
        }
    }
}
