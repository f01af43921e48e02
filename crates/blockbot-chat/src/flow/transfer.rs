//! Simulated fund-transfer flow.
//!
//! Linear four-step machine: ask for the receiver, ask for the amount, issue
//! a confirmation credential, then check the re-entered credential. Nothing
//! here moves real funds; the credential and receipt are synthetic.

use std::sync::LazyLock;
use std::time::Duration;

use blockbot_core::types::{format_millis_local, now_millis};
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};

const PROMPT_RECEIVER: &str = "To transfer funds, please provide the receiver's ID:";
const PROMPT_AMOUNT: &str = "Thank you. Now, please enter the amount you want to transfer:";
const CANCELLED: &str = "Invalid confirmation key. Transaction cancelled for security reasons.";

static CONFIRMATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^0x[0-9a-f]{64}$").expect("Invalid confirmation regex"));

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferStatus {
    #[default]
    Pending,
    Completed,
    Failed,
}

/// Record of a completed simulated transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReceipt {
    pub receiver_id: String,
    pub amount: String,
    /// Hex of the completion time in epoch milliseconds.
    pub transaction_id: String,
    /// Completion time, epoch milliseconds.
    pub timestamp: i64,
}

/// Checks a re-entered confirmation credential.
///
/// The check itself is a local pattern match, but it always waits for the
/// configured delay first, like a remote security check would.
#[derive(Debug, Clone)]
pub struct ConfirmationVerifier {
    delay: Duration,
}

impl ConfirmationVerifier {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Resolve to `true` when `candidate` is `0x` followed by 64 hex digits.
    pub async fn verify(&self, candidate: &str) -> bool {
        tokio::time::sleep(self.delay).await;
        CONFIRMATION_RE.is_match(candidate.trim())
    }
}

impl Default for ConfirmationVerifier {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

/// Synthetic `0x`-prefixed 64-hex-digit credential. Not a secret.
pub fn generate_confirmation_credential() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();
    format!("0x{}", hex::encode(bytes))
}

/// Result of advancing the transfer flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    /// Reply to the user; no verification needed.
    Reply(String),
    /// Step 3: this candidate credential must be verified first.
    Verify(String),
}

/// State of the fund-transfer flow.
#[derive(Debug, Clone, Default)]
pub struct TransferFlow {
    step: u8,
    receiver_id: String,
    amount: String,
    timestamp: i64,
    status: TransferStatus,
    history: Vec<TransferReceipt>,
}

impl TransferFlow {
    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn receiver_id(&self) -> &str {
        &self.receiver_id
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    /// Completion time of the last successful transfer (epoch ms), 0 if none.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn status(&self) -> TransferStatus {
        self.status
    }

    /// Completed transfers of this session, oldest first.
    pub fn history(&self) -> &[TransferReceipt] {
        &self.history
    }

    /// Advance the flow by one user message.
    ///
    /// At step 3 the message is handed back as [`TransferOutcome::Verify`];
    /// the caller checks it with a [`ConfirmationVerifier`] and reports the
    /// verdict through [`TransferFlow::finish`]. The flow stays at step 3
    /// until then.
    pub fn advance(&mut self, message: &str) -> TransferOutcome {
        match self.step {
            0 => {
                self.step = 1;
                self.receiver_id.clear();
                self.amount.clear();
                self.timestamp = 0;
                self.status = TransferStatus::Pending;
                tracing::info!("Transfer started");
                TransferOutcome::Reply(PROMPT_RECEIVER.to_string())
            }
            1 => {
                self.receiver_id = message.trim().to_string();
                self.step = 2;
                TransferOutcome::Reply(PROMPT_AMOUNT.to_string())
            }
            2 => {
                self.amount = message.trim().to_string();
                self.step = 3;
                let credential = generate_confirmation_credential();
                TransferOutcome::Reply(format!(
                    "For security purposes, please confirm this transaction using the following key:\n\n{}\n\nPlease enter the key to confirm the transaction:",
                    credential
                ))
            }
            _ => TransferOutcome::Verify(message.to_string()),
        }
    }

    /// Close the confirmation step with the verifier's verdict.
    pub fn finish(&mut self, valid: bool) -> String {
        self.step = 0;
        if valid {
            self.complete()
        } else {
            self.status = TransferStatus::Failed;
            self.receiver_id.clear();
            self.amount.clear();
            tracing::info!("Transfer cancelled: confirmation key rejected");
            CANCELLED.to_string()
        }
    }

    pub(crate) fn abandon(&mut self) {
        self.step = 0;
        self.receiver_id.clear();
        self.amount.clear();
        self.status = TransferStatus::Pending;
    }

    fn complete(&mut self) -> String {
        let now = now_millis();
        self.timestamp = now;
        self.status = TransferStatus::Completed;

        let receipt = TransferReceipt {
            receiver_id: self.receiver_id.clone(),
            amount: self.amount.clone(),
            transaction_id: format!("{:x}", now),
            timestamp: now,
        };
        tracing::info!(transaction_id = %receipt.transaction_id, "Transfer completed");

        let reply = format!(
            "Transaction completed successfully!\n\nDetails:\n- Receiver ID: {}\n- Amount: {}\n- Status: Completed\n- Transaction ID: {}\n- Timestamp: {}\n\nYour funds have been transferred securely.",
            receipt.receiver_id,
            receipt.amount,
            receipt.transaction_id,
            format_millis_local(now)
        );
        self.history.push(receipt);
        reply
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant() -> ConfirmationVerifier {
        ConfirmationVerifier::new(Duration::ZERO)
    }

    fn extract_credential(reply: &str) -> String {
        reply
            .split_whitespace()
            .find(|w| w.starts_with("0x"))
            .expect("reply should echo a credential")
            .to_string()
    }

    /// One turn, verifying at step 3 the way the controller does.
    async fn drive(flow: &mut TransferFlow, message: &str, verifier: &ConfirmationVerifier) -> String {
        match flow.advance(message) {
            TransferOutcome::Reply(text) => text,
            TransferOutcome::Verify(candidate) => {
                let valid = verifier.verify(&candidate).await;
                flow.finish(valid)
            }
        }
    }

    async fn at_confirmation(flow: &mut TransferFlow) -> String {
        let verifier = instant();
        drive(flow, "transfer funds", &verifier).await;
        drive(flow, "alice", &verifier).await;
        let reply = drive(flow, "10", &verifier).await;
        extract_credential(&reply)
    }

    // ---- Credential ----

    #[test]
    fn test_credential_shape() {
        let cred = generate_confirmation_credential();
        assert_eq!(cred.len(), 66);
        assert!(cred.starts_with("0x"));
        assert!(CONFIRMATION_RE.is_match(&cred));
    }

    #[test]
    fn test_credentials_differ() {
        assert_ne!(
            generate_confirmation_credential(),
            generate_confirmation_credential()
        );
    }

    // ---- Verifier ----

    #[tokio::test]
    async fn test_verifier_accepts_mixed_case() {
        let verifier = instant();
        let upper = format!("0x{}", "AB".repeat(32));
        assert!(verifier.verify(&upper).await);
        assert!(verifier.verify(&format!("  {}  ", upper)).await);
    }

    #[tokio::test]
    async fn test_verifier_rejects_bad_input() {
        let verifier = instant();
        assert!(!verifier.verify("not a key").await);
        assert!(!verifier.verify(&format!("0x{}", "a".repeat(63))).await);
        assert!(!verifier.verify(&format!("0x{}", "a".repeat(65))).await);
        assert!(!verifier.verify(&format!("0y{}", "a".repeat(64))).await);
        assert!(!verifier.verify(&format!("0x{}g", "a".repeat(63))).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_verifier_waits_for_delay() {
        let verifier = ConfirmationVerifier::default();
        assert_eq!(verifier.delay(), Duration::from_secs(1));

        let start = tokio::time::Instant::now();
        verifier.verify("nope").await;
        assert!(start.elapsed() >= Duration::from_secs(1));
    }

    // ---- Flow ----

    #[tokio::test]
    async fn test_steps_collect_fields() {
        let verifier = instant();
        let mut flow = TransferFlow::default();

        let reply = drive(&mut flow, "transfer funds", &verifier).await;
        assert!(reply.contains("receiver's ID"));
        assert_eq!(flow.step(), 1);
        assert_eq!(flow.status(), TransferStatus::Pending);

        let reply = drive(&mut flow, "alice", &verifier).await;
        assert!(reply.contains("amount"));
        assert_eq!(flow.receiver_id(), "alice");
        assert_eq!(flow.step(), 2);

        let reply = drive(&mut flow, "10", &verifier).await;
        assert_eq!(flow.amount(), "10");
        assert_eq!(flow.step(), 3);
        let cred = extract_credential(&reply);
        assert!(CONFIRMATION_RE.is_match(&cred));
    }

    #[test]
    fn test_confirmation_waits_for_verdict() {
        let mut flow = TransferFlow::default();
        flow.advance("transfer funds");
        flow.advance("alice");
        flow.advance("10");

        let outcome = flow.advance(" 0xabc ");
        assert_eq!(outcome, TransferOutcome::Verify(" 0xabc ".to_string()));
        assert_eq!(flow.step(), 3);
        assert_eq!(flow.receiver_id(), "alice");

        flow.finish(false);
        assert_eq!(flow.step(), 0);
        assert_eq!(flow.status(), TransferStatus::Failed);
    }

    #[tokio::test]
    async fn test_valid_confirmation_completes() {
        let mut flow = TransferFlow::default();
        let cred = at_confirmation(&mut flow).await;

        let reply = drive(&mut flow, &cred, &instant()).await;
        assert!(reply.contains("Receiver ID: alice"));
        assert!(reply.contains("Amount: 10"));
        assert!(reply.contains("Status: Completed"));
        assert_eq!(flow.step(), 0);
        assert_eq!(flow.status(), TransferStatus::Completed);
        assert!(flow.timestamp() > 0);

        assert_eq!(flow.history().len(), 1);
        let receipt = &flow.history()[0];
        assert_eq!(receipt.receiver_id, "alice");
        assert_eq!(receipt.transaction_id, format!("{:x}", receipt.timestamp));
        assert!(reply.contains(&receipt.transaction_id));
    }

    #[tokio::test]
    async fn test_any_well_formed_key_is_accepted() {
        let mut flow = TransferFlow::default();
        at_confirmation(&mut flow).await;
        let other = format!("0x{}", "0".repeat(64));
        drive(&mut flow, &other, &instant()).await;
        assert_eq!(flow.status(), TransferStatus::Completed);
    }

    #[tokio::test]
    async fn test_invalid_confirmation_cancels() {
        let mut flow = TransferFlow::default();
        at_confirmation(&mut flow).await;

        let reply = drive(&mut flow, "0x1234", &instant()).await;
        assert!(reply.contains("cancelled"));
        assert_eq!(flow.step(), 0);
        assert_eq!(flow.status(), TransferStatus::Failed);
        assert_eq!(flow.receiver_id(), "");
        assert_eq!(flow.amount(), "");
        assert_eq!(flow.timestamp(), 0);
        assert!(flow.history().is_empty());
    }

    #[tokio::test]
    async fn test_retry_after_failure() {
        let mut flow = TransferFlow::default();
        at_confirmation(&mut flow).await;
        drive(&mut flow, "wrong", &instant()).await;

        let cred = at_confirmation(&mut flow).await;
        assert_eq!(flow.status(), TransferStatus::Pending);
        drive(&mut flow, &cred, &instant()).await;
        assert_eq!(flow.status(), TransferStatus::Completed);
        assert_eq!(flow.history().len(), 1);
    }

    #[tokio::test]
    async fn test_history_accumulates() {
        let mut flow = TransferFlow::default();
        for _ in 0..3 {
            let cred = at_confirmation(&mut flow).await;
            drive(&mut flow, &cred, &instant()).await;
        }
        assert_eq!(flow.history().len(), 3);
    }

    #[tokio::test]
    async fn test_abandon_resets_progress() {
        let verifier = instant();
        let mut flow = TransferFlow::default();
        drive(&mut flow, "transfer funds", &verifier).await;
        drive(&mut flow, "bob", &verifier).await;
        flow.abandon();
        assert_eq!(flow.step(), 0);
        assert_eq!(flow.receiver_id(), "");
    }
}
