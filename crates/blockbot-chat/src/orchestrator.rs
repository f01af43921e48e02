//! Dialogue controller: central coordinator wiring classifier, flows, and
//! the fallback responder.
//!
//! One controller owns one conversation. Turns are serialized: a turn that
//! arrives while another is still being answered is refused with
//! [`ChatError::Busy`] and leaves no trace in the log.
//!
//! Flow state sits behind a short-held lock that is never kept across an
//! await, so steps, transfers and documents stay readable while a reply is
//! being generated or a confirmation key verified.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use blockbot_core::config::BlockbotConfig;

use crate::classifier::IntentClassifier;
use crate::error::ChatError;
use crate::flow::{
    ConfirmationVerifier, ContractOutcome, ContractRequest, FlowStore, KycDocument,
    TransferOutcome, TransferReceipt,
};
use crate::generator::TextGenerator;
use crate::log::ConversationLog;
use crate::response::{
    FallbackResponder, CONSENSUS_ANSWER, CONTRACT_APOLOGY, FALLBACK_APOLOGY, WELCOME_MESSAGE,
};
use crate::types::{FlowSelector, FlowSteps, Role, Turn, TurnInput};

/// Routes user turns and records the conversation.
pub struct DialogueController {
    classifier: IntentClassifier,
    responder: FallbackResponder,
    verifier: ConfirmationVerifier,
    /// Set while a turn is in progress.
    busy: AtomicBool,
    flows: Mutex<FlowStore>,
    log: Mutex<ConversationLog>,
    max_message_length: usize,
}

/// Work left after the synchronous part of a turn.
enum Pending {
    Reply(String),
    Contract(ContractRequest),
    Verify(String),
    Fallback,
}

/// Holds the busy flag for one accepted turn.
///
/// If the turn is dropped before [`TurnGuard::answer`] runs (a caller
/// timeout, a lost `select!` branch), the apology is recorded as the
/// assistant turn so the log never ends on an unanswered user turn.
struct TurnGuard<'a> {
    busy: &'a AtomicBool,
    log: &'a Mutex<ConversationLog>,
    apology: &'static str,
    answered: bool,
}

impl<'a> TurnGuard<'a> {
    fn acquire(
        busy: &'a AtomicBool,
        log: &'a Mutex<ConversationLog>,
    ) -> Result<Self, ChatError> {
        busy.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ChatError::Busy)?;
        Ok(Self {
            busy,
            log,
            apology: FALLBACK_APOLOGY,
            answered: false,
        })
    }

    fn answer(mut self, reply: String) -> Turn {
        self.answered = true;
        lock(self.log).append(Role::Assistant, reply).clone()
    }
}

impl Drop for TurnGuard<'_> {
    fn drop(&mut self) {
        if !self.answered {
            tracing::warn!("Turn abandoned before a reply was recorded");
            lock(self.log).append(Role::Assistant, self.apology);
        }
        self.busy.store(false, Ordering::Release);
    }
}

impl DialogueController {
    /// Create a controller for a fresh session.
    ///
    /// When `config.chat.welcome_message` is set the log starts with the
    /// welcome turn.
    pub fn new(config: &BlockbotConfig, generator: Arc<dyn TextGenerator>) -> Self {
        let responder = FallbackResponder::new(
            generator,
            Duration::from_secs(config.generator.timeout_secs),
        );
        let verifier =
            ConfirmationVerifier::new(Duration::from_millis(config.transfer.verification_delay_ms));

        let mut log = ConversationLog::new();
        if config.chat.welcome_message {
            log.append(Role::Assistant, WELCOME_MESSAGE);
        }

        Self {
            classifier: IntentClassifier::new(),
            responder,
            verifier,
            busy: AtomicBool::new(false),
            flows: Mutex::new(FlowStore::new()),
            log: Mutex::new(log),
            max_message_length: config.chat.max_message_length,
        }
    }

    /// Handle one user turn.
    ///
    /// Returns the assistant turn, or `None` when the input was blank and
    /// silently ignored. Every accepted turn appends exactly one user turn
    /// and one assistant turn, in that order, even if the returned future
    /// is dropped before it completes.
    pub async fn handle_turn(
        &self,
        input: impl Into<TurnInput>,
    ) -> Result<Option<Turn>, ChatError> {
        let input = input.into();
        let message = input.message().to_string();

        if message.is_empty() {
            tracing::debug!("Ignoring empty message");
            return Ok(None);
        }
        if message.chars().count() > self.max_message_length {
            return Err(ChatError::MessageTooLong(self.max_message_length));
        }

        let mut guard = TurnGuard::acquire(&self.busy, &self.log)?;
        self.log().append(Role::User, message.as_str());

        let pending = {
            let mut flows = self.flows();
            let selector = self.classifier.classify(&message, flows.steps());
            if let Some(kind) = selector.flow() {
                if flows.step_of(kind) == 0 {
                    flows.make_exclusive(kind);
                }
            }
            tracing::info!(?selector, topic = input.is_topic(), "Turn accepted");

            match selector {
                FlowSelector::Identity => Pending::Reply(flows.identity.advance(&message)),
                FlowSelector::Contract => match flows.contract.advance(&message) {
                    ContractOutcome::Prompt(text) => Pending::Reply(text),
                    ContractOutcome::Generate(request) => Pending::Contract(request),
                },
                FlowSelector::Consensus => Pending::Reply(CONSENSUS_ANSWER.to_string()),
                FlowSelector::Transfer => match flows.transfer.advance(&message) {
                    TransferOutcome::Reply(text) => Pending::Reply(text),
                    TransferOutcome::Verify(candidate) => Pending::Verify(candidate),
                },
                FlowSelector::Fallback => Pending::Fallback,
            }
        };

        let reply = match pending {
            Pending::Reply(text) => text,
            Pending::Contract(request) => {
                guard.apology = CONTRACT_APOLOGY;
                self.responder.generate_contract(&request).await
            }
            Pending::Verify(candidate) => {
                let valid = self.verifier.verify(&candidate).await;
                self.flows().transfer.finish(valid)
            }
            Pending::Fallback => self.responder.respond(&message).await,
        };

        Ok(Some(guard.answer(reply)))
    }

    /// Full conversation log, oldest first.
    pub fn history(&self) -> Vec<Turn> {
        self.log().turns().to_vec()
    }

    pub fn turn_count(&self) -> usize {
        self.log().turns().len()
    }

    /// True while a turn is being processed.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Current step of every flow.
    pub fn flow_steps(&self) -> FlowSteps {
        self.flows().steps()
    }

    /// Whether the last identity verification completed.
    pub fn identity_verified(&self) -> bool {
        self.flows().identity().is_verified()
    }

    /// Completed transfers of this session, oldest first.
    pub fn transfers(&self) -> Vec<TransferReceipt> {
        self.flows().transfer().history().to_vec()
    }

    /// Documents submitted in the current or last identity verification.
    pub fn documents(&self) -> Vec<KycDocument> {
        self.flows().identity().documents().to_vec()
    }

    fn flows(&self) -> MutexGuard<'_, FlowStore> {
        lock(&self.flows)
    }

    fn log(&self) -> MutexGuard<'_, ConversationLog> {
        lock(&self.log)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// Tests
// =============================================================================
