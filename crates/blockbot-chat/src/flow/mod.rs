//! Flow state store and the three step-indexed flows.

pub mod contract;
pub mod identity;
pub mod transfer;

pub use contract::{ContractDraft, ContractFlow, ContractOutcome, ContractRequest};
pub use identity::{DocumentKind, DocumentStatus, IdentityFlow, KycDocument};
pub use transfer::{
    ConfirmationVerifier, TransferFlow, TransferOutcome, TransferReceipt, TransferStatus,
};

use crate::types::{FlowKind, FlowSteps};

/// Per-session state of every flow.
///
/// All three flows exist for the whole session; at most one has a nonzero
/// step at any time. Flows are advanced only inside the crate, after
/// [`FlowStore::make_exclusive`]; callers outside get read access.
#[derive(Debug, Clone, Default)]
pub struct FlowStore {
    pub(crate) identity: IdentityFlow,
    pub(crate) transfer: TransferFlow,
    pub(crate) contract: ContractFlow,
}

impl FlowStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identity(&self) -> &IdentityFlow {
        &self.identity
    }

    pub fn transfer(&self) -> &TransferFlow {
        &self.transfer
    }

    pub fn contract(&self) -> &ContractFlow {
        &self.contract
    }

    pub fn steps(&self) -> FlowSteps {
        FlowSteps {
            identity: self.identity.step(),
            transfer: self.transfer.step(),
            contract: self.contract.step(),
        }
    }

    pub fn step_of(&self, kind: FlowKind) -> u8 {
        match kind {
            FlowKind::Identity => self.identity.step(),
            FlowKind::Transfer => self.transfer.step(),
            FlowKind::Contract => self.contract.step(),
        }
    }

    /// Prepare for `kind` to start: any other flow still in progress is
    /// abandoned and reset to step 0.
    ///
    /// Returns the flows that were abandoned.
    pub fn make_exclusive(&mut self, kind: FlowKind) -> Vec<FlowKind> {
        let mut abandoned = Vec::new();
        if kind != FlowKind::Identity && self.identity.step() > 0 {
            self.identity.abandon();
            abandoned.push(FlowKind::Identity);
        }
        if kind != FlowKind::Transfer && self.transfer.step() > 0 {
            self.transfer.abandon();
            abandoned.push(FlowKind::Transfer);
        }
        if kind != FlowKind::Contract && self.contract.step() > 0 {
            self.contract.abandon();
            abandoned.push(FlowKind::Contract);
        }
        for flow in &abandoned {
            tracing::info!(abandoned = ?flow, started = ?kind, "Flow abandoned for a new flow");
        }
        abandoned
    }
}
