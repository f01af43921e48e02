//! Identity-verification (KYC) intake flow.
//!
//! Step 0: any trigger shows the document checklist and moves to step 1.
//! Step 1: each `upload document <file>` records the next required document;
//! the third one completes verification and resets the flow to step 0.

use serde::{Deserialize, Serialize};

const UPLOAD_PREFIX: &str = "upload document";

const CHECKLIST: &str = "Welcome to the KYC verification process. Please provide the following documents:

1. Government-issued ID (passport or driver's license)
2. Proof of address (utility bill or bank statement)
3. Selfie with your ID

Use the \"Upload Document\" action to submit each document.";

const COMPLETED: &str = "Thank you for submitting all required documents. Your KYC verification is complete!

Status: VERIFIED

You can now proceed with using the platform's features.";

const UPLOAD_REMINDER: &str =
    "Please use the \"Upload Document\" action to submit your documents.";

/// Required document kinds, in the order they are collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    GovernmentId,
    ProofOfAddress,
    Selfie,
}

impl DocumentKind {
    pub const REQUIRED: [DocumentKind; 3] = [
        DocumentKind::GovernmentId,
        DocumentKind::ProofOfAddress,
        DocumentKind::Selfie,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::GovernmentId => "Government-issued ID",
            DocumentKind::ProofOfAddress => "Proof of address",
            DocumentKind::Selfie => "Selfie with ID",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Pending,
    Verified,
    Rejected,
}

/// One submitted document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KycDocument {
    pub kind: DocumentKind,
    /// Identifier supplied by the upload collaborator (a file name).
    pub file_name: String,
    pub status: DocumentStatus,
}

/// State of the identity-verification flow.
#[derive(Debug, Clone, Default)]
pub struct IdentityFlow {
    step: u8,
    documents: Vec<KycDocument>,
}

impl IdentityFlow {
    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn documents(&self) -> &[KycDocument] {
        &self.documents
    }

    /// Whether the last completed run verified every required document.
    pub fn is_verified(&self) -> bool {
        self.step == 0
            && self.documents.len() == DocumentKind::REQUIRED.len()
            && self
                .documents
                .iter()
                .all(|d| d.status == DocumentStatus::Verified)
    }

    /// Advance the flow by one user message and return the reply.
    pub fn advance(&mut self, message: &str) -> String {
        if self.step == 0 {
            self.step = 1;
            self.documents.clear();
            tracing::info!("Identity verification started");
            return CHECKLIST.to_string();
        }

        let Some(file_name) = parse_upload(message) else {
            return UPLOAD_REMINDER.to_string();
        };

        let Some(&kind) = DocumentKind::REQUIRED.get(self.documents.len()) else {
            // Unreachable while turns are serialized: the flow resets on the last upload.
            tracing::warn!(
                count = self.documents.len(),
                "Upload received with every document already submitted"
            );
            return self.complete();
        };

        self.documents.push(KycDocument {
            kind,
            file_name: file_name.to_string(),
            status: DocumentStatus::Pending,
        });
        let submitted = self.documents.len();
        let total = DocumentKind::REQUIRED.len();
        tracing::debug!(kind = ?kind, submitted, total, "Identity document received");

        if submitted >= total {
            return self.complete();
        }

        let shown_name = if file_name.is_empty() {
            "unnamed file"
        } else {
            file_name
        };
        format!(
            "Document \"{}\" ({}) received. Please submit the remaining documents.\nCurrently submitted: {}/{} documents.",
            kind.label(),
            shown_name,
            submitted,
            total
        )
    }

    pub(crate) fn abandon(&mut self) {
        self.step = 0;
        self.documents.clear();
    }

    fn complete(&mut self) -> String {
        self.step = 0;
        for doc in &mut self.documents {
            doc.status = DocumentStatus::Verified;
        }
        tracing::info!("Identity verification completed");
        COMPLETED.to_string()
    }
}

/// Extract the file name from an `upload document <file>` message.
///
/// The prefix is matched case-insensitively; the file name keeps its case
/// and may be empty.
fn parse_upload(message: &str) -> Option<&str> {
    let message = message.trim();
    let prefix = message.get(..UPLOAD_PREFIX.len())?;
    if !prefix.eq_ignore_ascii_case(UPLOAD_PREFIX) {
        return None;
    }
    Some(message[UPLOAD_PREFIX.len()..].trim())
}
