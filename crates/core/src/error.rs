use crate::model::{ItemId, PersonId};
use crate::recognizer::RecognitionError;

#[derive(Debug, thiserror::Error)]
pub enum BillError {
    #[error("name cannot be empty")]
    InvalidName,
    #[error("price must be a positive finite amount, got {0}")]
    InvalidPrice(f64),
    #[error("item not found: {0}")]
    ItemNotFound(ItemId),
    #[error("person not found: {0}")]
    PersonNotFound(PersonId),

    #[error("a receipt scan is already in progress")]
    ScanInProgress,
    #[error("scan ticket was issued by another session")]
    ForeignScanTicket,
    #[error("receipt recognition failed: {0}")]
    RecognitionFailed(#[from] RecognitionError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl BillError {
    /// True for the silent no-op class: bad input or a stale id.
    ///
    /// These never leave the point of the call; the caller keeps its previous state.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::InvalidName
                | Self::InvalidPrice(_)
                | Self::ItemNotFound(_)
                | Self::PersonNotFound(_)
        )
    }
}

pub type BillResult<T> = std::result::Result<T, BillError>;
