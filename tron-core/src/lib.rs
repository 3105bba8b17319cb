pub mod campaign;
pub mod schema;

pub use campaign::{
    BenefitKind, Campaign, LargeBenefit, Offer, OfferMetadata, SmallBenefit,
    LARGE_BENEFITS_DISPLAY_LIMIT, SMALL_BENEFITS_DISPLAY_LIMIT,
};
pub use schema::{is_valid_campaign, validate_campaign};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Offer key {key} does not match offer id {id}")]
    OfferIdMismatch { key: String, id: String },
    #[error("Duplicate {kind} benefit id {benefit_id} in offer {offer_id}")]
    DuplicateBenefitId {
        offer_id: String,
        kind: BenefitKind,
        benefit_id: String,
    },
}

pub type CoreResult<T> = Result<T, CoreError>;
