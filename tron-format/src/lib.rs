pub mod publicis;
pub mod transform;

pub use publicis::{
    BenefitRecord, ListedBenefit, PublicisCampaignMetadata, PublicisDocument, PublicisLargeBenefit,
    PublicisOffer, PublicisOfferMetadata, PublicisSmallBenefit,
};
pub use transform::{parse_document, render_document, to_external, to_internal, FormatError};
