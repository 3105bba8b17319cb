use indexmap::IndexMap;
use serde_json::Value;
use tron_core::{
    is_valid_campaign, validate_campaign, Campaign, CoreError, LargeBenefit, Offer,
    OfferMetadata, SmallBenefit,
};

use crate::publicis::{
    BenefitRecord, ListedBenefit, PublicisCampaignMetadata, PublicisDocument,
    PublicisLargeBenefit, PublicisOffer, PublicisOfferMetadata, PublicisSmallBenefit,
};

/// Parse JSON text into a campaign.
///
/// Runs the shallow shape check first, then a typed decode and the
/// structural invariants.
pub fn parse_document(text: &str) -> Result<Campaign, FormatError> {
    let value: Value = serde_json::from_str(text).map_err(FormatError::MalformedJson)?;
    if !is_valid_campaign(&value) {
        return Err(FormatError::InvalidStructure);
    }
    let document: PublicisDocument = serde_json::from_value(value).map_err(FormatError::Decode)?;
    to_internal(document)
}

/// Pretty-print a document with 2-space indentation
pub fn render_document(document: &PublicisDocument) -> Result<String, FormatError> {
    serde_json::to_string_pretty(document).map_err(FormatError::Encode)
}

/// Convert the wire document into the editor model.
///
/// Keyed benefit records become lists ordered by the numeric suffix of
/// their keys; each benefit keeps its key as id.
pub fn to_internal(document: PublicisDocument) -> Result<Campaign, FormatError> {
    let metadata = document.campaign_metadata;
    let mut campaign = Campaign::new(metadata.campaign_id);

    for (key, entries) in metadata.offers {
        if entries.is_empty() {
            tracing::warn!(offer_key = %key, "Skipping offer key with no offers");
            continue;
        }

        for entry in entries {
            let offer = offer_to_internal(&key, entry);
            if let Err(offer) = campaign.insert_offer(offer) {
                return Err(FormatError::DuplicateOffer(offer.id));
            }
        }
    }

    validate_campaign(&campaign)?;
    Ok(campaign)
}

/// Convert the editor model back into the wire document.
///
/// Benefit keys are positional (`benefit1`, `benefit2`, ...) whatever the
/// benefit ids are. Every benefit is emitted.
pub fn to_external(campaign: &Campaign) -> PublicisDocument {
    let offers = campaign
        .offers
        .values()
        .map(|offer| (offer.id.clone(), vec![offer_to_external(offer)]))
        .collect();

    PublicisDocument {
        campaign_metadata: PublicisCampaignMetadata {
            campaign_id: campaign.campaign_id.clone(),
            offers,
        },
    }
}

fn offer_to_internal(key: &str, entry: PublicisOffer) -> Offer {
    let id = entry.id.unwrap_or_else(|| key.to_string());
    let name = entry.name.unwrap_or_else(|| id.clone());
    let metadata = entry.offer_metadata;

    let small_benefits = ordered_benefits(metadata.small_benefits)
        .into_iter()
        .map(|(id, b)| SmallBenefit { id, text: b.text, icon: b.icon })
        .collect();
    let large_benefits = ordered_benefits(metadata.large_benefits)
        .into_iter()
        .map(|(id, b)| LargeBenefit {
            id,
            title: b.title,
            description: b.description,
            icon: b.icon,
        })
        .collect();

    Offer {
        id,
        name,
        promotion_id: entry.promotion_id,
        offer_metadata: OfferMetadata {
            campaign_title: metadata.campaign_title,
            small_benefits,
            large_benefits,
            offer_guarantee: metadata.offer_guarantee,
            extra: metadata.extra,
        },
        extra: entry.extra,
    }
}

fn offer_to_external(offer: &Offer) -> PublicisOffer {
    let metadata = &offer.offer_metadata;

    let small_benefits = positional_record(metadata.small_benefits.iter().map(|b| {
        PublicisSmallBenefit {
            text: b.text.clone(),
            icon: b.icon.clone(),
        }
    }));
    let large_benefits = positional_record(metadata.large_benefits.iter().map(|b| {
        PublicisLargeBenefit {
            title: b.title.clone(),
            description: b.description.clone(),
            icon: b.icon.clone(),
        }
    }));

    PublicisOffer {
        id: Some(offer.id.clone()),
        name: (offer.name != offer.id).then(|| offer.name.clone()),
        promotion_id: offer.promotion_id.clone(),
        offer_metadata: PublicisOfferMetadata {
            campaign_title: metadata.campaign_title.clone(),
            small_benefits,
            large_benefits,
            offer_guarantee: metadata.offer_guarantee.clone(),
            extra: metadata.extra.clone(),
        },
        extra: offer.extra.clone(),
    }
}

fn positional_record<T>(benefits: impl Iterator<Item = T>) -> BenefitRecord<T> {
    BenefitRecord::Keyed(
        benefits
            .enumerate()
            .map(|(index, benefit)| (format!("benefit{}", index + 1), benefit))
            .collect::<IndexMap<_, _>>(),
    )
}

/// Flatten a wire record into `(id, benefit)` pairs in display order
fn ordered_benefits<T>(record: BenefitRecord<T>) -> Vec<(String, T)> {
    match record {
        BenefitRecord::Keyed(entries) => {
            let mut entries: Vec<(String, T)> = entries.into_iter().collect();
            // Stable: keys without a numeric suffix keep document order, last
            entries.sort_by_key(|(key, _)| match key_suffix(key) {
                Some(n) => (0, n),
                None => (1, 0),
            });
            entries
        }
        BenefitRecord::Listed(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, ListedBenefit { id, body })| {
                (id.unwrap_or_else(|| format!("benefit{}", index + 1)), body)
            })
            .collect(),
    }
}

fn key_suffix(key: &str) -> Option<u64> {
    let stem = key.trim_end_matches(|c: char| c.is_ascii_digit());
    key[stem.len()..].parse().ok()
}

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("Malformed JSON: {0}")]
    MalformedJson(#[source] serde_json::Error),

    #[error("Invalid campaign structure: expected campaignMetadata.offers object")]
    InvalidStructure,

    #[error("Campaign does not match the document schema: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Duplicate offer id: {0}")]
    DuplicateOffer(String),

    #[error(transparent)]
    Invalid(#[from] CoreError),

    #[error("Failed to encode campaign: {0}")]
    Encode(#[source] serde_json::Error),
}

impl FormatError {
    /// True when the input was not JSON at all, as opposed to JSON of the
    /// wrong shape
    pub fn is_parse_error(&self) -> bool {
        matches!(self, FormatError::MalformedJson(_))
    }
}
