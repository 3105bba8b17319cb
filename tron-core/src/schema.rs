use std::collections::HashSet;

use serde_json::Value;

use crate::campaign::{BenefitKind, Campaign};
use crate::{CoreError, CoreResult};

/// Shallow shape check for an uploaded document.
///
/// Only looks for `campaignMetadata.offers` being an object; individual
/// offers are not inspected.
pub fn is_valid_campaign(data: &Value) -> bool {
    data.as_object()
        .and_then(|root| root.get("campaignMetadata"))
        .and_then(Value::as_object)
        .and_then(|metadata| metadata.get("offers"))
        .map_or(false, Value::is_object)
}

/// Structural invariants of a decoded campaign
pub fn validate_campaign(campaign: &Campaign) -> CoreResult<()> {
    for (key, offer) in &campaign.offers {
        if key != &offer.id {
            return Err(CoreError::OfferIdMismatch {
                key: key.clone(),
                id: offer.id.clone(),
            });
        }

        for kind in [BenefitKind::Small, BenefitKind::Large] {
            let mut seen = HashSet::new();
            for benefit_id in offer.offer_metadata.benefit_ids(kind) {
                if !seen.insert(benefit_id) {
                    return Err(CoreError::DuplicateBenefitId {
                        offer_id: offer.id.clone(),
                        kind,
                        benefit_id: benefit_id.to_string(),
                    });
                }
            }
        }
    }
    Ok(())
}
