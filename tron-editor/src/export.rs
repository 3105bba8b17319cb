use indexmap::IndexMap;
use tron_core::Campaign;
use tron_format::{render_document, to_external, FormatError};

use crate::models::EditingContext;

/// The campaign as it should be written out: enabled offers only, in
/// `offer_order`. Ids that are enabled but no longer in the campaign are
/// dropped.
pub fn filtered_campaign(campaign: &Campaign, context: &EditingContext) -> Campaign {
    let offers: IndexMap<_, _> = context
        .offer_order
        .iter()
        .filter(|id| context.is_enabled(id))
        .filter_map(|id| campaign.offer(id).map(|offer| (id.clone(), offer.clone())))
        .collect();

    Campaign {
        campaign_id: campaign.campaign_id.clone(),
        offers,
    }
}

/// Serialize the filtered campaign in document format, 2-space indented
pub fn export(campaign: &Campaign, context: &EditingContext) -> Result<String, ExportError> {
    let filtered = filtered_campaign(campaign, context);
    let text = render_document(&to_external(&filtered))?;
    tracing::info!(
        campaign_id = %filtered.campaign_id,
        offers = filtered.len(),
        "Exported campaign"
    );
    Ok(text)
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Format(#[from] FormatError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tron_core::{Offer, OfferMetadata};

    fn campaign(ids: &[&str]) -> Campaign {
        let mut campaign = Campaign::new("C");
        for id in ids {
            campaign.insert_offer(Offer::new(*id, "", OfferMetadata::default())).unwrap();
        }
        campaign
    }

    fn context(order: &[&str], enabled: &[&str]) -> EditingContext {
        EditingContext {
            enabled_offer_ids: enabled.iter().map(|s| s.to_string()).collect(),
            offer_order: order.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_export_filters_and_orders() {
        let campaign = campaign(&["a", "b", "c"]);
        let context = context(&["b", "a", "c"], &["a", "c"]);

        let filtered = filtered_campaign(&campaign, &context);
        assert_eq!(filtered.offer_ids(), vec!["a", "c"]);

        let text = export(&campaign, &context).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        let keys: Vec<&String> =
            value["campaignMetadata"]["offers"].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["a", "c"]);
    }

    #[test]
    fn test_export_follows_order_not_map_order() {
        let campaign = campaign(&["1", "2", "3"]);
        let context = context(&["3", "1", "2"], &["1", "2", "3"]);

        let text = export(&campaign, &context).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        let keys: Vec<&String> =
            value["campaignMetadata"]["offers"].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["3", "1", "2"]);
    }

    #[test]
    fn test_export_skips_stale_ids() {
        let campaign = campaign(&["1"]);
        let context = context(&["1", "gone"], &["1", "gone"]);

        assert_eq!(filtered_campaign(&campaign, &context).offer_ids(), vec!["1"]);
    }

    #[test]
    fn test_export_wraps_each_offer_in_a_list() {
        let campaign = campaign(&["1"]);
        let context = EditingContext::fresh(&campaign);

        let text = export(&campaign, &context).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        let entries = value["campaignMetadata"]["offers"]["1"].as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["id"], "1");
        assert!(text.contains("\n  \"campaignMetadata\""));
    }
}
