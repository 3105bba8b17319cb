use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Large benefits beyond this count are stored but never displayed.
pub const LARGE_BENEFITS_DISPLAY_LIMIT: usize = 3;

/// Templates always produce exactly this many small benefits.
pub const SMALL_BENEFITS_DISPLAY_LIMIT: usize = 4;

/// Selects one of the two benefit lists of an offer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BenefitKind {
    Small,
    Large,
}

impl fmt::Display for BenefitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BenefitKind::Small => f.write_str("small"),
            BenefitKind::Large => f.write_str("large"),
        }
    }
}

/// Short promotional bullet
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SmallBenefit {
    pub id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl SmallBenefit {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            icon: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// Promotional card with a heading and a body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LargeBenefit {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl LargeBenefit {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            icon: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// Display content of an offer.
///
/// `campaign_title` is a campaign-wide value that the document format
/// duplicates into every offer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct OfferMetadata {
    pub campaign_title: String,
    pub small_benefits: Vec<SmallBenefit>,
    pub large_benefits: Vec<LargeBenefit>,
    pub offer_guarantee: String,
    /// Fields this editor does not know about, carried through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OfferMetadata {
    /// Large benefits as the editor shows them (first three)
    pub fn displayed_large_benefits(&self) -> &[LargeBenefit] {
        let end = self.large_benefits.len().min(LARGE_BENEFITS_DISPLAY_LIMIT);
        &self.large_benefits[..end]
    }

    /// Small benefits as the editor shows them (first four)
    pub fn displayed_small_benefits(&self) -> &[SmallBenefit] {
        let end = self.small_benefits.len().min(SMALL_BENEFITS_DISPLAY_LIMIT);
        &self.small_benefits[..end]
    }

    /// Benefit ids of one list, in list order
    pub fn benefit_ids(&self, kind: BenefitKind) -> Vec<&str> {
        match kind {
            BenefitKind::Small => self.small_benefits.iter().map(|b| b.id.as_str()).collect(),
            BenefitKind::Large => self.large_benefits.iter().map(|b| b.id.as_str()).collect(),
        }
    }

    pub fn benefit_count(&self, kind: BenefitKind) -> usize {
        match kind {
            BenefitKind::Small => self.small_benefits.len(),
            BenefitKind::Large => self.large_benefits.len(),
        }
    }
}

/// One priced plan variant within a campaign
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: String,
    pub name: String,
    pub promotion_id: String,
    pub offer_metadata: OfferMetadata,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Offer {
    /// Create an offer whose display name is its id
    pub fn new(
        id: impl Into<String>,
        promotion_id: impl Into<String>,
        offer_metadata: OfferMetadata,
    ) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            promotion_id: promotion_id.into(),
            offer_metadata,
            extra: Map::new(),
        }
    }

    /// Give the offer a new id, keeping the display name in step when it
    /// was still mirroring the old id
    pub fn reassign_id(&mut self, new_id: &str) {
        if self.name == self.id {
            self.name = new_id.to_string();
        }
        self.id = new_id.to_string();
    }
}

/// The campaign document.
///
/// Offers are keyed by id. Map order is the order the offers were loaded or
/// last rebuilt in; edit operations keep it aligned with the editing order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub campaign_id: String,
    pub offers: IndexMap<String, Offer>,
}

impl Campaign {
    pub fn new(campaign_id: impl Into<String>) -> Self {
        Self {
            campaign_id: campaign_id.into(),
            offers: IndexMap::new(),
        }
    }

    /// Insert an offer under its own id. Returns the offer back if the id
    /// is already taken.
    pub fn insert_offer(&mut self, offer: Offer) -> Result<(), Offer> {
        if self.offers.contains_key(&offer.id) {
            return Err(offer);
        }
        self.offers.insert(offer.id.clone(), offer);
        Ok(())
    }

    pub fn offer(&self, id: &str) -> Option<&Offer> {
        self.offers.get(id)
    }

    pub fn offer_mut(&mut self, id: &str) -> Option<&mut Offer> {
        self.offers.get_mut(id)
    }

    pub fn contains_offer(&self, id: &str) -> bool {
        self.offers.contains_key(id)
    }

    /// Offer ids in map order
    pub fn offer_ids(&self) -> Vec<String> {
        self.offers.keys().cloned().collect()
    }

    pub fn first_offer(&self) -> Option<&Offer> {
        self.offers.values().next()
    }

    pub fn len(&self) -> usize {
        self.offers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata_with_large(count: usize) -> OfferMetadata {
        OfferMetadata {
            campaign_title: "Lato".to_string(),
            large_benefits: (1..=count)
                .map(|i| LargeBenefit::new(format!("benefit{}", i), "Tytuł", "Opis"))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_large_benefit_display_is_capped() {
        let metadata = metadata_with_large(5);
        assert_eq!(metadata.displayed_large_benefits().len(), 3);
        assert_eq!(metadata.large_benefits.len(), 5);

        let short = metadata_with_large(2);
        assert_eq!(short.displayed_large_benefits().len(), 2);
    }

    #[test]
    fn test_insert_offer_rejects_duplicate_id() {
        let mut campaign = Campaign::new("SUMMER");
        campaign.insert_offer(Offer::new("1", "P1", OfferMetadata::default())).unwrap();

        let rejected = campaign.insert_offer(Offer::new("1", "P2", OfferMetadata::default()));
        assert_eq!(rejected.unwrap_err().promotion_id, "P2");
        assert_eq!(campaign.len(), 1);
        assert_eq!(campaign.offer("1").unwrap().promotion_id, "P1");
    }

    #[test]
    fn test_offer_ids_follow_insertion_order() {
        let mut campaign = Campaign::new("SUMMER");
        for id in ["3", "1", "2"] {
            campaign.insert_offer(Offer::new(id, "", OfferMetadata::default())).unwrap();
        }
        assert_eq!(campaign.offer_ids(), vec!["3", "1", "2"]);
        assert_eq!(campaign.first_offer().unwrap().id, "3");
    }

    #[test]
    fn test_reassign_id_keeps_custom_name() {
        let mut mirrored = Offer::new("1", "", OfferMetadata::default());
        mirrored.reassign_id("7");
        assert_eq!(mirrored.name, "7");

        let mut named = Offer::new("1", "", OfferMetadata::default());
        named.name = "Taryfa G11".to_string();
        named.reassign_id("7");
        assert_eq!(named.id, "7");
        assert_eq!(named.name, "Taryfa G11");
    }
}
