use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Uploaded/exported campaign document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublicisDocument {
    pub campaign_metadata: PublicisCampaignMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublicisCampaignMetadata {
    #[serde(default)]
    pub campaign_id: String,
    /// Each key holds a list that in practice contains exactly one offer
    pub offers: IndexMap<String, Vec<PublicisOffer>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublicisOffer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub promotion_id: String,
    #[serde(default)]
    pub offer_metadata: PublicisOfferMetadata,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PublicisOfferMetadata {
    #[serde(default)]
    pub campaign_title: String,
    #[serde(default)]
    pub small_benefits: BenefitRecord<PublicisSmallBenefit>,
    #[serde(default)]
    pub large_benefits: BenefitRecord<PublicisLargeBenefit>,
    #[serde(default)]
    pub offer_guarantee: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublicisSmallBenefit {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublicisLargeBenefit {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// A benefit list as it appears on the wire.
///
/// The document format uses a record keyed `benefit1`, `benefit2`, ...;
/// files saved by older editor builds carry a plain array instead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum BenefitRecord<T> {
    Keyed(IndexMap<String, T>),
    Listed(Vec<ListedBenefit<T>>),
}

impl<T> Default for BenefitRecord<T> {
    fn default() -> Self {
        BenefitRecord::Keyed(IndexMap::new())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListedBenefit<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub body: T,
}
