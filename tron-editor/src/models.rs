use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tron_core::{BenefitKind, Campaign};

/// Editor-only state kept next to a campaign; never exported as such.
///
/// `offer_order` is the single source of truth for display and export order
/// and is always a permutation of the campaign's offer ids.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct EditingContext {
    pub enabled_offer_ids: BTreeSet<String>,
    pub offer_order: Vec<String>,
}

impl EditingContext {
    /// Context for a freshly loaded campaign: every offer enabled, order
    /// taken from the campaign's map order
    pub fn fresh(campaign: &Campaign) -> Self {
        let offer_order = campaign.offer_ids();
        Self {
            enabled_offer_ids: offer_order.iter().cloned().collect(),
            offer_order,
        }
    }

    pub fn is_enabled(&self, offer_id: &str) -> bool {
        self.enabled_offer_ids.contains(offer_id)
    }

    pub fn position(&self, offer_id: &str) -> Option<usize> {
        self.offer_order.iter().position(|id| id == offer_id)
    }

    /// True when `offer_order` lists every offer of `campaign` exactly once
    pub fn is_consistent_with(&self, campaign: &Campaign) -> bool {
        let unique: BTreeSet<&str> = self.offer_order.iter().map(String::as_str).collect();
        unique.len() == self.offer_order.len()
            && self.offer_order.len() == campaign.len()
            && self.offer_order.iter().all(|id| campaign.contains_offer(id))
    }
}

/// A campaign together with its editing context
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EditorState {
    pub campaign: Campaign,
    pub context: EditingContext,
}

impl EditorState {
    pub fn fresh(campaign: Campaign) -> Self {
        let context = EditingContext::fresh(&campaign);
        Self { campaign, context }
    }
}

/// Addresses one benefit in a list, by position or by id
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum BenefitRef {
    Index(usize),
    Id(String),
}

impl std::fmt::Display for BenefitRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BenefitRef::Index(index) => write!(f, "#{}", index),
            BenefitRef::Id(id) => f.write_str(id),
        }
    }
}

/// Editable scalar fields of a benefit
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BenefitField {
    Text,
    Title,
    Description,
    Icon,
}

impl std::fmt::Display for BenefitField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BenefitField::Text => "text",
            BenefitField::Title => "title",
            BenefitField::Description => "description",
            BenefitField::Icon => "icon",
        };
        f.write_str(name)
    }
}

/// A single user edit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Intent {
    RenameOffer {
        old_id: String,
        new_id: String,
    },
    ToggleOffer {
        id: String,
        enabled: bool,
    },
    /// `to_index: None` is a cancelled drag
    ReorderOffers {
        from_index: usize,
        to_index: Option<usize>,
    },
    ReorderBenefits {
        offer_id: String,
        kind: BenefitKind,
        from_index: usize,
        to_index: Option<usize>,
    },
    EditBenefitField {
        offer_id: String,
        kind: BenefitKind,
        benefit: BenefitRef,
        field: BenefitField,
        value: String,
    },
    EditOfferGuarantee {
        offer_id: String,
        value: String,
    },
    EditPromotionId {
        offer_id: String,
        value: String,
    },
    EditCampaignId {
        value: String,
    },
    EditCampaignTitle {
        value: String,
    },
    AddOffer,
}

impl Intent {
    pub fn name(&self) -> &'static str {
        match self {
            Intent::RenameOffer { .. } => "renameOffer",
            Intent::ToggleOffer { .. } => "toggleOffer",
            Intent::ReorderOffers { .. } => "reorderOffers",
            Intent::ReorderBenefits { .. } => "reorderBenefits",
            Intent::EditBenefitField { .. } => "editBenefitField",
            Intent::EditOfferGuarantee { .. } => "editOfferGuarantee",
            Intent::EditPromotionId { .. } => "editPromotionId",
            Intent::EditCampaignId { .. } => "editCampaignId",
            Intent::EditCampaignTitle { .. } => "editCampaignTitle",
            Intent::AddOffer => "addOffer",
        }
    }
}
