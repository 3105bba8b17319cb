use indexmap::IndexMap;
use tron_core::{BenefitKind, Campaign};

use crate::models::{BenefitField, BenefitRef, EditorState, Intent};

/// Apply one intent to a copy of `state`.
///
/// The input is never modified; on error the caller keeps its previous
/// state as is.
pub fn apply(state: &EditorState, intent: &Intent) -> Result<EditorState, EditError> {
    let mut next = state.clone();
    match ChangeHandler::apply(&mut next, intent) {
        Ok(()) => {
            tracing::debug!(intent = intent.name(), "Applied intent");
            Ok(next)
        }
        Err(err) => {
            tracing::warn!(intent = intent.name(), error = %err, "Intent rejected");
            Err(err)
        }
    }
}

/// Edit operations over a campaign and its editing context.
///
/// Each operation validates before it mutates, so a failed call leaves the
/// state untouched.
pub struct ChangeHandler;

impl ChangeHandler {
    pub fn apply(state: &mut EditorState, intent: &Intent) -> Result<(), EditError> {
        match intent {
            Intent::RenameOffer { old_id, new_id } => Self::rename_offer(state, old_id, new_id),
            Intent::ToggleOffer { id, enabled } => {
                Self::toggle_offer(state, id, *enabled);
                Ok(())
            }
            Intent::ReorderOffers { from_index, to_index } => {
                Self::reorder_offers(state, *from_index, *to_index)
            }
            Intent::ReorderBenefits { offer_id, kind, from_index, to_index } => {
                Self::reorder_benefits(state, offer_id, *kind, *from_index, *to_index)
            }
            Intent::EditBenefitField { offer_id, kind, benefit, field, value } => {
                Self::edit_benefit_field(state, offer_id, *kind, benefit, *field, value)
            }
            Intent::EditOfferGuarantee { offer_id, value } => {
                Self::edit_offer_guarantee(state, offer_id, value)
            }
            Intent::EditPromotionId { offer_id, value } => {
                Self::edit_promotion_id(state, offer_id, value)
            }
            Intent::EditCampaignId { value } => {
                Self::edit_campaign_id(state, value);
                Ok(())
            }
            Intent::EditCampaignTitle { value } => {
                Self::edit_campaign_title(state, value);
                Ok(())
            }
            Intent::AddOffer => Self::add_offer(state).map(|_| ()),
        }
    }

    /// Change an offer's id in place, keeping its position and enabled flag
    pub fn rename_offer(
        state: &mut EditorState,
        old_id: &str,
        new_id: &str,
    ) -> Result<(), EditError> {
        let campaign = &mut state.campaign;
        let index = campaign
            .offers
            .get_index_of(old_id)
            .ok_or_else(|| EditError::OfferNotFound(old_id.to_string()))?;

        if old_id == new_id {
            return Ok(());
        }
        if new_id.trim().is_empty() {
            return Err(EditError::InvalidOfferId(new_id.to_string()));
        }
        if campaign.contains_offer(new_id) {
            return Err(EditError::DuplicateOfferId(new_id.to_string()));
        }

        if let Some(mut offer) = campaign.offers.shift_remove(old_id) {
            offer.reassign_id(new_id);
            campaign.offers.shift_insert(index, new_id.to_string(), offer);
        }

        for id in state.context.offer_order.iter_mut().filter(|id| id.as_str() == old_id) {
            *id = new_id.to_string();
        }
        let enabled = &mut state.context.enabled_offer_ids;
        if enabled.remove(old_id) {
            enabled.insert(new_id.to_string());
        } else {
            enabled.remove(new_id);
        }
        prune_enabled(state);
        Ok(())
    }

    /// Include or exclude an offer from export
    pub fn toggle_offer(state: &mut EditorState, offer_id: &str, enabled: bool) {
        if !state.campaign.contains_offer(offer_id) {
            tracing::warn!(offer_id, "Toggling an offer that is not in the campaign");
        }
        if enabled {
            state.context.enabled_offer_ids.insert(offer_id.to_string());
        } else {
            state.context.enabled_offer_ids.remove(offer_id);
        }
    }

    /// Move one offer to a new position and rebuild the offer map in the
    /// new order
    pub fn reorder_offers(
        state: &mut EditorState,
        from_index: usize,
        to_index: Option<usize>,
    ) -> Result<(), EditError> {
        let Some(to_index) = to_index else {
            return Ok(());
        };
        move_item(&mut state.context.offer_order, from_index, to_index)?;
        rebuild_offer_map(&mut state.campaign, &state.context.offer_order);
        Ok(())
    }

    pub fn reorder_benefits(
        state: &mut EditorState,
        offer_id: &str,
        kind: BenefitKind,
        from_index: usize,
        to_index: Option<usize>,
    ) -> Result<(), EditError> {
        let offer = state
            .campaign
            .offer_mut(offer_id)
            .ok_or_else(|| EditError::OfferNotFound(offer_id.to_string()))?;
        let Some(to_index) = to_index else {
            return Ok(());
        };

        let metadata = &mut offer.offer_metadata;
        match kind {
            BenefitKind::Small => move_item(&mut metadata.small_benefits, from_index, to_index),
            BenefitKind::Large => move_item(&mut metadata.large_benefits, from_index, to_index),
        }
    }

    /// Replace one scalar field of one benefit
    pub fn edit_benefit_field(
        state: &mut EditorState,
        offer_id: &str,
        kind: BenefitKind,
        benefit: &BenefitRef,
        field: BenefitField,
        value: &str,
    ) -> Result<(), EditError> {
        let offer = state
            .campaign
            .offer_mut(offer_id)
            .ok_or_else(|| EditError::OfferNotFound(offer_id.to_string()))?;
        let metadata = &mut offer.offer_metadata;

        let index = match benefit {
            BenefitRef::Index(index) => Some(*index).filter(|i| *i < metadata.benefit_count(kind)),
            BenefitRef::Id(id) => metadata.benefit_ids(kind).iter().position(|b| *b == id.as_str()),
        }
        .ok_or_else(|| EditError::BenefitNotFound {
            offer_id: offer_id.to_string(),
            kind,
            benefit: benefit.to_string(),
        })?;

        let icon = || Some(value.to_string()).filter(|v| !v.is_empty());
        match (kind, field) {
            (BenefitKind::Small, BenefitField::Text) => {
                metadata.small_benefits[index].text = value.to_string()
            }
            (BenefitKind::Small, BenefitField::Icon) => {
                metadata.small_benefits[index].icon = icon()
            }
            (BenefitKind::Large, BenefitField::Title) => {
                metadata.large_benefits[index].title = value.to_string()
            }
            (BenefitKind::Large, BenefitField::Description) => {
                metadata.large_benefits[index].description = value.to_string()
            }
            (BenefitKind::Large, BenefitField::Icon) => {
                metadata.large_benefits[index].icon = icon()
            }
            (kind, field) => return Err(EditError::FieldNotApplicable { kind, field }),
        }
        Ok(())
    }

    pub fn edit_offer_guarantee(
        state: &mut EditorState,
        offer_id: &str,
        value: &str,
    ) -> Result<(), EditError> {
        let offer = state
            .campaign
            .offer_mut(offer_id)
            .ok_or_else(|| EditError::OfferNotFound(offer_id.to_string()))?;
        offer.offer_metadata.offer_guarantee = value.to_string();
        Ok(())
    }

    pub fn edit_promotion_id(
        state: &mut EditorState,
        offer_id: &str,
        value: &str,
    ) -> Result<(), EditError> {
        let offer = state
            .campaign
            .offer_mut(offer_id)
            .ok_or_else(|| EditError::OfferNotFound(offer_id.to_string()))?;
        offer.promotion_id = value.to_string();
        Ok(())
    }

    pub fn edit_campaign_id(state: &mut EditorState, value: &str) {
        state.campaign.campaign_id = value.to_string();
    }

    /// The title lives on every offer; overwrite all of them
    pub fn edit_campaign_title(state: &mut EditorState, value: &str) {
        for offer in state.campaign.offers.values_mut() {
            offer.offer_metadata.campaign_title = value.to_string();
        }
    }

    /// Append a copy of the first offer under the next numeric id.
    ///
    /// Requires every existing id to be a non-negative integer. Returns the
    /// new id.
    pub fn add_offer(state: &mut EditorState) -> Result<String, EditError> {
        let template = state
            .context
            .offer_order
            .iter()
            .find_map(|id| state.campaign.offer(id))
            .or_else(|| state.campaign.first_offer())
            .ok_or(EditError::NoTemplateOffer)?;

        let mut max_id: u64 = 0;
        for id in state.campaign.offers.keys() {
            let value = id
                .trim()
                .parse::<u64>()
                .map_err(|_| EditError::NonNumericOfferId(id.clone()))?;
            max_id = max_id.max(value);
        }
        let new_id = max_id.checked_add(1).ok_or(EditError::OfferIdExhausted)?.to_string();

        let mut offer = template.clone();
        offer.id = new_id.clone();
        offer.name = new_id.clone();

        state.campaign.offers.insert(new_id.clone(), offer);
        state.context.offer_order.push(new_id.clone());
        state.context.enabled_offer_ids.insert(new_id.clone());
        prune_enabled(state);
        Ok(new_id)
    }
}

/// Drop enabled ids that name no offer, left behind by toggles of unknown ids
fn prune_enabled(state: &mut EditorState) {
    let campaign = &state.campaign;
    state
        .context
        .enabled_offer_ids
        .retain(|id| campaign.contains_offer(id));
}

/// Single-element move: remove at `from`, reinsert at `to`
fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> Result<(), EditError> {
    let len = items.len();
    for index in [from, to] {
        if index >= len {
            return Err(EditError::IndexOutOfRange { index, len });
        }
    }
    let item = items.remove(from);
    items.insert(to, item);
    Ok(())
}

fn rebuild_offer_map(campaign: &mut Campaign, order: &[String]) {
    let mut remaining = std::mem::take(&mut campaign.offers);
    let mut rebuilt = IndexMap::with_capacity(remaining.len());
    for id in order {
        if let Some(offer) = remaining.shift_remove(id) {
            rebuilt.insert(id.clone(), offer);
        }
    }
    rebuilt.extend(remaining);
    campaign.offers = rebuilt;
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EditError {
    #[error("Offer not found: {0}")]
    OfferNotFound(String),

    #[error("Benefit {benefit} not found in {kind} benefits of offer {offer_id}")]
    BenefitNotFound {
        offer_id: String,
        kind: BenefitKind,
        benefit: String,
    },

    #[error("Index {index} out of range for {len} items")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Offer id already in use: {0}")]
    DuplicateOfferId(String),

    #[error("Invalid offer id: {0:?}")]
    InvalidOfferId(String),

    #[error("Cannot derive a new id, offer id is not numeric: {0}")]
    NonNumericOfferId(String),

    #[error("No offer to use as a template")]
    NoTemplateOffer,

    #[error("Numeric offer ids exhausted")]
    OfferIdExhausted,

    #[error("{kind} benefits have no {field} field")]
    FieldNotApplicable { kind: BenefitKind, field: BenefitField },
}

impl EditError {
    /// True for edits naming an offer, benefit or position that does not exist
    pub fn is_reference_error(&self) -> bool {
        matches!(
            self,
            EditError::OfferNotFound(_)
                | EditError::BenefitNotFound { .. }
                | EditError::IndexOutOfRange { .. }
        )
    }
}
