use chrono::{DateTime, Utc};
use serde::Serialize;
use tron_core::Campaign;
use tron_format::{parse_document, FormatError};
use tron_offer::{CampaignGenerator, CsvError, SkippedRow};

use crate::changes::{self, EditError};
use crate::export::{self, ExportError};
use crate::models::{EditingContext, EditorState, Intent};

/// Where the loaded campaign came from
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LoadSource {
    Json,
    Csv,
}

/// The campaign exactly as it was last loaded
#[derive(Debug, Clone)]
pub struct LoadedSnapshot {
    pub campaign: Campaign,
    pub source: LoadSource,
    pub loaded_at: DateTime<Utc>,
}

/// Serializable picture of the session
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView<'a> {
    pub campaign: &'a Campaign,
    pub context: &'a EditingContext,
    pub source: LoadSource,
    pub loaded_at: DateTime<Utc>,
}

/// Owns one open document: the loaded snapshot and the current edit state.
///
/// Every operation either replaces the current state wholesale or leaves
/// it as it was.
pub struct EditorSession {
    generator: CampaignGenerator,
    loaded: Option<LoadedSnapshot>,
    state: Option<EditorState>,
}

impl EditorSession {
    pub fn new(generator: CampaignGenerator) -> Self {
        Self {
            generator,
            loaded: None,
            state: None,
        }
    }

    /// Load a campaign document. A failed load keeps the previous campaign.
    pub fn load_json(&mut self, text: &str) -> Result<&EditorState, SessionError> {
        let campaign = parse_document(text).map_err(|err| {
            tracing::warn!(error = %err, "Rejected campaign JSON");
            SessionError::from(err)
        })?;
        Ok(self.load_campaign(campaign, LoadSource::Json))
    }

    /// Generate a campaign from an offer sheet. Returns the skipped rows.
    pub fn load_csv(&mut self, text: &str) -> Result<Vec<SkippedRow>, SessionError> {
        let generated = self.generator.from_csv(text).map_err(|err| {
            tracing::warn!(error = %err, "Rejected offer sheet");
            SessionError::from(err)
        })?;
        self.load_campaign(generated.campaign, LoadSource::Csv);
        Ok(generated.skipped)
    }

    /// Replace all session state with `campaign`
    pub fn load_campaign(&mut self, campaign: Campaign, source: LoadSource) -> &EditorState {
        tracing::info!(
            campaign_id = %campaign.campaign_id,
            offers = campaign.len(),
            ?source,
            "Loaded campaign"
        );
        self.loaded = Some(LoadedSnapshot {
            campaign: campaign.clone(),
            source,
            loaded_at: Utc::now(),
        });
        self.state.insert(EditorState::fresh(campaign))
    }

    pub fn apply(&mut self, intent: &Intent) -> Result<&EditorState, SessionError> {
        let current = self.state.as_ref().ok_or(SessionError::NoCampaignLoaded)?;
        let next = changes::apply(current, intent)?;
        Ok(&*self.state.insert(next))
    }

    /// Throw away all edits and start again from the loaded snapshot
    pub fn reset_to_loaded(&mut self) -> Result<&EditorState, SessionError> {
        let loaded = self.loaded.as_ref().ok_or(SessionError::NoCampaignLoaded)?;
        tracing::info!(
            campaign_id = %loaded.campaign.campaign_id,
            "Reset campaign to loaded state"
        );
        let fresh = EditorState::fresh(loaded.campaign.clone());
        Ok(&*self.state.insert(fresh))
    }

    pub fn export(&self) -> Result<String, SessionError> {
        let state = self.state.as_ref().ok_or(SessionError::NoCampaignLoaded)?;
        Ok(export::export(&state.campaign, &state.context)?)
    }

    pub fn state(&self) -> Option<&EditorState> {
        self.state.as_ref()
    }

    pub fn loaded(&self) -> Option<&LoadedSnapshot> {
        self.loaded.as_ref()
    }

    pub fn view(&self) -> Option<SessionView<'_>> {
        let state = self.state.as_ref()?;
        let loaded = self.loaded.as_ref()?;
        Some(SessionView {
            campaign: &state.campaign,
            context: &state.context,
            source: loaded.source,
            loaded_at: loaded.loaded_at,
        })
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(CampaignGenerator::default())
    }
}

/// How a session failure should be reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Input was not valid JSON / CSV
    Parse,
    /// Input parsed but has the wrong shape
    Schema,
    /// An edit named something that does not exist
    Reference,
    /// The operation is not possible in the current state
    Conflict,
    Internal,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("No campaign loaded")]
    NoCampaignLoaded,

    #[error(transparent)]
    Document(#[from] FormatError),

    #[error(transparent)]
    Sheet(#[from] CsvError),

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

impl SessionError {
    pub fn class(&self) -> ErrorClass {
        match self {
            SessionError::NoCampaignLoaded => ErrorClass::Conflict,
            SessionError::Document(FormatError::Encode(_)) => ErrorClass::Internal,
            SessionError::Document(err) if err.is_parse_error() => ErrorClass::Parse,
            SessionError::Document(_) => ErrorClass::Schema,
            SessionError::Sheet(_) => ErrorClass::Parse,
            SessionError::Edit(err) if err.is_reference_error() => ErrorClass::Reference,
            SessionError::Edit(_) => ErrorClass::Conflict,
            SessionError::Export(_) => ErrorClass::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"{
      "campaignMetadata": {
        "campaignId": "SPRING",
        "offers": {
          "1": [{ "id": "1", "promotionId": "P1", "offerMetadata": {
            "campaignTitle": "Wiosna",
            "smallBenefits": { "benefit1": { "text": "a" }, "benefit2": { "text": "b" } },
            "largeBenefits": { "benefit1": { "title": "t", "description": "d" } },
            "offerGuarantee": "g" } }],
          "2": [{ "id": "2", "promotionId": "P2", "offerMetadata": {
            "campaignTitle": "Wiosna", "smallBenefits": {}, "largeBenefits": {}, "offerGuarantee": "" } }]
        }
      }
    }"#;

    const SHEET: &str = "id;sfname;name;tariff;title_pl;period;cashback;fee\n\
                         1;SF1;PROMO1;G11;Prąd;\\N;50;10\n\
                         2;SF2;PROMO2;G11;Prąd;24;0;5\n";

    #[test]
    fn test_operations_need_a_campaign() {
        let mut session = EditorSession::default();
        assert!(matches!(session.export(), Err(SessionError::NoCampaignLoaded)));
        assert!(matches!(session.reset_to_loaded(), Err(SessionError::NoCampaignLoaded)));
        let err = session.apply(&Intent::AddOffer).unwrap_err();
        assert_eq!(err.class(), ErrorClass::Conflict);
        assert!(session.view().is_none());
    }

    #[test]
    fn test_load_json_enables_all_offers() {
        let mut session = EditorSession::default();
        let state = session.load_json(DOCUMENT).unwrap();

        assert_eq!(state.context.offer_order, vec!["1", "2"]);
        assert!(state.context.is_enabled("1") && state.context.is_enabled("2"));
        assert_eq!(session.view().unwrap().source, LoadSource::Json);
    }

    #[test]
    fn test_failed_load_keeps_previous_campaign() {
        let mut session = EditorSession::default();
        session.load_json(DOCUMENT).unwrap();
        session
            .apply(&Intent::ToggleOffer { id: "2".to_string(), enabled: false })
            .unwrap();

        let err = session.load_json("{ broken").unwrap_err();
        assert_eq!(err.class(), ErrorClass::Parse);
        let err = session.load_json(r#"{ "campaignMetadata": {} }"#).unwrap_err();
        assert_eq!(err.class(), ErrorClass::Schema);
        let err = session.load_csv("").unwrap_err();
        assert_eq!(err.class(), ErrorClass::Parse);

        let state = session.state().unwrap();
        assert_eq!(state.campaign.campaign_id, "SPRING");
        assert!(!state.context.is_enabled("2"));
    }

    #[test]
    fn test_second_upload_replaces_everything() {
        let mut session = EditorSession::default();
        session.load_json(DOCUMENT).unwrap();
        session.apply(&Intent::EditCampaignId { value: "EDITED".to_string() }).unwrap();

        let skipped = session.load_csv(SHEET).unwrap();
        assert!(skipped.is_empty());

        let state = session.state().unwrap();
        assert_eq!(state.campaign.campaign_id, "PARTNER2024");
        assert_eq!(session.loaded().unwrap().source, LoadSource::Csv);

        session.reset_to_loaded().unwrap();
        assert_eq!(session.state().unwrap().campaign.campaign_id, "PARTNER2024");
    }

    #[test]
    fn test_reset_restores_loaded_snapshot() {
        let mut session = EditorSession::default();
        session.load_json(DOCUMENT).unwrap();
        let loaded = session.state().unwrap().clone();

        session.apply(&Intent::EditCampaignTitle { value: "Lato".to_string() }).unwrap();
        session.apply(&Intent::ReorderOffers { from_index: 0, to_index: Some(1) }).unwrap();
        session.apply(&Intent::ToggleOffer { id: "1".to_string(), enabled: false }).unwrap();
        session.apply(&Intent::AddOffer).unwrap();

        let once = session.reset_to_loaded().unwrap().clone();
        assert_eq!(once, loaded);
        let twice = session.reset_to_loaded().unwrap().clone();
        assert_eq!(twice, once);
    }

    #[test]
    fn test_rejected_intent_keeps_state() {
        let mut session = EditorSession::default();
        session.load_json(DOCUMENT).unwrap();
        let before = session.state().unwrap().clone();

        let err = session
            .apply(&Intent::RenameOffer { old_id: "9".to_string(), new_id: "10".to_string() })
            .unwrap_err();
        assert_eq!(err.class(), ErrorClass::Reference);
        assert_eq!(session.state().unwrap(), &before);
    }

    #[test]
    fn test_export_after_edits() {
        let mut session = EditorSession::default();
        session.load_csv(SHEET).unwrap();
        session.apply(&Intent::ReorderOffers { from_index: 1, to_index: Some(0) }).unwrap();
        session
            .apply(&Intent::RenameOffer { old_id: "1".to_string(), new_id: "5".to_string() })
            .unwrap();

        let text = session.export().unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let offers = value["campaignMetadata"]["offers"].as_object().unwrap();
        let keys: Vec<&str> = offers.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["2", "5"]);
        assert_eq!(
            offers["5"][0]["offerMetadata"]["smallBenefits"]["benefit2"]["text"],
            "50 zł nadpłaty na koncie na start"
        );
    }
}
