use serde::{Deserialize, Serialize};
use tron_core::{Campaign, Offer, OfferMetadata};

use crate::records::{parse_csv, CsvError, CsvOfferRecord, SkipReason, SkippedRow};
use crate::templates::{self, PriceTerm};

pub const DEFAULT_CAMPAIGN_ID: &str = "PARTNER2024";
pub const DEFAULT_CAMPAIGN_TITLE: &str = "Oferta Partnerska Publicis";

/// Campaign-wide values stamped on every generated offer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneratorSettings {
    pub campaign_id: String,
    pub campaign_title: String,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            campaign_id: DEFAULT_CAMPAIGN_ID.to_string(),
            campaign_title: DEFAULT_CAMPAIGN_TITLE.to_string(),
        }
    }
}

/// A campaign built from a sheet, with the rows that did not make it in
#[derive(Debug, Clone)]
pub struct CsvCampaign {
    pub campaign: Campaign,
    pub skipped: Vec<SkippedRow>,
}

/// Builds campaigns from partner offer sheets
pub struct CampaignGenerator {
    settings: GeneratorSettings,
}

impl CampaignGenerator {
    pub fn new(settings: GeneratorSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Parse sheet text and generate one offer per row
    pub fn from_csv(&self, input: &str) -> Result<CsvCampaign, CsvError> {
        let import = parse_csv(input)?;
        let mut skipped = import.skipped;

        let (campaign, duplicates) = self.generate(&import.records);
        skipped.extend(duplicates);

        tracing::info!(
            campaign_id = %campaign.campaign_id,
            offers = campaign.len(),
            skipped = skipped.len(),
            "Generated campaign from CSV"
        );
        Ok(CsvCampaign { campaign, skipped })
    }

    /// Generate a campaign in row order. The first row wins when ids repeat;
    /// the dropped rows are returned alongside.
    pub fn generate(&self, records: &[CsvOfferRecord]) -> (Campaign, Vec<SkippedRow>) {
        let mut campaign = Campaign::new(self.settings.campaign_id.clone());
        let mut duplicates = Vec::new();

        for record in records {
            if let Err(offer) = campaign.insert_offer(self.generate_offer(record)) {
                tracing::warn!(
                    offer_id = %offer.id,
                    line = record.line,
                    "Duplicate offer id in CSV, keeping first row"
                );
                duplicates.push(SkippedRow {
                    line: record.line,
                    reason: SkipReason::DuplicateId { id: offer.id },
                });
            }
        }

        (campaign, duplicates)
    }

    /// Create a single offer from a sheet row
    pub fn generate_offer(&self, record: &CsvOfferRecord) -> Offer {
        let term = PriceTerm::of(record);
        let cashback = templates::parse_cashback(&record.cashback);
        let fee = record.fee.trim();

        let metadata = OfferMetadata {
            campaign_title: self.settings.campaign_title.clone(),
            small_benefits: templates::small_benefits(term, cashback, fee),
            large_benefits: templates::large_benefits(term, cashback),
            offer_guarantee: templates::offer_guarantee(term),
            ..Default::default()
        };

        Offer::new(record.id.clone(), record.name.clone(), metadata)
    }
}

impl Default for CampaignGenerator {
    fn default() -> Self {
        Self::new(GeneratorSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tron_core::BenefitKind;

    fn record(id: &str, period: &str, cashback: &str, fee: &str) -> CsvOfferRecord {
        CsvOfferRecord {
            id: id.to_string(),
            sfname: format!("SF{}", id),
            name: format!("PROMO{}", id),
            tariff: "G11".to_string(),
            title_pl: "Prąd".to_string(),
            period: period.to_string(),
            cashback: cashback.to_string(),
            fee: fee.to_string(),
            line: 0,
        }
    }

    #[test]
    fn test_variable_rate_offer() {
        let generator = CampaignGenerator::default();
        let offer = generator.generate_offer(&record("1", "\\N", "50", "10"));

        let metadata = &offer.offer_metadata;
        assert_eq!(metadata.offer_guarantee, "Zawsze najlepsza cena na rynku");
        assert_eq!(metadata.small_benefits[1].id, "benefit2");
        assert_eq!(metadata.small_benefits[1].text, "50 zł nadpłaty na koncie na start");
        assert_eq!(
            metadata.small_benefits[2].text,
            "od 10 zł opłaty handlowej przy e-fakturze i zgodach marketingowych"
        );
        assert_eq!(metadata.large_benefits[0].title, "Zawsze najlepsza cena za prąd");
        assert_eq!(metadata.campaign_title, "Oferta Partnerska Publicis");
    }

    #[test]
    fn test_fixed_term_offer() {
        let generator = CampaignGenerator::default();
        let offer = generator.generate_offer(&record("2", "12", "", "7"));

        let metadata = &offer.offer_metadata;
        assert_eq!(metadata.small_benefits[0].text, "Zamrożona cena przez 12 miesięcy");
        assert_eq!(metadata.small_benefits[1].text, "0 zł nadpłaty na koncie na start");
        assert_eq!(metadata.large_benefits[0].description, "Ochrona przed podwyżkami cen prądu");
        assert_eq!(metadata.offer_guarantee, "Gwarancja stałej ceny przez 12 miesięcy");
    }

    #[test]
    fn test_generated_offer_shape() {
        let generator = CampaignGenerator::default();
        let offer = generator.generate_offer(&record("5", "24", "100", "9"));

        assert_eq!(offer.id, "5");
        assert_eq!(offer.name, "5");
        assert_eq!(offer.promotion_id, "PROMO5");
        assert_eq!(offer.offer_metadata.benefit_count(BenefitKind::Small), 4);
        assert_eq!(offer.offer_metadata.benefit_count(BenefitKind::Large), 4);
        assert_eq!(offer.offer_metadata.large_benefits[1].icon.as_deref(), Some("FileText"));
    }

    #[test]
    fn test_generate_keeps_row_order_and_first_duplicate() {
        let generator = CampaignGenerator::default();
        let records = vec![
            record("3", "\\N", "0", "1"),
            record("1", "\\N", "0", "1"),
            record("3", "12", "0", "1"),
        ];
        let (campaign, duplicates) = generator.generate(&records);

        assert_eq!(campaign.campaign_id, "PARTNER2024");
        assert_eq!(campaign.offer_ids(), vec!["3", "1"]);
        assert_eq!(
            duplicates,
            vec![SkippedRow { line: 0, reason: SkipReason::DuplicateId { id: "3".to_string() } }]
        );
        assert_eq!(
            campaign.offer("3").unwrap().offer_metadata.offer_guarantee,
            "Zawsze najlepsza cena na rynku"
        );
    }

    #[test]
    fn test_settings_override_literals() {
        let generator = CampaignGenerator::new(GeneratorSettings {
            campaign_id: "AUTUMN".to_string(),
            campaign_title: "Jesień".to_string(),
        });
        let input = "id;sfname;name;tariff;title_pl;period;cashback;fee\n1;SF;P;G11;T;\\N;0;1\n";
        let generated = generator.from_csv(input).unwrap();

        assert_eq!(generated.campaign.campaign_id, "AUTUMN");
        assert_eq!(generated.campaign.offer("1").unwrap().offer_metadata.campaign_title, "Jesień");
        assert!(generated.skipped.is_empty());
    }

    #[test]
    fn test_duplicate_rows_reported_with_their_line() {
        let generator = CampaignGenerator::default();
        let input = "id;sfname;name;tariff;title_pl;period;cashback;fee\n\
                     7;SF;P1;G11;T;\\N;0;1\n\
                     8;SF;P2;G11;T;12;0;1\n\
                     7;SF;P3;G11;T;24;0;1\n";
        let generated = generator.from_csv(input).unwrap();

        assert_eq!(generated.campaign.offer_ids(), vec!["7", "8"]);
        assert_eq!(generated.campaign.offer("7").unwrap().promotion_id, "P1");
        assert_eq!(
            generated.skipped,
            vec![SkippedRow { line: 4, reason: SkipReason::DuplicateId { id: "7".to_string() } }]
        );
    }
}
