pub mod records;
pub mod templates;
pub mod generator;

pub use records::{parse_csv, CsvError, CsvImport, CsvOfferRecord, SkipReason, SkippedRow};
pub use templates::PriceTerm;
pub use generator::{CampaignGenerator, CsvCampaign, GeneratorSettings};
