use tron_core::{LargeBenefit, SmallBenefit};

use crate::records::CsvOfferRecord;

/// Placeholder the sheet export writes for a missing period
pub const NO_PERIOD_MARKER: &str = "\\N";

/// Pricing term of a sheet row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceTerm<'a> {
    /// Price frozen for the given number of months
    Fixed { months: &'a str },
    /// Price follows the market
    Variable,
}

impl<'a> PriceTerm<'a> {
    pub fn of(record: &'a CsvOfferRecord) -> Self {
        let period = record.period.trim();
        if period.is_empty() || period == NO_PERIOD_MARKER {
            PriceTerm::Variable
        } else {
            PriceTerm::Fixed { months: period }
        }
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, PriceTerm::Fixed { .. })
    }
}

/// Cashback amount; empty or unparseable input counts as zero
pub fn parse_cashback(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed.replace(',', ".").parse::<f64>() {
        Ok(amount) if amount.is_finite() => amount,
        _ => {
            tracing::warn!(cashback = trimmed, "Unparseable cashback, using 0");
            0.0
        }
    }
}

pub fn small_benefits(term: PriceTerm<'_>, cashback: f64, fee: &str) -> Vec<SmallBenefit> {
    let first = match term {
        PriceTerm::Fixed { months } => format!("Zamrożona cena przez {} miesięcy", months),
        PriceTerm::Variable => "Cena monitorowana i dostosowana do rynku".to_string(),
    };

    vec![
        SmallBenefit::new("benefit1", first).with_icon("Shield"),
        SmallBenefit::new("benefit2", format!("{} zł nadpłaty na koncie na start", cashback))
            .with_icon("Wallet"),
        SmallBenefit::new(
            "benefit3",
            format!("od {} zł opłaty handlowej przy e-fakturze i zgodach marketingowych", fee),
        )
        .with_icon("Receipt"),
        SmallBenefit::new("benefit4", "100% zielonej energii").with_icon("Leaf"),
    ]
}

pub fn large_benefits(term: PriceTerm<'_>, cashback: f64) -> Vec<LargeBenefit> {
    let first = match term {
        PriceTerm::Fixed { months } => LargeBenefit::new(
            "benefit1",
            format!("Stała cena za kWh przez {} miesięcy", months),
            "Ochrona przed podwyżkami cen prądu",
        ),
        PriceTerm::Variable => LargeBenefit::new(
            "benefit1",
            "Zawsze najlepsza cena za prąd",
            "Dbamy o najlepszą cenę za Ciebie i automatycznie ją dostosowujemy",
        ),
    };

    vec![
        first.with_icon("Shield"),
        LargeBenefit::new(
            "benefit2",
            "Umowa na czas nieoznaczony",
            "Umowa na czas nieoznaczony z miesięcznym okresem wypowiedzenia",
        )
        .with_icon("FileText"),
        LargeBenefit::new(
            "benefit3",
            format!("{} zł na start", cashback),
            "Oszczędności od pierwszego rachunku",
        )
        .with_icon("Wallet"),
        LargeBenefit::new(
            "benefit4",
            "100% zielonej energii",
            "Energia w całości pochodząca z odnawialnych źródeł",
        )
        .with_icon("Leaf"),
    ]
}

pub fn offer_guarantee(term: PriceTerm<'_>) -> String {
    match term {
        PriceTerm::Fixed { months } => format!("Gwarancja stałej ceny przez {} miesięcy", months),
        PriceTerm::Variable => "Zawsze najlepsza cena na rynku".to_string(),
    }
}
