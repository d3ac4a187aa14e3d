//! Askama templates for the web frontend.

use askama::Template;

use crate::domain::{Airport, Currency, FareOffer, SortKey};
use crate::pricing::RouteFailure;
use crate::render::{format_price, format_time};

/// Fare table page.
#[derive(Template)]
#[template(path = "prices.html")]
pub struct PricesTemplate {
    pub origin: String,
    pub currency: String,
    pub order: String,
    pub destinations: usize,
    pub offers: Vec<OfferView>,
    pub failures: Vec<FailureView>,
}

impl PricesTemplate {
    pub fn new(
        origin: Airport,
        currency: Currency,
        order: SortKey,
        destinations: usize,
        offers: &[FareOffer],
        failures: &[RouteFailure],
    ) -> Self {
        Self {
            origin: origin.to_string(),
            currency: currency.to_string(),
            order: order.as_str().to_string(),
            destinations,
            offers: offers.iter().map(OfferView::from_offer).collect(),
            failures: failures.iter().map(FailureView::from_failure).collect(),
        }
    }
}

// ============================================================================
// View Models (for templates)
// ============================================================================

/// One row of the fare table.
#[derive(Debug, Clone)]
pub struct OfferView {
    pub flight: String,
    pub origin: String,
    pub destination: String,
    pub departing: String,
    pub arriving: String,
    pub price: String,
}

impl OfferView {
    pub fn from_offer(offer: &FareOffer) -> Self {
        Self {
            flight: offer.flight.clone(),
            origin: offer.origin.to_string(),
            destination: offer.destination.to_string(),
            departing: format_time(offer.departure),
            arriving: format_time(offer.arrival),
            price: format_price(offer.price, offer.currency),
        }
    }
}

/// A destination that could not be priced.
#[derive(Debug, Clone)]
pub struct FailureView {
    pub destination: String,
    pub message: String,
}

impl FailureView {
    pub fn from_failure(failure: &RouteFailure) -> Self {
        Self {
            destination: failure.destination.to_string(),
            message: failure.error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::amadeus::RouteError;
    use crate::domain::Price;

    fn offer(dest: &str, price: &str) -> FareOffer {
        FareOffer {
            flight: format!("SK{dest}"),
            origin: Airport::parse("OSL").unwrap(),
            destination: Airport::parse(dest).unwrap(),
            departure: NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_opt(10, 5, 0),
            arrival: None,
            price: Price::parse(price).unwrap(),
            currency: Currency::parse("NOK").unwrap(),
        }
    }

    fn template(offers: &[FareOffer], failures: &[RouteFailure]) -> PricesTemplate {
        PricesTemplate::new(
            Airport::parse("OSL").unwrap(),
            Currency::parse("NOK").unwrap(),
            SortKey::Price,
            3,
            offers,
            failures,
        )
    }

    #[test]
    fn offer_view_formats_fields() {
        let view = OfferView::from_offer(&offer("BER", "650.50"));

        assert_eq!(view.flight, "SKBER");
        assert_eq!(view.departing, "2024-05-01 10:05");
        assert_eq!(view.arriving, "unknown");
        assert_eq!(view.price, "650 NOK");
    }

    #[test]
    fn renders_offer_rows_in_order() {
        let html = template(&[offer("CPH", "100"), offer("BER", "200")], &[])
            .render()
            .unwrap();

        let cph = html.find("SKCPH").unwrap();
        let ber = html.find("SKBER").unwrap();
        assert!(cph < ber);
        assert!(html.contains("100 NOK"));
        assert!(!html.contains("could not be priced"));
    }

    #[test]
    fn renders_failures() {
        let failures = [RouteFailure {
            destination: Airport::parse("ARN").unwrap(),
            error: RouteError::Timeout,
        }];

        let html = template(&[], &failures).render().unwrap();

        assert!(html.contains("No direct flights found"));
        assert!(html.contains("could not be priced"));
        assert!(html.contains("ARN"));
    }
}
