//! Plain-text presentation of fare offers.

use std::fmt::Write;

use chrono::NaiveDateTime;

use crate::domain::{Currency, FareOffer, Price};

const RULE: &str = "______________________________________________________________________";

/// Format a price the way travellers expect to read it in that currency.
///
/// Kroner are shown as whole numbers; euros and dollars get a symbol prefix.
pub fn format_price(price: Price, currency: Currency) -> String {
    match currency.as_str() {
        "NOK" => format!("{} NOK", price.whole()),
        "EUR" => format!("€{price}"),
        "USD" => format!("${price}"),
        other => format!("{price} {other}"),
    }
}

/// Date and time to the minute, or `unknown`.
pub fn format_time(t: Option<NaiveDateTime>) -> String {
    t.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Render offers as a tab-separated table, in the order given.
pub fn render_table(offers: &[FareOffer]) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = writeln!(out, "From\tTo\tDeparting\t\tArriving\t\tPrice");
    let _ = writeln!(out, "{RULE}");
    for offer in offers {
        let _ = writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}",
            offer.origin,
            offer.destination,
            format_time(offer.departure),
            format_time(offer.arrival),
            format_price(offer.price, offer.currency)
        );
    }
    let _ = writeln!(out, "{RULE}");
    out
}
