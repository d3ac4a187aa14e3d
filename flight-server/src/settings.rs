//! Process settings read from the environment.

use std::net::SocketAddr;

use tracing::debug;

use crate::domain::{
    Airport, Currency, InvalidAirport, InvalidCurrency, InvalidSortKey, SortKey,
};

pub const ORIGIN_VAR: &str = "FLYNOW_ORIGIN";
pub const CURRENCY_VAR: &str = "FLYNOW_CURRENCY";
pub const ORDER_VAR: &str = "FLYNOW_ORDER";
pub const LISTEN_VAR: &str = "FLYNOW_LISTEN";

const DEFAULT_ORIGIN: &str = "OSL";
const DEFAULT_CURRENCY: &str = "NOK";
const DEFAULT_LISTEN: &str = "127.0.0.1:3000";

/// Errors in the process settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("FLYNOW_ORIGIN: {0}")]
    Origin(#[from] InvalidAirport),

    #[error("FLYNOW_CURRENCY: {0}")]
    Currency(#[from] InvalidCurrency),

    #[error("FLYNOW_ORDER: {0}")]
    Order(#[from] InvalidSortKey),

    #[error("FLYNOW_LISTEN: invalid socket address {value:?}")]
    Listen {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

/// Where to search from, how to present results, and where to serve them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub origin: Airport,
    pub currency: Currency,
    pub order: SortKey,
    pub listen: SocketAddr,
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::resolve(|name| std::env::var(name).ok())
    }

    /// Read settings using `lookup` in place of the environment.
    ///
    /// Unset or blank values take their defaults.
    pub fn resolve(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let origin = Airport::parse_normalized(&get(ORIGIN_VAR).unwrap_or(DEFAULT_ORIGIN.into()))?;
        let currency =
            Currency::parse_normalized(&get(CURRENCY_VAR).unwrap_or(DEFAULT_CURRENCY.into()))?;
        let order = match get(ORDER_VAR) {
            Some(value) => value.parse::<SortKey>()?,
            None => SortKey::default(),
        };

        let listen = get(LISTEN_VAR).unwrap_or(DEFAULT_LISTEN.into());
        let listen = listen
            .trim()
            .parse::<SocketAddr>()
            .map_err(|source| SettingsError::Listen {
                value: listen.clone(),
                source,
            })?;

        let settings = Self {
            origin,
            currency,
            order,
            listen,
        };
        debug!(?settings, "resolved settings");
        Ok(settings)
    }
}
