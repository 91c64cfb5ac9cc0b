use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identity of the token a suggestion refers to, captured at generation
/// time so records stay meaningful after the upstream feed moves on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenIdentity {
    pub symbol: String,
    /// On-chain mint address.
    pub address: String,
    pub name: String,
}

/// Market signals copied onto a suggestion for display and audit.
///
/// Every field is optional: feeds routinely omit signals for freshly
/// listed tokens.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenMetrics {
    pub volume: Option<Decimal>,
    pub liquidity: Option<Decimal>,
    pub holders: Option<u64>,
    pub volatility: Option<Decimal>,
}

/// Point-in-time view of a token as received from the market data feed.
///
/// The fields beyond [`TokenMetrics`] exist only to feed the prediction
/// model; they are not persisted on suggestions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenSnapshot {
    pub symbol: String,
    pub address: String,
    pub name: String,
    pub volume: Option<Decimal>,
    pub liquidity: Option<Decimal>,
    pub holders: Option<u64>,
    pub volatility: Option<Decimal>,
    pub tx_count: Option<u64>,
    pub price_change_1m: Option<Decimal>,
    pub price_change_5m: Option<Decimal>,
    pub market_cap: Option<Decimal>,
    pub created_timestamp: Option<i64>,
    pub dev_activity: Option<u64>,
}

impl TokenSnapshot {
    /// Snapshot with identity only; every market signal absent.
    pub fn new(symbol: &str, address: &str, name: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            address: address.to_string(),
            name: name.to_string(),
            volume: None,
            liquidity: None,
            holders: None,
            volatility: None,
            tx_count: None,
            price_change_1m: None,
            price_change_5m: None,
            market_cap: None,
            created_timestamp: None,
            dev_activity: None,
        }
    }

    pub fn identity(&self) -> TokenIdentity {
        TokenIdentity {
            symbol: self.symbol.clone(),
            address: self.address.clone(),
            name: self.name.clone(),
        }
    }

    pub fn metrics(&self) -> TokenMetrics {
        TokenMetrics {
            volume: self.volume,
            liquidity: self.liquidity,
            holders: self.holders,
            volatility: self.volatility,
        }
    }

    /// Feature payload for the prediction model CLI.
    ///
    /// Key names follow the model's training-time feature extraction
    /// (`holders` becomes `holder_count`), and absent signals are sent
    /// as zero rather than omitted.
    pub fn feature_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "volume": feature(self.volume),
            "liquidity": feature(self.liquidity),
            "holder_count": self.holders.unwrap_or(0),
            "tx_count": self.tx_count.unwrap_or(0),
            "price_change_1m": feature(self.price_change_1m),
            "price_change_5m": feature(self.price_change_5m),
            "volatility": feature(self.volatility),
            "market_cap": feature(self.market_cap),
            "created_timestamp": self.created_timestamp.unwrap_or(0),
            "dev_activity": self.dev_activity.unwrap_or(0),
        })
    }
}

/// The model consumes plain floats; absent signals become zero.
fn feature(value: Option<Decimal>) -> f64 {
    value.and_then(|d| d.to_f64()).unwrap_or(0.0)
}
