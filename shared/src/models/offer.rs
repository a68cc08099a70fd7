//! Promotional offers

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The discount an offer grants, as a tagged variant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Discount {
    /// Percentage off the eligible subtotal; `amount` in (0, 100]
    Percentage { amount: Decimal },
    /// Flat amount off the eligible subtotal (not per unit)
    Fixed { amount: Decimal },
}

impl Discount {
    pub fn amount(&self) -> Decimal {
        match self {
            Discount::Percentage { amount } | Discount::Fixed { amount } => *amount,
        }
    }

    pub fn kind_str(&self) -> &'static str {
        match self {
            Discount::Percentage { .. } => "percentage",
            Discount::Fixed { .. } => "fixed",
        }
    }
}

/// Which products an offer covers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ScopeRepr", into = "ScopeRepr")]
pub enum OfferScope {
    /// Every product of the store
    All,
    /// An explicit product-id set
    Products(BTreeSet<Uuid>),
}

impl OfferScope {
    pub fn covers(&self, product_id: Uuid) -> bool {
        match self {
            OfferScope::All => true,
            OfferScope::Products(ids) => ids.contains(&product_id),
        }
    }
}

/// Wire form: the string sentinel "all" or an explicit id list
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ScopeRepr {
    Sentinel(String),
    Products(Vec<Uuid>),
}

impl TryFrom<ScopeRepr> for OfferScope {
    type Error = String;

    fn try_from(repr: ScopeRepr) -> Result<Self, Self::Error> {
        match repr {
            ScopeRepr::Sentinel(s) if s == "all" => Ok(OfferScope::All),
            ScopeRepr::Sentinel(s) => Err(format!("unknown offer scope '{}'", s)),
            ScopeRepr::Products(ids) => Ok(OfferScope::Products(ids.into_iter().collect())),
        }
    }
}

impl From<OfferScope> for ScopeRepr {
    fn from(scope: OfferScope) -> Self {
        match scope {
            OfferScope::All => ScopeRepr::Sentinel("all".to_string()),
            OfferScope::Products(ids) => ScopeRepr::Products(ids.into_iter().collect()),
        }
    }
}

/// A promotional offer published by a store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offer {
    pub id: Uuid,
    pub store_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub discount: Discount,
    /// Minimum eligible-scope subtotal for the offer to attach
    pub min_purchase: Decimal,
    pub scope: OfferScope,
    /// Usage cap; 0 means unlimited
    pub offer_limit: u32,
    /// Number of completed orders that redeemed this offer
    pub usage_count: u32,
    pub starting_date: NaiveDate,
    pub closing_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Offer {
    /// Whether `today` falls inside the offer's validity window
    pub fn in_window(&self, today: NaiveDate) -> bool {
        self.starting_date <= today && today <= self.closing_date
    }

    /// Whether the usage cap has been reached
    pub fn is_exhausted(&self) -> bool {
        self.offer_limit != 0 && self.usage_count >= self.offer_limit
    }

    /// Active offers can still be applied to new orders
    pub fn is_active_on(&self, today: NaiveDate) -> bool {
        self.in_window(today) && !self.is_exhausted()
    }
}

/// A discount actually applied to an order line, recorded on the snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedDiscount {
    pub offer_id: Uuid,
    pub offer_title: String,
    /// Discount carried by this line
    pub amount: Decimal,
    /// Line subtotal after the discount
    pub discounted_subtotal: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn offer(limit: u32, used: u32, from: NaiveDate, to: NaiveDate) -> Offer {
        Offer {
            id: Uuid::nil(),
            store_id: Uuid::nil(),
            title: "Test".to_string(),
            description: None,
            discount: Discount::Percentage { amount: dec("10") },
            min_purchase: Decimal::ZERO,
            scope: OfferScope::All,
            offer_limit: limit,
            usage_count: used,
            starting_date: from,
            closing_date: to,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_offer_window() {
        let from = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        let o = offer(0, 0, from, to);

        assert!(o.in_window(from));
        assert!(o.in_window(to));
        assert!(!o.in_window(from.pred_opt().unwrap()));
        assert!(!o.in_window(to.succ_opt().unwrap()));
    }

    #[test]
    fn test_offer_limit() {
        let from = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();

        // 0 means unlimited
        assert!(!offer(0, 1000, from, to).is_exhausted());
        assert!(!offer(5, 4, from, to).is_exhausted());
        assert!(offer(5, 5, from, to).is_exhausted());
    }

    #[test]
    fn test_scope_serde_sentinel() {
        let all: OfferScope = serde_json::from_str("\"all\"").unwrap();
        assert_eq!(all, OfferScope::All);
        assert_eq!(serde_json::to_string(&all).unwrap(), "\"all\"");

        assert!(serde_json::from_str::<OfferScope>("\"none\"").is_err());
    }

    #[test]
    fn test_scope_serde_products() {
        let id = Uuid::new_v4();
        let json = format!("[\"{}\"]", id);
        let scope: OfferScope = serde_json::from_str(&json).unwrap();
        assert!(scope.covers(id));
        assert!(!scope.covers(Uuid::new_v4()));
    }
}
