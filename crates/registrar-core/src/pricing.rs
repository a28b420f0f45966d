//! Registration price tiers and refund quotes

use crate::amount::{Amount, COIN};

/// Share of the paid price returned on unregister
pub const REFUND_PERCENT: u64 = 50;

/// Label length up to which the premium tier applies
const PREMIUM_MAX_LEN: usize = 4;
/// Label length up to which the standard tier applies
const STANDARD_MAX_LEN: usize = 8;

const PREMIUM_PRICE: Amount = Amount::from_base_units(5 * COIN);
const STANDARD_PRICE: Amount = Amount::from_base_units(5 * COIN / 2);
const BASIC_PRICE: Amount = Amount::from_base_units(COIN);

/// Price quoted for registering `name`, tiered by the length of its first
/// label: short names cost more.
pub fn registration_price(name: &str) -> Amount {
    let label = name.trim().split('.').next().unwrap_or_default();
    let len = label.chars().count();
    if len <= PREMIUM_MAX_LEN {
        PREMIUM_PRICE
    } else if len <= STANDARD_MAX_LEN {
        STANDARD_PRICE
    } else {
        BASIC_PRICE
    }
}

/// Amount returned when unregistering a domain bought at `price`
pub fn refund_quote(price: Amount) -> Amount {
    price.percent(REFUND_PERCENT)
}
