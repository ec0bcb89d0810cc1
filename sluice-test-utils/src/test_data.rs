// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::fmt::{self, Display};

/// A market-data tick, the typical payload of the sequences under test.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PriceTick {
    pub symbol: String,
    pub price: u64,
}

impl PriceTick {
    #[must_use]
    pub fn new(symbol: impl Into<String>, price: u64) -> Self {
        Self {
            symbol: symbol.into(),
            price,
        }
    }
}

impl Display for PriceTick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PriceTick[symbol={}, price={}]", self.symbol, self.price)
    }
}

pub fn tick_btc(price: u64) -> PriceTick {
    PriceTick::new("BTC", price)
}

pub fn tick_eth(price: u64) -> PriceTick {
    PriceTick::new("ETH", price)
}

pub fn tick_sol(price: u64) -> PriceTick {
    PriceTick::new("SOL", price)
}
