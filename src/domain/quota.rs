use std::fmt;
use std::ops::Add;

/// Quota units charged by the destination API for a single call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct QuotaCost(u32);

impl QuotaCost {
    pub const NONE: Self = Self(0);
    pub const CREATE_PLAYLIST: Self = Self(50);
    pub const SEARCH: Self = Self(100);
    pub const APPEND_ITEM: Self = Self(50);

    pub const fn units(self) -> u32 {
        self.0
    }
}

impl Add for QuotaCost {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl fmt::Display for QuotaCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} points", self.0)
    }
}

/// Running total of quota spent during one conversion. Only grows.
#[derive(Debug, Default)]
pub struct QuotaLedger {
    total: u64,
}

impl QuotaLedger {
    pub fn charge(&mut self, cost: QuotaCost) {
        self.total += u64::from(cost.units());
    }

    pub fn total(&self) -> u64 {
        self.total
    }
}
