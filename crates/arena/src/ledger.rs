//! Money and score bookkeeping.

use engine_core::Vitals;
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LedgerError {
    #[error("insufficient funds: price ${price}, available ${available}")]
    InsufficientFunds { price: u32, available: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    pub health: u32,
    pub armor: u32,
    money: u32,
    pub kills: u32,
    pub deaths: u32,
}

impl Ledger {
    pub fn new(money: u32) -> Self {
        Self {
            health: 100,
            armor: 100,
            money,
            kills: 0,
            deaths: 0,
        }
    }

    pub fn money(&self) -> u32 {
        self.money
    }

    /// Take `amount` from the balance, or leave it untouched if short.
    pub fn debit(&mut self, amount: u32) -> Result<u32, LedgerError> {
        let remaining = self
            .money
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientFunds {
                price: amount,
                available: self.money,
            })?;
        self.money = remaining;
        Ok(remaining)
    }

    pub fn vitals(&self) -> Vitals {
        Vitals {
            health: self.health,
            armor: self.armor,
            money: self.money,
            kills: self.kills,
            deaths: self.deaths,
        }
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(16_000)
    }
}
