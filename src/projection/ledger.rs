//! Pillar 3a sub-account ledger
//!
//! Accounts are kept in opening order. The active queue is FIFO: liquidation
//! always takes the oldest active account, contributions under a ceiling go to
//! the newest. Closed accounts keep their slot (balance zero) and are never
//! reopened.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::strategy::AccountOpening;

/// One pillar 3a account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Position in opening order (0-based)
    pub id: usize,
    pub balance: f64,
    /// Simulation year the account was opened (0 = before year 1)
    pub opened_year: u32,
    pub closed: bool,
}

/// Balance of an account at the moment it was closed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosedAccount {
    pub id: usize,
    pub balance: f64,
}

#[derive(Debug, Clone)]
pub struct Ledger {
    accounts: Vec<Account>,
    active: VecDeque<usize>,
    /// Set for dynamically opened ledgers
    ceiling: Option<f64>,
}

impl Ledger {
    pub fn new(opening: AccountOpening) -> Self {
        match opening {
            AccountOpening::Fixed { count } => Self::with_accounts(count),
            AccountOpening::Dynamic { ceiling } => Self::dynamic(ceiling),
        }
    }

    /// `count` empty accounts, contributions split evenly
    pub fn with_accounts(count: usize) -> Self {
        let mut ledger = Self {
            accounts: Vec::with_capacity(count),
            active: VecDeque::with_capacity(count),
            ceiling: None,
        };
        for _ in 0..count {
            ledger.open_account(0);
        }
        ledger
    }

    /// One empty account; more are opened as each fills to `ceiling`
    pub fn dynamic(ceiling: f64) -> Self {
        let mut ledger = Self {
            accounts: Vec::new(),
            active: VecDeque::new(),
            ceiling: Some(ceiling),
        };
        ledger.open_account(0);
        ledger
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// Balances of every account ever opened, closed ones at zero
    pub fn balances(&self) -> Vec<f64> {
        self.accounts.iter().map(|a| a.balance).collect()
    }

    pub fn total(&self) -> f64 {
        self.accounts.iter().map(|a| a.balance).sum()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Ids of active accounts, oldest first
    pub fn active_ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.active.iter().copied()
    }

    pub fn ceiling(&self) -> Option<f64> {
        self.ceiling
    }

    /// A fixed ledger takes money while any account is open; a dynamic one always can
    pub fn accepts_contributions(&self) -> bool {
        self.ceiling.is_some() || !self.active.is_empty()
    }

    /// One year on every active account: fee, growth, then the fee-adjusted contribution
    ///
    /// The contribution is added after growth, so it does not earn this year's return.
    pub fn apply_year(&mut self, contribution: f64, growth_rate: f64, fee_rate: f64, year: u32) {
        for &id in &self.active {
            let account = &mut self.accounts[id];
            account.balance *= 1.0 - fee_rate;
            account.balance *= 1.0 + growth_rate;
        }

        let net = contribution * (1.0 - fee_rate);
        if net <= 0.0 || !self.accepts_contributions() {
            return;
        }

        match self.ceiling {
            None => {
                let share = net / self.active.len() as f64;
                for &id in &self.active {
                    self.accounts[id].balance += share;
                }
            }
            Some(ceiling) => self.fill_up_to(net, ceiling, year),
        }
    }

    /// Deposit into the newest account up to `ceiling`, opening new accounts for the overflow
    fn fill_up_to(&mut self, mut amount: f64, ceiling: f64, year: u32) {
        // Room this small counts as full, so float residue cannot stall the loop
        let tolerance = ceiling * 1e-12;

        while amount > 0.0 {
            let newest = self
                .active
                .back()
                .copied()
                .filter(|&id| ceiling - self.accounts[id].balance > tolerance);
            let target = match newest {
                Some(id) => id,
                None => self.open_account(year),
            };

            let room = ceiling - self.accounts[target].balance;
            let deposit = amount.min(room);
            self.accounts[target].balance += deposit;
            amount -= deposit;
        }
    }

    fn open_account(&mut self, year: u32) -> usize {
        let id = self.accounts.len();
        self.accounts.push(Account {
            id,
            balance: 0.0,
            opened_year: year,
            closed: false,
        });
        self.active.push_back(id);
        log::trace!("opened pillar 3a account {} in year {}", id + 1, year);
        id
    }

    fn close(&mut self, id: usize) -> ClosedAccount {
        let account = &mut self.accounts[id];
        let balance = account.balance;
        account.balance = 0.0;
        account.closed = true;
        ClosedAccount { id, balance }
    }

    /// Close the oldest active account
    pub fn liquidate_oldest(&mut self) -> Option<ClosedAccount> {
        let id = self.active.pop_front()?;
        Some(self.close(id))
    }

    /// Close every active account, oldest first
    pub fn liquidate_all(&mut self) -> Vec<ClosedAccount> {
        let ids: Vec<usize> = self.active.drain(..).collect();
        ids.into_iter().map(|id| self.close(id)).collect()
    }
}
