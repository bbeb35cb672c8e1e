//! Factorial
//!
//! Append-only memo table of factorials used by the gamma kernel.
use crate::rational::Rational;
use num::bigint::BigInt;
use num::traits::One;
use std::cell::RefCell;

/// Cache of `0!, 1!, 2!, ...` grown on demand.
///
/// Lookups take `&self`; the table lives behind a `RefCell`, so the cache is
/// not `Sync` and is meant to be owned by a single kernel. Entries are never
/// evicted.
#[derive(Debug)]
pub struct Factorials {
    table: RefCell<Vec<BigInt>>,
}

impl Default for Factorials {
    fn default() -> Self {
        Self::new()
    }
}

impl Factorials {
    pub fn new() -> Self {
        Factorials {
            table: RefCell::new(vec![BigInt::one()]),
        }
    }

    /// `k!`, with `0! = 1! = 1`.
    pub fn get(&self, k: usize) -> BigInt {
        let mut table = self.table.borrow_mut();
        while table.len() <= k {
            let n = table.len();
            let next = &table[n - 1] * BigInt::from(n);
            table.push(next);
        }
        table[k].clone()
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.table.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.borrow().is_empty()
    }

    /// `(2n)! / (4^n n!)`, so that `Γ(n + 1/2) = double_factorial_ratio(n) · √π`.
    pub fn double_factorial_ratio(&self, n: usize) -> Rational {
        let numer = self.get(2 * n);
        let denom = BigInt::from(4u8).pow(n as u32) * self.get(n);
        Rational::new(numer, denom)
    }
}
