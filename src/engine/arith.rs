// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Overflow-checked money arithmetic. Stored and restored records are not
//! range-checked, so a product or quotient that does not fit in a `Decimal`
//! is logged and reported as zero instead of panicking.

use rust_decimal::Decimal;

pub fn mul(a: Decimal, b: Decimal) -> Decimal {
    a.checked_mul(b).unwrap_or_else(|| {
        tracing::warn!(%a, %b, "multiplication overflow, using 0");
        Decimal::ZERO
    })
}

/// Zero divisors also give zero.
pub fn div(a: Decimal, b: Decimal) -> Decimal {
    if b.is_zero() {
        return Decimal::ZERO;
    }
    a.checked_div(b).unwrap_or_else(|| {
        tracing::warn!(%a, %b, "division overflow, using 0");
        Decimal::ZERO
    })
}

/// On overflow the term is dropped and `acc` is kept.
pub fn add(acc: Decimal, term: Decimal) -> Decimal {
    acc.checked_add(term).unwrap_or_else(|| {
        tracing::warn!(%acc, %term, "sum overflow, term dropped");
        acc
    })
}

pub fn sub(a: Decimal, b: Decimal) -> Decimal {
    a.checked_sub(b).unwrap_or_else(|| {
        tracing::warn!(%a, %b, "subtraction overflow, using 0");
        Decimal::ZERO
    })
}

pub fn sum(terms: impl IntoIterator<Item = Decimal>) -> Decimal {
    terms.into_iter().fold(Decimal::ZERO, add)
}
