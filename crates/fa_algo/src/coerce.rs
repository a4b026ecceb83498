//! Lenient numeric coercion for ad-hoc extra amounts.
//!
//! Entries may arrive as numbers, numeric strings, null, or junk. Anything
//! that does not yield a finite non-negative number coerces to zero; a
//! string contributes its leading numeric prefix (`"250 TL"` → 250,
//! `"1.5e3"` → 1500).

use rust_decimal::Decimal;
use tracing::warn;

use fa_core::entities::{ExtraExpense, RawAmount};

/// Coerce one raw amount. Never fails.
pub fn coerce_amount(raw: &RawAmount) -> Decimal {
    let v = match raw {
        RawAmount::Missing => None,
        RawAmount::Number(d) => Some(*d),
        RawAmount::Text(s) => parse_leading_decimal(s),
        RawAmount::Other(v) => v.as_f64().and_then(|f| Decimal::try_from(f).ok()),
    };
    match v {
        Some(d) if d >= Decimal::ZERO => d,
        _ => Decimal::ZERO,
    }
}

/// Σ coerced amounts of all extras; unusable entries are logged and count as 0.
/// An entry that would overflow the running sum is unusable too.
pub fn extras_total(extras: &[ExtraExpense]) -> Decimal {
    extras.iter().fold(Decimal::ZERO, |acc, e| {
        let v = coerce_amount(&e.amount);
        if v.is_zero() && !matches!(e.amount, RawAmount::Number(_)) {
            warn!(extra = %e.name, amount = ?e.amount, "extra expense amount unusable; counted as 0");
        }
        match acc.checked_add(v) {
            Some(sum) => sum,
            None => {
                warn!(extra = %e.name, amount = %v, "extra expense amount overflows the total; counted as 0");
                acc
            }
        }
    })
}

/// Largest power of ten `Decimal` can carry.
const MAX_EXPONENT: i32 = 28;

/// `[+-]?digits[.digits][(e|E)[+-]?digits]` prefix after leading whitespace.
fn parse_leading_decimal(s: &str) -> Option<Decimal> {
    let (mantissa, rest) = leading_mantissa(s)?;
    match leading_exponent(rest) {
        Some(exp) => scale_by_power_of_ten(mantissa, exp),
        None => Some(mantissa),
    }
}

fn leading_mantissa(s: &str) -> Option<(Decimal, &str)> {
    let t = s.trim_start();
    let bytes = t.as_bytes();
    let mut end = 0usize;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let mut digits = 0usize;
    let mut seen_dot = false;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => digits += 1,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }
    if digits == 0 {
        return None;
    }
    let prefix = t[..end].trim_end_matches('.');
    prefix.parse::<Decimal>().ok().map(|d| (d, &t[end..]))
}

/// Exponent directly after the mantissa; a bare `e` is not one.
fn leading_exponent(rest: &str) -> Option<i32> {
    let tail = rest.strip_prefix('e').or_else(|| rest.strip_prefix('E'))?;
    let (negative, digits) = match tail.as_bytes().first() {
        Some(b'-') => (true, &tail[1..]),
        Some(b'+') => (false, &tail[1..]),
        _ => (false, tail),
    };
    let len = digits.bytes().take_while(u8::is_ascii_digit).count();
    if len == 0 {
        return None;
    }
    // Saturate absurd exponents; they fall outside `MAX_EXPONENT` either way.
    let exp = digits[..len].parse::<i32>().unwrap_or(i32::MAX);
    Some(if negative { -exp } else { exp })
}

/// `mantissa × 10^exp`; `None` when the result does not fit.
fn scale_by_power_of_ten(mantissa: Decimal, exp: i32) -> Option<Decimal> {
    if exp > MAX_EXPONENT {
        return if mantissa.is_zero() { Some(Decimal::ZERO) } else { None };
    }
    if exp < -MAX_EXPONENT {
        return Some(Decimal::ZERO);
    }
    let ten = Decimal::TEN;
    (0..exp.unsigned_abs()).try_fold(mantissa, |acc, _| {
        if exp >= 0 { acc.checked_mul(ten) } else { acc.checked_div(ten) }
    })
}
