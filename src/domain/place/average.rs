//! Rolling average of a place's temperatures.

use std::collections::BTreeSet;

/// Average of the known temperatures of a place, rounded half-up to 2 places.
///
/// History and current values are collected into a set, so readings that are
/// exactly equal count once. Missing readings are ignored. Returns `None`
/// when no reading is left.
pub fn average_temperature<I>(history: I, current: Option<f64>) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let distinct: BTreeSet<u64> = history
        .into_iter()
        .chain(std::iter::once(current))
        .flatten()
        .filter(|t| t.is_finite())
        .map(f64::to_bits)
        .collect();

    if distinct.is_empty() {
        return None;
    }

    let sum: f64 = distinct.iter().map(|bits| f64::from_bits(*bits)).sum();
    Some(round_half_up(sum / distinct.len() as f64, 2))
}

/// Rounds to `scale` decimal places, ties away from zero.
///
/// Works on the shortest decimal text of the value, so `12.345` rounds to
/// `12.35` even though its binary form sits just below the tie.
pub fn round_half_up(value: f64, scale: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }

    let text = format!("{}", value.abs());
    let (integer, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));
    if fraction.len() <= scale {
        return value;
    }

    let digits = format!("{}{}", integer, &fraction[..scale]);
    let Ok(mut units) = digits.parse::<u128>() else {
        return value;
    };
    if fraction.as_bytes()[scale] >= b'5' {
        units += 1;
    }

    let rounded = units as f64 / 10f64.powi(scale as i32);
    if value.is_sign_negative() {
        -rounded
    } else {
        rounded
    }
}
