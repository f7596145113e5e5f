#[macro_use]
mod macros;

pub mod price;

/// Round the exact binary value to `n_decimals` decimal places, ties to even.
///
/// `2.675` is stored slightly below the tie and goes down to `2.67`,
/// while the exact tie `412.125` goes to the even `412.12`.
#[must_use]
pub fn round(value: f64, n_decimals: usize) -> f64 {
    format!("{value:.n_decimals$}").parse().unwrap_or(value)
}
