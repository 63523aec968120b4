//! Brazilian CPF (individual taxpayer number) validation.

/// Strips formatting characters (`.` and `-`) and returns the bare digits.
#[must_use]
pub fn normalize_cpf(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

fn check_digit(digits: &[u32]) -> u32 {
    let weight_start = u32::try_from(digits.len()).unwrap_or(0) + 1;
    let sum: u32 = digits
        .iter()
        .zip((2..=weight_start).rev())
        .map(|(d, w)| d * w)
        .sum();
    let rest = (sum * 10) % 11;
    if rest == 10 { 0 } else { rest }
}

/// Returns true for a CPF with 11 digits, not all equal, and valid check digits.
///
/// Accepts both `52998224725` and `529.982.247-25`.
#[must_use]
pub fn is_valid_cpf(value: &str) -> bool {
    if !value.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '-') {
        return false;
    }
    let digits: Vec<u32> = value.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() != 11 || digits.iter().all(|d| *d == digits[0]) {
        return false;
    }
    check_digit(&digits[..9]) == digits[9] && check_digit(&digits[..10]) == digits[10]
}
