//! Custom field validators for request DTOs.

use rust_decimal::Decimal;
use validator::ValidationError;

use lyvinx_core::category::is_hex_color;

fn failure(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

/// Amount strictly greater than zero.
pub fn positive(value: &Decimal) -> Result<(), ValidationError> {
    if *value > Decimal::ZERO {
        Ok(())
    } else {
        Err(failure("positive", "must be greater than zero"))
    }
}

/// Amount zero or above.
pub fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if *value >= Decimal::ZERO {
        Ok(())
    } else {
        Err(failure("non_negative", "must not be negative"))
    }
}

/// `#RRGGBB` color.
pub fn hex_color(value: &str) -> Result<(), ValidationError> {
    if is_hex_color(value) {
        Ok(())
    } else {
        Err(failure("hex_color", "must be a #RRGGBB color"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_validators() {
        assert!(positive(&dec!(0.01)).is_ok());
        assert!(positive(&Decimal::ZERO).is_err());
        assert!(non_negative(&Decimal::ZERO).is_ok());
        assert!(non_negative(&dec!(-1)).is_err());
    }

    #[test]
    fn test_hex_color() {
        assert!(hex_color("#10B981").is_ok());
        assert!(hex_color("10B981").is_err());
    }
}
