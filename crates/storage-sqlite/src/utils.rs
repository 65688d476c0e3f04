use rust_decimal::Decimal;
use std::str::FromStr;

use crate::errors::StorageError;

/// Parses a TEXT column holding a decimal, accepting scientific notation.
pub fn parse_decimal(value: &str, field: &str) -> Result<Decimal, StorageError> {
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .map_err(|e| StorageError::InvalidData(format!("{} '{}': {}", field, value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("12.3400", "q").unwrap(), dec!(12.34));
        assert_eq!(parse_decimal("1.5e2", "q").unwrap(), dec!(150));
        assert!(parse_decimal("abc", "q").is_err());
    }
}
