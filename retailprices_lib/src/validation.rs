use retailprices_api::Constraint;

use crate::error::PricesError;
use crate::projection::ColumnSpec;

pub const MAX_FIELD_LENGTH: usize = 64;

/// Currencies the retail prices API can quote in.
pub const SUPPORTED_CURRENCIES: &[&str] = &[
    "USD", "AUD", "BRL", "CAD", "CHF", "CNY", "DKK", "EUR", "GBP", "INR", "JPY", "KRW", "NOK",
    "NZD", "RUB", "SEK", "TWD",
];

/// Strip ASCII control characters (0x00-0x1F except space 0x20), trim whitespace,
/// and enforce a byte-length limit.
pub fn sanitize_text(input: &str, max_len: usize) -> Result<String, PricesError> {
    if input.len() > max_len {
        return Err(PricesError::InvalidInput(format!(
            "input exceeds maximum length of {} bytes",
            max_len
        )));
    }
    let sanitized: String = input
        .chars()
        .filter(|c| !c.is_ascii_control() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string();
    if sanitized.is_empty() {
        return Err(PricesError::InvalidInput(
            "input is empty after sanitization".to_string(),
        ));
    }
    Ok(sanitized)
}

/// Validate a record field name: a letter or underscore followed by letters,
/// digits or underscores. Whether the field exists is up to the API.
pub fn validate_field_name(input: &str) -> Result<String, PricesError> {
    let name = sanitize_text(input, MAX_FIELD_LENGTH)?;
    let mut chars = name.chars();
    let first_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if !first_ok || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(PricesError::InvalidInput(format!(
            "invalid field name '{}'. Field names look like armRegionName or skuId",
            input
        )));
    }
    Ok(name)
}

/// Validate a constraint value. Values are sent exactly as given, so a value
/// with control characters is rejected rather than cleaned up.
pub fn validate_value(input: &str) -> Result<String, PricesError> {
    if let Some(c) = input.chars().find(|c| c.is_control()) {
        return Err(PricesError::InvalidInput(format!(
            "value {:?} contains control character {:?}",
            input, c
        )));
    }
    Ok(input.to_string())
}

/// Validate one `--limit FIELD VALUE` pair.
pub fn validate_constraint(field: &str, value: &str) -> Result<Constraint, PricesError> {
    Ok(Constraint::new(
        validate_field_name(field)?,
        validate_value(value)?,
    ))
}

/// Validate `--select` fields. An empty list yields the default columns.
pub fn validate_columns(fields: &[String]) -> Result<ColumnSpec, PricesError> {
    let names = fields
        .iter()
        .map(|f| validate_field_name(f))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ColumnSpec::new(names))
}

/// Validate a currency code: uppercase, check against the supported list.
pub fn validate_currency(input: &str) -> Result<String, PricesError> {
    let upper = input.trim().to_uppercase();
    if SUPPORTED_CURRENCIES.contains(&upper.as_str()) {
        Ok(upper)
    } else {
        Err(PricesError::InvalidInput(format!(
            "unsupported currency '{}'. Valid codes: {}",
            input,
            SUPPORTED_CURRENCIES.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::DEFAULT_COLUMNS;

    // -- Field names --

    #[test]
    fn field_name_valid() {
        assert_eq!(validate_field_name("armRegionName").unwrap(), "armRegionName");
        assert_eq!(validate_field_name("_private2").unwrap(), "_private2");
    }

    #[test]
    fn field_name_trimmed() {
        assert_eq!(validate_field_name("  skuId ").unwrap(), "skuId");
    }

    #[test]
    fn field_name_rejects_operators() {
        assert!(validate_field_name("skuId eq 'x'").is_err());
        assert!(validate_field_name("a-b").is_err());
        assert!(validate_field_name("1field").is_err());
    }

    #[test]
    fn field_name_empty() {
        assert!(validate_field_name("").is_err());
        assert!(validate_field_name("   ").is_err());
    }

    #[test]
    fn field_name_too_long() {
        assert!(validate_field_name(&"a".repeat(MAX_FIELD_LENGTH + 1)).is_err());
    }

    // -- Values --

    #[test]
    fn value_keeps_inner_spaces_and_quotes() {
        assert_eq!(validate_value("Virtual Machines").unwrap(), "Virtual Machines");
        assert_eq!(validate_value("O'Brien").unwrap(), "O'Brien");
    }

    #[test]
    fn value_is_not_trimmed() {
        assert_eq!(validate_value(" D2 v3 ").unwrap(), " D2 v3 ");
        assert_eq!(validate_value("").unwrap(), "");
    }

    #[test]
    fn value_rejects_control_chars() {
        assert!(validate_value("D2\tv3").is_err());
        assert!(validate_value("west\u{0}europe").is_err());
        assert!(validate_value("westeurope\n").is_err());
    }

    #[test]
    fn value_length_is_not_limited() {
        let long = "x".repeat(300);
        assert_eq!(validate_value(&long).unwrap(), long);
    }

    #[test]
    fn constraint_keeps_value_verbatim() {
        let c = validate_constraint(" meterName ", " D2 v3 ").unwrap();
        assert_eq!(c, Constraint::new("meterName", " D2 v3 "));
    }

    #[test]
    fn constraint_rejects_tab_in_value() {
        let err = validate_constraint("meterName", "D2\tv3").unwrap_err();
        assert!(matches!(err, PricesError::InvalidInput(_)));
    }

    // -- Columns --

    #[test]
    fn columns_in_given_order() {
        let spec = validate_columns(&["retailPrice".to_string(), "skuId".to_string()]).unwrap();
        assert_eq!(spec.names(), ["retailPrice", "skuId"]);
    }

    #[test]
    fn columns_empty_gives_defaults() {
        let spec = validate_columns(&[]).unwrap();
        assert_eq!(spec.len(), DEFAULT_COLUMNS.len());
    }

    #[test]
    fn columns_reject_bad_name() {
        assert!(validate_columns(&["sku Id".to_string()]).is_err());
    }

    // -- Currency --

    #[test]
    fn currency_uppercased() {
        assert_eq!(validate_currency("gbp").unwrap(), "GBP");
        assert_eq!(validate_currency(" EUR ").unwrap(), "EUR");
    }

    #[test]
    fn currency_unknown() {
        let err = validate_currency("XYZ").unwrap_err();
        assert!(err.to_string().contains("unsupported currency 'XYZ'"));
    }
}
