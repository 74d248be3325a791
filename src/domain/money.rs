use std::fmt;

/// Money is represented as integer cents so sums never drift.
/// $50.00 = 5000 cents.
pub type Cents = i64;

/// Format cents as a plain decimal string.
/// Example: 5000 -> "50.00", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs_cents / 100, abs_cents % 100)
}

/// Format cents as a dollar amount with thousands separators.
/// Example: 123456 -> "$1,234.56", -500 -> "-$5.00"
pub fn format_currency(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    let units = (abs_cents / 100).to_string();

    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (i, digit) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{}${}.{:02}", sign, grouped, abs_cents % 100)
}

/// Parse a user-entered amount into cents.
///
/// Accepts "50", "50.5", "50.00" and an optional leading `$`. More than two
/// decimal places are rejected rather than silently truncated. Negative
/// amounts are rejected; direction is carried by the transaction type.
pub fn parse_amount(input: &str) -> Result<Cents, ParseAmountError> {
    let input = input.trim();
    let input = input.strip_prefix('$').unwrap_or(input).replace(',', "");
    if input.starts_with('-') {
        return Err(ParseAmountError::Negative);
    }

    let (units_str, decimal_str) = match input.split_once('.') {
        Some((units, decimals)) => (units, decimals),
        None => (input.as_str(), ""),
    };

    if units_str.is_empty() && decimal_str.is_empty() {
        return Err(ParseAmountError::InvalidFormat);
    }
    if !units_str.chars().all(|c| c.is_ascii_digit())
        || !decimal_str.chars().all(|c| c.is_ascii_digit())
    {
        return Err(ParseAmountError::InvalidFormat);
    }

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        units_str
            .parse()
            .map_err(|_| ParseAmountError::InvalidFormat)?
    };

    let decimal_cents: i64 = match decimal_str.len() {
        0 => 0,
        1 => decimal_str.parse::<i64>().map_err(|_| ParseAmountError::InvalidFormat)? * 10,
        2 => decimal_str.parse().map_err(|_| ParseAmountError::InvalidFormat)?,
        _ => return Err(ParseAmountError::TooManyDecimals),
    };

    units
        .checked_mul(100)
        .and_then(|c| c.checked_add(decimal_cents))
        .ok_or(ParseAmountError::InvalidFormat)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseAmountError {
    InvalidFormat,
    Negative,
    TooManyDecimals,
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAmountError::InvalidFormat => write!(f, "invalid money format"),
            ParseAmountError::Negative => write!(f, "amount must not be negative"),
            ParseAmountError::TooManyDecimals => write!(f, "at most two decimal places allowed"),
        }
    }
}

impl std::error::Error for ParseAmountError {}
