use bigdecimal::BigDecimal;
use std::fmt;

pub const FULL_NAME_MAX_LEN: usize = 100;
pub const CPF_LEN: usize = 11;
pub const EMAIL_MAX_LEN: usize = 150;
pub const PHONE_MAX_LEN: usize = 15;
pub const DESCRIPTION_MAX_LEN: usize = 250;
pub const MONEY_SCALE: i64 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult = Result<(), ValidationError>;

pub fn sanitize_string(value: &str) -> String {
    value
        .chars()
        .filter(|ch| !ch.is_control())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn validate_required(field: &'static str, value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }

    Ok(())
}

pub fn validate_max_len(field: &'static str, value: &str, max_len: usize) -> ValidationResult {
    if value.len() > max_len {
        return Err(ValidationError::new(
            field,
            format!("must be at most {} characters", max_len),
        ));
    }

    Ok(())
}

/// Amount must be strictly positive with at most two fractional digits.
pub fn validate_amount(amount: &BigDecimal) -> ValidationResult {
    if amount <= &BigDecimal::from(0) {
        return Err(ValidationError::new("amount", "must be greater than zero"));
    }

    validate_money_scale("amount", amount)
}

/// Initial deposits may be zero but never negative.
pub fn validate_initial_deposit(amount: &BigDecimal) -> ValidationResult {
    if amount < &BigDecimal::from(0) {
        return Err(ValidationError::new(
            "initial_deposit",
            "must not be negative",
        ));
    }

    validate_money_scale("initial_deposit", amount)
}

pub fn validate_money_scale(field: &'static str, amount: &BigDecimal) -> ValidationResult {
    let (_, scale) = amount.normalized().as_bigint_and_exponent();
    if scale > MONEY_SCALE {
        return Err(ValidationError::new(
            field,
            format!("must have at most {} fractional digits", MONEY_SCALE),
        ));
    }

    Ok(())
}

/// Strips formatting punctuation and checks for exactly eleven digits.
pub fn normalize_cpf(cpf: &str) -> Result<String, ValidationError> {
    let normalized: String = cpf
        .chars()
        .filter(|ch| *ch != '.' && *ch != '-')
        .collect::<String>()
        .trim()
        .to_string();

    if normalized.len() != CPF_LEN || !normalized.chars().all(|ch| ch.is_ascii_digit()) {
        return Err(ValidationError::new(
            "cpf",
            format!("must be exactly {} digits", CPF_LEN),
        ));
    }

    Ok(normalized)
}

/// Lower-cases the address after a minimal shape check.
pub fn normalize_email(email: &str) -> Result<String, ValidationError> {
    let email = email.trim();
    validate_required("email", email)?;
    validate_max_len("email", email, EMAIL_MAX_LEN)?;

    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(ValidationError::new("email", "is not a valid address"));
    }

    Ok(email.to_lowercase())
}

pub fn validate_description(description: &Option<String>) -> ValidationResult {
    if let Some(description) = description {
        validate_max_len("description", description, DESCRIPTION_MAX_LEN)?;
    }

    Ok(())
}
