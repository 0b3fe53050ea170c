use crate::domain::error::FieldError;
use crate::domain::rating::{MAX_RATING, MIN_RATING};
use crate::domain::store::CreateStore;
use crate::domain::user::{CreateUser, LoginRequest, Role, UpdatePassword};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$")
        .expect("email pattern is valid")
});

const SPECIAL_CHARS: &str = "!@#$%^&*()_+-=[]{};':\"\\|,.<>/?";

pub const NAME_MIN: usize = 20;
pub const NAME_MAX: usize = 60;
pub const PASSWORD_MIN: usize = 8;
pub const PASSWORD_MAX: usize = 16;
pub const ADDRESS_MAX: usize = 400;
pub const STORE_NAME_MIN: usize = 3;
pub const STORE_NAME_MAX: usize = 100;

/// Trims and lower-cases an email before it is validated or stored.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn check_email(errors: &mut Vec<FieldError>, field: &str, email: &str) {
    if email.is_empty() {
        errors.push(FieldError::new(field, "Email is required"));
    } else if !is_valid_email(email) {
        errors.push(FieldError::new(field, "Please provide a valid email address"));
    }
}

fn check_address(errors: &mut Vec<FieldError>, address: &str) {
    if char_len(address) > ADDRESS_MAX {
        errors.push(FieldError::new("address", "Address cannot exceed 400 characters"));
    }
}

/// Password strength rule shared by registration and password change.
fn check_strong_password(errors: &mut Vec<FieldError>, field: &str, label: &str, password: &str) {
    let len = char_len(password);
    if password.is_empty() {
        errors.push(FieldError::new(field, format!("{label} is required")));
        return;
    }
    if len < PASSWORD_MIN {
        errors.push(FieldError::new(
            field,
            format!("{label} must be at least {PASSWORD_MIN} characters"),
        ));
    }
    if len > PASSWORD_MAX {
        errors.push(FieldError::new(
            field,
            format!("{label} cannot exceed {PASSWORD_MAX} characters"),
        ));
    }
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_special = password.chars().any(|c| SPECIAL_CHARS.contains(c));
    if !has_upper || !has_special {
        errors.push(FieldError::new(
            field,
            format!("{label} must include at least one uppercase letter and one special character"),
        ));
    }
}

/// Validates a registration or admin user creation, returning the parsed role.
pub fn validate_user(req: &CreateUser) -> (Vec<FieldError>, Option<Role>) {
    let mut errors = Vec::new();

    let name = req.name.trim();
    if name.is_empty() {
        errors.push(FieldError::new("name", "Name is required"));
    } else if char_len(name) < NAME_MIN {
        errors.push(FieldError::new("name", "Name must be at least 20 characters"));
    } else if char_len(name) > NAME_MAX {
        errors.push(FieldError::new("name", "Name cannot exceed 60 characters"));
    }

    check_email(&mut errors, "email", &normalize_email(&req.email));
    check_strong_password(&mut errors, "password", "Password", &req.password);

    if let Some(address) = &req.address {
        check_address(&mut errors, address);
    }

    let role = match req.role.as_deref().map(str::trim) {
        None | Some("") => Some(Role::User),
        Some(raw) => match raw.parse::<Role>() {
            Ok(role) => Some(role),
            Err(_) => {
                errors.push(FieldError::new("role", "Role must be one of user, owner, admin"));
                None
            }
        },
    };

    (errors, role)
}

pub fn validate_login(req: &LoginRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();
    check_email(&mut errors, "email", &normalize_email(&req.email));
    if req.password.is_empty() {
        errors.push(FieldError::new("password", "Password is required"));
    }
    errors
}

/// Validates a store creation, returning the owner id once it is known to be positive.
pub fn validate_store(req: &CreateStore) -> (Vec<FieldError>, Option<u32>) {
    let mut errors = Vec::new();

    let name = req.name.trim();
    if name.is_empty() {
        errors.push(FieldError::new("name", "Store name is required"));
    } else if char_len(name) < STORE_NAME_MIN {
        errors.push(FieldError::new("name", "Store name must be at least 3 characters"));
    } else if char_len(name) > STORE_NAME_MAX {
        errors.push(FieldError::new("name", "Store name cannot exceed 100 characters"));
    }

    check_email(&mut errors, "email", &normalize_email(&req.email));

    match req.address.as_deref().map(str::trim) {
        None | Some("") => errors.push(FieldError::new("address", "Address is required")),
        Some(address) => check_address(&mut errors, address),
    }

    let owner_id = positive_id(
        &mut errors,
        "ownerId",
        "Owner ID",
        "Owner ID must be a positive number",
        req.owner_id.as_ref(),
    );

    (errors, owner_id)
}

pub fn validate_password_change(req: &UpdatePassword) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if req.old_password.is_empty() {
        errors.push(FieldError::new("oldPassword", "Old password is required"));
    } else if char_len(&req.old_password) < PASSWORD_MIN {
        errors.push(FieldError::new(
            "oldPassword",
            "Old password must be at least 8 characters",
        ));
    }
    check_strong_password(&mut errors, "newPassword", "New password", &req.new_password);
    errors
}

/// Checks a rating value, returning it narrowed to `u8` when it lies within 1..=5.
pub fn validate_rating_value(errors: &mut Vec<FieldError>, rating: Option<&Value>) -> Option<u8> {
    match number_input(rating) {
        NumberInput::Missing => {
            errors.push(FieldError::new("rating", "Rating is required"));
            None
        }
        NumberInput::NotANumber => {
            errors.push(FieldError::new("rating", "Rating must be a number"));
            None
        }
        NumberInput::Fraction => {
            errors.push(FieldError::new("rating", "Rating must be an integer"));
            None
        }
        NumberInput::Integer(v) if v < MIN_RATING => {
            errors.push(FieldError::new("rating", "Rating must be at least 1"));
            None
        }
        NumberInput::Integer(v) if v > MAX_RATING => {
            errors.push(FieldError::new("rating", "Rating must not exceed 5"));
            None
        }
        NumberInput::Integer(v) => u8::try_from(v).ok(),
    }
}

pub fn validate_store_id(errors: &mut Vec<FieldError>, store_id: Option<&Value>) -> Option<u32> {
    positive_id(errors, "storeId", "Store ID", "Store ID must be positive", store_id)
}

/// A numeric field as clients send it: a JSON number or a numeric string.
#[derive(Debug, Clone, Copy, PartialEq)]
enum NumberInput {
    Missing,
    Integer(i64),
    Fraction,
    NotANumber,
}

fn number_input(value: Option<&Value>) -> NumberInput {
    let parsed = match value {
        None | Some(Value::Null) => return NumberInput::Missing,
        Some(Value::Number(n)) => n.as_i64().map(Ok).or_else(|| n.as_f64().map(Err)),
        Some(Value::String(raw)) => {
            let raw = raw.trim();
            raw.parse::<i64>().ok().map(Ok).or_else(|| {
                raw.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(Err)
            })
        }
        Some(_) => None,
    };

    match parsed {
        None => NumberInput::NotANumber,
        Some(Ok(v)) => NumberInput::Integer(v),
        // saturating cast; out-of-range values fail the bound checks
        Some(Err(f)) if f.fract() == 0.0 => NumberInput::Integer(f as i64),
        Some(Err(_)) => NumberInput::Fraction,
    }
}

fn positive_id(
    errors: &mut Vec<FieldError>,
    field: &str,
    label: &str,
    not_positive: &str,
    value: Option<&Value>,
) -> Option<u32> {
    let message = match number_input(value) {
        NumberInput::Integer(id) => match u32::try_from(id) {
            Ok(id) if id > 0 => return Some(id),
            _ => not_positive.to_string(),
        },
        NumberInput::Missing => format!("{label} is required"),
        NumberInput::NotANumber => format!("{label} must be a number"),
        NumberInput::Fraction => format!("{label} must be an integer"),
    };
    errors.push(FieldError::new(field, message));
    None
}
