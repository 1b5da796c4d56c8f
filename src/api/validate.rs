use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{ApiError, ApiResult};

const EMAIL_MAX_LEN: usize = 254;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex");
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn email(field: &'static str, value: &str) -> ApiResult<()> {
    max_len(field, value, EMAIL_MAX_LEN)?;
    if !is_valid_email(value) {
        return Err(ApiError::InvalidField {
            field,
            reason: "enter a valid email address".into(),
        });
    }
    Ok(())
}

pub(crate) fn max_len(field: &'static str, value: &str, max: usize) -> ApiResult<()> {
    let len = value.chars().count();
    if len > max {
        return Err(ApiError::InvalidField {
            field,
            reason: format!("at most {max} characters (got {len})"),
        });
    }
    Ok(())
}
