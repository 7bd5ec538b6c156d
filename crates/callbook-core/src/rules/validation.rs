use crate::domain::{has_required_domain, is_valid_phone, CallDraft, CallFields, CallPatch, FieldPatch};
use crate::error::ValidationError;

pub const MIN_DURATION_MINUTES: u8 = 1;
pub const MAX_DURATION_MINUTES: u8 = 60;

/// Checks a draft and returns the values to persist.
///
/// Rules run in a fixed order and the first failure is returned: required
/// fields, customer name, phone, email, duration, agent name. Names, status
/// and optional fields are trimmed; blank optional fields become `None`.
pub fn validate(draft: &CallDraft) -> Result<CallFields, ValidationError> {
    let required = [
        &draft.customer_name,
        &draft.customer_phone,
        &draft.customer_email,
        &draft.call_status,
        &draft.duration_minutes,
        &draft.agent_name,
    ];
    if required.iter().any(|value| value.trim().is_empty()) {
        return Err(ValidationError::MissingFields);
    }

    let customer_name = check_customer_name(&draft.customer_name)?;
    let customer_phone = check_phone(&draft.customer_phone)?;
    let customer_email = check_email(&draft.customer_email)?;
    let duration_minutes = parse_duration(&draft.duration_minutes)?;
    let agent_name = check_agent_name(&draft.agent_name)?;

    Ok(CallFields {
        customer_name,
        customer_phone,
        customer_email,
        call_status: draft.call_status.trim().to_string(),
        comments: normalize_optional(draft.comments.as_deref()),
        duration_minutes,
        agent_name,
        photo_uri: normalize_optional(draft.photo_uri.as_deref()),
    })
}

/// Same rules as [`validate`], applied to the fields a patch carries.
pub fn validate_patch(patch: &CallPatch) -> Result<FieldPatch, ValidationError> {
    let present_required = [
        &patch.customer_name,
        &patch.customer_phone,
        &patch.customer_email,
        &patch.call_status,
        &patch.duration_minutes,
        &patch.agent_name,
    ];
    if present_required
        .iter()
        .any(|value| matches!(value, Some(raw) if raw.trim().is_empty()))
    {
        return Err(ValidationError::MissingFields);
    }

    let customer_name = patch
        .customer_name
        .as_deref()
        .map(check_customer_name)
        .transpose()?;
    let customer_phone = patch.customer_phone.as_deref().map(check_phone).transpose()?;
    let customer_email = patch.customer_email.as_deref().map(check_email).transpose()?;
    let duration_minutes = patch
        .duration_minutes
        .as_deref()
        .map(parse_duration)
        .transpose()?;
    let agent_name = patch
        .agent_name
        .as_deref()
        .map(check_agent_name)
        .transpose()?;

    Ok(FieldPatch {
        customer_name,
        customer_phone,
        customer_email,
        call_status: patch.call_status.as_deref().map(|raw| raw.trim().to_string()),
        comments: patch.comments.as_deref().map(|raw| normalize_optional(Some(raw))),
        duration_minutes,
        agent_name,
        photo_uri: patch.photo_uri.as_deref().map(|raw| normalize_optional(Some(raw))),
    })
}

/// Parses a duration typed by the user into whole minutes within range.
///
/// Reads the leading integer and ignores whatever follows it, so `"30 min"`
/// is 30 and `"4.5"` is 4. Fails when there is no leading digit.
pub fn parse_duration(raw: &str) -> Result<u8, ValidationError> {
    let text = raw.trim_start();
    let (negative, unsigned) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let digits = unsigned
        .bytes()
        .take_while(|byte| byte.is_ascii_digit())
        .count();
    if digits == 0 {
        return Err(ValidationError::InvalidDuration);
    }
    let magnitude = unsigned[..digits]
        .bytes()
        .try_fold(0u64, |acc, byte| {
            acc.checked_mul(10)?.checked_add(u64::from(byte - b'0'))
        })
        .unwrap_or(u64::MAX);
    if negative
        || magnitude < u64::from(MIN_DURATION_MINUTES)
        || magnitude > u64::from(MAX_DURATION_MINUTES)
    {
        return Err(ValidationError::InvalidDuration);
    }
    u8::try_from(magnitude).map_err(|_| ValidationError::InvalidDuration)
}

fn check_customer_name(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if contains_digit(trimmed) {
        return Err(ValidationError::InvalidName);
    }
    Ok(trimmed.to_string())
}

fn check_agent_name(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if contains_digit(trimmed) {
        return Err(ValidationError::InvalidAgentName);
    }
    Ok(trimmed.to_string())
}

// Phone and email are matched as typed; surrounding blanks fail the format.
fn check_phone(raw: &str) -> Result<String, ValidationError> {
    if !is_valid_phone(raw) {
        return Err(ValidationError::InvalidPhone);
    }
    Ok(raw.to_string())
}

fn check_email(raw: &str) -> Result<String, ValidationError> {
    if !has_required_domain(raw) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(raw.trim_start().to_string())
}

fn contains_digit(value: &str) -> bool {
    value.chars().any(|ch| ch.is_ascii_digit())
}

fn normalize_optional(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
