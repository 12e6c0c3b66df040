//! My Page profile edits: member details and password changes.

use fruit_mall_core::PhoneNumber;
use secrecy::{ExposeSecret, SecretString};

use crate::api::{ChangePasswordRequest, UpdateMemberRequest};
use crate::error::{AppError, Result};

/// Shortest accepted password.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Symbols a password may use, at least one of which is required.
pub const PASSWORD_SYMBOLS: &str = "!@#$%^&*";

/// Check a new password against the backend's password policy.
///
/// At least [`MIN_PASSWORD_LEN`] characters drawn from ASCII letters, digits
/// and [`PASSWORD_SYMBOLS`], with at least one of each kind.
///
/// # Errors
///
/// Returns [`AppError::Validation`] describing the policy.
pub fn validate_password(password: &str) -> Result<()> {
    let allowed = password
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || PASSWORD_SYMBOLS.contains(c));
    let letter = password.chars().any(|c| c.is_ascii_alphabetic());
    let digit = password.chars().any(|c| c.is_ascii_digit());
    let symbol = password.chars().any(|c| PASSWORD_SYMBOLS.contains(c));

    if password.chars().count() >= MIN_PASSWORD_LEN && allowed && letter && digit && symbol {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters and mix letters, digits and one of {PASSWORD_SYMBOLS}"
        )))
    }
}

/// Normalize a profile update: the name is required, a blank phone number
/// or address is sent as absent.
///
/// # Errors
///
/// Returns [`AppError::Validation`] for a blank name or malformed phone number.
pub fn update_request(request: UpdateMemberRequest) -> Result<UpdateMemberRequest> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("name is required".to_string()));
    }

    let phone_number = match blank_to_none(request.phone_number) {
        Some(phone) => {
            let phone =
                PhoneNumber::parse(&phone).map_err(|e| AppError::Validation(e.to_string()))?;
            if !is_hyphenated_phone(phone.as_str()) {
                return Err(AppError::Validation(
                    "phone number must look like 010-1234-5678".to_string(),
                ));
            }
            Some(phone.to_string())
        }
        None => None,
    };

    Ok(UpdateMemberRequest {
        name: name.to_string(),
        phone_number,
        address: blank_to_none(request.address),
    })
}

/// `NNN-NNN-NNNN` or `NNN-NNNN-NNNN`.
fn is_hyphenated_phone(phone: &str) -> bool {
    let parts: Vec<&str> = phone.split('-').collect();
    let digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
    matches!(parts.as_slice(), [area, middle, last]
        if area.len() == 3
            && (3..=4).contains(&middle.len())
            && last.len() == 4
            && parts.iter().all(|&part| digits(part)))
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Build a password change, checking the confirmation and the new
/// password's policy before anything is sent.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if the current password is blank, the
/// confirmation differs, or the new password breaks the policy.
pub fn password_change(
    current: &SecretString,
    new: &SecretString,
    confirm: &SecretString,
) -> Result<ChangePasswordRequest> {
    if current.expose_secret().is_empty() {
        return Err(AppError::Validation(
            "current password is required".to_string(),
        ));
    }
    if new.expose_secret() != confirm.expose_secret() {
        return Err(AppError::Validation("passwords do not match".to_string()));
    }
    validate_password(new.expose_secret())?;

    Ok(ChangePasswordRequest {
        current_password: current.expose_secret().to_string(),
        new_password: new.expose_secret().to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn secret(s: &str) -> SecretString {
        SecretString::from(s)
    }

    #[test]
    fn test_password_policy() {
        assert!(validate_password("fresh!fruit7").is_ok());
        assert!(validate_password("a1!bcdef").is_ok());

        for weak in ["short1!", "nodigits!!", "nosymbol12", "12345678!", "spa ce1!x"] {
            assert!(
                matches!(validate_password(weak), Err(AppError::Validation(_))),
                "{weak} should be rejected"
            );
        }
    }

    #[test]
    fn test_update_request_normalizes_fields() {
        let request = update_request(UpdateMemberRequest {
            name: "  Kim Minji ".to_string(),
            phone_number: Some(" 010-9876-5432 ".to_string()),
            address: Some("   ".to_string()),
        })
        .unwrap();
        assert_eq!(request.name, "Kim Minji");
        assert_eq!(request.phone_number.as_deref(), Some("010-9876-5432"));
        assert_eq!(request.address, None);

        let short_middle = update_request(UpdateMemberRequest {
            name: "Kim".to_string(),
            phone_number: Some("02-123-4567".to_string()),
            address: None,
        });
        assert!(short_middle.is_err());
        let three_digit_middle = update_request(UpdateMemberRequest {
            name: "Kim".to_string(),
            phone_number: Some("031-123-4567".to_string()),
            address: Some(" Suwon ".to_string()),
        })
        .unwrap();
        assert_eq!(three_digit_middle.address.as_deref(), Some("Suwon"));
    }

    #[test]
    fn test_update_request_rejects_bad_input() {
        let blank_name = UpdateMemberRequest {
            name: " ".to_string(),
            ..UpdateMemberRequest::default()
        };
        assert!(matches!(
            update_request(blank_name),
            Err(AppError::Validation(msg)) if msg == "name is required"
        ));

        for phone in ["01012345678", "010 1234 5678", "010-12-5678", "phone"] {
            let bad_phone = UpdateMemberRequest {
                name: "Kim".to_string(),
                phone_number: Some(phone.to_string()),
                address: None,
            };
            assert!(
                matches!(update_request(bad_phone), Err(AppError::Validation(_))),
                "{phone} should be rejected"
            );
        }
    }

    #[test]
    fn test_password_change() {
        let request =
            password_change(&secret("old"), &secret("fresh!fruit7"), &secret("fresh!fruit7"))
                .unwrap();
        assert_eq!(request.current_password, "old");
        assert_eq!(request.new_password, "fresh!fruit7");

        let err = password_change(&secret("old"), &secret("fresh!fruit7"), &secret("fresh!fruit8"))
            .unwrap_err();
        assert_eq!(err.user_message(), "passwords do not match");

        let err = password_change(&secret(""), &secret("fresh!fruit7"), &secret("fresh!fruit7"))
            .unwrap_err();
        assert_eq!(err.user_message(), "current password is required");
    }
}
