use cashflow_core::RecurrenceRule;
use cashflow_core::model::{ExceptionKind, parse_exception_key};

use crate::error::{ApiError, ApiResult};
use crate::models::{CreateAccountRequest, CreateEventRequest};

const MAX_NAME_LEN: usize = 200;

/// Bounds for `?horizonYears=` on projection endpoints
pub const MAX_REQUEST_HORIZON_YEARS: i64 = 50;

fn validate_name(field: &str, name: &str) -> ApiResult<()> {
    if name.trim().is_empty() {
        return Err(ApiError::validation(field, "Name cannot be empty"));
    }

    if name.len() > MAX_NAME_LEN {
        return Err(ApiError::validation(
            field,
            format!("Name cannot exceed {MAX_NAME_LEN} characters"),
        ));
    }

    Ok(())
}

/// Validate account creation request
pub fn validate_account(req: &CreateAccountRequest) -> ApiResult<()> {
    validate_name("name", &req.name)
}

/// Validate event creation request
///
/// Rejects everything the projection would otherwise only report as a
/// diagnostic. Whether the account exists is checked by the store, under
/// its write lock.
pub fn validate_event(req: &CreateEventRequest) -> ApiResult<()> {
    validate_name("name", &req.name)?;

    if !req.direction.is_known() {
        return Err(ApiError::validation(
            "type",
            format!(
                "Type must be \"income\" or \"expense\", got {:?}",
                req.direction.as_str()
            ),
        ));
    }

    if let Some(rule) = req.rrule.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
        rule.parse::<RecurrenceRule>()
            .map_err(|err| ApiError::validation("rrule", err.to_string()))?;
    }

    for (key, exception) in req.exceptions.iter().flatten() {
        if parse_exception_key(key).is_none() {
            return Err(ApiError::validation(
                "exceptions",
                format!("Exception key {key:?} is not a YYYY-MM-DD date"),
            ));
        }
        if let ExceptionKind::Unknown(kind) = &exception.kind {
            return Err(ApiError::validation(
                "exceptions",
                format!("Exception on {key} has unknown type {kind:?}"),
            ));
        }
    }

    Ok(())
}

/// Validate the requested projection horizon
pub fn validate_horizon_years(years: i64) -> ApiResult<()> {
    if !(1..=MAX_REQUEST_HORIZON_YEARS).contains(&years) {
        return Err(ApiError::validation(
            "horizonYears",
            format!("Horizon must be between 1 and {MAX_REQUEST_HORIZON_YEARS} years"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cashflow_core::model::{AccountId, Direction, Exception};
    use std::collections::BTreeMap;

    fn event() -> CreateEventRequest {
        CreateEventRequest {
            name: "Rent".into(),
            category: String::new(),
            account: AccountId::new("A1"),
            amount: 100,
            start: "2025-01-01T00:00:00Z".parse().unwrap(),
            rrule: Some("FREQ=MONTHLY".into()),
            direction: Direction::Expense,
            exceptions: None,
        }
    }

    #[test]
    fn test_validate_account_name() {
        let req = |name: &str| CreateAccountRequest {
            name: name.into(),
            color: None,
        };
        assert!(validate_account(&req("Checking")).is_ok());
        assert!(validate_account(&req("")).is_err());
        assert!(validate_account(&req("   ")).is_err());
        assert!(validate_account(&req(&"a".repeat(201))).is_err());
    }

    #[test]
    fn test_validate_event() {
        assert!(validate_event(&event()).is_ok());

        let mut blank_rule = event();
        blank_rule.rrule = Some("  ".into());
        assert!(validate_event(&blank_rule).is_ok());

        let mut bad_rule = event();
        bad_rule.rrule = Some("FREQ=MONTHLY;BYHOUR=9".into());
        assert!(validate_event(&bad_rule).is_err());

        let mut bad_type = event();
        bad_type.direction = Direction::Other("transfer".into());
        assert!(validate_event(&bad_type).is_err());
    }

    #[test]
    fn test_validate_exceptions() {
        let with = |key: &str, exception: Exception| {
            let mut req = event();
            req.exceptions = Some(BTreeMap::from([(key.to_string(), exception)]));
            validate_event(&req)
        };

        assert!(with("2025-03-01", Exception::forever(5)).is_ok());
        assert!(with("03/01/2025", Exception::skip()).is_err());
        assert!(
            with(
                "2025-03-01",
                Exception {
                    kind: ExceptionKind::Unknown("double".into()),
                    amount: 0
                }
            )
            .is_err()
        );
    }

    #[test]
    fn test_validate_horizon_years() {
        assert!(validate_horizon_years(1).is_ok());
        assert!(validate_horizon_years(50).is_ok());
        assert!(validate_horizon_years(0).is_err());
        assert!(validate_horizon_years(51).is_err());
    }
}
