use validator::Validate;

use crate::errors::AppError;

pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload.validate().map_err(|err| {
        let details = err
            .field_errors()
            .iter()
            .map(|(field, errs)| {
                let errors = errs
                    .iter()
                    .map(|e| e.code.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{}: [{}]", field, errors)
            })
            .collect::<Vec<_>>()
            .join("; ");
        AppError::BadRequest(format!("Validation failed: {}", details))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, Validate)]
    struct Probe {
        #[validate(email)]
        email: String,
    }

    #[test]
    fn invalid_payload_becomes_bad_request() {
        let probe = Probe {
            email: "not-an-email".to_string(),
        };
        let err = validate_payload(&probe).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg.contains("email")));
    }

    #[test]
    fn valid_payload_passes() {
        let probe = Probe {
            email: "hr@teamloom.app".to_string(),
        };
        assert!(validate_payload(&probe).is_ok());
    }
}
