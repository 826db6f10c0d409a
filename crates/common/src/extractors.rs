//! Request body extractor shared by the domain crates

use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::Error;

/// JSON body that has passed its `validator` rules.
///
/// Malformed JSON and failed validation both reject with
/// [`Error::Validation`], so clients get a 400 in the common envelope.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                tracing::debug!(error = %rejection.body_text(), "Rejected request body");
                Error::Validation(rejection.body_text())
            })?;

        value
            .validate()
            .map_err(|errors| Error::Validation(describe(&errors)))?;

        Ok(ValidatedJson(value))
    }
}

/// One `field: code` pair per failing field, sorted by field name.
fn describe(errors: &ValidationErrors) -> String {
    let mut fields: Vec<String> = errors
        .field_errors()
        .iter()
        .map(|(field, field_errors)| {
            let codes: Vec<&str> = field_errors.iter().map(|e| &*e.code).collect();
            format!("{}: {}", field, codes.join(", "))
        })
        .collect();
    fields.sort();
    format!("invalid request body ({})", fields.join("; "))
}
