// ============================
// crates/backend-lib/src/validation/mod.rs
// ============================
//! Request validation helpers.

use validator::{Validate, ValidationErrors};
use vizboard_common::LoginRequest;

/// First field error of `errors`, taking fields in the order given.
///
/// `validator` keeps field errors in a hash map, so the declaration order of
/// the request type has to be supplied to make "first" deterministic.
pub fn first_error_message(errors: &ValidationErrors, fields: &[&str]) -> Option<String> {
    let field_errors = errors.field_errors();

    fields
        .iter()
        .filter_map(|field| field_errors.get(*field))
        .chain(field_errors.values())
        .flat_map(|errs| errs.iter())
        .next()
        .map(|err| {
            err.message
                .as_ref()
                .map_or_else(|| err.code.to_string(), ToString::to_string)
        })
}

/// Validate a login request, returning the first field error message
pub fn validate_login(request: &LoginRequest) -> Result<(), String> {
    match request.validate() {
        Ok(()) => Ok(()),
        Err(errors) => Err(first_error_message(&errors, &LoginRequest::FIELDS)
            .unwrap_or_else(|| "invalid login request".to_string())),
    }
}
