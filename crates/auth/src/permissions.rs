//! Permission checks against validated claims

use crate::claims::ValidatedClaims;
use crate::error::AuthError;

/// Require `required` to appear verbatim in the token's `permissions`.
pub fn check_permission(claims: &ValidatedClaims, required: &str) -> Result<(), AuthError> {
    let Some(granted) = claims.permissions.as_ref() else {
        tracing::debug!(sub = %claims.sub, "Token carries no permissions claim");
        return Err(AuthError::PermissionsMissing);
    };

    if granted.iter().any(|permission| permission == required) {
        Ok(())
    } else {
        tracing::debug!(sub = %claims.sub, permission = %required, "Permission not granted");
        Err(AuthError::Unauthorized {
            required: required.to_string(),
        })
    }
}
