use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use companion_domain::age::{AgeError, MIN_PRODUCT_AGE};

/// Age-gate service error variants.
#[derive(Debug, thiserror::Error)]
pub enum AgeGateError {
    #[error("date_of_birth is required")]
    MissingDateOfBirth,
    #[error("date_of_birth must be a valid YYYY-MM-DD date")]
    InvalidDateOfBirth,
    #[error("date_of_birth cannot be in the future")]
    FutureDateOfBirth,
    #[error("you must be at least {min_age_required} years old to use this service")]
    AgeBlocked { min_age_required: u32 },
    #[error("invalid feature rule: {0}")]
    InvalidFeatureRule(&'static str),
    #[error("invalid override: {0}")]
    InvalidOverride(&'static str),
    #[error("invalid persona behavior: {0}")]
    InvalidPersonaBehavior(&'static str),
    #[error("feature rule not found")]
    FeatureRuleNotFound,
    #[error("override not found")]
    OverrideNotFound,
    #[error("forbidden")]
    Forbidden,
    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

impl AgeGateError {
    pub fn minor() -> Self {
        Self::AgeBlocked {
            min_age_required: MIN_PRODUCT_AGE,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingDateOfBirth => "MISSING_DATE_OF_BIRTH",
            Self::InvalidDateOfBirth => "INVALID_DATE_OF_BIRTH",
            Self::FutureDateOfBirth => "FUTURE_DATE_OF_BIRTH",
            Self::AgeBlocked { .. } => "AGE_BLOCKED",
            Self::InvalidFeatureRule(_) => "INVALID_FEATURE_RULE",
            Self::InvalidOverride(_) => "INVALID_OVERRIDE",
            Self::InvalidPersonaBehavior(_) => "INVALID_PERSONA_BEHAVIOR",
            Self::FeatureRuleNotFound => "FEATURE_RULE_NOT_FOUND",
            Self::OverrideNotFound => "OVERRIDE_NOT_FOUND",
            Self::Forbidden => "FORBIDDEN",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl From<AgeError> for AgeGateError {
    fn from(err: AgeError) -> Self {
        match err {
            AgeError::InvalidInput { .. } => Self::FutureDateOfBirth,
        }
    }
}

impl IntoResponse for AgeGateError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::MissingDateOfBirth
            | Self::InvalidDateOfBirth
            | Self::FutureDateOfBirth
            | Self::InvalidFeatureRule(_)
            | Self::InvalidOverride(_)
            | Self::InvalidPersonaBehavior(_) => StatusCode::BAD_REQUEST,
            Self::AgeBlocked { .. } | Self::Forbidden => StatusCode::FORBIDDEN,
            Self::FeatureRuleNotFound | Self::OverrideNotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let mut body = serde_json::json!({
            "success": false,
            "kind": self.kind(),
            "error": self.to_string(),
        });
        if let Self::AgeBlocked { min_age_required } = &self {
            body["min_age_required"] = (*min_age_required).into();
        }
        (status, axum::Json(body)).into_response()
    }
}
