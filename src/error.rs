use thiserror::Error;

/// Errors raised while building a closed curve.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveError {
    #[error("closed curve needs at least 3 control points, got {got}")]
    TooFewControlPoints { got: usize },

    #[error("control point {index} is not finite")]
    NonFiniteControlPoint { index: usize },
}

/// Errors raised while validating controller or fleet parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Curve(#[from] CurveError),

    #[error("invalid value {value} for `{name}`")]
    InvalidParameter { name: &'static str, value: f32 },

    #[error("invalid range for `{name}`: [{min}, {max})")]
    InvalidRange {
        name: &'static str,
        min: f32,
        max: f32,
    },
}

/// Rejects non-finite or non-positive values.
pub(crate) fn require_positive(name: &'static str, value: f32) -> Result<f32, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidParameter { name, value })
    }
}

/// Rejects ranges that are not finite, or where `min > max`.
pub(crate) fn require_range(name: &'static str, range: [f32; 2]) -> Result<[f32; 2], ConfigError> {
    let [min, max] = range;
    if min.is_finite() && max.is_finite() && min <= max {
        Ok(range)
    } else {
        Err(ConfigError::InvalidRange { name, min, max })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_rejects_zero_and_nan() {
        assert!(require_positive("x", 1.0).is_ok());
        assert!(require_positive("x", 0.0).is_err());
        assert!(require_positive("x", f32::NAN).is_err());
        assert!(require_positive("x", f32::INFINITY).is_err());
    }

    #[test]
    fn range_rejects_inverted_bounds() {
        assert!(require_range("r", [0.1, 0.2]).is_ok());
        assert!(require_range("r", [0.2, 0.2]).is_ok());
        assert_eq!(
            require_range("r", [0.3, 0.2]),
            Err(ConfigError::InvalidRange {
                name: "r",
                min: 0.3,
                max: 0.2
            })
        );
    }

    #[test]
    fn curve_error_message() {
        let err = CurveError::TooFewControlPoints { got: 2 };
        assert_eq!(
            err.to_string(),
            "closed curve needs at least 3 control points, got 2"
        );
    }
}
