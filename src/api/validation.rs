use crate::core::AxisValue;
use crate::error::{ChartError, ChartResult};

use super::ChartInput;

/// Checks raw chart input before normalization.
///
/// The checks run in a fixed order and the first failure wins:
/// data present, bind target, axis info, axis limits, limit types.
/// Input is never modified.
pub fn validate(input: Option<&ChartInput>) -> ChartResult<&ChartInput> {
    let input = match input {
        Some(input) if !input.is_empty() => input,
        _ => return Err(ChartError::NoData),
    };

    if input
        .bind_to
        .as_deref()
        .is_none_or(|bind_to| bind_to.trim().is_empty())
    {
        return Err(ChartError::NoBindTarget);
    }

    let Some(x_axis) = input.axis.as_ref().and_then(|axis| axis.x.as_ref()) else {
        return Err(ChartError::NoAxisInfo);
    };

    let (Some(lower), Some(upper)) = (
        present(x_axis.lower_limit.as_ref()),
        present(x_axis.upper_limit.as_ref()),
    ) else {
        return Err(ChartError::NoAxisLimitInfo);
    };

    if !lower.is_date() || !upper.is_date() {
        return Err(ChartError::InvalidAxisTypeValues);
    }

    Ok(input)
}

fn present(value: Option<&AxisValue>) -> Option<&AxisValue> {
    value.filter(|value| !value.is_empty())
}
