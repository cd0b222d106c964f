use travelmate_core::{CoreError, CoreResult};

pub fn required(field: &str, value: &str) -> CoreResult<()> {
    if value.trim().is_empty() {
        return Err(CoreError::ValidationError(format!("{} is required.", field)));
    }
    Ok(())
}

pub fn min_len(field: &str, value: &str, min: usize) -> CoreResult<()> {
    required(field, value)?;
    if value.trim().len() < min {
        return Err(CoreError::ValidationError(format!(
            "{} must be at least {} characters.",
            field, min
        )));
    }
    Ok(())
}

pub fn cost(value: f64) -> CoreResult<()> {
    if !value.is_finite() {
        return Err(CoreError::ValidationError(
            "Cost must be a valid number.".to_string(),
        ));
    }
    if value < 0.0 {
        return Err(CoreError::ValidationError(
            "Cost cannot be negative.".to_string(),
        ));
    }
    Ok(())
}

pub fn positive(field: &str, value: u32) -> CoreResult<()> {
    if value == 0 {
        return Err(CoreError::ValidationError(format!(
            "{} must be a positive number.",
            field
        )));
    }
    Ok(())
}
