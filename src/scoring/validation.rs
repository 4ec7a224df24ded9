use super::config::ScoringOptions;

/// Validate scoring options at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_options(options: &ScoringOptions) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(floor) = options.contribution_floor {
        if !floor.is_finite() {
            errors.push("scoring.contribution_floor: must be a finite number".to_string());
        } else if floor > 1.0 {
            errors.push(format!(
                "scoring.contribution_floor: {} exceeds the maximum contribution of 1",
                floor
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
