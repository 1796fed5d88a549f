use super::{is_missing, messages};
use serde_json::Value;

/// Options for [`validate_number`].
#[derive(Debug, Default, Clone, Copy)]
pub struct NumberOptions {
    pub required: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Maximum number of decimal places.
    pub max_precision: Option<u32>,
}

/// Validates and coerces a numeric value.
///
/// Accepts JSON numbers and numeric strings; anything else fails with a
/// descriptive message and normalizes to `None`.
pub fn validate_number(raw: Option<&Value>, opts: &NumberOptions) -> (Vec<String>, Option<f64>) {
    let mut errors = Vec::new();

    if is_missing(raw) {
        if opts.required {
            errors.push(messages::REQUIRED.to_string());
        }
        return (errors, None);
    }

    let value = match raw {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    let Some(value) = value else {
        errors.push("Value must be a number".to_string());
        return (errors, None);
    };

    if let Some(min) = opts.min
        && value < min
    {
        errors.push(format!("Value must be at least {min}"));
    }
    if let Some(max) = opts.max
        && value > max
    {
        errors.push(format!("Value must be no more than {max}"));
    }

    if let Some(max_precision) = opts.max_precision
        && decimal_places(value) > max_precision
    {
        errors.push(format!(
            "Value must have no more than {max_precision} decimal places"
        ));
    }

    (errors, Some(value))
}

fn decimal_places(value: f64) -> u32 {
    // Format trims trailing zeros, so 1.50 counts as one decimal place.
    let s = format!("{value}");
    match s.split_once('.') {
        Some((_, frac)) => frac.len() as u32,
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::decimal_places;

    #[test]
    fn decimal_places_counts_fraction_digits() {
        assert_eq!(decimal_places(10.0), 0);
        assert_eq!(decimal_places(0.5), 1);
        assert_eq!(decimal_places(3.25), 2);
    }
}
