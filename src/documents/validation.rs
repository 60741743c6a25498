use std::fmt;

use super::schema::LineItem;

/// A single validation failure tied to the offending request field.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)
    }
}

/// Accumulator that checks a request in full instead of stopping at the
/// first broken field.
#[derive(Debug, Default)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let combined = self
            .errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "ошибка валидации: {}", combined)
    }
}

impl std::error::Error for ValidationErrors {}

/// Check the line items shared by every document template. Runs before any
/// totals computation or rendering, so a failed request has no side effects.
pub fn validate_items(items: &[LineItem]) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if items.is_empty() {
        errors.add(ValidationError::new(
            "items",
            "список позиций не может быть пустым",
        ));
    }

    for (index, item) in items.iter().enumerate() {
        let position = index + 1;
        if item.name.trim().is_empty() {
            errors.add(ValidationError::new(
                format!("items[{}].name", position),
                "наименование позиции не заполнено",
            ));
        }
        // Comparisons are inverted so NaN fails them as well.
        if !(item.quantity > 0.0) {
            errors.add(ValidationError::new(
                format!("items[{}].quantity", position),
                "количество должно быть больше нуля",
            ));
        }
        if !(item.price >= 0.0) {
            errors.add(ValidationError::new(
                format!("items[{}].price", position),
                "цена не может быть отрицательной",
            ));
        }
        if let Some(rate) = item.vat_rate {
            if !(0.0..=100.0).contains(&rate) {
                errors.add(ValidationError::new(
                    format!("items[{}].vat_rate", position),
                    "ставка НДС должна быть от 0 до 100",
                ));
            }
        }
    }

    errors.into_result()
}
