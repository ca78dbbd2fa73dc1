//! Input checks for readings and the other user-editable entities.
//!
//! Every rule is evaluated, so a report lists all offending fields at once.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

/// Field an error is attached to. `General` covers rules spanning several fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationField {
    Systolic,
    Diastolic,
    Pulse,
    General,
    Label,
    Dosage,
    Time,
    DaysOfWeek,
    BpThreshold,
    PressureUnit,
    Name,
    Age,
    MedicalConditions,
}

impl ValidationField {
    fn from_name(name: &str) -> Self {
        match name {
            "systolic" => ValidationField::Systolic,
            "diastolic" => ValidationField::Diastolic,
            "pulse" => ValidationField::Pulse,
            "label" => ValidationField::Label,
            "dosage" => ValidationField::Dosage,
            "time" => ValidationField::Time,
            "days_of_week" => ValidationField::DaysOfWeek,
            "bp_threshold" => ValidationField::BpThreshold,
            "pressure_unit" => ValidationField::PressureUnit,
            "name" => ValidationField::Name,
            "age" => ValidationField::Age,
            "medical_conditions" => ValidationField::MedicalConditions,
            _ => ValidationField::General,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ValidationField::Systolic => "systolic",
            ValidationField::Diastolic => "diastolic",
            ValidationField::Pulse => "pulse",
            ValidationField::General => "general",
            ValidationField::Label => "label",
            ValidationField::Dosage => "dosage",
            ValidationField::Time => "time",
            ValidationField::DaysOfWeek => "days_of_week",
            ValidationField::BpThreshold => "bp_threshold",
            ValidationField::PressureUnit => "pressure_unit",
            ValidationField::Name => "name",
            ValidationField::Age => "age",
            ValidationField::MedicalConditions => "medical_conditions",
        }
    }
}

/// Outcome of a validation: one message per offending field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub errors: BTreeMap<ValidationField, String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn single(field: ValidationField, message: impl Into<String>) -> Self {
        let mut report = Self::default();
        report.errors.insert(field, message.into());
        report
    }

    pub fn message(&self, field: ValidationField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// `Ok(())` when valid, the report itself otherwise
    pub fn into_result(self) -> Result<(), ValidationReport> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|(field, message)| format!("{}: {}", field.as_str(), message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

impl From<ValidationErrors> for ValidationReport {
    fn from(errors: ValidationErrors) -> Self {
        let mut report = ValidationReport::default();
        collect_errors(&errors, None, &mut report);
        report
    }
}

/// Flatten validator output. Errors of nested structs are reported on the parent field.
fn collect_errors(errors: &ValidationErrors, parent: Option<ValidationField>, report: &mut ValidationReport) {
    for (name, kind) in errors.errors() {
        let field = parent.unwrap_or_else(|| ValidationField::from_name(name));
        match kind {
            ValidationErrorsKind::Field(list) => {
                if let Some(first) = list.first() {
                    let message = first
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid {}", name));
                    report.errors.entry(field).or_insert(message);
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_errors(nested, Some(field), report),
            ValidationErrorsKind::List(items) => {
                for nested in items.values() {
                    collect_errors(nested, Some(field), report);
                }
            }
        }
    }
}

/// Run the validator derive of any entity and turn the outcome into a report
pub fn check<T: Validate>(value: &T) -> Result<(), ValidationReport> {
    value.validate().map_err(ValidationReport::from)
}

/// The three values of a reading, `None` when missing or not an integer
#[derive(Debug, Validate)]
#[validate(schema(function = "validate_ordering", skip_on_field_errors = false))]
struct ReadingValues {
    #[validate(
        required(message = "Please enter systolic pressure"),
        range(min = 60, max = 250, message = "Systolic pressure should be between 60-250")
    )]
    systolic: Option<i32>,

    #[validate(
        required(message = "Please enter diastolic pressure"),
        range(min = 40, max = 150, message = "Diastolic pressure should be between 40-150")
    )]
    diastolic: Option<i32>,

    #[validate(
        required(message = "Please enter pulse"),
        range(min = 30, max = 220, message = "Pulse should be between 30-220")
    )]
    pulse: Option<i32>,
}

// Applies whenever both values are present, even when either is out of range
fn validate_ordering(values: &ReadingValues) -> Result<(), ValidationError> {
    if let (Some(systolic), Some(diastolic)) = (values.systolic, values.diastolic) {
        if systolic <= diastolic {
            let mut error = ValidationError::new("systolic_not_above_diastolic");
            error.message = Some("Systolic pressure must be greater than diastolic pressure".into());
            return Err(error);
        }
    }
    Ok(())
}

fn parse_number(raw: &str) -> Option<i32> {
    raw.trim().parse().ok()
}

fn validate_reading(values: ReadingValues) -> ValidationReport {
    match values.validate() {
        Ok(()) => ValidationReport::default(),
        Err(errors) => errors.into(),
    }
}

/// Validate raw text as entered in a form.
///
/// A value counts only when the whole trimmed text is an integer, so `"120abc"` and `"12.5"`
/// are reported as missing rather than read as their leading digits.
pub fn validate(systolic: &str, diastolic: &str, pulse: &str) -> ValidationReport {
    validate_reading(ReadingValues {
        systolic: parse_number(systolic),
        diastolic: parse_number(diastolic),
        pulse: parse_number(pulse),
    })
}

/// Validate already parsed values
pub fn validate_values(systolic: i32, diastolic: i32, pulse: i32) -> ValidationReport {
    validate_reading(ReadingValues {
        systolic: Some(systolic),
        diastolic: Some(diastolic),
        pulse: Some(pulse),
    })
}
