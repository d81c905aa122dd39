//! Validation of backend configuration tables.
//!
//! Each collection backend receives a raw `toml::Value` from the
//! `[collection.implementations.<name>]` section. Before building anything the
//! backend checks that table against a [`Schema`] of required and optional
//! fields, so a typo in a contract address is reported at load time instead of
//! as a failed RPC call later.

use crate::key::OrderingKey;
use crate::utils::parse_address;
use thiserror::Error;

/// Errors that can occur during configuration validation.
#[derive(Debug, Error)]
pub enum ValidationError {
	/// A required field is missing.
	#[error("Missing required field: {0}")]
	MissingField(String),
	/// A field has an invalid value.
	#[error("Invalid value for field '{field}': {message}")]
	InvalidValue { field: String, message: String },
	/// A field has the wrong TOML type.
	#[error("Type mismatch for field '{field}': expected {expected}, got {actual}")]
	TypeMismatch {
		field: String,
		expected: String,
		actual: String,
	},
}

/// Expected type of a configuration field.
#[derive(Debug)]
pub enum FieldType {
	String,
	/// An integer with optional inclusive bounds.
	Integer { min: Option<i64>, max: Option<i64> },
	/// A string holding a 20-byte hex address.
	Address,
	/// A uint256 given either as a non-negative integer or as a decimal string.
	/// Strings are needed for values above `i64::MAX`, such as 18-decimal amounts.
	Uint,
	Array(Box<FieldType>),
	Table(Schema),
}

/// Custom check run after the type check passes.
pub type FieldValidator = Box<dyn Fn(&toml::Value) -> Result<(), String> + Send + Sync>;

/// A named field in a schema.
pub struct Field {
	pub name: String,
	pub field_type: FieldType,
	pub validator: Option<FieldValidator>,
}

impl std::fmt::Debug for Field {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Field")
			.field("name", &self.name)
			.field("field_type", &self.field_type)
			.field("validator", &self.validator.is_some())
			.finish()
	}
}

impl Field {
	pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
		Self {
			name: name.into(),
			field_type,
			validator: None,
		}
	}

	/// Adds a custom validator to this field.
	pub fn with_validator<F>(mut self, validator: F) -> Self
	where
		F: Fn(&toml::Value) -> Result<(), String> + Send + Sync + 'static,
	{
		self.validator = Some(Box::new(validator));
		self
	}
}

/// Required and optional fields of a configuration table.
#[derive(Debug)]
pub struct Schema {
	pub required: Vec<Field>,
	pub optional: Vec<Field>,
}

impl Schema {
	pub fn new(required: Vec<Field>, optional: Vec<Field>) -> Self {
		Self { required, optional }
	}

	/// Validates a TOML table against this schema.
	///
	/// Required fields must be present; optional fields are checked only when
	/// present. Nested tables report their fields with a dotted path.
	pub fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let table = config
			.as_table()
			.ok_or_else(|| ValidationError::TypeMismatch {
				field: "root".to_string(),
				expected: "table".to_string(),
				actual: config.type_str().to_string(),
			})?;

		for field in &self.required {
			let value = table
				.get(&field.name)
				.ok_or_else(|| ValidationError::MissingField(field.name.clone()))?;
			validate_field(field, value)?;
		}

		for field in &self.optional {
			if let Some(value) = table.get(&field.name) {
				validate_field(field, value)?;
			}
		}

		Ok(())
	}
}

fn validate_field(field: &Field, value: &toml::Value) -> Result<(), ValidationError> {
	validate_field_type(&field.name, value, &field.field_type)?;

	if let Some(validator) = &field.validator {
		validator(value).map_err(|message| ValidationError::InvalidValue {
			field: field.name.clone(),
			message,
		})?;
	}

	Ok(())
}

fn type_mismatch(field_name: &str, expected: &str, value: &toml::Value) -> ValidationError {
	ValidationError::TypeMismatch {
		field: field_name.to_string(),
		expected: expected.to_string(),
		actual: value.type_str().to_string(),
	}
}

fn validate_field_type(
	field_name: &str,
	value: &toml::Value,
	expected_type: &FieldType,
) -> Result<(), ValidationError> {
	match expected_type {
		FieldType::String => {
			if !value.is_str() {
				return Err(type_mismatch(field_name, "string", value));
			}
		},
		FieldType::Integer { min, max } => {
			let int_val = value
				.as_integer()
				.ok_or_else(|| type_mismatch(field_name, "integer", value))?;

			if let Some(min_val) = min {
				if int_val < *min_val {
					return Err(ValidationError::InvalidValue {
						field: field_name.to_string(),
						message: format!("Value {} is less than minimum {}", int_val, min_val),
					});
				}
			}
			if let Some(max_val) = max {
				if int_val > *max_val {
					return Err(ValidationError::InvalidValue {
						field: field_name.to_string(),
						message: format!("Value {} is greater than maximum {}", int_val, max_val),
					});
				}
			}
		},
		FieldType::Address => {
			let text = value
				.as_str()
				.ok_or_else(|| type_mismatch(field_name, "address string", value))?;
			parse_address(text).map_err(|message| ValidationError::InvalidValue {
				field: field_name.to_string(),
				message,
			})?;
		},
		FieldType::Uint => match value {
			toml::Value::Integer(i) if *i >= 0 => {},
			toml::Value::Integer(i) => {
				return Err(ValidationError::InvalidValue {
					field: field_name.to_string(),
					message: format!("Value {} must not be negative", i),
				});
			},
			toml::Value::String(s) => {
				s.parse::<OrderingKey>()
					.map_err(|e| ValidationError::InvalidValue {
						field: field_name.to_string(),
						message: e.to_string(),
					})?;
			},
			other => return Err(type_mismatch(field_name, "uint", other)),
		},
		FieldType::Array(inner_type) => {
			let array = value
				.as_array()
				.ok_or_else(|| type_mismatch(field_name, "array", value))?;

			for (i, item) in array.iter().enumerate() {
				validate_field_type(&format!("{}[{}]", field_name, i), item, inner_type)?;
			}
		},
		FieldType::Table(schema) => {
			schema.validate(value).map_err(|e| match e {
				ValidationError::MissingField(f) => {
					ValidationError::MissingField(format!("{}.{}", field_name, f))
				},
				ValidationError::InvalidValue { field, message } => ValidationError::InvalidValue {
					field: format!("{}.{}", field_name, field),
					message,
				},
				ValidationError::TypeMismatch {
					field,
					expected,
					actual,
				} => ValidationError::TypeMismatch {
					field: format!("{}.{}", field_name, field),
					expected,
					actual,
				},
			})?;
		},
	}

	Ok(())
}

/// Implemented by each backend to validate its own configuration table.
pub trait ConfigSchema: Send + Sync {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError>;
}

#[cfg(test)]
mod tests {
	use super::*;

	fn contracts_schema() -> Schema {
		Schema::new(
			vec![
				Field::new("sorted_troves", FieldType::Address),
				Field::new("max_trials", FieldType::Integer {
					min: Some(1),
					max: None,
				}),
			],
			vec![
				Field::new("gas_compensation", FieldType::Uint),
				Field::new("label", FieldType::String),
			],
		)
	}

	#[test]
	fn test_valid_table() {
		let config: toml::Value = toml::from_str(
			r#"
sorted_troves = "0xB7f8BC63BbcaD18155201308C8f3540b07f84F5e"
max_trials = 1500
gas_compensation = "200000000000000000000"
"#,
		)
		.unwrap();

		assert!(contracts_schema().validate(&config).is_ok());
	}

	#[test]
	fn test_missing_required_field() {
		let config: toml::Value = toml::from_str("max_trials = 10").unwrap();
		let err = contracts_schema().validate(&config).unwrap_err();
		assert_eq!(err.to_string(), "Missing required field: sorted_troves");
	}

	#[test]
	fn test_bad_address() {
		let config: toml::Value = toml::from_str(
			r#"
sorted_troves = "0x1234"
max_trials = 10
"#,
		)
		.unwrap();

		let err = contracts_schema().validate(&config).unwrap_err();
		assert!(matches!(err, ValidationError::InvalidValue { ref field, .. } if field == "sorted_troves"));
	}

	#[test]
	fn test_integer_bounds_and_uint() {
		let config: toml::Value = toml::from_str(
			r#"
sorted_troves = "0xB7f8BC63BbcaD18155201308C8f3540b07f84F5e"
max_trials = 0
"#,
		)
		.unwrap();
		assert!(contracts_schema().validate(&config).is_err());

		let config: toml::Value = toml::from_str(
			r#"
sorted_troves = "0xB7f8BC63BbcaD18155201308C8f3540b07f84F5e"
max_trials = 1
gas_compensation = -5
"#,
		)
		.unwrap();
		assert!(contracts_schema().validate(&config).is_err());
	}

	#[test]
	fn test_nested_table_paths() {
		let schema = Schema::new(
			vec![Field::new(
				"fixture",
				FieldType::Table(Schema::new(
					vec![Field::new("first_redemption_hint", FieldType::Address)],
					vec![],
				)),
			)],
			vec![],
		);

		let config: toml::Value = toml::from_str("[fixture]\nfirst_redemption_hint = 5").unwrap();
		let err = schema.validate(&config).unwrap_err();
		assert!(err.to_string().contains("fixture.first_redemption_hint"));
	}

	#[test]
	fn test_custom_validator() {
		let schema = Schema::new(
			vec![
				Field::new("partitions", FieldType::Array(Box::new(FieldType::Integer {
					min: Some(0),
					max: None,
				})))
				.with_validator(|value| match value.as_array() {
					Some(arr) if arr.is_empty() => Err("partitions cannot be empty".to_string()),
					_ => Ok(()),
				}),
			],
			vec![],
		);

		let config: toml::Value = toml::from_str("partitions = []").unwrap();
		let err = schema.validate(&config).unwrap_err();
		assert!(err.to_string().contains("partitions cannot be empty"));
	}
}
