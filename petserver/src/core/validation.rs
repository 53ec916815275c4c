//! Request body validation
//!
//! Turns an untyped JSON body into `NewPet` or `PetPatch`. Every offending
//! field is reported, keyed by its path (`group.scientific_name`,
//! `traits[1].name`). A key that is present with `null` is an error, never
//! "absent".

use serde_json::{Map, Value};

use shared::Sex;
use crate::error::{FieldErrors, PetServerError, PetServerResult};
use crate::types::{NewPet, PetPatch};

pub const PET_NAME_MAX_LEN: usize = 50;
pub const GROUP_NAME_MAX_LEN: usize = 50;
pub const TRAIT_NAME_MAX_LEN: usize = 20;

const REQUIRED: &str = "This field is required.";
const NOT_NULL: &str = "This field may not be null.";

/// (path suffix, message) pairs produced by a single field parser
type Issues = Vec<(String, String)>;

fn issue(message: impl Into<String>) -> Issues {
    vec![(String::new(), message.into())]
}

fn nested(suffix: impl Into<String>, issues: Issues) -> Issues {
    let suffix = suffix.into();
    issues
        .into_iter()
        .map(|(path, message)| (format!("{suffix}{path}"), message))
        .collect()
}

#[derive(Default)]
struct Validator {
    errors: FieldErrors,
}

impl Validator {
    fn record(&mut self, field: &str, issues: Issues) {
        for (suffix, message) in issues {
            self.errors.entry(format!("{field}{suffix}")).or_default().push(message);
        }
    }

    /// Parses `field` if the key is present; `None` if absent or invalid
    fn present<T>(&mut self, object: &Map<String, Value>, field: &str, parse: fn(&Value) -> Result<T, Issues>) -> Option<T> {
        match object.get(field) {
            None => None,
            Some(Value::Null) => {
                self.record(field, issue(NOT_NULL));
                None
            }
            Some(value) => match parse(value) {
                Ok(parsed) => Some(parsed),
                Err(issues) => {
                    self.record(field, issues);
                    None
                }
            },
        }
    }

    fn required<T>(&mut self, object: &Map<String, Value>, field: &str, parse: fn(&Value) -> Result<T, Issues>) -> Option<T> {
        if !object.contains_key(field) {
            self.record(field, issue(REQUIRED));
            return None;
        }
        self.present(object, field, parse)
    }

    fn finish<T>(self, parsed: Option<T>) -> PetServerResult<T> {
        match parsed {
            Some(value) if self.errors.is_empty() => Ok(value),
            _ => Err(PetServerError::Validation { errors: self.errors }),
        }
    }
}

fn as_object(body: &Value) -> PetServerResult<&Map<String, Value>> {
    body.as_object().ok_or_else(|| PetServerError::MalformedBody {
        details: format!("Expected a JSON object but got {}.", type_name(body)),
    })
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

fn text(value: &Value, max_len: usize) -> Result<String, Issues> {
    let raw = match value {
        Value::String(s) => s.as_str(),
        _ => return Err(issue("Not a valid string.")),
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(issue("This field may not be blank."));
    }
    if trimmed.chars().count() > max_len {
        return Err(issue(format!("Ensure this field has no more than {max_len} characters.")));
    }
    Ok(trimmed.to_string())
}

fn parse_pet_name(value: &Value) -> Result<String, Issues> {
    text(value, PET_NAME_MAX_LEN)
}

fn parse_age(value: &Value) -> Result<u32, Issues> {
    let invalid = || issue("A valid integer is required.");
    let parsed: i64 = match value {
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i,
            (None, Some(f)) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => f as i64,
            _ => return Err(invalid()),
        },
        Value::String(s) => s.trim().parse().map_err(|_| invalid())?,
        _ => return Err(invalid()),
    };
    if parsed < 0 {
        return Err(issue("Ensure this value is greater than or equal to 0."));
    }
    u32::try_from(parsed).map_err(|_| issue(format!("Ensure this value is less than or equal to {}.", u32::MAX)))
}

fn parse_weight(value: &Value) -> Result<f64, Issues> {
    let invalid = || issue("A valid number is required.");
    let parsed = match value {
        Value::Number(n) => n.as_f64().ok_or_else(invalid)?,
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| invalid())?,
        _ => return Err(invalid()),
    };
    if !parsed.is_finite() {
        return Err(invalid());
    }
    if parsed < 0.0 {
        return Err(issue("Ensure this value is greater than or equal to 0."));
    }
    Ok(parsed)
}

fn parse_sex(value: &Value) -> Result<Sex, Issues> {
    match value {
        Value::String(s) => s.parse::<Sex>().map_err(|_| issue(format!("\"{s}\" is not a valid choice."))),
        other => Err(issue(format!("\"{other}\" is not a valid choice."))),
    }
}

fn named_object(value: &Value, key: &str, max_len: usize) -> Result<String, Issues> {
    let object = value.as_object().ok_or_else(|| {
        issue(format!("Invalid data. Expected a dictionary, but got {}.", type_name(value)))
    })?;
    match object.get(key) {
        None => Err(nested(format!(".{key}"), issue(REQUIRED))),
        Some(Value::Null) => Err(nested(format!(".{key}"), issue(NOT_NULL))),
        Some(inner) => text(inner, max_len).map_err(|issues| nested(format!(".{key}"), issues)),
    }
}

fn parse_group(value: &Value) -> Result<String, Issues> {
    named_object(value, "scientific_name", GROUP_NAME_MAX_LEN)
}

fn parse_traits(value: &Value) -> Result<Vec<String>, Issues> {
    let items = value.as_array().ok_or_else(|| {
        issue(format!("Expected a list of items but got type \"{}\".", type_name(value)))
    })?;

    let mut names = Vec::with_capacity(items.len());
    let mut issues = Issues::new();
    for (index, item) in items.iter().enumerate() {
        match named_object(item, "name", TRAIT_NAME_MAX_LEN) {
            Ok(name) => names.push(name),
            Err(item_issues) => issues.extend(nested(format!("[{index}]"), item_issues)),
        }
    }

    if issues.is_empty() { Ok(names) } else { Err(issues) }
}

/// Validate a create body
pub fn validate_new_pet(body: &Value) -> PetServerResult<NewPet> {
    let object = as_object(body)?;
    let mut validator = Validator::default();

    let name = validator.required(object, "name", parse_pet_name);
    let age = validator.required(object, "age", parse_age);
    let weight = validator.required(object, "weight", parse_weight);
    let sex = validator.present(object, "sex", parse_sex);
    let group = validator.required(object, "group", parse_group);
    let traits = validator.present(object, "traits", parse_traits);

    let parsed = match (name, age, weight, group) {
        (Some(name), Some(age), Some(weight), Some(group)) => Some(NewPet {
            name,
            age,
            weight,
            sex: sex.unwrap_or_default(),
            group,
            traits: traits.unwrap_or_default(),
        }),
        _ => None,
    };
    validator.finish(parsed)
}

/// Validate a partial-update body; only keys present are checked
pub fn validate_patch(body: &Value) -> PetServerResult<PetPatch> {
    let object = as_object(body)?;
    let mut validator = Validator::default();

    let patch = PetPatch {
        name: validator.present(object, "name", parse_pet_name),
        age: validator.present(object, "age", parse_age),
        weight: validator.present(object, "weight", parse_weight),
        sex: validator.present(object, "sex", parse_sex),
        group: validator.present(object, "group", parse_group),
        traits: validator.present(object, "traits", parse_traits),
    };
    validator.finish(Some(patch))
}
