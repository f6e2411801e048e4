use crate::domain::model::AnimalId;
use crate::utils::error::{HerdError, Result};
use std::collections::HashSet;

pub const MIN_NAME_LENGTH: usize = 3;
pub const MAX_NAME_LENGTH: usize = 50;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// 動物名稱：必填，長度 3 到 50 個字元
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(HerdError::InvalidName {
            name: name.to_string(),
            reason: "name must be provided".to_string(),
        });
    }

    let length = name.chars().count();
    if length < MIN_NAME_LENGTH {
        return Err(HerdError::InvalidName {
            name: name.to_string(),
            reason: format!("name must have at least {} characters", MIN_NAME_LENGTH),
        });
    }
    if length > MAX_NAME_LENGTH {
        return Err(HerdError::InvalidName {
            name: name.to_string(),
            reason: format!("name must have at most {} characters", MAX_NAME_LENGTH),
        });
    }

    Ok(())
}

pub fn validate_identifier(field_name: &str, value: i64) -> Result<AnimalId> {
    u64::try_from(value)
        .ok()
        .and_then(|raw| AnimalId::try_new(raw).ok())
        .ok_or_else(|| HerdError::InvalidIdentifier {
            field: field_name.to_string(),
            value,
        })
}

/// 父母編號：缺少或 0 代表沒有紀錄
pub fn validate_parent_reference(field_name: &str, value: Option<i64>) -> Result<Option<AnimalId>> {
    match value {
        None => Ok(None),
        Some(raw) => {
            let id = validate_identifier(field_name, raw)?;
            Ok((!id.is_unassigned()).then_some(id))
        }
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(HerdError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(HerdError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(HerdError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_file_extension(field_name: &str, file: &str, allowed_extensions: &[&str]) -> Result<()> {
    let allowed_set: HashSet<&str> = allowed_extensions.iter().copied().collect();

    match std::path::Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
    {
        Some(extension) if allowed_set.contains(extension) => Ok(()),
        Some(extension) => Err(HerdError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: format!(
                "Unsupported file extension: {}. Allowed extensions: {}",
                extension,
                allowed_extensions.join(", ")
            ),
        }),
        None => Err(HerdError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: "File has no extension or invalid filename".to_string(),
        }),
    }
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(HerdError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&value) {
        return Err(HerdError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Valid values: {}", allowed.join(", ")),
        });
    }
    Ok(())
}
