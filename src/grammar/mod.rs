//! Configuration-token grammar.
//!
//! A single delimited token describes one parameter or one filter subsystem:
//!
//! - parameter: `nam|val|unc` or `nam|start;end;delta|unc`
//! - first-order subsystem: `TYPE|nam|val|unc`, `TYPE ∈ {LP, HP}`
//! - second-order subsystem: `TYPE|nam1|val1|unc1|nam2|val2|unc2`,
//!   `TYPE ∈ {LP, HP, BP}` (either value field may use the swept form)
//!
//! Whether a parameter is swept is purely syntactic: a `;` inside the value
//! field selects the `start;end;delta` form. Separators must be the literal
//! `|` and `;` characters in exactly the positions shown.
//!
//! Parsing is pure: the same token always yields the same descriptor or the
//! same structured failure, and no I/O happens here.

use crate::domain::{FilterKind, ParamKind, Parameter, Subsystem};
use crate::error::AppError;

/// Parse a model-coefficient parameter token (free-form id).
pub fn parse_parameter(token: &str) -> Result<Parameter, AppError> {
    let fields: Vec<&str> = token.split('|').collect();
    if fields.len() != 3 {
        return Err(AppError::syntax(format!(
            "Invalid configuration token '{token}': expected 'id|value|uncertainty' \
             with literal '|' separators."
        )));
    }
    let id = fields[0];
    if id.is_empty() || id.contains(';') {
        return Err(AppError::syntax(format!(
            "Invalid configuration token '{token}': bad parameter id '{id}'."
        )));
    }
    parameter_from_fields(id, fields[1], fields[2], token)
}

/// Parse a system parameter token; the id must be exactly three characters.
pub fn parse_system_parameter(token: &str) -> Result<Parameter, AppError> {
    let param = parse_parameter(token)?;
    if param.id.chars().count() != 3 {
        return Err(AppError::syntax(format!(
            "Invalid configuration token '{token}': system parameter id '{}' \
             must be exactly three characters.",
            param.id
        )));
    }
    Ok(param)
}

/// Parse an obligatory parameter token (`val|unc` form, implied reserved id).
pub fn parse_obligatory(token: &str, id: &str) -> Result<Parameter, AppError> {
    let fields: Vec<&str> = token.split('|').collect();
    if fields.len() != 2 {
        return Err(AppError::syntax(format!(
            "Invalid configuration token '{token}' for '{id}': expected \
             'value|uncertainty'."
        )));
    }
    parameter_from_fields(id, fields[0], fields[1], token)
}

/// Parse a first-order subsystem token: `TYPE|nam|val|unc`.
pub fn parse_first_order(token: &str) -> Result<Subsystem, AppError> {
    let fields: Vec<&str> = token.split('|').collect();
    if fields.len() != 4 {
        return Err(AppError::syntax(format!(
            "Invalid configuration token '{token}': expected 'TYPE|nam|value|uncertainty'."
        )));
    }
    let kind = match fields[0] {
        "LP" => FilterKind::Lp,
        "HP" => FilterKind::Hp,
        other => {
            return Err(AppError::syntax(format!(
                "Invalid configuration token '{token}': first-order subsystem type \
                 '{other}' is not one of LP, HP."
            )));
        }
    };
    let period = parse_system_parameter(&fields[1..4].join("|"))?;
    Ok(Subsystem {
        kind,
        period,
        damping: None,
    })
}

/// Parse a second-order subsystem token: `TYPE|nam1|val1|unc1|nam2|val2|unc2`.
///
/// The embedded parameters are positionally bound to (period, damping).
pub fn parse_second_order(token: &str) -> Result<Subsystem, AppError> {
    let fields: Vec<&str> = token.split('|').collect();
    if fields.len() != 7 {
        return Err(AppError::syntax(format!(
            "Invalid configuration token '{token}': expected \
             'TYPE|nam1|value1|uncertainty1|nam2|value2|uncertainty2'."
        )));
    }
    let kind = match fields[0] {
        "LP" => FilterKind::Lp,
        "HP" => FilterKind::Hp,
        "BP" => FilterKind::Bp,
        other => {
            return Err(AppError::syntax(format!(
                "Invalid configuration token '{token}': second-order subsystem type \
                 '{other}' is not one of LP, HP, BP."
            )));
        }
    };
    let period = parse_system_parameter(&fields[1..4].join("|"))?;
    let damping = parse_system_parameter(&fields[4..7].join("|"))?;
    Ok(Subsystem {
        kind,
        period,
        damping: Some(damping),
    })
}

fn parameter_from_fields(
    id: &str,
    value_field: &str,
    unc_field: &str,
    token: &str,
) -> Result<Parameter, AppError> {
    let uncertainty = parse_number(unc_field, token)?;
    let kind = if value_field.contains(';') {
        let parts: Vec<&str> = value_field.split(';').collect();
        if parts.len() != 3 {
            return Err(AppError::syntax(format!(
                "Invalid configuration token '{token}': swept value field must be \
                 'start;end;delta'."
            )));
        }
        ParamKind::Swept {
            start: parse_number(parts[0], token)?,
            end: parse_number(parts[1], token)?,
            delta: parse_number(parts[2], token)?,
        }
    } else {
        ParamKind::Fixed {
            value: parse_number(value_field, token)?,
        }
    };
    Ok(Parameter {
        id: id.to_string(),
        uncertainty,
        kind,
    })
}

fn parse_number(field: &str, token: &str) -> Result<f64, AppError> {
    field.parse::<f64>().map_err(|_| {
        AppError::syntax(format!(
            "Invalid configuration token '{token}': '{field}' is not a number."
        ))
    })
}
