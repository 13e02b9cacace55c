use crate::commands::error::{CommandResult, InternalError, RuntimeError};
use std::any::type_name;
use std::str::FromStr;

/// The values captured from a message, shaped by how many capture groups the
/// matching pattern declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parameters {
    /// The pattern has no capture groups.
    None,
    /// The pattern has exactly one capture group.
    Single(String),
    /// The pattern has two or more capture groups, in group order.
    List(Vec<String>),
}

impl Parameters {
    pub fn from_captures(mut captures: Vec<String>) -> Self {
        match captures.len() {
            0 => Parameters::None,
            1 => Parameters::Single(captures.remove(0)),
            _ => Parameters::List(captures),
        }
    }

    pub fn as_slice(&self) -> &[String] {
        match self {
            Parameters::None => &[],
            Parameters::Single(value) => std::slice::from_ref(value),
            Parameters::List(values) => values,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    pub fn single(&self) -> Option<&str> {
        match self {
            Parameters::Single(value) => Some(value),
            _ => None,
        }
    }

    pub fn get(&self, index: usize) -> CommandResult<&str> {
        self.as_slice()
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| {
                InternalError::MissingParameter {
                    index,
                    count: self.len(),
                }
                .into()
            })
    }

    pub fn parse<T: FromStr>(&self, index: usize) -> CommandResult<T> {
        let value = self.get(index)?;
        value.trim().parse().map_err(|_| {
            RuntimeError::InvalidParameter {
                value: value.to_string(),
                expected: short_type_name::<T>().to_string(),
            }
            .into()
        })
    }
}

fn short_type_name<T>() -> &'static str {
    let name = type_name::<T>();
    name.rsplit("::").next().unwrap_or(name)
}
