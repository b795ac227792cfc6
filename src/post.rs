use crate::global_variables::*;
use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub struct PostResult {
    pub name: String,
    pub label: String,
    pub value: Float,
    pub unit: Option<String>,
}

impl PostResult {
    pub fn new(name: &str, label: &str, value: Float, unit: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            value,
            unit: unit.map(str::to_string),
        }
    }
}

impl fmt::Display for PostResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:.6e}", self.label, self.value)?;
        if let Some(unit) = &self.unit {
            write!(f, " {unit}")?;
        }
        Ok(())
    }
}
