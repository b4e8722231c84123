//! Composable filter state for the instance list
//!
//! Holds the set of committed filter criteria, ordered by insertion for
//! chip display. Criteria are capped globally and per field; an add past
//! a cap is rejected outright and leaves the state unchanged. The state
//! serializes into the search expression the list endpoint expects:
//! OR within a field's values, AND across fields.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::instance::InstanceStatus;
use crate::validation::{self, ValidationError};

/// Default maximum number of criteria across all fields
pub const DEFAULT_MAX_CRITERIA: usize = 10;

/// Default maximum number of criteria for a single field
pub const DEFAULT_MAX_CRITERIA_PER_FIELD: usize = 10;

/// Fields the instance list can be filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    /// Instance name
    Name,
    /// Creating user
    Owner,
    /// Region
    Region,
    /// Cloud provider
    Provider,
    /// Lifecycle status
    Status,
}

impl FilterField {
    /// Column name used in the search expression.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterField::Name => "name",
            FilterField::Owner => "owner",
            FilterField::Region => "region",
            FilterField::Provider => "cloud_provider",
            FilterField::Status => "status",
        }
    }

    /// Whether the field takes free text (and needs value validation)
    /// rather than a selection from a fixed set.
    pub fn is_text(&self) -> bool {
        matches!(self, FilterField::Name | FilterField::Owner)
    }
}

impl std::fmt::Display for FilterField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One committed filter entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriterion {
    /// Field the criterion applies to
    pub field: FilterField,
    /// Value to match
    pub value: String,
    /// Exact match (`=`) versus partial match (`like %value%`)
    pub exact: bool,
}

/// Errors from filter mutations.
///
/// Both are surfaced as disabled controls or inline validation, never
/// as user-visible exceptions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// Adding would exceed the global or per-field criteria cap
    #[error("filter limit reached ({max} criteria)")]
    CapExceeded { max: usize },

    /// The candidate value fails the field's character/length policy
    #[error("invalid value for {field} filter: {source}")]
    InvalidValue {
        field: FilterField,
        source: ValidationError,
    },
}

/// Ordered collection of active filter criteria.
#[derive(Debug, Clone)]
pub struct FilterState {
    criteria: Vec<FilterCriterion>,
    max_total: usize,
    max_per_field: usize,
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CRITERIA, DEFAULT_MAX_CRITERIA_PER_FIELD)
    }
}

impl FilterState {
    /// Create a filter state with the given caps.
    pub fn new(max_total: usize, max_per_field: usize) -> Self {
        Self {
            criteria: Vec::new(),
            max_total,
            max_per_field,
        }
    }

    /// Number of committed criteria across all fields.
    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    /// Whether no criteria are committed.
    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /// Remaining global capacity.
    pub fn remaining_capacity(&self) -> usize {
        self.max_total.saturating_sub(self.criteria.len())
    }

    /// All committed criteria in insertion order.
    pub fn criteria(&self) -> &[FilterCriterion] {
        &self.criteria
    }

    /// Criteria committed for one field, in insertion order.
    pub fn for_field(&self, field: FilterField) -> impl Iterator<Item = &FilterCriterion> {
        self.criteria.iter().filter(move |c| c.field == field)
    }

    /// Append a criterion.
    ///
    /// Validates the candidate value against the field's policy, then
    /// enforces the per-field and global caps. On any failure the state
    /// is left unchanged. Re-adding an identical criterion is a no-op.
    pub fn add(&mut self, field: FilterField, value: impl Into<String>, exact: bool) -> Result<(), FilterError> {
        let value = value.into();
        self.validate_value(field, &value)?;

        let candidate = FilterCriterion { field, value, exact };
        if self.criteria.contains(&candidate) {
            return Ok(());
        }

        if self.criteria.len() >= self.max_total {
            return Err(FilterError::CapExceeded {
                max: self.max_total,
            });
        }
        if self.for_field(field).count() >= self.max_per_field {
            return Err(FilterError::CapExceeded {
                max: self.max_per_field,
            });
        }

        self.criteria.push(candidate);
        Ok(())
    }

    /// Remove the first criterion matching `field` and `value`.
    /// Removing a non-existent entry is a no-op.
    pub fn remove(&mut self, field: FilterField, value: &str) {
        if let Some(pos) = self
            .criteria
            .iter()
            .position(|c| c.field == field && c.value == value)
        {
            self.criteria.remove(pos);
        }
    }

    /// Remove all criteria for one field.
    pub fn clear_field(&mut self, field: FilterField) {
        self.criteria.retain(|c| c.field != field);
    }

    /// Remove all criteria.
    pub fn clear_all(&mut self) {
        self.criteria.clear();
    }

    /// Serialize the active criteria into the list endpoint's search
    /// expression: disjunction within a field, conjunction across
    /// fields. Returns `None` when no criteria are committed.
    pub fn to_search(&self) -> Option<String> {
        if self.criteria.is_empty() {
            return None;
        }

        // Group by field in first-appearance order.
        let mut fields: Vec<FilterField> = Vec::new();
        for criterion in &self.criteria {
            if !fields.contains(&criterion.field) {
                fields.push(criterion.field);
            }
        }

        let groups: Vec<String> = fields
            .into_iter()
            .map(|field| {
                let clauses: Vec<String> = self
                    .for_field(field)
                    .map(|c| {
                        if c.exact {
                            format!("{} = {}", field.as_str(), c.value)
                        } else {
                            format!("{} like %{}%", field.as_str(), c.value)
                        }
                    })
                    .collect();
                if clauses.len() == 1 {
                    clauses.into_iter().next().unwrap_or_default()
                } else {
                    format!("({})", clauses.join(" or "))
                }
            })
            .collect();

        Some(groups.join(" and "))
    }

    fn validate_value(&self, field: FilterField, value: &str) -> Result<(), FilterError> {
        match field {
            FilterField::Status => {
                value
                    .parse::<InstanceStatus>()
                    .map_err(|_| FilterError::InvalidValue {
                        field,
                        source: ValidationError::InvalidValue {
                            value: value.to_string(),
                            reason: "not a known status",
                        },
                    })?;
                Ok(())
            }
            _ => validation::validate_filter_value(value)
                .map_err(|source| FilterError::InvalidValue { field, source }),
        }
    }
}
