//! Information display module for models
//!
//! This module provides functionality for displaying models and their components
//! in a human-readable format. It implements the `Display` trait for `Model` and
//! provides helper functions to format the entity collections as tables.

use std::fmt::{self, Display};

use itertools::Itertools;
use tabled::{builder::Builder, settings::Style};

use crate::prelude::{
    Compartment, InitialValue, Model, Parameter, Reaction, ResolvedUnit, Species, UnitDefinition,
    UnitRef,
};

/// Trait for converting model components to table records
///
/// This trait defines methods that allow model components to be displayed
/// as rows in a formatted table. Implementors must provide column headers
/// and a way to convert their data to string values for each column.
trait TableRecord {
    /// Get the column headers for the table
    fn columns() -> Vec<String>;

    /// Convert the instance to a record for display in a table
    fn to_record(&self) -> Vec<String>;
}

impl Display for Model {
    /// Formats a model for display
    ///
    /// Creates a formatted table representation of the model, including all its
    /// non-empty collections.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = Builder::default();
        builder.push_record(vec![match &self.name {
            Some(name) => format!("Model '{}' ({})", self.id, name),
            None => format!("Model '{}'", self.id),
        }]);

        if !self.units.is_empty() {
            builder.push_record(vec!["Units"]);
            builder.push_record(vec![unit_table(self)]);
        }

        if !self.compartments.is_empty() {
            builder.push_record(vec!["Compartments"]);
            builder.push_record(vec![to_table(&self.compartments)]);
        }

        if !self.species.is_empty() {
            builder.push_record(vec!["Species"]);
            builder.push_record(vec![to_table(&self.species)]);
        }

        if !self.parameters.is_empty() {
            builder.push_record(vec!["Parameters"]);
            builder.push_record(vec![to_table(&self.parameters)]);
        }

        if !self.reactions.is_empty() {
            builder.push_record(vec!["Reactions"]);
            builder.push_record(vec![to_table(&self.reactions)]);
        }

        let mut table = builder.build();
        table.with(Style::sharp());
        write!(f, "{table}")
    }
}

/// Converts a collection of TableRecord implementors to a formatted table string
fn to_table<T: TableRecord>(records: &[T]) -> String {
    let mut builder = Builder::default();
    builder.push_record(T::columns());

    for record in records {
        builder.push_record(record.to_record());
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

/// Unit definitions together with their resolved SBML base units. Units that
/// cannot be resolved are shown as `-`.
fn unit_table(model: &Model) -> String {
    let registry = model.unit_registry();
    let mut builder = Builder::default();
    builder.push_record(UnitDefinition::columns());

    for unit in &model.units {
        let mut record = unit.to_record();
        record.push(
            registry
                .get(&unit.id)
                .as_ref()
                .map_or("-".to_string(), ResolvedUnit::to_string),
        );
        builder.push_record(record);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

fn optional_unit(unit: &Option<UnitRef>) -> String {
    unit.as_ref().map_or("-".to_string(), UnitRef::to_string)
}

impl TableRecord for UnitDefinition {
    fn columns() -> Vec<String> {
        vec![
            "ID".to_string(),
            "Definition".to_string(),
            "Base Units".to_string(),
        ]
    }

    /// The base units column is filled by `unit_table`
    fn to_record(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.definition.clone().unwrap_or(self.id.to_string()),
        ]
    }
}

impl TableRecord for Compartment {
    fn columns() -> Vec<String> {
        vec![
            "ID".to_string(),
            "Name".to_string(),
            "Size".to_string(),
            "Unit".to_string(),
        ]
    }

    fn to_record(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone().unwrap_or("-".to_string()),
            self.value.to_string(),
            optional_unit(&self.unit),
        ]
    }
}

impl TableRecord for Species {
    fn columns() -> Vec<String> {
        vec![
            "ID".to_string(),
            "Name".to_string(),
            "Compartment".to_string(),
            "Initial".to_string(),
            "Unit".to_string(),
        ]
    }

    fn to_record(&self) -> Vec<String> {
        let initial = match self.initial {
            InitialValue::Amount(value) => format!("{value} (amount)"),
            InitialValue::Concentration(value) => format!("{value} (concentration)"),
        };

        vec![
            self.id.to_string(),
            self.name.clone().unwrap_or("-".to_string()),
            self.compartment.to_string(),
            initial,
            optional_unit(&self.substance_unit),
        ]
    }
}

impl TableRecord for Parameter {
    fn columns() -> Vec<String> {
        vec![
            "ID".to_string(),
            "Name".to_string(),
            "Value".to_string(),
            "Unit".to_string(),
            "Constant".to_string(),
        ]
    }

    fn to_record(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone().unwrap_or("-".to_string()),
            self.value.to_string(),
            optional_unit(&self.unit),
            self.constant.to_string(),
        ]
    }
}

impl TableRecord for Reaction {
    fn columns() -> Vec<String> {
        vec![
            "ID".to_string(),
            "Name".to_string(),
            "Equation".to_string(),
            "Rate Law".to_string(),
            "Local Parameters".to_string(),
        ]
    }

    fn to_record(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone().unwrap_or("-".to_string()),
            self.equation.to_string(),
            self.kinetic_law
                .as_ref()
                .map_or("-".to_string(), |law| law.math.clone()),
            self.local_parameters.iter().map(|p| &p.id).join(", "),
        ]
    }
}
