use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::{Column, QueryError, QuerySink, Row, Table, Value};

#[derive(Debug, Clone, Eq, PartialEq)]
/// A column requested by a query.
///
/// Written as `name` for static columns and `name:arguments` for the
/// columns of a dynamic column family, e.g. `file:crash.info`.
pub struct ColumnSpec {
    /// The declared or fully qualified column name.
    pub name: String,
    /// The arguments passed to a dynamic column.
    pub arguments: Option<String>,
}

impl From<&str> for ColumnSpec {
    fn from(value: &str) -> Self {
        match value.split_once(':') {
            Some((name, arguments)) => Self {
                name: name.to_string(),
                arguments: Some(arguments.to_string()),
            },
            None => Self {
                name: value.to_string(),
                arguments: None,
            },
        }
    }
}

impl FromStr for ColumnSpec {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl Display for ColumnSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.arguments {
            Some(arguments) => write!(f, "{}:{arguments}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

enum Projected<'t, T> {
    Static(&'t dyn Column<T>),
    Dynamic(Box<dyn Column<T> + 't>),
}

impl<T> Projected<'_, T> {
    #[inline]
    fn value(&self, row: Row<'_, T>) -> Value {
        match self {
            Projected::Static(column) => column.value(row),
            Projected::Dynamic(column) => column.value(row),
        }
    }
}

/// A [QuerySink] collecting the values of a fixed list of columns.
///
/// The projection asks the table to stop once its optional row limit is reached.
pub struct Projection<'t, T> {
    columns: Vec<Projected<'t, T>>,
    limit: Option<usize>,
    rows: Vec<Vec<Value>>,
}

impl<'t, T> Projection<'t, T> {
    /// Resolves the requested columns against the table.
    ///
    /// If no columns are requested every static column of the table is used.
    pub fn new<Tb>(
        table: &'t Tb,
        specs: &[ColumnSpec],
        limit: Option<usize>,
    ) -> Result<Self, QueryError>
    where
        Tb: Table<Entity = T> + ?Sized,
    {
        let columns = if specs.is_empty() {
            table.columns().columns().map(Projected::Static).collect()
        } else {
            specs
                .iter()
                .map(|spec| resolve(table, spec))
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(Self {
            columns,
            limit,
            rows: Vec::new(),
        })
    }

    /// Returns `true` once the row limit has been reached.
    pub fn is_satisfied(&self) -> bool {
        self.limit.is_some_and(|limit| self.rows.len() >= limit)
    }

    /// Consumes the projection returning the collected rows.
    pub fn into_rows(self) -> Vec<Vec<Value>> {
        self.rows
    }
}

impl<T> QuerySink<T> for Projection<'_, T> {
    fn process_dataset(&mut self, row: Row<'_, T>) -> bool {
        if self.is_satisfied() {
            return false;
        }

        let values = self.columns.iter().map(|c| c.value(row)).collect();
        self.rows.push(values);
        !self.is_satisfied()
    }
}

fn resolve<'t, T, Tb>(table: &'t Tb, spec: &ColumnSpec) -> Result<Projected<'t, T>, QueryError>
where
    Tb: Table<Entity = T> + ?Sized,
{
    if let Some(arguments) = &spec.arguments {
        let family = table.dynamic_column(&spec.name).ok_or_else(|| {
            QueryError::UnknownColumn {
                table: table.name().to_string(),
                column: spec.name.clone(),
            }
        })?;
        return Ok(Projected::Dynamic(family.make_column(arguments)?));
    }

    if let Some(column) = table.column(&spec.name) {
        return Ok(Projected::Static(column));
    }

    if table.dynamic_column(&spec.name).is_some() {
        return Err(QueryError::MissingArguments {
            table: table.name().to_string(),
            column: spec.name.clone(),
        });
    }

    Err(QueryError::UnknownColumn {
        table: table.name().to_string(),
        column: spec.name.clone(),
    })
}
