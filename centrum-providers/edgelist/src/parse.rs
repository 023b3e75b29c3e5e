//! Line parsing against a resolved layout.

use std::sync::Arc;

use centrum_core::{Edge, VertexId};

use crate::{
    errors::EdgeListError,
    layout::{ColumnType, ResolvedLayout},
};

/// Lines starting with one of these markers are comments.
const COMMENT_MARKERS: [char; 2] = ['#', '%'];

/// Parses every record of `text`, whose first line is line `first_line`
/// (one-based) of the file.
pub(crate) fn parse_block(
    text: &str,
    first_line: usize,
    layout: &ResolvedLayout,
) -> Result<Vec<Edge>, EdgeListError> {
    let mut edges = Vec::new();
    for (offset, line) in text.lines().enumerate() {
        if let Some(edge) = parse_line(line, first_line + offset, layout)? {
            edges.push(edge);
        }
    }
    Ok(edges)
}

/// Parses one line, returning `None` for blank and comment lines.
pub(crate) fn parse_line(
    line: &str,
    line_number: usize,
    layout: &ResolvedLayout,
) -> Result<Option<Edge>, EdgeListError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with(COMMENT_MARKERS) {
        return Ok(None);
    }
    let fields: Vec<&str> = if layout.delimiter.is_whitespace() {
        trimmed.split_whitespace().collect()
    } else {
        trimmed.split(layout.delimiter).map(str::trim).collect()
    };
    if fields.len() != layout.columns.len() {
        return Err(EdgeListError::ColumnCount {
            line: line_number,
            expected: layout.columns.len(),
            found: fields.len(),
        });
    }

    let mut source = None;
    let mut destination = None;
    let mut weight = 1.0_f32;
    for (index, (field, column)) in fields.iter().zip(&layout.columns).enumerate() {
        let invalid = || EdgeListError::InvalidValue {
            line: line_number,
            column: Arc::from(column.name()),
            value: (*field).to_owned(),
        };
        let value = parse_value(field, column.ty()).ok_or_else(invalid)?;
        if index == layout.source {
            source = Some(value.vertex().ok_or_else(invalid)?);
        }
        if index == layout.destination {
            destination = Some(value.vertex().ok_or_else(invalid)?);
        }
        if Some(index) == layout.weight {
            weight = value.weight();
        }
    }
    // Both positions were checked to exist when the layout was resolved.
    match (source, destination) {
        (Some(source), Some(target)) => Ok(Some(Edge::new(source, target, weight))),
        _ => Err(EdgeListError::ColumnCount {
            line: line_number,
            expected: layout.columns.len(),
            found: fields.len(),
        }),
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Value {
    Int(i64),
    Float(f64),
}

impl Value {
    fn vertex(self) -> Option<VertexId> {
        match self {
            Self::Int(raw) => u32::try_from(raw).ok().map(VertexId::new),
            Self::Float(_) => None,
        }
    }

    fn weight(self) -> f32 {
        match self {
            Self::Int(raw) => raw as f32,
            Self::Float(raw) => raw as f32,
        }
    }
}

fn parse_value(field: &str, ty: ColumnType) -> Option<Value> {
    match ty {
        ColumnType::Int32 => field.parse::<i32>().ok().map(|v| Value::Int(i64::from(v))),
        ColumnType::Int64 => field.parse::<i64>().ok().map(Value::Int),
        ColumnType::Float32 => field
            .parse::<f32>()
            .ok()
            .map(|v| Value::Float(f64::from(v))),
        ColumnType::Float64 => field.parse::<f64>().ok().map(Value::Float),
    }
}
