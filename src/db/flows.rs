//! Flow and category rows

use rusqlite::{params, Connection, Row};

use crate::error::IntensityError;
use crate::model::{Category, Flow, FlowType, ReferenceProperty};

pub(crate) fn parse_category_path(json: &str) -> Result<Vec<String>, IntensityError> {
    Ok(serde_json::from_str(json)?)
}

/// Raw row before the category JSON is decoded
struct FlowRow {
    id: String,
    name: String,
    category_json: String,
    property: String,
    unit: String,
    flow_type: String,
}

impl FlowRow {
    fn from_row(row: &Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            category_json: row.get("category_json")?,
            property: row.get("property")?,
            unit: row.get("unit")?,
            flow_type: row.get("flow_type")?,
        })
    }

    fn into_flow(self) -> Result<Flow, IntensityError> {
        Ok(Flow {
            category: parse_category_path(&self.category_json)?,
            id: self.id,
            name: self.name,
            property: ReferenceProperty::parse(&self.property),
            unit: self.unit,
            flow_type: FlowType::parse(&self.flow_type),
        })
    }
}

fn query_flows(conn: &Connection, sql: &str, name: Option<&str>) -> Result<Vec<Flow>, IntensityError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = match name {
        Some(name) => stmt
            .query_map(params![name], FlowRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?,
        None => stmt
            .query_map([], FlowRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?,
    };

    rows.into_iter().map(FlowRow::into_flow).collect()
}

/// All flows in insertion order
pub fn list_flows(conn: &Connection) -> Result<Vec<Flow>, IntensityError> {
    query_flows(conn, "SELECT * FROM flows ORDER BY rowid", None)
}

/// Flows with exactly this name
pub fn flows_for_name(conn: &Connection, name: &str) -> Result<Vec<Flow>, IntensityError> {
    query_flows(conn, "SELECT * FROM flows WHERE name = ? ORDER BY rowid", Some(name))
}

pub fn insert_flow(conn: &Connection, flow: &Flow) -> Result<(), IntensityError> {
    conn.execute(
        r#"
        INSERT INTO flows (id, name, category_json, property, unit, flow_type)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
        params![
            flow.id,
            flow.name,
            serde_json::to_string(&flow.category)?,
            flow.property.as_str(),
            flow.unit,
            flow.flow_type.as_str(),
        ],
    )?;
    Ok(())
}

pub fn list_categories(conn: &Connection) -> Result<Vec<Category>, IntensityError> {
    let mut stmt = conn.prepare("SELECT id, name, parent_id FROM categories ORDER BY rowid")?;
    let categories = stmt
        .query_map([], |row| {
            Ok(Category {
                id: row.get(0)?,
                name: row.get(1)?,
                parent_id: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(categories)
}

pub fn insert_category(conn: &Connection, category: &Category) -> Result<(), IntensityError> {
    conn.execute(
        "INSERT INTO categories (id, name, parent_id) VALUES (?, ?, ?)",
        params![category.id, category.name, category.parent_id],
    )?;
    Ok(())
}
