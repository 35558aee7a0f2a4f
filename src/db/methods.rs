//! Impact method rows (method → categories → factors)

use rusqlite::{params, Connection};

use crate::error::IntensityError;
use crate::model::{ImpactCategoryRecord, ImpactFactorRecord, ImpactMethodRecord};

fn load_factors(conn: &Connection, category_id: &str) -> Result<Vec<ImpactFactorRecord>, IntensityError> {
    let mut stmt = conn.prepare(
        "SELECT flow_id, value, unit FROM impact_factors WHERE category_id = ? ORDER BY rowid",
    )?;
    let factors = stmt
        .query_map(params![category_id], |row| {
            Ok(ImpactFactorRecord {
                flow_id: row.get(0)?,
                value: row.get(1)?,
                unit: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(factors)
}

fn load_categories(conn: &Connection, method_id: &str) -> Result<Vec<ImpactCategoryRecord>, IntensityError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, reference_unit FROM impact_categories WHERE method_id = ? ORDER BY position",
    )?;
    let mut categories = stmt
        .query_map(params![method_id], |row| {
            Ok(ImpactCategoryRecord {
                id: row.get(0)?,
                name: row.get(1)?,
                reference_unit: row.get(2)?,
                factors: Vec::new(),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    for category in &mut categories {
        category.factors = load_factors(conn, &category.id)?;
    }
    Ok(categories)
}

pub fn list_methods(conn: &Connection) -> Result<Vec<ImpactMethodRecord>, IntensityError> {
    let mut stmt = conn.prepare("SELECT id, name, version FROM impact_methods ORDER BY rowid")?;
    let mut methods = stmt
        .query_map([], |row| {
            Ok(ImpactMethodRecord {
                id: row.get(0)?,
                name: row.get(1)?,
                version: row.get(2)?,
                categories: Vec::new(),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    for method in &mut methods {
        method.categories = load_categories(conn, &method.id)?;
    }
    Ok(methods)
}

pub fn insert_method(conn: &mut Connection, method: &ImpactMethodRecord) -> Result<(), IntensityError> {
    let tx = conn.transaction()?;

    tx.execute(
        "INSERT INTO impact_methods (id, name, version) VALUES (?, ?, ?)",
        params![method.id, method.name, method.version],
    )?;

    for (position, category) in method.categories.iter().enumerate() {
        tx.execute(
            r#"
            INSERT INTO impact_categories (id, method_id, name, reference_unit, position)
            VALUES (?, ?, ?, ?, ?)
            "#,
            params![category.id, method.id, category.name, category.reference_unit, position as i64],
        )?;
        for factor in &category.factors {
            tx.execute(
                "INSERT INTO impact_factors (category_id, flow_id, value, unit) VALUES (?, ?, ?, ?)",
                params![category.id, factor.flow_id, factor.value, factor.unit],
            )?;
        }
    }

    tx.commit()?;
    Ok(())
}

/// Delete a method together with its categories and factors
pub fn delete_method(conn: &mut Connection, id: &str) -> Result<bool, IntensityError> {
    let tx = conn.transaction()?;
    tx.execute(
        "DELETE FROM impact_factors WHERE category_id IN (SELECT id FROM impact_categories WHERE method_id = ?)",
        params![id],
    )?;
    tx.execute("DELETE FROM impact_categories WHERE method_id = ?", params![id])?;
    let changes = tx.execute("DELETE FROM impact_methods WHERE id = ?", params![id])?;
    tx.commit()?;
    Ok(changes > 0)
}
