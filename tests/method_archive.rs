//! Writing, zipping and importing the method artifact

mod common;

use std::fs::File;
use std::io::Write;

use chrono::{TimeZone, Utc};
use common::*;
use material_intensity::classifier::{CategoryBucket, FactorRecord};
use material_intensity::method::{self, artifact_dir, MethodOptions, METHOD_ID};
use material_intensity::{Classification, ImpactCategoryKind, IntensityError, InventoryDb, InventoryStore};
use tempfile::TempDir;

fn factor(id: &str, unit: &str, value: f64) -> FactorRecord {
    FactorRecord {
        flow_id: id.to_string(),
        flow_name: format!("{} flow", id),
        category_path: vec!["Elementary flows".into(), "Resource".into(), "in ground".into()],
        unit: unit.to_string(),
        value,
    }
}

fn classification() -> Classification {
    Classification {
        buckets: vec![
            CategoryBucket {
                kind: ImpactCategoryKind::AbioticRmi,
                factors: vec![factor("gangue", "kg", 1.0), factor("zero", "kg", 0.0)],
            },
            CategoryBucket {
                kind: ImpactCategoryKind::Water,
                factors: vec![factor("water", "m3", 1000.0)],
            },
        ],
    }
}

fn options() -> MethodOptions {
    MethodOptions {
        name: "Material Intensity".to_string(),
        last_change: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
    }
}

#[test]
fn test_archive_layout() {
    let root = TempDir::new().unwrap();
    let artifact = method::assemble(&classification(), &options());
    let dir = artifact.write_dir(&artifact_dir(root.path(), "ei")).unwrap();

    let zip_path = method::archive(&dir).unwrap();
    assert_eq!(
        zip_path,
        root.path().join("Material Intensity").join("Material Intensity METHOD_ei.zip")
    );

    let mut archive = zip::ZipArchive::new(File::open(&zip_path).unwrap()).unwrap();
    let mut names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            format!("lcia_categories/{}.json", ImpactCategoryKind::AbioticRmi.id()),
            format!("lcia_categories/{}.json", ImpactCategoryKind::Water.id()),
            format!("lcia_methods/{}.json", METHOD_ID),
        ]
    );
}

#[test]
fn test_category_document_fields() {
    let root = TempDir::new().unwrap();
    let artifact = method::assemble(&classification(), &options());
    let dir = artifact.write_dir(root.path()).unwrap();

    let raw = std::fs::read_to_string(
        dir.join("lcia_categories")
            .join(format!("{}.json", ImpactCategoryKind::Water.id())),
    )
    .unwrap();
    let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();

    assert_eq!(doc["@type"], "ImpactCategory");
    assert!(doc["lastChange"].as_str().unwrap().starts_with("2024-03-01T12:00:00.000"));
    assert_eq!(doc["referenceUnitName"], "kg");
    let factor = &doc["impactFactors"][0];
    assert_eq!(factor["value"], 1000.0);
    assert_eq!(factor["unit"]["name"], "m3");
    assert_eq!(factor["flowProperty"]["@id"], "93a60a56-a3c8-22da-a746-0800200c9a66");
    assert_eq!(factor["flow"]["flowType"], "ELEMENTARY_FLOW");
}

#[test]
fn test_import_replaces_same_method() {
    let root = TempDir::new().unwrap();
    let artifact = method::assemble(&classification(), &options());
    let zip_path = method::archive(&artifact.write_dir(&root.path().join("m")).unwrap()).unwrap();

    let mut db = InventoryDb::open_in_memory().unwrap();
    method::import_archive(&mut db, &zip_path).unwrap();
    let imported = method::import_archive(&mut db, &zip_path).unwrap();
    assert_eq!(imported.len(), 1);

    let methods = db.impact_methods().unwrap();
    assert_eq!(methods.len(), 1);
    assert_eq!(methods[0].id, METHOD_ID);
    assert_eq!(methods[0].categories.len(), 2);

    let rmi = &methods[0].categories[0];
    assert_eq!(rmi.name, "Abiotic RMI");
    assert_eq!(rmi.factors.len(), 1);
    assert_eq!(rmi.factors[0].flow_id, "gangue");
    assert_eq!(methods[0].categories[1].factors[0].unit, "m3");
}

#[test]
fn test_import_rejects_archive_without_method() {
    let root = TempDir::new().unwrap();
    let zip_path = root.path().join("empty.zip");
    let mut writer = zip::ZipWriter::new(File::create(&zip_path).unwrap());
    writer
        .start_file("lcia_categories/x.json", zip::write::SimpleFileOptions::default())
        .unwrap();
    writer.write_all(b"{}").unwrap();
    writer.finish().unwrap();

    let mut db = seeded();
    let err = method::import_archive(&mut db, &zip_path).unwrap_err();
    assert!(matches!(err, IntensityError::InvalidArtifact(_) | IntensityError::Json(_)));
    assert!(db.impact_methods().unwrap().is_empty());
}
