//! Exporting and merging definition files

use super::{open_file_store, Session};
use crate::error::CliResult;
use crate::output::print_success;
use attrdef_store::FileResource;
use std::path::Path;

/// Write every definition of the configured file to `out` as strict JSON
pub fn export(session: &Session, out: &Path) -> CliResult<usize> {
    let store = session.open_store(false)?;
    store.store(&FileResource::new(out))?;
    print_success(&format!(
        "Exported {} attribute definition(s) to {}",
        store.len(),
        out.display()
    ));
    Ok(store.len())
}

/// Merge `other` into the configured definitions and write the result to `out`.
///
/// Keys already present in the configured file keep their definitions.
pub fn merge(session: &Session, other: &Path, out: &Path) -> CliResult<usize> {
    let store = session.open_store(false)?;
    let before = store.len();
    let incoming = open_file_store(other, &session.store, false)?;

    store.import_store(&incoming).store(&FileResource::new(out))?;
    print_success(&format!(
        "Merged {} new attribute definition(s) from {}; wrote {} to {}",
        store.len() - before,
        other.display(),
        store.len(),
        out.display()
    ));
    Ok(store.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures;
    use crate::output::OutputFormat;
    use attrdef_store::StoreConfig;

    #[test]
    fn test_export_writes_strict_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixtures::write(dir.path(), "defs.json", fixtures::DEFINITIONS);
        let out = dir.path().join("out.json");
        let session = Session::new(
            StoreConfig::default().with_location(&path),
            OutputFormat::Table,
        );

        assert_eq!(export(&session, &out).unwrap(), 2);
        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(written["eppn"]["@class"], "DefaultAttributeDefinition");
        assert_eq!(written["mail"]["name"], "email");
    }

    #[test]
    fn test_merge_keeps_existing_definitions() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixtures::write(dir.path(), "defs.json", fixtures::DEFINITIONS);
        let other = fixtures::write(
            dir.path(),
            "other.json",
            r#"{
                mail: { "@class": "DefaultAttributeDefinition", key: "mail", name: "replaced" },
                cn: { "@class": "SamlIdPAttributeDefinition", key: "cn", friendlyName: "commonName" },
            }"#,
        );
        let out = dir.path().join("merged.json");
        let session = Session::new(
            StoreConfig::default().with_location(&path),
            OutputFormat::Table,
        );

        assert_eq!(merge(&session, &other, &out).unwrap(), 3);
        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(written["mail"]["name"], "email");
        assert_eq!(written["cn"]["@class"], "SamlIdPAttributeDefinition");
        assert_eq!(written["cn"]["friendlyName"], "commonName");
    }
}
