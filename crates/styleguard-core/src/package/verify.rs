use crate::error::{Result, StyleguardError};
use crate::hash::sha256_hash_bytes;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use zip::ZipArchive;

/// SHA-256 of every file entry's decompressed content, keyed by part name.
pub fn part_digests(path: &Path) -> Result<BTreeMap<String, String>> {
    let file = File::open(path).map_err(|e| StyleguardError::io(path, e))?;
    let mut archive = ZipArchive::new(BufReader::new(file))?;
    let mut digests = BTreeMap::new();

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.is_dir() {
            continue;
        }
        let name = entry.name().to_string();
        let mut content = Vec::new();
        entry
            .read_to_end(&mut content)
            .map_err(|e| StyleguardError::package(format!("cannot read '{}': {}", name, e)))?;
        digests.insert(name, sha256_hash_bytes(&content));
    }

    Ok(digests)
}

/// Check that each part in `untouched` has the same digest in `rewritten` as
/// it had in `original`.
pub fn verify_passthrough<'a>(
    original: &BTreeMap<String, String>,
    rewritten: &Path,
    untouched: impl IntoIterator<Item = &'a String>,
) -> Result<()> {
    let after = part_digests(rewritten)?;

    for name in untouched {
        match (original.get(name), after.get(name)) {
            (Some(before), Some(now)) if before == now => {}
            (_, None) => {
                return Err(StyleguardError::package(format!(
                    "part '{}' is missing from the rewritten package",
                    name
                )))
            }
            _ => {
                return Err(StyleguardError::package(format!(
                    "part '{}' changed although it was passed through",
                    name
                )))
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::OoxmlPackage;

    fn save(path: &Path, parts: &[(&str, &[u8])]) {
        let mut pkg = OoxmlPackage::new();
        for (name, bytes) in parts {
            pkg.set_part(name, bytes.to_vec());
        }
        std::fs::write(path, pkg.save().unwrap()).unwrap();
    }

    #[test]
    fn identical_parts_verify() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.docx");
        let b = dir.path().join("b.docx");
        save(&a, &[("x.xml", b"<x/>"), ("y.xml", b"<y/>")]);
        save(&b, &[("x.xml", b"<x/>"), ("y.xml", b"<changed/>")]);

        let original = part_digests(&a).unwrap();
        let untouched = vec!["x.xml".to_string()];
        assert!(verify_passthrough(&original, &b, &untouched).is_ok());
    }

    #[test]
    fn changed_part_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.docx");
        let b = dir.path().join("b.docx");
        save(&a, &[("x.xml", b"<x/>")]);
        save(&b, &[("x.xml", b"<x2/>")]);

        let original = part_digests(&a).unwrap();
        let untouched = vec!["x.xml".to_string()];
        let err = verify_passthrough(&original, &b, &untouched).unwrap_err();
        assert!(err.to_string().contains("x.xml"));
    }
}
