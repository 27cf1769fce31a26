//! Named-formula persistence.
//!
//! A catalog is a flat `name -> source text` mapping stored as one JSON
//! object on disk. Source texts are opaque here: compilation (and therefore
//! validation) happens at the caller, through the usual compile path.

crate::prelude!();

use std::path::{Path, PathBuf};

/// Flat name-to-source store backed by a JSON file.
///
/// A missing file is an empty catalog; saving rewrites the whole file. The
/// catalog holds no open handle, each operation reads or writes the file.
#[derive(Debug, Clone)]
pub struct Catalog {
    /// Path of the backing JSON file.
    path: PathBuf,
}
impl Catalog {
    /// Constructor, does not touch the filesystem.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing JSON file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole mapping, empty if the file does not exist.
    fn read(&self) -> Res<Map<String, String>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let contents = std::fs::read_to_string(&self.path)?;
        let map = serde_json::from_str(&contents)?;
        Ok(map)
    }

    /// Loads the source text saved under `name`.
    pub fn load(&self, name: &str) -> Res<Option<String>> {
        let mut map = self.read()?;
        let res = map.remove(name);
        tracing::debug!(
            "load `{}` from {}: {}",
            name,
            self.path.display(),
            if res.is_some() { "found" } else { "not found" },
        );
        Ok(res)
    }

    /// Saves `src` under `name`, overwriting any previous entry.
    pub fn save(&self, name: &str, src: &str) -> Res<()> {
        let mut map = self.read()?;
        map.insert(name.to_string(), src.to_string());
        let json = serde_json::to_string_pretty(&map)?;
        std::fs::write(&self.path, json)?;
        tracing::debug!("saved `{}` to {}", name, self.path.display());
        Ok(())
    }

    /// Names present in the catalog, sorted.
    pub fn names(&self) -> Res<Vec<String>> {
        Ok(self.read()?.into_keys().collect())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    /// Builds a catalog over a fresh temp file.
    fn scratch(name: &str) -> Catalog {
        let mut path = std::env::temp_dir();
        path.push(format!("indukt_catalog_{}_{}.json", name, std::process::id()));
        let _ = std::fs::remove_file(&path);
        Catalog::new(path)
    }

    #[test]
    fn missing_file_is_empty() {
        let catalog = scratch("empty");
        assert_eq!(catalog.load("anything").unwrap(), None);
        assert!(catalog.names().unwrap().is_empty());
    }

    #[test]
    fn round_trip() {
        let catalog = scratch("round_trip");
        catalog.save("gauss_base", "n * (n + 1) / 2").unwrap();
        catalog.save("gauss_induction", "n * (n + 1) / 2").unwrap();

        assert_eq!(
            catalog.load("gauss_base").unwrap().as_deref(),
            Some("n * (n + 1) / 2"),
        );
        assert_eq!(catalog.load("nope").unwrap(), None);
        assert_eq!(
            catalog.names().unwrap(),
            vec!["gauss_base".to_string(), "gauss_induction".to_string()],
        );

        // Overwrites are in place.
        catalog.save("gauss_base", "n").unwrap();
        assert_eq!(catalog.load("gauss_base").unwrap().as_deref(), Some("n"));
        assert_eq!(catalog.names().unwrap().len(), 2);

        let _ = std::fs::remove_file(catalog.path());
    }
}
