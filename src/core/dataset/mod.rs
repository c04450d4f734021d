//! # Dataset Module
//!
//! Resolves pair references to image files in an LFW directory tree.
//!
//! Images live at `<root>/<identity>/<identity>_<index:04>.jpg`. Every image
//! is embedded once even when several pairs reference it, so the set of
//! paths is deduplicated before inference.

use crate::core::pairs::{ImageRef, PairList};
use crate::error::DatasetError;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Maps image references to paths under a dataset root
#[derive(Debug, Clone)]
pub struct DatasetLayout {
    root: PathBuf,
}

impl DatasetLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a referenced image
    pub fn resolve(&self, image: &ImageRef) -> PathBuf {
        self.root.join(&image.identity).join(image.file_name())
    }
}

/// The deduplicated set of images referenced by a pair list
#[derive(Debug, Clone, Default)]
pub struct ImageSet {
    paths: BTreeSet<PathBuf>,
}

impl ImageSet {
    /// Collect both images of every pair
    pub fn from_pairs(layout: &DatasetLayout, pairs: &PairList) -> Self {
        let paths = pairs
            .iter()
            .flat_map(|pair| [layout.resolve(&pair.first), layout.resolve(&pair.second)])
            .collect();

        Self { paths }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    /// Paths in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.paths.iter()
    }

    /// Check that the root exists and every referenced image is a file
    pub fn verify(&self, layout: &DatasetLayout) -> Result<(), DatasetError> {
        if !layout.root().is_dir() {
            return Err(DatasetError::RootNotFound {
                path: layout.root().to_path_buf(),
            });
        }

        if self.paths.is_empty() {
            return Err(DatasetError::NoImages);
        }

        if let Some(missing) = self.paths.iter().find(|p| !p.is_file()) {
            return Err(DatasetError::ImageNotFound {
                path: missing.clone(),
            });
        }

        tracing::debug!(images = self.paths.len(), "All referenced images present");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pairs::parse_pairs;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn sample_pairs() -> PairList {
        parse_pairs(Cursor::new(
            "2\nAbel_Pacheco\t1\t4\nAbel_Pacheco\t1\t2\nAbel_Pacheco\t1\tDean_Barker\t1\nAbel_Pacheco\t4\tDean_Barker\t2\n",
        ))
        .unwrap()
    }

    #[test]
    fn resolve_builds_identity_path() {
        let layout = DatasetLayout::new("lfw-deepfunneled");
        let path = layout.resolve(&ImageRef::new("Abel_Pacheco", 4));

        assert_eq!(
            path,
            Path::new("lfw-deepfunneled")
                .join("Abel_Pacheco")
                .join("Abel_Pacheco_0004.jpg")
        );
    }

    #[test]
    fn image_set_deduplicates() {
        let layout = DatasetLayout::new("/lfw");
        let set = ImageSet::from_pairs(&layout, &sample_pairs());

        // Abel_Pacheco 1, 2, 4 and Dean_Barker 1, 2
        assert_eq!(set.len(), 5);
        assert!(set.contains(&layout.resolve(&ImageRef::new("Dean_Barker", 2))));
    }

    #[test]
    fn verify_reports_missing_image() {
        let temp = TempDir::new().unwrap();
        let layout = DatasetLayout::new(temp.path());
        let set = ImageSet::from_pairs(&layout, &sample_pairs());

        let result = set.verify(&layout);
        assert!(matches!(result, Err(DatasetError::ImageNotFound { .. })));
    }

    #[test]
    fn verify_reports_missing_root() {
        let layout = DatasetLayout::new("/nonexistent/lfw-deepfunneled");
        let set = ImageSet::from_pairs(&layout, &sample_pairs());

        let result = set.verify(&layout);
        assert!(matches!(result, Err(DatasetError::RootNotFound { .. })));
    }

    #[test]
    fn verify_passes_when_all_present() {
        let temp = TempDir::new().unwrap();
        let layout = DatasetLayout::new(temp.path());
        let set = ImageSet::from_pairs(&layout, &sample_pairs());

        for path in set.iter() {
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, b"jpeg").unwrap();
        }

        assert!(set.verify(&layout).is_ok());
    }
}
