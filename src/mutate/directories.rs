use crate::model::Snapshot;

use super::*;

impl<C: ContentApi + ?Sized> Mutator<'_, C> {
    /// Delete every file under `path/` (as listed in `snapshot`), one call each, then the
    /// placeholder marker if there is one.
    pub fn delete_directory(&self, path: &str, snapshot: &Snapshot) -> TreeResult<BatchReport> {
        self.authorize()?;
        let dir = self.subtree.validate(path)?;
        self.delete_directory_validated(&dir, snapshot)
    }

    pub(super) fn delete_directory_validated(
        &self,
        dir: &str,
        snapshot: &Snapshot,
    ) -> TreeResult<BatchReport> {
        if !snapshot.is_directory(dir) {
            return Err(TreeError::NotFound(format!("directory {}", dir)));
        }

        let marker = format!("{}/{}", dir, MARKER);
        let files: Vec<String> = snapshot
            .files_under(dir)
            .into_iter()
            .map(|e| e.path.clone())
            .filter(|p| p != &marker)
            .collect();

        let mut report = BatchReport::default();
        for file in files {
            match self.delete_if_present(&file) {
                Ok(true) => report.completed.push(file),
                Ok(false) => {
                    tracing::warn!(path = %file, "already gone; skipping");
                    report.skipped.push(file);
                }
                Err(err) => return Err(interrupted(&file, report.completed, err)),
            }
        }

        // Directories holding real files usually never had a marker.
        match self.delete_if_present(&marker) {
            Ok(true) => report.completed.push(marker),
            Ok(false) => {}
            Err(err) => return Err(interrupted(&marker, report.completed, err)),
        }

        tracing::info!(
            path = dir,
            deleted = report.completed.len(),
            skipped = report.skipped.len(),
            "deleted directory"
        );
        Ok(report)
    }
}
