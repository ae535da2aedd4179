use super::*;

impl<C: ContentApi + ?Sized> Mutator<'_, C> {
    /// Create or update a file. An existing ref is passed through so the remote can reject a
    /// concurrent change.
    pub fn write_file(&self, path: &str, bytes: &[u8]) -> TreeResult<ContentRef> {
        self.authorize()?;
        let path = self.subtree.validate(path)?;
        self.write_validated(&path, bytes)
    }

    /// Write several files in order, one create-or-update each. Every path is validated before
    /// the first call; the first failure stops the batch.
    pub fn write_files(&self, files: &[(String, Vec<u8>)]) -> TreeResult<BatchReport> {
        self.authorize()?;
        let paths = files
            .iter()
            .map(|(p, _)| self.subtree.validate(p))
            .collect::<TreeResult<Vec<_>>>()?;

        let mut report = BatchReport::default();
        for (path, (_, bytes)) in paths.into_iter().zip(files) {
            match self.write_validated(&path, bytes) {
                Ok(_) => report.completed.push(path),
                Err(err) => return Err(interrupted(&path, report.completed, err)),
            }
        }
        Ok(report)
    }

    /// Directories cannot exist empty remotely; write the placeholder marker instead.
    pub fn create_directory(&self, path: &str) -> TreeResult<ContentRef> {
        self.authorize()?;
        let dir = self.subtree.validate(path)?;
        if is_marker(&dir) {
            return Err(TreeError::invalid_path(path, "directory name is reserved"));
        }
        self.write_validated(&format!("{}/{}", dir, MARKER), b"")
    }

    pub fn delete_file(&self, path: &str) -> TreeResult<()> {
        self.authorize()?;
        let path = self.subtree.validate(path)?;
        self.delete_file_validated(&path)
    }

    pub(super) fn write_validated(&self, path: &str, bytes: &[u8]) -> TreeResult<ContentRef> {
        let existing = self.metadata(path)?;
        let message = match existing {
            Some(_) => format!("Update {}", path),
            None => format!("Create {}", path),
        };
        let new_ref = self.put(path, bytes, existing.as_ref(), &message)?;
        tracing::info!(path, bytes = bytes.len(), updated = existing.is_some(), "wrote file");
        Ok(new_ref)
    }

    pub(super) fn delete_file_validated(&self, path: &str) -> TreeResult<()> {
        let Some(content_ref) = self.metadata(path)? else {
            return Err(TreeError::NotFound(path.to_string()));
        };
        self.remove(path, &content_ref, &format!("Delete {}", path))?;
        tracing::info!(path, "deleted file");
        Ok(())
    }

    /// Delete when the path still resolves; `Ok(false)` when it is already gone.
    pub(super) fn delete_if_present(&self, path: &str) -> TreeResult<bool> {
        match self.metadata(path)? {
            Some(content_ref) => {
                self.remove(path, &content_ref, &format!("Delete {}", path))?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
