use crate::model::Snapshot;
use crate::subtree::rebase;

use super::*;

impl<C: ContentApi + ?Sized> Mutator<'_, C> {
    /// Move a file, or every file under a directory, by copy-then-delete.
    ///
    /// `from` is a directory when it ends with `/` or the snapshot classifies it as one.
    /// Markers stay where they are. A failure can leave both source and destination present.
    pub fn rename(&self, from: &str, to: &str, snapshot: &Snapshot) -> TreeResult<BatchReport> {
        self.authorize()?;
        let src = self.subtree.validate(from)?;
        let dst = self.subtree.validate(to)?;
        if src == dst {
            return Err(TreeError::invalid_path(to, "destination equals source"));
        }
        if dst
            .strip_prefix(src.as_str())
            .is_some_and(|rest| rest.starts_with('/'))
        {
            return Err(TreeError::invalid_path(to, "destination is inside source"));
        }

        let mut report = BatchReport::default();
        if !(from.ends_with('/') || snapshot.is_directory(&src)) {
            self.move_file_validated(&src, &dst)?;
            report.completed.push(src);
            return Ok(report);
        }

        let moves: Vec<(String, String)> = snapshot
            .files_under(&src)
            .into_iter()
            .filter_map(|e| rebase(&e.path, &src, &dst).map(|d| (e.path.clone(), d)))
            .collect();
        if moves.is_empty() {
            return Err(TreeError::NotFound(format!("directory {}", src)));
        }

        for (file_from, file_to) in moves {
            if is_marker(&file_from) {
                report.skipped.push(file_from);
                continue;
            }
            match self.move_file_validated(&file_from, &file_to) {
                Ok(()) => report.completed.push(file_from),
                Err(err) => return Err(interrupted(&file_from, report.completed, err)),
            }
        }
        tracing::info!(
            from = %src,
            to = %dst,
            moved = report.completed.len(),
            "moved directory"
        );
        Ok(report)
    }

    fn move_file_validated(&self, from: &str, to: &str) -> TreeResult<()> {
        let Some(src_ref) = self.metadata(from)? else {
            return Err(TreeError::NotFound(from.to_string()));
        };
        let bytes = self.blob(&src_ref)?;

        let existing = self.metadata(to)?;
        self.put(
            to,
            &bytes,
            existing.as_ref(),
            &format!("Move {} to {}", from, to),
        )?;
        self.remove(from, &src_ref, &format!("Remove {} after move to {}", from, to))?;
        tracing::info!(from, to, "moved file");
        Ok(())
    }
}
