use crate::model::Snapshot;

use super::*;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BulkOutcome {
    /// The confirmation step said no; nothing was sent.
    Declined { items: usize },
    Completed(BatchReport),
}

impl<C: ContentApi + ?Sized> Mutator<'_, C> {
    /// Delete a selection of files and directories after `confirm(count)` agrees.
    ///
    /// Items run in sorted order and stop at the first hard failure; later items are never
    /// attempted. Items under a selected directory that was already processed are skipped.
    pub fn bulk_delete<'p>(
        &self,
        paths: impl IntoIterator<Item = &'p str>,
        snapshot: &Snapshot,
        confirm: impl FnOnce(usize) -> bool,
    ) -> TreeResult<BulkOutcome> {
        self.authorize()?;
        let mut items = paths
            .into_iter()
            .map(|p| self.subtree.validate(p))
            .collect::<TreeResult<Vec<_>>>()?;
        items.sort();
        items.dedup();

        if items.is_empty() {
            return Ok(BulkOutcome::Completed(BatchReport::default()));
        }
        if !confirm(items.len()) {
            tracing::info!(items = items.len(), "bulk delete declined");
            return Ok(BulkOutcome::Declined { items: items.len() });
        }

        let mut report = BatchReport::default();
        let mut done_dirs: Vec<String> = Vec::new();
        for item in items {
            if done_dirs
                .iter()
                .any(|d| item.strip_prefix(d.as_str()).is_some_and(|r| r.starts_with('/')))
            {
                report.skipped.push(item);
                continue;
            }

            if snapshot.is_directory(&item) {
                match self.delete_directory_validated(&item, snapshot) {
                    Ok(sub) => {
                        report.absorb(sub);
                        done_dirs.push(item);
                    }
                    Err(err) => return Err(interrupted(&item, report.completed, err)),
                }
            } else {
                match self.delete_file_validated(&item) {
                    Ok(()) => report.completed.push(item),
                    Err(err) => return Err(interrupted(&item, report.completed, err)),
                }
            }
        }
        Ok(BulkOutcome::Completed(report))
    }
}
