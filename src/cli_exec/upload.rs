use std::fs;
use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};

use super::*;

fn exclude_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for p in patterns {
        builder.add(Glob::new(p).with_context(|| format!("invalid glob: {}", p))?);
    }
    builder.build().context("build exclude set")
}

/// Files under `root` as `(relative path, bytes)`, sorted, skipping excluded paths and
/// anything below an excluded directory.
fn collect_files(root: &Path, excludes: &GlobSet) -> Result<Vec<(String, Vec<u8>)>> {
    fn walk(
        root: &Path,
        dir: &Path,
        excludes: &GlobSet,
        out: &mut Vec<(String, Vec<u8>)>,
    ) -> Result<()> {
        for entry in fs::read_dir(dir).with_context(|| format!("read dir {}", dir.display()))? {
            let entry = entry.context("read dir entry")?;
            let path = entry.path();
            let rel = path
                .strip_prefix(root)
                .unwrap_or(&path)
                .to_string_lossy()
                .replace('\\', "/");
            if excludes.is_match(&rel) {
                continue;
            }

            let ft = entry.file_type().context("read file type")?;
            if ft.is_dir() {
                walk(root, &path, excludes, out)?;
            } else if ft.is_file() {
                let bytes =
                    fs::read(&path).with_context(|| format!("read {}", path.display()))?;
                out.push((rel, bytes));
            }
        }
        Ok(())
    }

    let mut out = Vec::new();
    walk(root, root, excludes, &mut out)?;
    out.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(out)
}

pub(super) fn handle_put_command(
    ctx: &CliContext,
    local: &Path,
    remote: &str,
    exclude: &[String],
) -> Result<()> {
    let meta = fs::metadata(local).with_context(|| format!("stat {}", local.display()))?;
    let mut console = ctx.console()?;

    if meta.is_file() {
        let bytes = fs::read(local).with_context(|| format!("read {}", local.display()))?;
        let size = bytes.len();
        console
            .dispatch(Command::Mutate(Mutation::WriteFile {
                path: remote.to_string(),
                bytes,
            }))
            .with_context(|| format!("upload {}", remote))?;
        warn_stale_listing(&mut console);
        println!("Uploaded {} ({} bytes)", remote, size);
        return Ok(());
    }

    let excludes = exclude_set(exclude)?;
    let base = remote.trim_end_matches('/');
    let files: Vec<(String, Vec<u8>)> = collect_files(local, &excludes)?
        .into_iter()
        .map(|(rel, bytes)| (format!("{}/{}", base, rel), bytes))
        .collect();
    if files.is_empty() {
        anyhow::bail!("nothing to upload under {}", local.display());
    }

    let outcome = console
        .dispatch(Command::Mutate(Mutation::WriteFiles { files }))
        .with_context(|| format!("upload {} -> {}", local.display(), base))?;
    warn_stale_listing(&mut console);
    match outcome {
        Outcome::Batch(report) => print_report("uploaded", &report, false),
        other => anyhow::bail!("unexpected outcome {:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excluded_directories_are_not_walked() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("maps")).unwrap();
        fs::create_dir_all(dir.path().join("logs")).unwrap();
        fs::write(dir.path().join("maps/de_dust2.bsp"), b"bsp").unwrap();
        fs::write(dir.path().join("logs/today.log"), b"log").unwrap();
        fs::write(dir.path().join("server.cfg"), b"cfg").unwrap();

        let set = exclude_set(&["logs".to_string(), "*.cfg".to_string()]).unwrap();
        let files = collect_files(dir.path(), &set).unwrap();
        let names: Vec<&str> = files.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(names, vec!["maps/de_dust2.bsp"]);
    }
}
