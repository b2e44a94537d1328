//! Working-tree status via libgit2.
//!
//! Splits `git status` into unstaged modifications, staged changes and
//! untracked files. A path may appear in more than one set.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use git2::{ErrorCode, Repository, Status, StatusOptions};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StatusError {
    #[error("not a git repository: {}", .0.display())]
    NotARepository(PathBuf),
    #[error("git status query failed: {0}")]
    Git(#[from] git2::Error),
}

/// Snapshot of the working tree relative to HEAD.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepoStatus {
    pub modified: BTreeSet<String>,
    pub staged: BTreeSet<String>,
    pub untracked: BTreeSet<String>,
    pub last_commit_time: Option<DateTime<Utc>>,
}

impl RepoStatus {
    pub fn total_changes(&self) -> usize {
        self.modified.len() + self.staged.len() + self.untracked.len()
    }

    pub fn has_changes(&self) -> bool {
        self.total_changes() > 0
    }
}

/// Source of working-tree status for the reminder engine.
pub trait StatusProvider {
    fn status(&self) -> Result<RepoStatus, StatusError>;
}

const UNSTAGED: Status = Status::WT_MODIFIED
    .union(Status::WT_DELETED)
    .union(Status::WT_TYPECHANGE)
    .union(Status::WT_RENAMED);

const STAGED: Status = Status::INDEX_NEW
    .union(Status::INDEX_MODIFIED)
    .union(Status::INDEX_DELETED)
    .union(Status::INDEX_RENAMED)
    .union(Status::INDEX_TYPECHANGE);

/// Reads status from the git repository rooted at `workdir`.
pub struct GitStatusProvider {
    workdir: PathBuf,
    excluded: Option<PathBuf>,
}

impl GitStatusProvider {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            excluded: None,
        }
    }

    /// Leave out everything under `dir`, e.g. the hook's own log directory.
    /// Relative paths are taken from the working directory.
    pub fn excluding(mut self, dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let relative = dir.strip_prefix(&self.workdir).unwrap_or(dir);
        self.excluded = Some(relative.to_path_buf());
        self
    }

    fn open(&self) -> Result<Repository, StatusError> {
        Repository::open(&self.workdir).map_err(|e| match e.code() {
            ErrorCode::NotFound => StatusError::NotARepository(self.workdir.clone()),
            _ => StatusError::Git(e),
        })
    }
}

impl StatusProvider for GitStatusProvider {
    fn status(&self) -> Result<RepoStatus, StatusError> {
        let repo = self.open()?;
        let status = read_status(&repo, self.excluded.as_deref())?;
        debug!(
            "git status in {}: {} modified, {} staged, {} untracked",
            self.workdir.display(),
            status.modified.len(),
            status.staged.len(),
            status.untracked.len()
        );
        Ok(status)
    }
}

fn read_status(repo: &Repository, excluded: Option<&Path>) -> Result<RepoStatus, StatusError> {
    let mut opts = StatusOptions::new();
    opts.include_untracked(true)
        .recurse_untracked_dirs(true)
        .include_ignored(false)
        .exclude_submodules(true);

    let mut status = RepoStatus::default();
    for entry in repo.statuses(Some(&mut opts))?.iter() {
        let Some(path) = entry.path() else {
            continue;
        };
        if excluded.is_some_and(|dir| Path::new(path).starts_with(dir)) {
            continue;
        }
        let flags = entry.status();
        if flags.intersects(UNSTAGED) {
            status.modified.insert(path.to_string());
        }
        if flags.intersects(STAGED) {
            status.staged.insert(path.to_string());
        }
        if flags.contains(Status::WT_NEW) {
            status.untracked.insert(path.to_string());
        }
    }

    status.last_commit_time = last_commit_time(repo);
    Ok(status)
}

/// Commit time of HEAD; `None` on an unborn branch.
fn last_commit_time(repo: &Repository) -> Option<DateTime<Utc>> {
    let commit = repo.head().ok()?.peel_to_commit().ok()?;
    DateTime::from_timestamp(commit.time().seconds(), 0)
}

/// Convenience for callers that only need to know if `path` is inside a repo.
pub fn is_repository(path: &Path) -> bool {
    Repository::open(path).is_ok()
}

#[cfg(test)]
pub(crate) mod test_repo {
    use git2::{IndexAddOption, Repository, Signature};
    use std::path::Path;

    pub fn init(dir: &Path) -> Repository {
        Repository::init(dir).unwrap()
    }

    pub fn commit_all(repo: &Repository, message: &str) {
        let mut index = repo.index().unwrap();
        index
            .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
            .unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let sig = Signature::now("Test", "test@example.com").unwrap();
        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap();
    }

    pub fn stage(repo: &Repository, path: &str) {
        let mut index = repo.index().unwrap();
        index.add_path(Path::new(path)).unwrap();
        index.write().unwrap();
    }
}
