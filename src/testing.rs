//! In-memory fakes for the fetcher and filesystem capabilities.

use crate::fetch::{AssetFetcher, FetchError};
use crate::fs::FileSystem;
use reqwest::StatusCode;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io;
use std::path::{Path, PathBuf};

/// `http://` base URL of a local port nothing listens on.
pub fn closed_port_base() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind local port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{}", addr)
}

pub enum Reply {
    Body(Vec<u8>),
    Status(StatusCode),
}

/// Serves canned replies per URL and records every request.
#[derive(Default)]
pub struct ScriptedFetcher {
    replies: HashMap<String, Reply>,
    pub requests: RefCell<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, reply: Reply) -> Self {
        self.replies.insert(url.to_string(), reply);
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    fn reply(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.requests.borrow_mut().push(url.to_string());
        match self.replies.get(url) {
            Some(Reply::Body(body)) => Ok(body.clone()),
            Some(Reply::Status(status)) => Err(FetchError::Status(*status)),
            None => Err(FetchError::Status(StatusCode::NOT_FOUND)),
        }
    }
}

impl AssetFetcher for ScriptedFetcher {
    async fn fetch_json(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.reply(url)
    }

    async fn fetch_asset(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.reply(url)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemFile {
    pub contents: Vec<u8>,
    pub mode: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsOp {
    CreateDir,
    Remove,
    Write,
    Chmod,
    Rename,
}

/// Filesystem held in memory; `fail` makes one kind of operation error out.
#[derive(Default)]
pub struct MemoryFs {
    pub dirs: RefCell<BTreeSet<PathBuf>>,
    pub files: RefCell<BTreeMap<PathBuf, MemFile>>,
    pub ops: RefCell<Vec<(FsOp, PathBuf)>>,
    fail: Cell<Option<FsOp>>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(&self, op: FsOp) {
        self.fail.set(Some(op));
    }

    pub fn put_file(&self, path: &Path, contents: &[u8]) {
        if let Some(parent) = path.parent() {
            self.dirs.borrow_mut().insert(parent.to_path_buf());
        }
        self.files.borrow_mut().insert(
            path.to_path_buf(),
            MemFile {
                contents: contents.to_vec(),
                mode: 0o644,
            },
        );
    }

    pub fn file(&self, path: &Path) -> Option<MemFile> {
        self.files.borrow().get(path).cloned()
    }

    pub fn file_paths(&self) -> Vec<PathBuf> {
        self.files.borrow().keys().cloned().collect()
    }

    fn record(&self, op: FsOp, path: &Path) -> io::Result<()> {
        self.ops.borrow_mut().push((op, path.to_path_buf()));
        if self.fail.get() == Some(op) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "permission denied",
            ));
        }
        Ok(())
    }
}

impl FileSystem for MemoryFs {
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        self.record(FsOp::CreateDir, path)?;
        let files = self.files.borrow();
        for ancestor in path.ancestors() {
            if files.contains_key(ancestor) {
                return Err(io::Error::other(format!(
                    "{} is not a directory",
                    ancestor.display()
                )));
            }
        }
        let mut dirs = self.dirs.borrow_mut();
        for ancestor in path.ancestors() {
            dirs.insert(ancestor.to_path_buf());
        }
        Ok(())
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        self.record(FsOp::Remove, path)?;
        self.files
            .borrow_mut()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        self.record(FsOp::Write, path)?;
        let parent_exists = path
            .parent()
            .is_some_and(|parent| self.dirs.borrow().contains(parent));
        if !parent_exists {
            return Err(io::Error::from(io::ErrorKind::NotFound));
        }
        self.files.borrow_mut().insert(
            path.to_path_buf(),
            MemFile {
                contents: contents.to_vec(),
                mode: 0o644,
            },
        );
        Ok(())
    }

    fn set_executable(&self, path: &Path) -> io::Result<()> {
        self.record(FsOp::Chmod, path)?;
        let mut files = self.files.borrow_mut();
        let file = files
            .get_mut(path)
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))?;
        file.mode = 0o755;
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        self.record(FsOp::Rename, to)?;
        let mut files = self.files.borrow_mut();
        let file = files
            .remove(from)
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))?;
        files.insert(to.to_path_buf(), file);
        Ok(())
    }
}
