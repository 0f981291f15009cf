use crate::{
    error::{Blocked, NodeError, WriteOutcome},
    sort::SortDirection,
};
use std::{
    cell::OnceCell,
    cmp::Ordering,
    fs::{self, File, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
    time::UNIX_EPOCH,
};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Size of a node as far as it could be measured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Size {
    /// Measured without any failure in the subtree
    Exact(u64),
    /// Directory total that leaves out descendants which could not be measured
    Partial(u64),
    /// Nothing could be measured; counts as zero
    Unknown,
}

impl Size {
    pub fn bytes(self) -> u64 {
        match self {
            Size::Exact(bytes) | Size::Partial(bytes) => bytes,
            Size::Unknown => 0,
        }
    }

    pub fn is_exact(self) -> bool {
        matches!(self, Size::Exact(_))
    }
}

/// Represents a file or directory.
///
/// Children and size are filled in lazily and kept for the lifetime of the
/// node. The size cell is unsynchronized, so a tree must stay on one thread.
#[derive(Debug, Clone)]
pub struct FileNode {
    name: String,
    name_without_extension: String,
    path: Option<PathBuf>,
    is_dir: bool,
    created: Option<f64>,
    /// `None` until scanned; `Some(vec![])` for a scanned empty directory
    children: Option<Vec<FileNode>>,
    contents: Option<String>,
    size: OnceCell<Size>,
    error_count: usize,
}

impl FileNode {
    /// Build a node for `path`. The path does not have to exist.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, NodeError> {
        let raw = path.as_ref();
        if raw.as_os_str().is_empty() {
            return Ok(Self::detached(""));
        }
        let path = std::path::absolute(raw).unwrap_or_else(|_| raw.to_path_buf());

        let (is_dir, created) = match fs::metadata(&path) {
            Ok(meta) => (meta.is_dir(), creation_time(&meta)),
            Err(e) if is_missing(&e) => (false, None),
            Err(e) => return Err(NodeError::io(path, e)),
        };

        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());

        Ok(Self {
            name_without_extension: stem_of(&name),
            name,
            path: Some(path),
            is_dir,
            created,
            children: None,
            contents: None,
            size: OnceCell::new(),
            error_count: 0,
        })
    }

    /// A node with no filesystem path behind it
    pub fn detached(name: &str) -> Self {
        Self {
            name: name.to_string(),
            name_without_extension: stem_of(name),
            path: None,
            is_dir: false,
            created: None,
            children: None,
            contents: None,
            size: OnceCell::new(),
            error_count: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn name_without_extension(&self) -> &str {
        &self.name_without_extension
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    /// Creation time in seconds since the Unix epoch
    pub fn created(&self) -> Option<f64> {
        self.created
    }

    /// `None` if the node was never scanned
    pub fn children(&self) -> Option<&[FileNode]> {
        self.children.as_deref()
    }

    pub fn children_mut(&mut self) -> Option<&mut [FileNode]> {
        self.children.as_deref_mut()
    }

    pub fn is_scanned(&self) -> bool {
        self.children.is_some()
    }

    pub fn child_count(&self) -> usize {
        self.children.as_ref().map_or(0, Vec::len)
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }

    /// Entries skipped by the last best-effort scan of this subtree
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    fn dir_path(&self) -> Option<PathBuf> {
        if self.is_dir { self.path.clone() } else { None }
    }

    /// List the directory and replace the children with its entries.
    ///
    /// With `recurse`, every child directory is scanned before it is added.
    /// Any failure aborts the scan and leaves the previous children in place.
    pub fn scan(&mut self, recurse: bool) -> Result<(), NodeError> {
        let Some(path) = self.dir_path() else {
            return Ok(());
        };

        let entries = fs::read_dir(&path).map_err(|e| NodeError::io(&path, e))?;
        let mut children = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| NodeError::io(&path, e))?;
            let mut child = FileNode::new(entry.path())?;
            if recurse && child.is_dir {
                child.scan(true)?;
            }
            children.push(child);
        }

        debug!(path = %path.display(), entries = children.len(), recurse, "scanned directory");
        self.children = Some(children);
        Ok(())
    }

    /// Recursive scan that skips whatever cannot be read.
    ///
    /// Returns the number of skipped entries in the subtree.
    pub fn scan_best_effort(&mut self) -> usize {
        let Some(path) = self.dir_path() else {
            self.error_count = 0;
            return 0;
        };

        let entries = match fs::read_dir(&path) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not list directory");
                self.error_count = 1;
                return 1;
            }
        };

        let mut children = Vec::new();
        let mut errors = 0usize;
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "could not read directory entry");
                    errors += 1;
                    continue;
                }
            };
            match FileNode::new(entry.path()) {
                Ok(mut child) => {
                    errors += child.scan_best_effort();
                    children.push(child);
                }
                Err(e) => {
                    warn!(error = %e, "skipping entry");
                    errors += 1;
                }
            }
        }

        self.children = Some(children);
        self.error_count = errors;
        errors
    }

    /// Size of the node, computed on first access and cached afterwards.
    ///
    /// An unscanned directory is scanned one level deep first. Failures are
    /// never returned; they show up as `Size::Unknown` or `Size::Partial`.
    pub fn size(&mut self) -> Size {
        if let Some(size) = self.size.get() {
            return *size;
        }
        let size = self.measure();
        self.size.get_or_init(|| size);
        size
    }

    /// Best-effort byte count
    pub fn bytes(&mut self) -> u64 {
        self.size().bytes()
    }

    pub fn size_in_gb(&mut self) -> f64 {
        self.bytes() as f64 / BYTES_PER_GB
    }

    /// The memoized size, without computing it
    pub fn cached_size(&self) -> Option<Size> {
        self.size.get().copied()
    }

    fn measure(&mut self) -> Size {
        if !self.is_dir {
            let Some(path) = self.path.as_deref() else {
                return Size::Unknown;
            };
            return match fs::metadata(path) {
                Ok(meta) => Size::Exact(meta.len()),
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "size unavailable");
                    Size::Unknown
                }
            };
        }

        if self.children.is_none()
            && let Err(e) = self.scan(false)
        {
            debug!(error = %e, "directory size unavailable");
            return Size::Unknown;
        }
        let Some(children) = self.children.as_mut() else {
            return Size::Unknown;
        };

        let mut total = 0u64;
        // entries skipped by a best-effort scan are missing from the total
        let mut exact = self.error_count == 0;
        for child in children.iter_mut() {
            let size = child.size();
            total = total.saturating_add(size.bytes());
            exact &= size.is_exact();
        }
        if exact { Size::Exact(total) } else { Size::Partial(total) }
    }

    /// Reorder the direct children by creation time.
    ///
    /// Children without a timestamp go last in either direction and keep
    /// their relative order.
    pub fn sort_by_creation_time(&mut self, direction: SortDirection) {
        if let Some(children) = self.children.as_mut() {
            children.sort_by(|a, b| compare_created(a.created, b.created, direction));
        }
    }

    /// Reorder the direct children by size, measuring any that are not cached yet
    pub fn sort_by_size(&mut self, direction: SortDirection) {
        if let Some(children) = self.children.as_mut() {
            for child in children.iter_mut() {
                child.size();
            }
            children.sort_by(|a, b| direction.apply(a.cached_bytes().cmp(&b.cached_bytes())));
        }
    }

    pub fn sort_by_name(&mut self, direction: SortDirection) {
        if let Some(children) = self.children.as_mut() {
            children.sort_by(|a, b| {
                let ordering = a
                    .name
                    .to_lowercase()
                    .cmp(&b.name.to_lowercase())
                    .then_with(|| a.name.cmp(&b.name));
                direction.apply(ordering)
            });
        }
    }

    fn cached_bytes(&self) -> u64 {
        self.size.get().map_or(0, |size| size.bytes())
    }

    /// Depth-first search for a file named exactly `name`.
    ///
    /// Directories are descended into, never matched themselves. Unscanned
    /// directories on the way are scanned one level at a time.
    pub fn find(&mut self, name: &str) -> Result<Option<&FileNode>, NodeError> {
        let trail = self.locate(name)?;
        Ok(trail.and_then(|trail| self.descendant(&trail)))
    }

    /// Like `find`, but returns the child indices leading to the match
    pub fn locate(&mut self, name: &str) -> Result<Option<Vec<usize>>, NodeError> {
        if !self.is_dir {
            return Ok(None);
        }
        if self.children.is_none() {
            self.scan(false)?;
        }
        let Some(children) = self.children.as_mut() else {
            return Ok(None);
        };

        for (index, child) in children.iter_mut().enumerate() {
            if child.is_dir {
                if let Some(mut trail) = child.locate(name)? {
                    trail.insert(0, index);
                    return Ok(Some(trail));
                }
            } else if child.name == name {
                return Ok(Some(vec![index]));
            }
        }
        Ok(None)
    }

    /// Like `locate`, but directories that cannot be listed are skipped
    /// instead of aborting the search
    pub fn locate_best_effort(&mut self, name: &str) -> Option<Vec<usize>> {
        if !self.is_dir {
            return None;
        }
        if self.children.is_none()
            && let Err(e) = self.scan(false)
        {
            warn!(error = %e, "skipping unreadable directory in search");
            self.error_count = self.error_count.max(1);
            return None;
        }

        for (index, child) in self.children.as_mut()?.iter_mut().enumerate() {
            if child.is_dir {
                if let Some(mut trail) = child.locate_best_effort(name) {
                    trail.insert(0, index);
                    return Some(trail);
                }
            } else if child.name == name {
                return Some(vec![index]);
            }
        }
        None
    }

    pub fn descendant(&self, trail: &[usize]) -> Option<&FileNode> {
        trail
            .iter()
            .try_fold(self, |node, &index| node.children.as_ref()?.get(index))
    }

    pub fn descendant_mut(&mut self, trail: &[usize]) -> Option<&mut FileNode> {
        let mut node = self;
        for &index in trail {
            node = node.children.as_mut()?.get_mut(index)?;
        }
        Some(node)
    }

    /// Detach a child from the in-memory tree. The filesystem is not touched.
    pub fn remove_child(&mut self, index: usize) -> Option<FileNode> {
        let children = self.children.as_mut()?;
        (index < children.len()).then(|| children.remove(index))
    }

    pub fn exists(&self) -> bool {
        self.path.as_deref().is_some_and(Path::exists)
    }

    pub fn is_readable(&self) -> bool {
        self.path.as_deref().is_some_and(|path| File::open(path).is_ok())
    }

    pub fn is_writable(&self) -> bool {
        self.path
            .as_deref()
            .and_then(|path| fs::metadata(path).ok())
            .is_some_and(|meta| !meta.permissions().readonly())
    }

    /// Read the whole file as UTF-8 and keep it as the node's contents.
    ///
    /// Returns `Ok(None)` without touching the contents when the node is not
    /// an existing, readable file.
    pub fn read_all(&mut self) -> Result<Option<&str>, NodeError> {
        let Some(path) = self.path.as_deref() else {
            return Ok(None);
        };
        if self.is_dir || !self.exists() || !self.is_readable() {
            return Ok(None);
        }

        let bytes = fs::read(path).map_err(|e| NodeError::io(path, e))?;
        let text = String::from_utf8(bytes).map_err(|source| NodeError::InvalidUtf8 {
            path: path.to_path_buf(),
            source,
        })?;
        self.contents = Some(text);
        Ok(self.contents.as_deref())
    }

    fn writable_path(&self) -> Result<&Path, Blocked> {
        let path = self.path.as_deref().ok_or(Blocked::Detached)?;
        if self.is_dir || path.is_dir() {
            return Err(Blocked::IsDirectory);
        }
        if !path.exists() {
            return Err(Blocked::Missing);
        }
        if !self.is_writable() {
            return Err(Blocked::NotWritable);
        }
        Ok(path)
    }

    /// Replace the file's contents with `text`.
    ///
    /// The new contents go to a temporary file next to the target, which is
    /// then renamed over it.
    pub fn write_all(&self, text: &str) -> Result<WriteOutcome, NodeError> {
        let path = match self.writable_path() {
            Ok(path) => path,
            Err(blocked) => return Ok(WriteOutcome::Blocked(blocked)),
        };
        let io_err = |e: io::Error| NodeError::io(path, e);

        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let permissions = fs::metadata(path).map_err(io_err)?.permissions();
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| NodeError::io(dir, e))?;
        tmp.write_all(text.as_bytes()).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        fs::set_permissions(tmp.path(), permissions).map_err(io_err)?;
        tmp.persist(path).map_err(|e| io_err(e.error))?;

        debug!(path = %path.display(), bytes = text.len(), "wrote file");
        Ok(WriteOutcome::Written)
    }

    pub fn append(&self, text: &str) -> Result<WriteOutcome, NodeError> {
        let path = match self.writable_path() {
            Ok(path) => path,
            Err(blocked) => return Ok(WriteOutcome::Blocked(blocked)),
        };
        let io_err = |e: io::Error| NodeError::io(path, e);

        let mut file = OpenOptions::new().append(true).open(path).map_err(io_err)?;
        file.write_all(text.as_bytes()).map_err(io_err)?;
        file.flush().map_err(io_err)?;
        Ok(WriteOutcome::Written)
    }

    pub fn truncate(&self) -> Result<WriteOutcome, NodeError> {
        self.write_all("")
    }

    /// Create an empty file unless something already exists at the path.
    ///
    /// Returns whether a file was created.
    pub fn create_if_missing(&self) -> Result<bool, NodeError> {
        let path = self.path.as_deref().ok_or(NodeError::Detached)?;
        match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(_) => {
                debug!(path = %path.display(), "created empty file");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(NodeError::io(path, e)),
        }
    }

    /// Remove the file or empty directory at the path.
    ///
    /// A missing path is an error. The in-memory tree is left as it is.
    pub fn delete(&self) -> Result<(), NodeError> {
        self.remove(false)
    }

    /// Remove the path, including everything below it if it is a directory
    pub fn delete_recursive(&self) -> Result<(), NodeError> {
        self.remove(true)
    }

    fn remove(&self, recursive: bool) -> Result<(), NodeError> {
        let path = self.path.as_deref().ok_or(NodeError::Detached)?;
        let io_err = |e: io::Error| NodeError::io(path, e);

        // symlinks are removed as links, never followed
        let meta = fs::symlink_metadata(path).map_err(io_err)?;
        if !meta.is_dir() {
            fs::remove_file(path).map_err(io_err)?;
        } else if recursive {
            fs::remove_dir_all(path).map_err(io_err)?;
        } else {
            fs::remove_dir(path).map_err(io_err)?;
        }

        info!(path = %path.display(), recursive, "deleted");
        Ok(())
    }
}

fn is_missing(e: &io::Error) -> bool {
    matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory)
}

fn creation_time(meta: &fs::Metadata) -> Option<f64> {
    meta.created()
        .ok()
        .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
        .map(|age| age.as_secs_f64())
}

fn stem_of(name: &str) -> String {
    Path::new(name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string())
}

fn compare_created(a: Option<f64>, b: Option<f64>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => direction.apply(a.total_cmp(&b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
