use dsweep::{Blocked, FileNode, NodeError, Size, SortDirection, WriteOutcome};
use std::{
    error::Error,
    fs,
    io::ErrorKind,
    path::Path,
};
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn Error>>;

fn child_names(node: &FileNode) -> Vec<String> {
    let mut names: Vec<String> = node
        .children()
        .unwrap_or_default()
        .iter()
        .map(|c| c.name().to_string())
        .collect();
    names.sort();
    names
}

fn write_bytes(path: &Path, len: usize) -> std::io::Result<()> {
    fs::write(path, vec![b'x'; len])
}

#[test]
fn missing_path_is_tolerated_at_construction() -> TestResult {
    let dir = TempDir::new()?;
    let node = FileNode::new(dir.path().join("report.final.pdf"))?;
    assert!(!node.is_dir());
    assert!(!node.exists());
    assert_eq!(node.name(), "report.final.pdf");
    assert_eq!(node.name_without_extension(), "report.final");
    assert!(node.created().is_none());
    assert!(node.path().is_some_and(Path::is_absolute));
    Ok(())
}

#[test]
fn directory_flag_comes_from_the_filesystem() -> TestResult {
    let dir = TempDir::new()?;
    fs::create_dir(dir.path().join("sub"))?;
    write_bytes(&dir.path().join("file"), 1)?;
    assert!(FileNode::new(dir.path().join("sub"))?.is_dir());
    assert!(!FileNode::new(dir.path().join("file"))?.is_dir());
    Ok(())
}

#[test]
fn scan_lists_every_entry_once() -> TestResult {
    let dir = TempDir::new()?;
    for name in ["a.txt", "b.txt", "c.bin"] {
        write_bytes(&dir.path().join(name), 1)?;
    }
    fs::create_dir(dir.path().join("d"))?;

    let mut root = FileNode::new(dir.path())?;
    assert!(!root.is_scanned());
    root.scan(false)?;
    assert_eq!(root.child_count(), 4);
    assert_eq!(child_names(&root), ["a.txt", "b.txt", "c.bin", "d"]);
    Ok(())
}

#[test]
fn empty_directory_is_scanned_empty_not_unscanned() -> TestResult {
    let dir = TempDir::new()?;
    let mut root = FileNode::new(dir.path())?;
    root.scan(true)?;
    assert!(root.is_scanned());
    assert_eq!(root.children().map(<[FileNode]>::len), Some(0));
    Ok(())
}

#[test]
fn scanning_a_file_is_noop() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("plain.txt");
    write_bytes(&path, 3)?;
    let mut node = FileNode::new(&path)?;
    node.scan(true)?;
    assert!(node.children().is_none());
    Ok(())
}

#[test]
fn recursion_controls_depth_of_scan() -> TestResult {
    let dir = TempDir::new()?;
    fs::create_dir_all(dir.path().join("one").join("two"))?;
    write_bytes(&dir.path().join("one").join("two").join("leaf"), 1)?;

    let mut shallow = FileNode::new(dir.path())?;
    shallow.scan(false)?;
    assert_eq!(shallow.descendant(&[0]).map(FileNode::is_scanned), Some(false));

    let mut deep = FileNode::new(dir.path())?;
    deep.scan(true)?;
    let leaf = deep.descendant(&[0, 0, 0]).map(FileNode::name);
    assert_eq!(leaf, Some("leaf"));
    Ok(())
}

#[test]
fn scan_of_vanished_directory_fails() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("gone");
    fs::create_dir(&path)?;
    let mut node = FileNode::new(&path)?;
    fs::remove_dir(&path)?;

    let err = node.scan(false).err();
    assert_eq!(err.and_then(|e| e.io_kind()), Some(ErrorKind::NotFound));
    assert!(!node.is_scanned());
    Ok(())
}

#[test]
fn best_effort_scan_counts_failures() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("gone");
    fs::create_dir(&path)?;
    let mut node = FileNode::new(&path)?;
    fs::remove_dir(&path)?;

    assert_eq!(node.scan_best_effort(), 1);
    assert_eq!(node.error_count(), 1);
    assert_eq!(node.size(), Size::Unknown);
    Ok(())
}

#[cfg(unix)]
#[test]
fn skipped_entry_makes_directory_size_partial() -> TestResult {
    let dir = TempDir::new()?;
    write_bytes(&dir.path().join("a"), 10)?;
    // a link to itself cannot be stat'ed, so the scan has to skip it
    std::os::unix::fs::symlink("loop", dir.path().join("loop"))?;

    let mut root = FileNode::new(dir.path())?;
    assert_eq!(root.scan_best_effort(), 1);
    assert_eq!(root.error_count(), 1);
    assert_eq!(root.child_count(), 1);
    assert_eq!(root.size(), Size::Partial(10));
    Ok(())
}

#[test]
fn search_skips_directories_that_cannot_be_listed() -> TestResult {
    let dir = TempDir::new()?;
    let vanished = dir.path().join("vanished");
    fs::create_dir(&vanished)?;
    fs::create_dir(dir.path().join("kept"))?;
    write_bytes(&dir.path().join("kept").join("target.txt"), 3)?;

    let mut root = FileNode::new(dir.path())?;
    root.scan(false)?;
    fs::remove_dir(&vanished)?;

    let trail = root.locate_best_effort("target.txt").ok_or("target.txt not found")?;
    let found = root.descendant(&trail).map(FileNode::name);
    assert_eq!(found, Some("target.txt"));
    Ok(())
}

#[test]
fn file_size_is_byte_length() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("data.bin");
    write_bytes(&path, 1234)?;
    let mut node = FileNode::new(&path)?;
    assert_eq!(node.size(), Size::Exact(1234));
    Ok(())
}

#[test]
fn missing_file_has_zero_size() -> TestResult {
    let dir = TempDir::new()?;
    let mut node = FileNode::new(dir.path().join("nothing"))?;
    assert_eq!(node.bytes(), 0);
    assert_eq!(node.size(), Size::Unknown);
    Ok(())
}

#[test]
fn directory_size_is_sum_of_children() -> TestResult {
    let dir = TempDir::new()?;
    write_bytes(&dir.path().join("ten"), 10)?;
    write_bytes(&dir.path().join("twenty"), 20)?;
    fs::create_dir(dir.path().join("nested"))?;
    write_bytes(&dir.path().join("nested").join("five"), 5)?;

    let mut root = FileNode::new(dir.path())?;
    assert_eq!(root.size(), Size::Exact(35));
    // the shallow scan triggered by sizing materialized the children
    assert_eq!(root.child_count(), 3);
    let child_sum: u64 = root
        .children()
        .unwrap_or_default()
        .iter()
        .filter_map(FileNode::cached_size)
        .map(Size::bytes)
        .sum();
    assert_eq!(child_sum, 35);
    Ok(())
}

#[test]
fn size_is_cached_for_node_lifetime() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("growing.log");
    write_bytes(&path, 5)?;
    let mut node = FileNode::new(&path)?;
    assert_eq!(node.bytes(), 5);

    write_bytes(&path, 500)?;
    assert_eq!(node.bytes(), 5);
    assert_eq!(FileNode::new(&path)?.bytes(), 500);
    Ok(())
}

#[test]
fn size_in_gb_is_bytes_over_binary_gigabyte() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("kb");
    write_bytes(&path, 1024)?;
    let mut node = FileNode::new(&path)?;
    assert_eq!(node.size_in_gb(), 1.0 / (1024.0 * 1024.0));
    Ok(())
}

#[test]
fn sort_by_size_on_real_tree() -> TestResult {
    let dir = TempDir::new()?;
    write_bytes(&dir.path().join("small"), 1)?;
    write_bytes(&dir.path().join("large"), 300)?;
    write_bytes(&dir.path().join("medium"), 20)?;

    let mut root = FileNode::new(dir.path())?;
    root.scan(false)?;
    root.sort_by_size(SortDirection::Ascending);
    let order: Vec<&str> = root.children().unwrap_or_default().iter().map(FileNode::name).collect();
    assert_eq!(order, ["small", "medium", "large"]);
    Ok(())
}

#[test]
fn find_reaches_deep_files() -> TestResult {
    let dir = TempDir::new()?;
    let deep = dir.path().join("a").join("b").join("c");
    fs::create_dir_all(&deep)?;
    write_bytes(&deep.join("needle.txt"), 7)?;
    write_bytes(&dir.path().join("hay.txt"), 1)?;

    let mut root = FileNode::new(dir.path())?;
    let found = root.find("needle.txt")?;
    assert_eq!(found.and_then(FileNode::path), Some(deep.join("needle.txt").as_path()));
    assert!(root.find("missing.txt")?.is_none());
    Ok(())
}

#[test]
fn find_on_a_file_is_none() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("alone.txt");
    write_bytes(&path, 1)?;
    let mut node = FileNode::new(&path)?;
    assert!(node.find("alone.txt")?.is_none());
    Ok(())
}

#[test]
fn write_append_truncate_round_trip() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("note.txt");
    let mut node = FileNode::new(&path)?;
    assert!(node.create_if_missing()?);

    assert_eq!(node.write_all("hello")?, WriteOutcome::Written);
    assert_eq!(node.read_all()?, Some("hello"));

    assert!(node.append("!")?.is_written());
    assert_eq!(node.read_all()?, Some("hello!"));

    assert_eq!(node.truncate()?, WriteOutcome::Written);
    assert_eq!(node.read_all()?, Some(""));
    assert_eq!(node.contents(), Some(""));
    Ok(())
}

#[test]
fn writes_to_missing_file_are_blocked() -> TestResult {
    let dir = TempDir::new()?;
    let node = FileNode::new(dir.path().join("absent.txt"))?;
    assert_eq!(node.write_all("x")?, WriteOutcome::Blocked(Blocked::Missing));
    assert_eq!(node.append("x")?, WriteOutcome::Blocked(Blocked::Missing));
    assert!(!node.exists());
    Ok(())
}

#[test]
fn writes_to_directory_are_blocked() -> TestResult {
    let dir = TempDir::new()?;
    let node = FileNode::new(dir.path())?;
    assert_eq!(node.write_all("x")?, WriteOutcome::Blocked(Blocked::IsDirectory));
    Ok(())
}

#[test]
fn writes_to_read_only_file_are_blocked() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("locked.txt");
    fs::write(&path, "keep")?;
    let mut permissions = fs::metadata(&path)?.permissions();
    permissions.set_readonly(true);
    fs::set_permissions(&path, permissions)?;

    let node = FileNode::new(&path)?;
    assert!(!node.is_writable());
    assert_eq!(node.write_all("lost")?, WriteOutcome::Blocked(Blocked::NotWritable));
    assert_eq!(fs::read_to_string(&path)?, "keep");
    Ok(())
}

#[cfg(unix)]
#[test]
fn overwrite_keeps_file_mode() -> TestResult {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new()?;
    let path = dir.path().join("script.sh");
    fs::write(&path, "old")?;
    fs::set_permissions(&path, fs::Permissions::from_mode(0o750))?;

    let node = FileNode::new(&path)?;
    assert!(node.write_all("new")?.is_written());
    assert_eq!(fs::metadata(&path)?.permissions().mode() & 0o777, 0o750);
    assert_eq!(fs::read_to_string(&path)?, "new");
    Ok(())
}

#[test]
fn read_all_skips_missing_and_directories() -> TestResult {
    let dir = TempDir::new()?;
    let mut missing = FileNode::new(dir.path().join("nope"))?;
    assert_eq!(missing.read_all()?, None);
    assert!(missing.contents().is_none());

    let mut folder = FileNode::new(dir.path())?;
    assert_eq!(folder.read_all()?, None);
    Ok(())
}

#[test]
fn read_all_rejects_invalid_utf8() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("binary.dat");
    fs::write(&path, [0xff, 0xfe, 0x00])?;
    let mut node = FileNode::new(&path)?;
    assert!(matches!(node.read_all(), Err(NodeError::InvalidUtf8 { .. })));
    assert!(node.contents().is_none());
    Ok(())
}

#[test]
fn create_if_missing_leaves_existing_files_alone() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("existing.txt");
    fs::write(&path, "data")?;
    let node = FileNode::new(&path)?;
    assert!(!node.create_if_missing()?);
    assert_eq!(fs::read_to_string(&path)?, "data");
    Ok(())
}

#[test]
fn delete_removes_file_but_not_tree_entry() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("trash.tmp");
    write_bytes(&path, 4)?;

    let mut root = FileNode::new(dir.path())?;
    root.scan(false)?;
    let trash = root.find("trash.tmp")?.ok_or("trash.tmp not found")?;
    trash.delete()?;

    assert!(!path.exists());
    assert_eq!(root.child_count(), 1);
    Ok(())
}

#[test]
fn delete_of_missing_path_is_an_error() -> TestResult {
    let dir = TempDir::new()?;
    let node = FileNode::new(dir.path().join("never-there"))?;
    let err = node.delete().err();
    assert_eq!(err.and_then(|e| e.io_kind()), Some(ErrorKind::NotFound));
    Ok(())
}

#[test]
fn non_empty_directory_needs_recursive_delete() -> TestResult {
    let dir = TempDir::new()?;
    let sub = dir.path().join("full");
    fs::create_dir(&sub)?;
    write_bytes(&sub.join("inside"), 2)?;

    let node = FileNode::new(&sub)?;
    assert!(node.delete().is_err());
    assert!(sub.exists());
    node.delete_recursive()?;
    assert!(!sub.exists());
    Ok(())
}
