//! Builds the content-addressed input root: an in-memory directory tree
//! accumulated from dependency paths, finalized into canonical `Directory`
//! messages whose digests feed CAS upload.

use std::collections::{BTreeMap, HashMap};
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use bytes::Bytes;
use prost::Message;
use recc_reapi::remote_execution as re;
use tracing::debug;
use walkdir::WalkDir;

use crate::config::Config;
use crate::digest::Digest;
use crate::errors::Result;
use crate::pathutil;

/// Blobs waiting for upload, keyed by digest. Content addressing makes this
/// map the dedup point: the same bytes can be inserted any number of times.
pub type BlobMap = HashMap<Digest, Bytes>;

/// A file (or symlink) read from the local filesystem, ready to become a
/// node in the input root. Symlinks are not followed; they carry their
/// target text instead of contents.
pub struct InputFile {
    contents: Bytes,
    digest: Digest,
    executable: bool,
    symlink_target: Option<String>,
}

impl InputFile {
    /// Reads a file with `lstat` semantics. Returns `None` for path types
    /// that can't be shipped (directories, fifos, sockets).
    pub fn from_path(path: &Path) -> Result<Option<InputFile>> {
        let metadata = std::fs::symlink_metadata(path)?;
        let file_type = metadata.file_type();

        if file_type.is_symlink() {
            let target = std::fs::read_link(path)?.to_string_lossy().into_owned();
            return Ok(Some(InputFile {
                digest: Digest::of_bytes(target.as_bytes()),
                contents: Bytes::from(target.clone()),
                executable: false,
                symlink_target: Some(target),
            }));
        }
        if file_type.is_file() {
            let contents = Bytes::from(std::fs::read(path)?);
            return Ok(Some(InputFile {
                digest: Digest::of_bytes(&contents),
                executable: metadata.permissions().mode() & 0o100 != 0,
                contents,
                symlink_target: None,
            }));
        }
        Ok(None)
    }

    pub fn digest(&self) -> &Digest {
        &self.digest
    }

    pub fn contents(&self) -> &Bytes {
        &self.contents
    }

    pub fn is_symlink(&self) -> bool {
        self.symlink_target.is_some()
    }

    fn file_node(&self, name: &str) -> re::FileNode {
        re::FileNode {
            name: name.to_string(),
            digest: Some(self.digest().into()),
            is_executable: self.executable,
        }
    }
}

/// A mutable directory tree keyed by path segment. Sibling order is free
/// while building; the `BTreeMap`s give the canonical lexicographic order
/// at serialization time.
#[derive(Default)]
pub struct NestedDirectory {
    files: BTreeMap<String, InputFile>,
    subdirs: BTreeMap<String, NestedDirectory>,
    symlinks: BTreeMap<String, String>,
}

impl NestedDirectory {
    /// Stores `file` at `relative_path`, creating intermediate directories.
    /// A bare `/` (or empty path) is not a valid input and is ignored.
    pub fn add(&mut self, file: InputFile, relative_path: &str) {
        if relative_path.is_empty() || relative_path == "/" {
            return;
        }
        match relative_path.split_once('/') {
            Some((parent, rest)) => {
                if parent.is_empty() {
                    self.add(file, rest);
                } else {
                    self.subdirs
                        .entry(parent.to_string())
                        .or_default()
                        .add(file, rest);
                }
            }
            None => match &file.symlink_target {
                Some(target) => {
                    self.symlinks
                        .insert(relative_path.to_string(), target.clone());
                }
                None => {
                    self.files.insert(relative_path.to_string(), file);
                }
            },
        }
    }

    /// Ensures an (possibly empty) directory exists at `path`.
    pub fn add_directory(&mut self, path: &str) {
        if path.is_empty() || path == "/" {
            return;
        }
        let path = path.strip_prefix('/').unwrap_or(path);
        match path.split_once('/') {
            Some((parent, rest)) => {
                if parent.is_empty() {
                    self.add_directory(rest);
                } else {
                    let subdir = self.subdirs.entry(parent.to_string()).or_default();
                    subdir.add_directory(rest);
                }
            }
            None => {
                self.subdirs.entry(path.to_string()).or_default();
            }
        }
    }

    /// Post-order serialization: every directory's canonical encoding is
    /// inserted into `blobs` under its digest, and the root digest is
    /// returned. File content blobs are collected separately by callers.
    pub fn to_digest(&self, blobs: &mut BlobMap) -> Digest {
        let mut directory = re::Directory::default();
        for (name, file) in &self.files {
            directory.files.push(file.file_node(name));
        }
        for (name, subdir) in &self.subdirs {
            let subdir_digest = subdir.to_digest(blobs);
            directory.directories.push(re::DirectoryNode {
                name: name.clone(),
                digest: Some((&subdir_digest).into()),
            });
        }
        for (name, target) in &self.symlinks {
            directory.symlinks.push(re::SymlinkNode {
                name: name.clone(),
                target: target.clone(),
            });
        }

        let encoded = Bytes::from(directory.encode_to_vec());
        let digest = Digest::of_bytes(&encoded);
        blobs.insert(digest.clone(), encoded);
        digest
    }
}

/// Ingests a whole directory tree from disk (the
/// `RECC_DEPS_DIRECTORY_OVERRIDE` path), storing file contents in
/// `file_contents` and returning the assembled tree. Paths are made
/// relative to the project root and passed through the prefix map, the same
/// rewriting applied to discovered dependencies.
pub fn make_nested_directory(
    root: &Path,
    config: &Config,
    file_contents: &mut BlobMap,
) -> Result<NestedDirectory> {
    let mut nested = NestedDirectory::default();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_dir() {
            continue;
        }
        let Some(file) = InputFile::from_path(entry.path())? else {
            debug!(path = %entry.path().display(), "skipping unsupported file");
            continue;
        };

        let local_path = entry.path().to_string_lossy();
        let mapped = pathutil::resolve_prefix_map(&local_path, &config.prefix_replacement);
        let relative =
            pathutil::make_relative(&mapped, &config.project_root, &config.project_root);
        let normalized = pathutil::normalize(&relative);

        if !file.is_symlink() {
            file_contents.insert(file.digest().clone(), file.contents().clone());
        }
        nested.add(file, &normalized);
    }
    Ok(nested)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    fn file(contents: &str) -> InputFile {
        let contents = Bytes::from(contents.to_string());
        InputFile {
            digest: Digest::of_bytes(&contents),
            contents,
            executable: false,
            symlink_target: None,
        }
    }

    fn symlink(target: &str) -> InputFile {
        InputFile {
            digest: Digest::of_bytes(target.as_bytes()),
            contents: Bytes::from(target.to_string()),
            executable: false,
            symlink_target: Some(target.to_string()),
        }
    }

    #[test]
    fn empty_directory_digest() {
        let mut blobs = BlobMap::new();
        let digest = NestedDirectory::default().to_digest(&mut blobs);
        assert_eq!(digest.hash(), EMPTY_SHA256);
        assert_eq!(digest.size_bytes(), 0);
        assert!(blobs.contains_key(&digest));
    }

    #[test]
    fn root_digest_is_insertion_order_independent() {
        let mut first = NestedDirectory::default();
        first.add(file("alpha"), "sub/a.h");
        first.add(file("beta"), "sub/b.h");
        first.add(file("main"), "main.c");

        let mut second = NestedDirectory::default();
        second.add(file("main"), "main.c");
        second.add(file("beta"), "sub/b.h");
        second.add(file("alpha"), "sub/a.h");

        let mut blobs_first = BlobMap::new();
        let mut blobs_second = BlobMap::new();
        assert_eq!(
            first.to_digest(&mut blobs_first),
            second.to_digest(&mut blobs_second)
        );
        // Root plus one subdirectory.
        assert_eq!(blobs_first.len(), 2);
    }

    #[test]
    fn different_contents_different_digest() {
        let mut a = NestedDirectory::default();
        a.add(file("one"), "x.c");
        let mut b = NestedDirectory::default();
        b.add(file("two"), "x.c");
        assert_ne!(
            a.to_digest(&mut BlobMap::new()),
            b.to_digest(&mut BlobMap::new())
        );
    }

    #[test]
    fn absolute_paths_are_rooted_at_input_root() {
        let mut a = NestedDirectory::default();
        a.add(file("data"), "/usr/include/x.h");
        let mut b = NestedDirectory::default();
        b.add(file("data"), "usr/include/x.h");
        assert_eq!(
            a.to_digest(&mut BlobMap::new()),
            b.to_digest(&mut BlobMap::new())
        );
    }

    #[test]
    fn symlinks_are_stored_by_target() {
        let mut dir = NestedDirectory::default();
        dir.add(symlink("../real/file.h"), "link.h");

        let mut blobs = BlobMap::new();
        let digest = dir.to_digest(&mut blobs);
        let encoded = blobs.get(&digest).unwrap();
        let decoded = re::Directory::decode(encoded.clone()).unwrap();
        assert!(decoded.files.is_empty());
        assert_eq!(decoded.symlinks.len(), 1);
        assert_eq!(decoded.symlinks[0].name, "link.h");
        assert_eq!(decoded.symlinks[0].target, "../real/file.h");
    }

    #[test]
    fn directory_nodes_are_sorted() {
        let mut dir = NestedDirectory::default();
        dir.add(file("1"), "zeta/x.h");
        dir.add(file("2"), "alpha/y.h");
        dir.add(file("3"), "b.c");
        dir.add(file("4"), "a.c");

        let mut blobs = BlobMap::new();
        let digest = dir.to_digest(&mut blobs);
        let decoded = re::Directory::decode(blobs.get(&digest).unwrap().clone()).unwrap();
        let file_names: Vec<_> = decoded.files.iter().map(|f| f.name.as_str()).collect();
        let dir_names: Vec<_> = decoded.directories.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(file_names, vec!["a.c", "b.c"]);
        assert_eq!(dir_names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn add_directory_creates_empty_nodes() {
        let mut dir = NestedDirectory::default();
        dir.add_directory("out/sub");

        let mut blobs = BlobMap::new();
        let digest = dir.to_digest(&mut blobs);
        let decoded = re::Directory::decode(blobs.get(&digest).unwrap().clone()).unwrap();
        assert_eq!(decoded.directories.len(), 1);
        assert_eq!(decoded.directories[0].name, "out");
        // out/, out/sub/, root
        assert_eq!(blobs.len(), 3);
    }

    #[test]
    fn input_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tool.sh");
        std::fs::write(&path, b"#!/bin/sh\n").unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();

        let file = InputFile::from_path(&path).unwrap().unwrap();
        assert!(file.executable);
        assert!(!file.is_symlink());
        assert_eq!(file.digest(), &Digest::of_bytes(b"#!/bin/sh\n"));

        let link = dir.path().join("link.sh");
        std::os::unix::fs::symlink("tool.sh", &link).unwrap();
        let file = InputFile::from_path(&link).unwrap().unwrap();
        assert!(file.is_symlink());
        assert_eq!(file.symlink_target.as_deref(), Some("tool.sh"));

        // Directories are unsupported as inputs.
        assert!(InputFile::from_path(dir.path()).unwrap().is_none());
    }

    #[test]
    fn ingests_directory_tree_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("top.h"), b"top").unwrap();
        std::fs::write(dir.path().join("sub/inner.h"), b"inner").unwrap();

        let config = Config {
            project_root: dir.path().to_string_lossy().into_owned(),
            ..Config::default()
        };

        let mut contents = BlobMap::new();
        let nested = make_nested_directory(dir.path(), &config, &mut contents).unwrap();
        let mut blobs = BlobMap::new();
        let digest = nested.to_digest(&mut blobs);

        // Both file contents captured.
        assert!(contents.contains_key(&Digest::of_bytes(b"top")));
        assert!(contents.contains_key(&Digest::of_bytes(b"inner")));

        // Tree shape: root with top.h and sub/inner.h.
        let decoded = re::Directory::decode(blobs.get(&digest).unwrap().clone()).unwrap();
        assert_eq!(decoded.files.len(), 1);
        assert_eq!(decoded.files[0].name, "top.h");
        assert_eq!(decoded.directories.len(), 1);
        assert_eq!(decoded.directories[0].name, "sub");
    }
}
