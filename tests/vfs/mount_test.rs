/*!
 * Mount Table Tests
 * Directory mounts, overlay order, and path resolution
 */

use std::fs;

use asset_vfs::vfs::{
    FileError, FileType, Located, MountError, MountKind, MountSource, ResolveError, VfsError,
    VirtualFilesystem,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use crate::common;

fn dir_with(files: &[(&str, &[u8])]) -> TempDir {
    let temp = TempDir::new().unwrap();
    for (name, content) in files {
        let path = temp.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
    temp
}

#[test]
fn test_directory_mount_reads_host_file() {
    let temp = dir_with(&[("a.txt", b"alpha"), ("sub/b.txt", b"beta")]);
    let mut vfs = VirtualFilesystem::new();
    vfs.mount(MountSource::Directory(temp.path()), "/data").unwrap();

    assert_eq!(vfs.read_all("/data/a.txt").unwrap(), b"alpha".to_vec());
    assert_eq!(vfs.read_all("/data/sub/b.txt").unwrap(), b"beta".to_vec());

    let resolved = vfs.resolve("/data/sub/b.txt").unwrap();
    assert_eq!(resolved.path, "/data/sub/b.txt");
    assert!(matches!(resolved.located(), Located::HostFile { size: 4, .. }));
}

#[test]
fn test_overlay_last_mount_wins() {
    let base = dir_with(&[("f.txt", b"base"), ("only_base.txt", b"1")]);
    let patch = dir_with(&[("f.txt", b"patched")]);

    let mut vfs = VirtualFilesystem::new();
    let first = vfs.mount(MountSource::Directory(base.path()), "/res").unwrap();
    let second = vfs.mount(MountSource::Directory(patch.path()), "/res").unwrap();

    assert_eq!(vfs.read_all("/res/f.txt").unwrap(), b"patched".to_vec());
    assert_eq!(vfs.resolve("/res/f.txt").unwrap().mount, second);
    // Falls through to the earlier mount when the later one lacks the path
    assert_eq!(vfs.resolve("/res/only_base.txt").unwrap().mount, first);

    vfs.unmount(second).unwrap();
    assert_eq!(vfs.read_all("/res/f.txt").unwrap(), b"base".to_vec());
}

#[test]
fn test_overlay_directory_and_archive() {
    let dir = dir_with(&[("f.txt", b"from directory")]);
    let archive = common::ZipBuilder::new()
        .deflated("f.txt", b"from archive")
        .build();

    let mut vfs = VirtualFilesystem::new();
    vfs.mount(MountSource::ArchiveBuffer(&archive), "/res").unwrap();
    vfs.mount(MountSource::Directory(dir.path()), "/res").unwrap();
    assert_eq!(vfs.read_all("/res/f.txt").unwrap(), b"from directory".to_vec());

    let mut reversed = VirtualFilesystem::new();
    reversed.mount(MountSource::Directory(dir.path()), "/res").unwrap();
    reversed.mount(MountSource::ArchiveBuffer(&archive), "/res").unwrap();
    assert_eq!(reversed.read_all("/res/f.txt").unwrap(), b"from archive".to_vec());
}

#[test]
fn test_mount_missing_directory_leaves_table_unchanged() {
    let temp = dir_with(&[("a.txt", b"a")]);
    let mut vfs = VirtualFilesystem::new();
    vfs.mount(MountSource::Directory(temp.path()), "/data").unwrap();
    let before = vfs.mounts();

    let missing = temp.path().join("does-not-exist");
    let result = vfs.mount(MountSource::Directory(&missing), "/other");
    assert!(matches!(result, Err(MountError::NotFound(_))));

    assert_eq!(vfs.mounts(), before);
    assert_eq!(vfs.read_all("/data/a.txt").unwrap(), b"a".to_vec());
}

#[test]
fn test_mount_path_rejects_missing_path() {
    let temp = TempDir::new().unwrap();
    let mut vfs = VirtualFilesystem::new();
    let result = vfs.mount_path(temp.path().join("nope"), "/x");
    assert!(matches!(result, Err(MountError::NotFound(_))));
    assert!(vfs.mounts().is_empty());
}

#[test]
fn test_paths_outside_prefixes_are_not_found() {
    let temp = dir_with(&[("a.txt", b"a")]);
    let mut vfs = VirtualFilesystem::new();
    vfs.mount(MountSource::Directory(temp.path()), "/data").unwrap();

    assert!(matches!(
        vfs.resolve("/elsewhere/a.txt"),
        Err(ResolveError::NotFound(_))
    ));
    assert!(matches!(
        vfs.resolve("/datab/a.txt"),
        Err(ResolveError::NotFound(_))
    ));
    assert!(matches!(
        vfs.read_all("/data/missing.txt"),
        Err(FileError::NotFound(_))
    ));
}

#[test]
fn test_paths_are_normalized_before_lookup() {
    let temp = dir_with(&[("a.txt", b"a")]);
    let mut vfs = VirtualFilesystem::new();
    vfs.mount(MountSource::Directory(temp.path()), "data/").unwrap();

    for path in [
        "/data/a.txt",
        "data/a.txt",
        "//data//a.txt",
        "/data/./a.txt",
        "/data/sub/../a.txt",
        "/other/../data/a.txt",
    ] {
        assert_eq!(vfs.resolve(path).unwrap().path, "/data/a.txt", "{}", path);
    }

    // Climbing above the root never reaches anything
    assert!(vfs.resolve("/../data/a.txt").is_err());
    assert!(vfs.resolve("/data/../../data/a.txt").is_err());
}

#[test]
fn test_root_mount_matches_every_path() {
    let temp = dir_with(&[("top.txt", b"t"), ("deep/er/x.txt", b"x")]);
    let mut vfs = VirtualFilesystem::new();
    vfs.mount(MountSource::Directory(temp.path()), "/").unwrap();

    assert!(vfs.exists("/top.txt"));
    assert!(vfs.exists("/deep/er/x.txt"));
    assert!(vfs.metadata("/").unwrap().is_dir());
    assert!(vfs.metadata("").unwrap().is_dir());
}

#[test]
fn test_list_dir_merges_mounts() {
    let base = dir_with(&[("a.txt", b"a"), ("shared.txt", b"old")]);
    let extra = dir_with(&[("b.txt", b"b"), ("shared.txt", b"new")]);

    let mut vfs = VirtualFilesystem::new();
    vfs.mount(MountSource::Directory(base.path()), "/res").unwrap();
    vfs.mount(MountSource::Directory(extra.path()), "/res").unwrap();
    vfs.mount(MountSource::Directory(extra.path()), "/res/nested/mount").unwrap();

    let names: Vec<_> = vfs
        .list_dir("/res")
        .unwrap()
        .into_iter()
        .map(|e| (e.name, e.file_type))
        .collect();
    assert_eq!(
        names,
        vec![
            ("a.txt".to_string(), FileType::File),
            ("b.txt".to_string(), FileType::File),
            ("nested".to_string(), FileType::Directory),
            ("shared.txt".to_string(), FileType::File),
        ]
    );

    assert!(vfs.list_dir("/missing").is_err());
}

#[test]
fn test_open_directory_is_an_error() {
    let temp = dir_with(&[("sub/x.txt", b"x")]);
    let mut vfs = VirtualFilesystem::new();
    vfs.mount(MountSource::Directory(temp.path()), "/data").unwrap();

    assert!(matches!(vfs.open("/data/sub"), Err(FileError::IsDirectory(_))));
}

#[test]
fn test_empty_file_read_all_is_empty_error() {
    let temp = dir_with(&[("empty.txt", b"")]);
    let mut vfs = VirtualFilesystem::new();
    vfs.mount(MountSource::Directory(temp.path()), "/data").unwrap();

    assert_eq!(vfs.metadata("/data/empty.txt").unwrap().size, 0);
    assert!(matches!(vfs.read_all("/data/empty.txt"), Err(FileError::Empty(_))));
}

#[test]
fn test_mount_info_reports_sources_in_order() {
    let temp = dir_with(&[("a.txt", b"a")]);
    let archive = common::ZipBuilder::new().stored("z.txt", b"z").build();

    let mut vfs = VirtualFilesystem::new();
    let dir_id = vfs.mount(MountSource::Directory(temp.path()), "/d").unwrap();
    let zip_id = vfs.mount_from_memory(&archive, "/z").unwrap();

    let mounts = vfs.mounts();
    assert_eq!(mounts.len(), 2);
    assert_eq!(mounts[0].id, dir_id);
    assert_eq!(mounts[0].kind, MountKind::Directory);
    assert_eq!(mounts[0].host_path.as_deref(), Some(temp.path()));
    assert_eq!(mounts[1].id, zip_id);
    assert_eq!(mounts[1].kind, MountKind::ArchiveBuffer);
    assert_eq!(mounts[1].virtual_prefix, "/z");
    assert!(mounts[0].mount_order < mounts[1].mount_order);

    vfs.unmount(dir_id).unwrap();
    assert!(!vfs.is_mounted(dir_id));
    assert!(matches!(vfs.unmount(dir_id), Err(ResolveError::NotFound(_))));
}

#[test]
fn test_with_mount_convenience() {
    let temp = dir_with(&[("hello.txt", b"hello")]);

    let vfs = VirtualFilesystem::with_mount(temp.path(), "/data").unwrap();
    assert_eq!(vfs.mounts().len(), 1);
    assert_eq!(vfs.read_all("/data/hello.txt").unwrap(), b"hello".to_vec());

    let missing = temp.path().join("nope");
    assert!(matches!(
        VirtualFilesystem::with_mount(&missing, "/data"),
        Err(VfsError::Mount(MountError::NotFound(_)))
    ));
}

#[test]
fn test_lookups_never_grow_string_pool() {
    let temp = dir_with(&[("dir/host.txt", b"host")]);
    let archive = common::ZipBuilder::new()
        .stored("packed/a.txt", b"a")
        .directory("empty/")
        .build();

    let mut vfs = VirtualFilesystem::new();
    vfs.mount_path(temp.path(), "/data").unwrap();
    vfs.mount_from_memory(&archive, "/data").unwrap();
    let before = vfs.pool().len();

    for path in [
        "/data/dir/host.txt",
        "/data/packed/a.txt",
        "/data/packed",
        "/data/never/seen.txt",
        "/elsewhere/x",
        "/data/./packed/../packed/missing.txt",
    ] {
        let _ = vfs.resolve(path);
        let _ = vfs.exists(path);
        let _ = vfs.metadata(path);
        let _ = vfs.list_dir(path);
        let _ = vfs.read_all(path);
    }

    assert_eq!(vfs.pool().len(), before);
}
