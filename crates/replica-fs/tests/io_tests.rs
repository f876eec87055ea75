use assert_fs::prelude::*;
use predicates::prelude::*;
use replica_fs::{Fingerprint, RelativePath, io, list_files};
use rstest::rstest;

#[rstest]
#[case("a.txt")]
#[case("nested/b.txt")]
#[case("very/deeply/nested/c.txt")]
fn test_copy_with_metadata_reaches_any_depth(#[case] rel: &str) {
    let source = assert_fs::TempDir::new().unwrap();
    let replica = assert_fs::TempDir::new().unwrap();
    source.child(rel).write_str("content").unwrap();

    let path = RelativePath::new(rel);
    let target = path.under(replica.path());
    io::create_dirs_below(replica.path(), target.parent().unwrap()).unwrap();
    io::copy_with_metadata(&path.under(source.path()), &target).unwrap();

    replica.child(rel).assert("content");
}

#[test]
fn test_copy_overwrites_existing_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("src.txt").write_str("hello").unwrap();
    temp.child("dst.txt").write_str("world, longer content").unwrap();

    io::copy_with_metadata(
        temp.child("src.txt").path(),
        temp.child("dst.txt").path(),
    )
    .unwrap();

    temp.child("dst.txt").assert("hello");
}

#[test]
fn test_remove_file_deletes_only_the_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("dir/gone.txt").write_str("x").unwrap();

    io::remove_file(temp.child("dir/gone.txt").path()).unwrap();

    temp.child("dir/gone.txt").assert(predicate::path::missing());
    temp.child("dir").assert(predicate::path::is_dir());
}

#[test]
fn test_remove_missing_file_is_not_found() {
    let temp = assert_fs::TempDir::new().unwrap();
    let err = io::remove_file(temp.child("nothing").path()).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_listed_files_fingerprint_like_their_bytes() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("one.bin").write_binary(&[0, 1, 2, 3]).unwrap();
    temp.child("two/two.bin").write_binary(b"two").unwrap();

    let files = list_files(temp.path()).unwrap();
    assert_eq!(files.len(), 2);

    let one = Fingerprint::from_file(&files[0].under(temp.path())).unwrap();
    assert_eq!(one, Fingerprint::from_bytes(&[0, 1, 2, 3]));
}
