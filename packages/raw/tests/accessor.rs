use std::collections::BTreeSet;

use attrfs_raw::{Accessor, AttributeStore, Config, Error, NamePolicy, Target};
use tempfile::NamedTempFile;

/// Linux only lets unprivileged processes use the `user.` namespace.
fn attr(name: &str) -> String {
    if cfg!(any(target_os = "linux", target_os = "android")) {
        format!("user.{}", name)
    } else {
        name.to_string()
    }
}

/// A scratch file on a filesystem that supports user attributes.
///
/// Returns `None` (and the test is skipped) when the filesystem refuses.
fn scratch() -> Option<(NamedTempFile, Target)> {
    let file = NamedTempFile::new_in(env!("CARGO_TARGET_TMPDIR")).unwrap();
    let target = Target::from(file.path());
    let probe = attr("attrfs.probe");
    match attrfs_raw::write(&target, &probe, b"") {
        Ok(()) => {
            attrfs_raw::remove(&target, &probe).unwrap();
            Some((file, target))
        }
        Err(err) => {
            eprintln!("skipping: extended attributes unsupported here ({})", err);
            None
        }
    }
}

fn our_names(names: Vec<String>) -> BTreeSet<String> {
    let prefix = attr("");
    names
        .into_iter()
        .filter(|name| name.starts_with(&prefix))
        .collect()
}

#[test]
fn data_attribute_lifecycle() {
    let Some((_file, target)) = scratch() else {
        return;
    };
    let name = attr("DataAttrib");

    attrfs_raw::write(&target, &name, &[0xFF, 0x20]).unwrap();
    assert!(attrfs_raw::exists(&target, &name));
    assert_eq!(attrfs_raw::read(&target, &name).unwrap(), vec![0xFF, 0x20]);

    attrfs_raw::remove(&target, &name).unwrap();
    assert!(!attrfs_raw::exists(&target, &name));
    assert!(matches!(
        attrfs_raw::read(&target, &name),
        Err(Error::NotFound { .. })
    ));
}

#[test]
fn missing_attribute_is_not_found() {
    let Some((_file, target)) = scratch() else {
        return;
    };
    let name = attr("NeverWritten");

    assert!(!attrfs_raw::exists(&target, &name));
    assert!(attrfs_raw::read(&target, &name).unwrap_err().is_not_found());
    assert!(attrfs_raw::remove(&target, &name).unwrap_err().is_not_found());
}

#[test]
fn empty_value_round_trips() {
    let Some((_file, target)) = scratch() else {
        return;
    };
    let name = attr("Empty");

    attrfs_raw::write(&target, &name, b"").unwrap();
    assert_eq!(attrfs_raw::read(&target, &name).unwrap(), Vec::<u8>::new());
    // A zero-length value is present but reports as not existing.
    assert!(!attrfs_raw::exists(&target, &name));
    assert!(attrfs_raw::list(&target).unwrap().contains(&name));
}

#[test]
fn write_replaces_existing_value() {
    let Some((_file, target)) = scratch() else {
        return;
    };
    let name = attr("Replaced");

    attrfs_raw::write(&target, &name, b"a much longer first value").unwrap();
    attrfs_raw::write(&target, &name, b"short").unwrap();
    assert_eq!(attrfs_raw::read(&target, &name).unwrap(), b"short");
}

#[test]
fn large_value_round_trips() {
    let Some((_file, target)) = scratch() else {
        return;
    };
    let name = attr("Large");
    let value: Vec<u8> = (0..2048u32).map(|i| (i % 251) as u8).collect();

    attrfs_raw::write(&target, &name, &value).unwrap();
    assert_eq!(attrfs_raw::read(&target, &name).unwrap(), value);
}

#[test]
fn list_returns_every_written_name() {
    let Some((_file, target)) = scratch() else {
        return;
    };
    let expected: BTreeSet<String> = ["Alpha", "Beta", "Gamma", "Delta"]
        .iter()
        .map(|n| attr(n))
        .collect();

    for name in &expected {
        attrfs_raw::write(&target, name, name.as_bytes()).unwrap();
    }

    assert_eq!(our_names(attrfs_raw::list(&target).unwrap()), expected);

    let raw: BTreeSet<String> = Accessor::new()
        .list_raw(&target)
        .unwrap()
        .into_iter()
        .map(|name| String::from_utf8(name).unwrap())
        .collect();
    assert!(raw.is_superset(&expected));
}

#[test]
fn list_of_bare_file_has_none_of_ours() {
    let Some((_file, target)) = scratch() else {
        return;
    };
    assert!(our_names(attrfs_raw::list(&target).unwrap()).is_empty());
}

#[test]
fn file_url_targets_reach_the_same_file() {
    let Some((file, target)) = scratch() else {
        return;
    };
    let url = url::Url::from_file_path(file.path()).unwrap();
    let by_url = Target::parse(url.as_str());
    let name = attr("ViaUrl");

    attrfs_raw::write(&by_url, &name, b"url").unwrap();
    assert_eq!(attrfs_raw::read(&target, &name).unwrap(), b"url");
}

#[test]
fn missing_file_is_an_os_error() {
    let dir = tempfile::tempdir().unwrap();
    let target = Target::from(dir.path().join("does-not-exist"));

    let err = attrfs_raw::read(&target, &attr("Anything")).unwrap_err();
    assert_eq!(err.code(), Some(libc::ENOENT));
    assert!(attrfs_raw::list(&target).is_err());
    assert!(!attrfs_raw::exists(&target, &attr("Anything")));
}

#[test]
fn configured_accessor_behaves_the_same_on_stable_values() {
    let Some((_file, target)) = scratch() else {
        return;
    };
    let accessor = Accessor::with_config(Config {
        retry_on_resize: false,
        non_utf8_names: NamePolicy::Lossy,
    });
    let name = attr("Configured");

    accessor.write(&target, &name, b"value").unwrap();
    assert_eq!(accessor.read(&target, &name).unwrap(), b"value");
    assert!(accessor.list(&target).unwrap().contains(&name));
}

/// Names the safe API cannot write are set through libc directly.
#[cfg(any(target_os = "linux", target_os = "android"))]
#[test]
fn non_utf8_names_follow_the_name_policy() {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let Some((file, target)) = scratch() else {
        return;
    };
    let raw_name = b"user.attrfs\xff".to_vec();
    let path = CString::new(file.path().as_os_str().as_bytes()).unwrap();
    let c_name = CString::new(raw_name.clone()).unwrap();
    let value = [1u8];

    let rc = unsafe {
        libc::setxattr(
            path.as_ptr(),
            c_name.as_ptr(),
            value.as_ptr().cast(),
            value.len(),
            0,
        )
    };
    if rc != 0 {
        eprintln!(
            "skipping: non-UTF-8 name refused ({})",
            std::io::Error::last_os_error()
        );
        return;
    }
    attrfs_raw::write(&target, &attr("Plain"), b"x").unwrap();

    let accessor = Accessor::new();
    assert!(accessor.list_raw(&target).unwrap().contains(&raw_name));

    let dropped = our_names(accessor.list(&target).unwrap());
    assert_eq!(dropped, BTreeSet::from([attr("Plain")]));

    let lossy = Accessor::with_config(Config {
        non_utf8_names: NamePolicy::Lossy,
        ..Config::default()
    });
    let listed = our_names(lossy.list(&target).unwrap());
    assert_eq!(
        listed,
        BTreeSet::from([attr("Plain"), "user.attrfs\u{fffd}".to_string()])
    );
}
