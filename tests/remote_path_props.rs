// tests/remote_path_props.rs

use proptest::prelude::*;

use syncres::sync::remote::{join_remote, paths_overlap, strip_remote_base};

fn segment() -> impl Strategy<Value = String> {
    // Never starts with '.', so "." and ".." cannot occur.
    "[A-Za-z0-9_][A-Za-z0-9_. -]{0,11}"
}

fn relative_path() -> impl Strategy<Value = String> {
    prop::collection::vec(segment(), 1..6).prop_map(|segs| segs.join("/"))
}

fn base() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("/".to_string()),
        prop::collection::vec("[a-z0-9]{1,8}", 1..4).prop_map(|segs| format!("/{}", segs.join("/"))),
        prop::collection::vec("[a-z0-9]{1,8}", 1..4).prop_map(|segs| format!("/{}/", segs.join("/"))),
    ]
}

proptest! {
    #[test]
    fn strip_inverts_join(base in base(), rel in relative_path()) {
        let remote = join_remote(&base, &rel);
        prop_assert_eq!(strip_remote_base(&base, &remote), Some(rel.as_str()));
    }

    #[test]
    fn joined_path_is_absolute_and_clean(base in base(), rel in relative_path()) {
        let remote = join_remote(&base, &rel);
        prop_assert!(remote.starts_with('/'));
        prop_assert!(!remote.contains("//"));
        prop_assert!(!remote.ends_with('/'));
    }

    #[test]
    fn a_path_overlaps_its_parent_directory(base in base(), rel in relative_path(), leaf in segment()) {
        let dir = join_remote(&base, &rel);
        let child = join_remote(&dir, &leaf);
        prop_assert!(paths_overlap(&dir, &child));
        prop_assert!(paths_overlap(&child, &dir));
    }
}

#[test]
fn siblings_sharing_a_prefix_do_not_overlap() {
    assert!(!paths_overlap("/sdcard/app/assets", "/sdcard/app/assets2"));
    assert!(!paths_overlap("/sdcard/app/a.png", "/sdcard/app/a.png.meta"));
}
