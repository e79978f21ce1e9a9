//! Pure merging of bucket ACL lists.
//!
//! The appliance replaces the whole ACL array on every update, so each
//! mutation computes the complete new list locally and sends it back.

use crate::types::{AclEntry, AclPermission};

/// Returns `entries` with `grantee` holding exactly `permission`.
///
/// The first entry for `grantee` is replaced in place; if there is none, a new
/// user entry is appended.
pub fn insert_or_replace(
    mut entries: Vec<AclEntry>,
    grantee: &str,
    permission: AclPermission,
) -> Vec<AclEntry> {
    match entries.iter_mut().find(|entry| entry.is_for(grantee)) {
        Some(entry) => entry.permission = permission,
        None => entries.push(AclEntry::user(grantee, permission)),
    }

    entries
}

/// Returns `entries` without any entry for `grantee`, preserving order.
pub fn remove(mut entries: Vec<AclEntry>, grantee: &str) -> Vec<AclEntry> {
    entries.retain(|entry| !entry.is_for(grantee));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Grantee;

    fn entry(name: &str, permission: AclPermission) -> AclEntry {
        AclEntry::user(name, permission)
    }

    #[test]
    fn insert_appends_new_grantee() {
        let entries = vec![entry("root", AclPermission::FullControl)];
        let merged = insert_or_replace(entries, "ba-1", AclPermission::FullControl);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[1], entry("ba-1", AclPermission::FullControl));
    }

    #[test]
    fn insert_twice_grows_list_once() {
        let original = vec![entry("root", AclPermission::FullControl)];

        let once = insert_or_replace(original.clone(), "ba-1", AclPermission::Read);
        let twice = insert_or_replace(once, "ba-1", AclPermission::FullControl);

        assert_eq!(twice.len(), original.len() + 1);
        assert_eq!(twice[1].permission, AclPermission::FullControl);
    }

    #[test]
    fn replace_keeps_position_and_grantee_kind() {
        let entries = vec![
            entry("a", AclPermission::Read),
            AclEntry {
                grantee: Grantee {
                    kind: Some("group".into()),
                    name: "b".into(),
                },
                permission: AclPermission::Read,
            },
            entry("c", AclPermission::Read),
        ];

        let merged = insert_or_replace(entries, "b", AclPermission::Write);

        let names: Vec<_> = merged.iter().map(|e| e.grantee.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert_eq!(merged[1].permission, AclPermission::Write);
        assert_eq!(merged[1].grantee.kind.as_deref(), Some("group"));
    }

    #[test]
    fn remove_without_match_is_unchanged() {
        let entries = vec![
            entry("a", AclPermission::Read),
            entry("b", AclPermission::FullControl),
        ];

        assert_eq!(remove(entries.clone(), "missing"), entries);
    }

    #[test]
    fn remove_drops_every_duplicate() {
        let entries = vec![
            entry("a", AclPermission::Read),
            entry("b", AclPermission::Read),
            entry("c", AclPermission::Read),
            entry("b", AclPermission::Write),
        ];

        let remaining = remove(entries, "b");

        let names: Vec<_> = remaining.iter().map(|e| e.grantee.name.as_str()).collect();
        assert_eq!(names, ["a", "c"]);
    }

    #[test]
    fn empty_lists() {
        assert!(remove(Vec::new(), "a").is_empty());
        assert_eq!(
            insert_or_replace(Vec::new(), "a", AclPermission::Read),
            vec![entry("a", AclPermission::Read)]
        );
    }
}
