//! Wire model tests

mod common;

use casegate::{Role, RolePermissionsUpdate};
use common::*;
use serde_json::json;

#[test]
fn role_edit_starts_from_current_grants() {
    let update = RolePermissionsUpdate::from_role(&supervisor());
    assert_eq!(update.permission_ids, vec![1, 2, 3]);

    let bare = Role { id: 1, name: "Guest".into(), description: None, permissions: None };
    assert!(RolePermissionsUpdate::from_role(&bare).permission_ids.is_empty());
}

#[test]
fn toggle_adds_and_removes_keeping_order() {
    let mut update = RolePermissionsUpdate::from_role(&supervisor());
    assert!(!update.toggle(2));
    assert_eq!(update.permission_ids, vec![1, 3]);
    assert!(update.toggle(40));
    assert!(update.toggle(2));
    assert_eq!(update.permission_ids, vec![1, 3, 40, 2]);
}

#[test]
fn role_edit_submits_full_replacement_list() {
    let mut update = RolePermissionsUpdate::default();
    update.toggle(7);
    update.toggle(9);
    assert_eq!(serde_json::to_value(&update).unwrap(), json!({ "permissionIds": [7, 9] }));
}

#[test]
fn permission_serializes_in_camel_case() {
    let mut p = perm(1, CASES_VIEW).with_description("See cases");
    p.module_id = Some(3);
    assert_eq!(
        serde_json::to_value(&p).unwrap(),
        json!({ "id": 1, "name": CASES_VIEW, "description": "See cases", "moduleId": 3 })
    );
}
