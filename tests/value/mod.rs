// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg(test)]

use anyhow::Result;
use initialize::*;

#[test]
fn clones_do_not_share_writes() -> Result<()> {
    let mut original = Value::new_object();
    original
        .as_object_mut()?
        .insert(Value::from("city"), Value::from("Prague"));

    let mut copy = original.clone();
    copy.as_object_mut()?
        .insert(Value::from("city"), Value::from("Brno"));

    assert_eq!(original.field("city"), Some(&Value::from("Prague")));
    assert_eq!(copy.field("city"), Some(&Value::from("Brno")));
    Ok(())
}

#[test]
fn display_is_compact_json() -> Result<()> {
    let mut obj = Value::new_object();
    obj.as_object_mut()?.insert(
        Value::from("tags"),
        Value::from(vec![Value::from(1i64), Value::from(1.5), Value::Null]),
    );
    obj.as_object_mut()?
        .insert(Value::from("ok"), Value::Bool(true));

    assert_eq!(obj.to_string(), r#"{"ok":true,"tags":[1,1.5,null]}"#);
    assert_eq!(
        obj.to_json_str()?,
        "{\n  \"ok\": true,\n  \"tags\": [\n    1,\n    1.5,\n    null\n  ]\n}"
    );
    Ok(())
}

#[test]
fn accessors_reject_other_kinds() {
    assert!(Value::from("x").as_array().is_err());
    assert!(Value::Null.as_object().is_err());
    assert!(Value::from(3i64).as_string().is_err());
    assert!(Value::Null.is_null());
}
