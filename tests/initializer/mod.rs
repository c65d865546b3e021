// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg(test)]

use anyhow::{anyhow, Result};
use initialize::predicates::*;
use initialize::*;
use serde_json::json;

fn classes() -> Result<ClassRegistry> {
    Ok(ClassRegistry::new()
        .with(ClassDef::new("Address").with_property("city", Type::String))?
        .with(
            ClassDef::new("Person")
                .with_property("name", Type::String)
                .with_property("age", Type::Integer)
                .with_property("address", Type::class("Address")),
        )?)
}

#[test]
fn person_with_address() -> Result<()> {
    let rules = Rules::new()
        .rule(path_contains("city"), constant("Prague"))
        .rule(type_is(Type::String), constant("N/A"))
        .rule(property_named("age"), constant(42i64));

    let person = Initializer::new(classes()?, rules).instance(&Type::class("Person"))?;
    assert_eq!(
        serde_json::to_value(&person)?,
        json!({ "name": "N/A", "age": 42, "address": { "city": "Prague" } })
    );
    Ok(())
}

#[test]
fn without_rules_values_stay_default() -> Result<()> {
    let person = Initializer::new(classes()?, Rules::new()).instance(&Type::class("Person"))?;
    assert_eq!(
        serde_json::to_value(&person)?,
        json!({ "name": null, "age": 0, "address": { "city": null } })
    );
    Ok(())
}

#[test]
fn first_rule_wins() -> Result<()> {
    let rules = Rules::new()
        .rule(path_equals("address.city"), constant("Brno"))
        .rule(path_contains("city"), constant("Prague"))
        .rule(always(), constant("other"));
    let initializer = Initializer::new(classes()?, rules);

    // Same input, same output.
    let first = initializer.instance(&Type::class("Person"))?;
    let second = initializer.instance(&Type::class("Person"))?;
    assert_eq!(first, second);
    // `always` also matches `address`, so the class is not descended into.
    assert_eq!(first.field("address"), Some(&Value::from("other")));

    let rules = Rules::new()
        .rule(path_equals("address.city"), constant("Brno"))
        .rule(path_contains("city"), constant("Prague"));
    let person = Initializer::new(classes()?, rules).instance(&Type::class("Person"))?;
    assert_eq!(
        person.field("address").and_then(|a| a.field("city")),
        Some(&Value::from("Brno"))
    );
    Ok(())
}

#[test]
fn generators_see_the_containing_instance() -> Result<()> {
    let classes = ClassRegistry::new().with(
        ClassDef::new("Name")
            .with_property("first", Type::String)
            .with_property("last", Type::String)
            .with_property("full", Type::String),
    )?;
    let rules = Rules::new()
        .rule(property_named("first"), constant("Ada"))
        .rule(property_named("last"), constant("Lovelace"))
        .rule(
            property_named("full"),
            |_: &PathNode<'_>, instance: &Value| -> Result<Value> {
                let part = |name: &str| -> Result<String> {
                    Ok(instance
                        .field(name)
                        .ok_or_else(|| anyhow!("missing {name}"))?
                        .as_string()?
                        .to_string())
                };
                Ok(Value::from(format!("{} {}", part("first")?, part("last")?)))
            },
        );

    let name = Initializer::new(classes, rules).instance(&Type::class("Name"))?;
    assert_eq!(name.field("full"), Some(&Value::from("Ada Lovelace")));
    Ok(())
}

#[test]
fn self_referential_class_terminates() -> Result<()> {
    let classes = ClassRegistry::new().with(
        ClassDef::new("Link")
            .with_property("value", Type::Integer)
            .with_property("next", Type::class("Link")),
    )?;
    let rules = Rules::new().rule(type_is(Type::Integer), constant(1i64));

    let link = Initializer::new(classes, rules).instance(&Type::class("Link"))?;
    assert_eq!(
        serde_json::to_value(&link)?,
        json!({ "value": 1, "next": null })
    );
    Ok(())
}

#[test]
fn mutually_recursive_classes_terminate() -> Result<()> {
    let classes = ClassRegistry::new()
        .with(ClassDef::new("Parent").with_property("child", Type::class("Child")))?
        .with(ClassDef::new("Child").with_property("parent", Type::class("Parent")))?;

    let parent = Initializer::new(classes, Rules::new()).instance(&Type::class("Parent"))?;
    assert_eq!(
        serde_json::to_value(&parent)?,
        json!({ "child": { "parent": null } })
    );
    Ok(())
}

#[test]
fn depth_limit_is_an_error() -> Result<()> {
    let config = InitializerConfig::from_json_str(r#"{ "max_depth": 1 }"#)?;
    let initializer = Initializer::new(classes()?, Rules::new()).with_config(config);

    let err = initializer
        .instance(&Type::class("Person"))
        .err()
        .ok_or_else(|| anyhow!("depth limit not enforced"))?;
    assert_eq!(
        err.to_string(),
        "Maximum traversal depth 1 exceeded at path 'address.city'"
    );
    Ok(())
}

#[test]
fn unmatched_nodes_can_fail() -> Result<()> {
    let rules = Rules::new().rule(type_is(Type::String), constant("x"));
    let mut initializer = Initializer::new(classes()?, rules);
    initializer.set_unmatched_policy(UnmatchedPolicy::Fail);

    let err = initializer
        .instance(&Type::class("Person"))
        .err()
        .ok_or_else(|| anyhow!("unmatched node accepted"))?;
    assert!(matches!(
        err.downcast_ref::<InitializeError>(),
        Some(InitializeError::NoApplicableRule { path }) if path == "age"
    ));
    Ok(())
}

#[test]
fn read_only_properties_are_skipped() -> Result<()> {
    let classes = ClassRegistry::new().with(
        ClassDef::new("Entity")
            .with_property_descriptor(PropertyDescriptor::field("id", Type::Integer).read_only())
            .with_property("label", Type::String),
    )?;
    let rules = Rules::new()
        .rule(type_is(Type::Integer), constant(9i64))
        .rule(type_is(Type::String), constant("entity"));

    let entity = Initializer::new(classes, rules).instance(&Type::class("Entity"))?;
    assert_eq!(
        serde_json::to_value(&entity)?,
        json!({ "id": 0, "label": "entity" })
    );
    Ok(())
}

#[test]
fn root_collection() -> Result<()> {
    let rules = Rules::new().rule(path_matches("[*].city"), constant("Prague"));
    let initializer = Initializer::new(classes()?, rules);

    let addresses = initializer.collection(&Type::class("Address"), 2)?;
    assert_eq!(
        serde_json::to_value(&addresses)?,
        json!([{ "city": "Prague" }, { "city": "Prague" }])
    );
    assert_eq!(
        initializer.collection(&Type::String, 0)?,
        Value::new_array()
    );
    Ok(())
}

#[test]
fn array_properties_get_items_when_sized() -> Result<()> {
    let classes = ClassRegistry::new().with(
        ClassDef::new("Tagged").with_property("tags", Type::array_of(Type::String)),
    )?;
    let rules = Rules::new().rule(
        and(collection_item(), type_is(Type::String)),
        |node: &PathNode<'_>, _: &Value| -> Result<Value> {
            Ok(Value::from(node.path().to_string()))
        },
    );

    let unsized_tagged =
        Initializer::new(classes.clone(), Rules::new()).instance(&Type::class("Tagged"))?;
    assert_eq!(unsized_tagged.field("tags"), Some(&Value::Null));

    let mut initializer = Initializer::new(classes, rules);
    initializer.set_collection_size(Some(2));
    let tagged = initializer.instance(&Type::class("Tagged"))?;
    assert_eq!(
        serde_json::to_value(&tagged)?,
        json!({ "tags": ["tags[0]", "tags[1]"] })
    );
    Ok(())
}

#[test]
fn unknown_root_class() -> Result<()> {
    let err = Initializer::new(classes()?, Rules::new())
        .instance(&Type::class("Nobody"))
        .err()
        .ok_or_else(|| anyhow!("unknown class accepted"))?;
    assert!(matches!(
        err.downcast_ref::<InitializeError>(),
        Some(InitializeError::UnknownClass(name)) if name == "Nobody"
    ));
    Ok(())
}

#[test]
fn config_from_yaml() -> Result<()> {
    let config: InitializerConfig = serde_yaml::from_str(
        "max_depth: 4\nunmatched: fail\ncollection_size: 3\n",
    )?;
    assert_eq!(
        config,
        InitializerConfig {
            max_depth: 4,
            unmatched: UnmatchedPolicy::Fail,
            descend_into_classes: true,
            collection_size: Some(3),
        }
    );

    let initializer = Initializer::new(classes()?, Rules::new()).with_config(config.clone());
    assert_eq!(initializer.config(), &config);
    Ok(())
}

#[test]
fn classes_can_be_left_alone() -> Result<()> {
    let config = InitializerConfig {
        descend_into_classes: false,
        ..InitializerConfig::default()
    };
    let rules = Rules::new().rule(type_is(Type::String), constant("x"));
    let person = Initializer::new(classes()?, rules)
        .with_config(config)
        .instance(&Type::class("Person"))?;
    assert_eq!(
        serde_json::to_value(&person)?,
        json!({ "name": "x", "age": 0, "address": null })
    );
    Ok(())
}
