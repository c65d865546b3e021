// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg(test)]

use anyhow::Result;
use initialize::predicates::*;
use initialize::*;
use serde_json::json;

fn boxed() -> Result<ClassDef> {
    let class = ClassDef::new("Box").with_type_parameter("T");
    let t = class.var("T")?;
    Ok(class.with_property("value", t))
}

fn pair() -> Result<ClassDef> {
    let class = ClassDef::new("Pair")
        .with_type_parameter("A")
        .with_type_parameter("B");
    let (a, b) = (class.var("A")?, class.var("B")?);
    Ok(class.with_property("first", a).with_property("second", b))
}

fn scalars() -> Rules {
    Rules::new()
        .rule(type_is(Type::String), constant("text"))
        .rule(type_is(Type::Integer), constant(7i64))
        .rule(type_is(Type::Number), constant(0.5))
}

#[test]
fn type_argument_reaches_the_property() -> Result<()> {
    let classes = ClassRegistry::new().with(boxed()?)?;
    let initializer = Initializer::new(classes, scalars());

    let text = initializer.instance(&Type::parameterized("Box", vec![Type::String]))?;
    let number = initializer.instance(&Type::parameterized("Box", vec![Type::Integer]))?;
    assert_eq!(serde_json::to_value(&text)?, json!({ "value": "text" }));
    assert_eq!(serde_json::to_value(&number)?, json!({ "value": 7 }));
    Ok(())
}

#[test]
fn raw_usage_resolves_to_the_bound() -> Result<()> {
    let numeric = ClassDef::new("Measure").with_bounded_type_parameter("N", Type::Number);
    let n = numeric.var("N")?;
    let classes = ClassRegistry::new()
        .with(boxed()?)?
        .with(numeric.with_property("amount", n))?;
    let rules = scalars().rule(type_is(Type::Any), constant("anything"));
    let initializer = Initializer::new(classes, rules);

    let raw_box = initializer.instance(&Type::class("Box"))?;
    assert_eq!(raw_box.field("value"), Some(&Value::from("anything")));

    let raw_measure = initializer.instance(&Type::class("Measure"))?;
    assert_eq!(raw_measure.field("amount"), Some(&Value::from(0.5)));
    Ok(())
}

#[test]
fn nested_type_arguments() -> Result<()> {
    let classes = ClassRegistry::new()
        .with(boxed()?)?
        .with(pair()?)?
        .with(ClassDef::new("Holder").with_property(
            "pair",
            Type::parameterized(
                "Pair",
                vec![
                    Type::String,
                    Type::parameterized("Box", vec![Type::Integer]),
                ],
            ),
        ))?;

    let holder = Initializer::new(classes, scalars()).instance(&Type::class("Holder"))?;
    assert_eq!(
        serde_json::to_value(&holder)?,
        json!({ "pair": { "first": "text", "second": { "value": 7 } } })
    );
    Ok(())
}

#[test]
fn arguments_flow_through_superclasses() -> Result<()> {
    // class Named<N> extends Pair<String, N> { String label; }
    // class Counter extends Named<Integer> { }
    let named = ClassDef::new("Named").with_type_parameter("N");
    let n = named.var("N")?;
    let named = named
        .with_superclass(Type::parameterized("Pair", vec![Type::String, n]))
        .with_property("label", Type::String);

    let classes = ClassRegistry::new()
        .with(pair()?)?
        .with(named)?
        .with(
            ClassDef::new("Counter")
                .with_superclass(Type::parameterized("Named", vec![Type::Integer])),
        )?;
    let rules = Rules::new()
        .rule(declared_in_class("Named"), constant("own"))
        .rule(
            and(declared_in_class("Pair"), type_is(Type::Integer)),
            constant(1i64),
        )
        .rule(declared_in_class("Pair"), constant("inherited"));

    let counter = Initializer::new(classes, rules).instance(&Type::class("Counter"))?;
    assert_eq!(
        serde_json::to_value(&counter)?,
        json!({ "first": "inherited", "second": 1, "label": "own" })
    );
    Ok(())
}

#[test]
fn collection_items_of_generic_type() -> Result<()> {
    let classes = ClassRegistry::new().with(boxed()?)?;
    let mut initializer = Initializer::new(classes, scalars());
    initializer.set_collection_size(Some(1));

    let items = initializer.collection(&Type::parameterized("Box", vec![Type::Number]), 2)?;
    assert_eq!(
        serde_json::to_value(&items)?,
        json!([{ "value": 0.5 }, { "value": 0.5 }])
    );

    let nested = initializer.collection(&Type::array_of(Type::String), 2)?;
    assert_eq!(serde_json::to_value(&nested)?, json!([["text"], ["text"]]));
    Ok(())
}

#[test]
fn raw_type_matches_any_parameterization() -> Result<()> {
    let classes = ClassRegistry::new()
        .with(boxed()?)?
        .with(ClassDef::new("Shelf").with_property(
            "box",
            Type::parameterized("Box", vec![Type::String]),
        ))?;
    let rules = Rules::new().rule(raw_type_is(Type::class("Box")), constant("boxed"));

    let shelf = Initializer::new(classes, rules).instance(&Type::class("Shelf"))?;
    assert_eq!(shelf.field("box"), Some(&Value::from("boxed")));
    Ok(())
}

#[test]
fn same_class_nests_with_other_arguments() -> Result<()> {
    let classes = ClassRegistry::new()
        .with(boxed()?)?
        .with(ClassDef::new("Crate").with_property(
            "b",
            Type::parameterized(
                "Box",
                vec![Type::parameterized("Box", vec![Type::String])],
            ),
        ))?;
    let rules = Rules::new().rule(type_is(Type::String), constant("s"));

    let outer = Initializer::new(classes, rules).instance(&Type::class("Crate"))?;
    assert_eq!(
        serde_json::to_value(&outer)?,
        json!({ "b": { "value": { "value": "s" } } })
    );
    Ok(())
}

#[test]
fn growing_type_arguments_hit_the_depth_limit() -> Result<()> {
    // class Chain<T> { T value; Chain<Chain<T>> next; }
    let chain = ClassDef::new("Chain").with_type_parameter("T");
    let t = chain.var("T")?;
    let chain = chain.with_property("value", t.clone()).with_property(
        "next",
        Type::parameterized("Chain", vec![Type::parameterized("Chain", vec![t])]),
    );
    let classes = ClassRegistry::new().with(chain)?;
    let mut initializer = Initializer::new(classes, scalars());
    initializer.set_max_depth(4);

    let err = initializer
        .instance(&Type::parameterized("Chain", vec![Type::String]))
        .err()
        .ok_or_else(|| anyhow::anyhow!("unbounded generic recursion accepted"))?;
    assert!(matches!(
        err.downcast_ref::<InitializeError>(),
        Some(InitializeError::DepthLimitExceeded { limit: 4, .. })
    ));
    Ok(())
}
