//! Variables loaded from JSON.

use std::collections::HashMap;

use ircstyle::{Array, Styler, Value};

#[test]
fn test_json_variables() {
    let vars: HashMap<String, Value> = serde_json::from_str(
        r#"{
            "count": 3,
            "ratio": 0.5,
            "name": "Clicky",
            "names": ["George", "John"],
            "scores": {"Clicky": 42, "Looksup": 23}
        }"#,
    )
    .unwrap();

    assert_eq!(vars["count"], Value::Integer(3));
    assert_eq!(vars["ratio"], Value::Real(0.5));
    assert_eq!(vars["name"].as_str(), Some("Clicky"));
    assert_eq!(vars["names"].as_array().map(Array::len), Some(2));

    let scores = vars["scores"].as_array().unwrap();
    let keys: Vec<&str> = scores.iter().map(|(key, _)| key).collect();
    assert_eq!(keys, vec!["Clicky", "Looksup"]);
}

#[test]
fn test_render_with_json_variables() {
    let vars: HashMap<String, Value> =
        serde_json::from_str(r#"{"scores": {"Clicky": 42, "Looksup": 23}}"#).unwrap();
    let out = Styler::default()
        .render(
            "<for from='scores' item='s' key='k'><var name='k'/>=<var name='s'/></for>",
            &vars,
        )
        .unwrap();
    assert_eq!(out, "Clicky=42 & Looksup=23");
}

#[test]
fn test_unsupported_json_values_are_rejected() {
    let result: Result<HashMap<String, Value>, _> = serde_json::from_str(r#"{"flag": true}"#);
    assert!(result.is_err());
}
