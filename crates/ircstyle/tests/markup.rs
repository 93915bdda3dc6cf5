//! Markup parsing and schema validation.

use ircstyle::markup::{
    Element, MAX_DEPTH, MarkupError, MarkupValidator, Node, SchemaValidator, parse_markup,
};

fn diagnostics(template: &str) -> Vec<String> {
    let root = parse_markup(template).unwrap();
    SchemaValidator::new()
        .validate(&root)
        .iter()
        .map(ToString::to_string)
        .collect()
}

#[test]
fn test_parses_nested_elements() {
    let root = parse_markup(r#"a<b>b<u>c</u></b><var name="x"/>"#).unwrap();
    let expected = Element::new("msg")
        .with_text("a")
        .with_element(
            Element::new("b")
                .with_text("b")
                .with_element(Element::new("u").with_text("c")),
        )
        .with_element(Element::new("var").with_attribute("name", "x"));
    assert_eq!(root, expected);
}

#[test]
fn test_attribute_values_decode_entities() {
    let root = parse_markup(r#"<for from='a' item='b' last_separator=" &amp; &#x41;"/>"#).unwrap();
    let Some(Node::Element(element)) = root.children.first() else {
        panic!("expected an element");
    };
    assert_eq!(element.attribute("last_separator"), Some(" & A"));
}

#[test]
fn test_text_entities() {
    let root = parse_markup("&lt;b&gt; &quot;&apos; &#65;").unwrap();
    assert_eq!(root.children, vec![Node::Text("<b> \"' A".to_string())]);
}

#[test]
fn test_unknown_entity_is_an_error() {
    assert!(matches!(
        parse_markup("&nbsp;"),
        Err(MarkupError::Syntax { .. })
    ));
}

#[test]
fn test_mismatched_closing_tag() {
    assert!(parse_markup("<b>x</u>").is_err());
    assert!(matches!(
        parse_markup("x</b>"),
        Err(MarkupError::Syntax { line: 1, column: 2, .. })
    ));
}

#[test]
fn test_unclosed_element_reports_end_of_input() {
    assert!(matches!(
        parse_markup("line\n<b>x"),
        Err(MarkupError::UnexpectedEof { line: 2, .. })
    ));
}

#[test]
fn test_duplicate_attribute() {
    assert!(parse_markup(r#"<color fg="red" fg="blue">x</color>"#).is_err());
}

#[test]
fn test_valid_template_has_no_diagnostics() {
    let template = concat!(
        "<b>x</b><u>y</u><color fg='red'>z</color>",
        "<for from='a' item='b' key='c' sep=', ' last=' and '><var name='b'/></for>",
        "<plural var='#a'>\n  <case form='one'>1</case>\n  <case form='other'>n</case>\n</plural>",
    );
    assert!(diagnostics(template).is_empty());
}

#[test]
fn test_schema_violations() {
    assert_eq!(
        diagnostics("<var/>"),
        vec![r#"/msg/var: the "name" attribute is required on <var>"#]
    );
    assert_eq!(
        diagnostics("<var name='x'>text</var>"),
        vec!["/msg/var: <var> must be empty"]
    );
    assert_eq!(
        diagnostics("<b><case form='one'>x</case></b>"),
        vec!["/msg/b/case: <case> may only appear directly inside <plural>"]
    );
    assert_eq!(
        diagnostics("<u style='x'>y</u>"),
        vec![r#"/msg/u: attribute "style" is not allowed on <u>"#]
    );
    assert_eq!(
        diagnostics("<for from='a b' item='c'>x</for>"),
        vec![r#"/msg/for: "a b" is not a valid variable name"#]
    );
}

#[test]
fn test_plural_content_rules() {
    assert_eq!(
        diagnostics("<plural var='n'></plural>"),
        vec!["/msg/plural: <plural> requires at least one <case>"]
    );
    assert_eq!(
        diagnostics("<plural var='n'>text<case form='one'>x</case></plural>"),
        vec!["/msg/plural: text is not allowed directly inside <plural>"]
    );
}

#[test]
fn test_color_requires_a_channel() {
    let expected = vec![
        r#"/msg/color: the "fg" attribute or the "bg" attribute or both must be supplied when using the <color> tag"#,
    ];
    assert_eq!(diagnostics("<color>foo</color>"), expected);
    assert_eq!(diagnostics("<color fg='' bg=''>foo</color>"), expected);
    assert!(diagnostics("<color fg='' bg='red'>foo</color>").is_empty());
}

#[test]
fn test_nesting_limit() {
    let nested = |depth: usize| format!("{}x{}", "<u>".repeat(depth), "</u>".repeat(depth));
    assert!(parse_markup(&nested(MAX_DEPTH)).is_ok());

    let err = parse_markup(&format!("line\n{}", nested(2_000))).unwrap_err();
    assert!(matches!(
        err,
        MarkupError::NestingTooDeep { line: 2, limit: MAX_DEPTH, .. }
    ));
    assert_eq!(
        err.to_string(),
        format!("elements nested deeper than {MAX_DEPTH} levels at 2:{}", 3 * MAX_DEPTH + 1)
    );
}
