use super::*;
use tyshape_parser::{ParserConfig, parse_type};

fn ty(text: &str) -> TUnion {
    match parse_type(text, &ParserConfig::default()) {
        Ok(union) => union,
        Err(err) => panic!("`{text}` failed to parse: {err}"),
    }
}

#[test]
fn test_empty_docblock_renders_nothing() {
    let docblock = Docblock::new();
    assert!(docblock.is_empty());
    assert_eq!(docblock.render("App"), "");
}

#[test]
fn test_tags_keep_insertion_order() {
    let mut docblock = Docblock::new();
    docblock.push(DocTag::Template {
        name: "T".to_string(),
        bound: ty("\\App\\Model"),
    });
    docblock.push(DocTag::Param {
        name: "items".to_string(),
        ty: ty("list<int>"),
    });
    docblock.push(DocTag::Return(ty("?\\Other\\Thing")));
    docblock.push(DocTag::Throws("App\\Error\\Failure".to_string()));

    assert_eq!(docblock.tags().len(), 4);
    assert_eq!(
        docblock.tag_lines("App"),
        vec![
            "@template T as Model",
            "@param list<int> $items",
            "@return \\Other\\Thing|null",
            "@throws Error\\Failure",
        ]
    );
}

#[test]
fn test_render_wraps_tags() {
    let mut docblock = Docblock::new();
    docblock.push(DocTag::Return(ty("non-empty-string")));
    assert_eq!(docblock.render(""), "/**\n * @return non-empty-string\n */\n");
}

#[test]
fn test_comment_terminator_in_literal_type_does_not_close_docblock() {
    let mut docblock = Docblock::new();
    docblock.push(DocTag::Param {
        name: "glob".to_string(),
        ty: ty("'src/*/lib'|int"),
    });
    docblock.push(DocTag::Return(ty("'a*/b'")));

    assert_eq!(
        docblock.tag_lines(""),
        vec!["@param mixed $glob".to_string(), "@return mixed".to_string()]
    );
    let rendered = docblock.render("");
    assert_eq!(rendered.matches("*/").count(), 1, "{rendered}");
    assert!(rendered.ends_with(" */\n"), "{rendered}");
}
