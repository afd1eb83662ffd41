use super::*;

#[test]
fn test_split_namespace() {
    assert_eq!(split_namespace("A\\B\\c"), ("A\\B", "c"));
    assert_eq!(split_namespace("\\Foo"), ("", "Foo"));
    assert_eq!(split_namespace("strlen"), ("", "strlen"));
}

#[test]
fn test_normalize_name_is_case_insensitive_key() {
    assert_eq!(normalize_name("\\Foo\\Bar"), "foo\\bar");
    assert_eq!(normalize_name("foo\\BAR"), normalize_name("Foo\\Bar"));
}

#[test]
fn test_relative_rendering_inside_namespace() {
    let name = FqName::new("App\\Model\\User");
    assert_eq!(name.relative_to("App\\Model"), "User");
    assert_eq!(name.relative_to("App"), "Model\\User");
    assert_eq!(name.relative_to("Other"), "\\App\\Model\\User");
}

#[test]
fn test_relative_rendering_does_not_match_partial_segment() {
    // `AppX` must not be treated as inside `App`
    let name = FqName::new("AppX\\User");
    assert_eq!(name.relative_to("App"), "\\AppX\\User");
}

#[test]
fn test_relative_rendering_in_global_namespace() {
    assert_eq!(FqName::new("Exception").relative_to(""), "Exception");
    assert_eq!(FqName::new("Foo\\Bar").relative_to(""), "\\Foo\\Bar");
}
