use super::*;

#[test]
fn test_span_slice_and_cover() {
    let text = "array<int, string>";
    let a = ByteSpan::new(0, 5);
    let b = ByteSpan::new(6, 9);

    assert_eq!(a.slice(text), "array");
    assert_eq!(b.slice(text), "int");
    assert_eq!(a.cover(b), ByteSpan::new(0, 9));
    assert_eq!(a.len(), 5);
}

#[test]
fn test_span_out_of_range_slice_is_empty() {
    let span = ByteSpan::new(10, 20);
    assert_eq!(span.slice("int"), "");
    assert!(ByteSpan::at(3).is_empty());
}
