use super::{collapse_whitespace, decode_entities, HtmlDocument};

const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Spec</title><style>body { margin: 0; }</style></head>
<body>
<h2 id="intro">1. Introduction</h2>
<div id="Introduction" class="section">
  <div class="results extra"><p>The |system| shall start.</p>
    <div class="coverageMethod">com.ex.FooTest.testStart <a href="https://example.org/a?x=1&amp;y=2">github</a></div>
    <div class="packageName">com.ex</div>
  </div>
  <div class="results">Second <b>bold</b> result<br>next line</div>
  <script>var ignored = "text";</script>
</div>
<p id="intro">duplicate id</p>
</body>
</html>
"#;

#[test]
fn test_element_by_id_finds_first_match() {
    let doc = HtmlDocument::parse(PAGE).unwrap();
    let element = doc.element_by_id("intro").expect("anchor should exist");

    assert_eq!(doc.tag_name(element).as_deref(), Some("h2"));
    assert_eq!(doc.text(element), "1. Introduction");
}

#[test]
fn test_element_by_id_missing() {
    let doc = HtmlDocument::parse(PAGE).unwrap();
    assert!(doc.element_by_id("nowhere").is_none());
}

#[test]
fn test_elements_with_class_matches_class_tokens() {
    let doc = HtmlDocument::parse(PAGE).unwrap();
    let anchor = doc.element_by_id("Introduction").unwrap();
    let results = doc.elements_with_class(anchor, "results");

    assert_eq!(results.len(), 2, "Both results divs, in document order");
    assert_eq!(doc.attribute(results[0], "class").as_deref(), Some("results extra"));
    assert!(doc.elements_with_class(anchor, "result").is_empty());
}

#[test]
fn test_text_renders_plain_text() {
    let doc = HtmlDocument::parse(PAGE).unwrap();
    let anchor = doc.element_by_id("Introduction").unwrap();
    let results = doc.elements_with_class(anchor, "results");

    assert_eq!(
        doc.text(results[0]),
        "The |system| shall start. com.ex.FooTest.testStart github com.ex"
    );
    assert_eq!(doc.text(results[1]), "Second bold result next line");
}

#[test]
fn test_text_skips_scripts() {
    let doc = HtmlDocument::parse(PAGE).unwrap();
    let anchor = doc.element_by_id("Introduction").unwrap();
    assert!(!doc.text(anchor).contains("ignored"));
}

#[test]
fn test_attribute_values_are_decoded() {
    let doc = HtmlDocument::parse(PAGE).unwrap();
    let anchor = doc.element_by_id("Introduction").unwrap();
    let link = doc
        .first_element_with_attribute(anchor, "a", "href")
        .expect("link should exist");

    assert_eq!(
        doc.attribute(link, "HREF").as_deref(),
        Some("https://example.org/a?x=1&y=2")
    );
    assert!(doc.attribute(link, "title").is_none());
}

#[test]
fn test_first_element_by_tag() {
    let doc = HtmlDocument::parse(PAGE).unwrap();
    let head = doc.first_element_by_tag(doc.root(), "head").unwrap();
    let style = doc.first_element_by_tag(doc.root(), "style").unwrap();

    assert_eq!(&PAGE[head.start_byte()..head.start_byte() + 6], "<head>");
    assert_eq!(&PAGE[doc.content_end(style)..style.end_byte()], "</style>");
    assert_eq!(&PAGE[doc.content_end(head)..head.end_byte()], "</head>");
}

#[test]
fn test_source_is_kept_verbatim() {
    let doc = HtmlDocument::parse(PAGE).unwrap();
    assert_eq!(doc.source(), PAGE);
}

#[test]
fn test_unquoted_and_single_quoted_attributes() {
    let doc = HtmlDocument::parse("<div id=plain></div><div id='single'></div>").unwrap();
    assert!(doc.element_by_id("plain").is_some());
    assert!(doc.element_by_id("single").is_some());
}

#[test]
fn test_decode_entities() {
    assert_eq!(decode_entities("a &lt;b&gt; &amp; &quot;c&quot;"), "a <b> & \"c\"");
    assert_eq!(decode_entities("&#65;&#x42;"), "AB");
    assert_eq!(decode_entities("fish & chips"), "fish & chips");
    assert_eq!(decode_entities("&unknown; &"), "&unknown; &");
}

#[test]
fn test_text_keeps_spaces_around_inline_markup() {
    let doc = HtmlDocument::parse("<p id=\"p\">The <b>bean</b> is <i>managed</i> here</p>").unwrap();
    let p = doc.element_by_id("p").unwrap();
    assert_eq!(doc.text(p), "The bean is managed here");

    let doc = HtmlDocument::parse("<div id=\"d\">x.Y.z <a href=\"#\">g</a></div>").unwrap();
    assert_eq!(doc.text(doc.element_by_id("d").unwrap()), "x.Y.z g");
}

#[test]
fn test_text_without_gaps_stays_joined() {
    let doc = HtmlDocument::parse("<p id=\"p\">un<b>bro</b>ken</p>").unwrap();
    assert_eq!(doc.text(doc.element_by_id("p").unwrap()), "unbroken");
}

#[test]
fn test_text_collapses_no_break_spaces() {
    let doc = HtmlDocument::parse("<p id=\"p\">A&nbsp;B &nbsp; C</p>").unwrap();
    assert_eq!(doc.text(doc.element_by_id("p").unwrap()), "A B C");
}

#[test]
fn test_decode_named_references() {
    assert_eq!(decode_entities("bean&rsquo;s"), "bean\u{2019}s");
    assert_eq!(decode_entities("1&ndash;2 &sect;3"), "1\u{2013}2 \u{a7}3");
}

#[test]
fn test_collapse_whitespace() {
    assert_eq!(collapse_whitespace("  a\u{a0}\u{a0}b\n\tc  "), "a b c");
    assert_eq!(collapse_whitespace(" \u{a0} "), "");
}
