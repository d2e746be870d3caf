use super::{resolve, Resolution};
use crate::audit::{Assertion, Group, Section};
use crate::document::HtmlDocument;
use crate::error::{DocumentKind, Warning};

fn section_with(title: &str, texts: &[(&str, &str)]) -> Section {
    let mut section = Section::new(title.to_lowercase(), title, 1);
    for (id, text) in texts {
        let mut assertion = Assertion::new(*id);
        assertion.text = (*text).to_string();
        section.push_assertion(assertion);
    }
    section
}

fn result(text: &str, methods: &[(&str, &str)], package: &str) -> String {
    let methods: String = methods
        .iter()
        .map(|(name, href)| {
            format!(r#"<div class="coverageMethod">{name} <a href="{href}">github</a></div>"#)
        })
        .collect();
    format!(
        r#"<div class="results"><p>{text}</p>{methods}<div class="packageName">{package}</div></div>"#
    )
}

fn coverage(anchor: &str, results: &[String]) -> HtmlDocument {
    HtmlDocument::parse(format!(
        "<html><body><h3>{anchor}</h3><div id=\"{anchor}\">{}</div></body></html>",
        results.concat()
    ))
    .unwrap()
}

#[test]
fn test_single_direct_assertion() {
    let mut sections = vec![section_with("Introduction", &[("1.1", "The system shall start.")])];
    let html = coverage(
        "Introduction",
        &[result(
            "The system shall start.",
            &[(
                "com.ex.FooTest.testStart",
                "https://github.com/ex/tck/blob/master/FooTest.java",
            )],
            "com.ex",
        )],
    );

    let resolution = resolve(&mut sections, &html, "v2");

    let tests = &sections[0].assertions().next().unwrap().tests;
    assert_eq!(tests.len(), 1);
    assert_eq!(tests[0].method_name, "com.ex.FooTest.testStart");
    assert_eq!(
        tests[0].ref_url.as_str(),
        "https://github.com/ex/tck/blob/v2/FooTest.java"
    );
    assert_eq!(tests[0].package_name, "com.ex");
    assert_eq!(resolution.tests_linked, 1);
    assert!(resolution.warnings.is_empty());
}

#[test]
fn test_results_under_bare_anchor() {
    let mut sections = vec![section_with("Intro", &[("1", "Covered text")])];
    let html = HtmlDocument::parse(
        r#"<div id="Intro"><div class="results">Covered text<div class="coverageMethod">a.B.c <a href="https://x.org/master/B.java">github</a></div></div></div>"#,
    )
    .unwrap();

    resolve(&mut sections, &html, "1.0");
    assert_eq!(sections[0].assertions().next().unwrap().tests.len(), 1);
}

#[test]
fn test_whitespace_is_normalised_before_matching() {
    let mut sections = vec![section_with("Norm", &[("n", "  A   B\tC ")])];
    let html = coverage(
        "Norm",
        &[result("prefix A B C suffix", &[("x.T.m", "https://x.org/T.java")], "x")],
    );

    resolve(&mut sections, &html, "v1");
    assert_eq!(sections[0].assertions().next().unwrap().tests.len(), 1);
}

#[test]
fn test_pipes_are_stripped_from_results() {
    let mut sections = vec![section_with("Pipes", &[("p", "AB")])];
    let html = coverage(
        "Pipes",
        &[result("|A|B|", &[("x.T.m", "https://x.org/T.java")], "x")],
    );

    resolve(&mut sections, &html, "v1");
    assert_eq!(sections[0].assertions().next().unwrap().tests.len(), 1);
}

#[test]
fn test_matching_is_case_sensitive() {
    let mut sections = vec![section_with("Case", &[("c", "the system")])];
    let html = coverage(
        "Case",
        &[result("The System", &[("x.T.m", "https://x.org/T.java")], "x")],
    );

    resolve(&mut sections, &html, "v1");
    assert!(sections[0].assertions().next().unwrap().tests.is_empty());
}

#[test]
fn test_missing_anchor_warns_and_keeps_empty_tests() {
    let mut sections = vec![section_with("Elsewhere", &[("e", "Some text")])];
    let html = coverage(
        "Introduction",
        &[result("Some text", &[("x.T.m", "https://x.org/T.java")], "x")],
    );

    let resolution = resolve(&mut sections, &html, "v1");

    assert!(sections[0].assertions().next().unwrap().tests.is_empty());
    assert_eq!(
        resolution.warnings,
        vec![Warning::SectionAnchorMissing {
            section: "Elsewhere".to_string(),
            document: DocumentKind::Coverage,
        }]
    );
}

#[test]
fn test_empty_sections_are_not_looked_up() {
    let mut sections = vec![Section::new("s1", "Missing", 1)];
    let html = coverage("Other", &[]);

    let resolution = resolve(&mut sections, &html, "v1");
    assert_eq!(resolution, Resolution::default());
}

#[test]
fn test_matches_are_not_exclusive_and_not_deduplicated() {
    let mut sections = vec![section_with(
        "Multi",
        &[("short", "shall start"), ("long", "The system shall start.")],
    )];
    let html = coverage(
        "Multi",
        &[
            result(
                "The system shall start.",
                &[("a.A.one", "https://x.org/A.java"), ("b.B.two", "https://x.org/B.java")],
                "pkg",
            ),
            result("It shall start later", &[("c.C.three", "https://x.org/C.java")], "pkg"),
            result("The system shall start.", &[("a.A.one", "https://x.org/A.java")], "pkg"),
        ],
    );

    let resolution = resolve(&mut sections, &html, "v1");

    let names = |id: &str| -> Vec<String> {
        sections[0]
            .assertions()
            .find(|a| a.id == id)
            .unwrap()
            .tests
            .iter()
            .map(|t| t.method_name.clone())
            .collect()
    };
    assert_eq!(names("short"), vec!["a.A.one", "b.B.two", "c.C.three", "a.A.one"]);
    assert_eq!(names("long"), vec!["a.A.one", "b.B.two", "a.A.one"]);
    assert_eq!(resolution.tests_linked, 7);
}

#[test]
fn test_grouped_assertions_are_resolved() {
    let mut section = Section::new("g", "Grouped", 1);
    let mut group = Group::new(section.next_group_ref());
    let mut assertion = Assertion::new("g1");
    assertion.text = "grouped claim".to_string();
    group.push_assertion(assertion);
    section.push_group(group);
    let mut sections = vec![section];

    let html = coverage(
        "Grouped",
        &[result("a grouped claim here", &[("x.T.m", "https://x.org/T.java")], "x")],
    );
    resolve(&mut sections, &html, "v1");

    assert_eq!(sections[0].assertions().next().unwrap().tests.len(), 1);
}

#[test]
fn test_malformed_url_is_skipped() {
    let mut sections = vec![section_with("Urls", &[("u", "claim")])];
    let html = coverage(
        "Urls",
        &[result(
            "claim",
            &[("x.T.bad", "not a url"), ("x.T.good", "https://x.org/master/T.java")],
            "x",
        )],
    );

    let resolution = resolve(&mut sections, &html, "2.0.Final");

    let tests = &sections[0].assertions().next().unwrap().tests;
    assert_eq!(tests.len(), 1);
    assert_eq!(tests[0].method_name, "x.T.good");
    assert_eq!(tests[0].ref_url.as_str(), "https://x.org/2.0.Final/T.java");
    assert!(matches!(
        resolution.warnings.as_slice(),
        [Warning::MalformedTestUrl { href, .. }] if href == "not a url"
    ));
}

#[test]
fn test_method_without_dot_is_skipped() {
    let mut sections = vec![section_with("Dots", &[("d", "claim")])];
    let html = coverage(
        "Dots",
        &[result("claim", &[("testWithoutClass", "https://x.org/T.java")], "x")],
    );

    let resolution = resolve(&mut sections, &html, "v1");

    assert!(sections[0].assertions().next().unwrap().tests.is_empty());
    assert_eq!(
        resolution.warnings,
        vec![Warning::MalformedTestMethod {
            method: "testWithoutClass".to_string()
        }]
    );
}

#[test]
fn test_github_literal_is_removed_from_method_names() {
    let mut sections = vec![section_with("Gh", &[("g", "claim")])];
    let html = coverage(
        "Gh",
        &[result("claim", &[("org.githubTest.run", "https://x.org/T.java")], "x")],
    );

    resolve(&mut sections, &html, "v1");
    assert_eq!(
        sections[0].assertions().next().unwrap().tests[0].method_name,
        "org.Test.run"
    );
}

#[test]
fn test_results_with_inline_markup_match() {
    let mut sections = vec![section_with("Inline", &[("i", "The bean is managed here")])];
    let html = coverage(
        "Inline",
        &[result(
            "The <b>bean</b> is <i>managed</i> <a href=\"#m\">here</a>",
            &[("x.Y.z", "https://x.org/Y.java")],
            "x",
        )],
    );

    let resolution = resolve(&mut sections, &html, "v1");

    let tests = &sections[0].assertions().next().unwrap().tests;
    assert_eq!(tests.len(), 1);
    assert_eq!(tests[0].method_name, "x.Y.z");
    assert_eq!(resolution.tests_linked, 1);
}

#[test]
fn test_no_break_space_matches_plain_space() {
    let mut sections = vec![section_with("Spaces", &[("s", "A B")])];
    let html = coverage(
        "Spaces",
        &[result("A&nbsp;B", &[("x.T.m", "https://x.org/T.java")], "x")],
    );

    resolve(&mut sections, &html, "v1");
    assert_eq!(sections[0].assertions().next().unwrap().tests.len(), 1);
}

#[test]
fn test_named_references_are_decoded_before_matching() {
    let mut sections = vec![section_with("Named", &[("n", "the bean\u{2019}s type \u{2013} \u{a7}3")])];
    let html = coverage(
        "Named",
        &[result(
            "the bean&rsquo;s type &ndash; &sect;3",
            &[("x.T.m", "https://x.org/T.java")],
            "x",
        )],
    );

    resolve(&mut sections, &html, "v1");
    assert_eq!(sections[0].assertions().next().unwrap().tests.len(), 1);
}
