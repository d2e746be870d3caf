//! Renders assertion blocks and plans their insertion into the specification document.
//!
//! Each section with at least one element gets, right after its anchor element, a toggle
//! paragraph and a `div` listing the section's assertions with the tests that cover them. A
//! visibility script goes after `<head>` and the block styles are appended to the first
//! `<style>` element.

use tracing::{debug, warn};

use crate::audit::{Assertion, Group, Section, SectionElement};
use crate::document::HtmlDocument;
use crate::edit_plan::EditPlan;
use crate::error::{DocumentKind, Warning};

/// Script toggling an assertion block and swapping its icon.
pub const VISIBILITY_SCRIPT: &str = "<script>
function changeVisibility(divId, hrefId)
{
 var divElement = document.getElementById(divId);
 var hrefElement = document.getElementById(hrefId);
 if (divElement.style.display == 'none') {
   divElement.style.display = \"block\";
   hrefElement.innerHTML = '<img src=\"images/minus.png\"/>';
 } else {
   divElement.style.display = \"none\";
   hrefElement.innerHTML = '<img src=\"images/plus.png\"/>';
 }
}
</script>";

/// Rules appended to the first `<style>` element.
pub const ASSERTION_STYLES: &str = "
.assertionsDiv { background-color: #F2FAF2; display: block; padding: 10pt 10pt 5pt 10pt; }
.groupAssertion { padding-left: 15pt; }
.notTestableAssertion { background-color: #E1F0FF; }
.assertionTest { font-family: monospace; }
";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Choices affecting the generated markup.
pub struct RenderOptions {
    /// Emit one paragraph carrying both classes for untestable assertions instead of a
    /// `notTestableAssertion` paragraph nested in the assertion paragraph.
    pub well_formed_paragraphs: bool,
}

/// Insertions planned for the specification and the defects met while planning them.
#[derive(Debug, Default)]
pub struct Decoration {
    /// Insertions against the specification source.
    pub plan: EditPlan,
    /// Sections whose blocks were planned.
    pub sections_decorated: usize,
    /// Defects that were skipped.
    pub warnings: Vec<Warning>,
}

/// Plans the script, styles and per-section assertion blocks for `spec`.
#[must_use]
pub fn decorate(spec: &HtmlDocument, sections: &[Section], options: RenderOptions) -> Decoration {
    let mut decoration = Decoration::default();
    let root = spec.root();

    let head = spec.first_element_by_tag(root, "head");
    match head {
        Some(head) => decoration
            .plan
            .insert(head.end_byte(), VISIBILITY_SCRIPT, "visibility script"),
        None => decoration.warn(Warning::MissingHead),
    }

    match spec.first_element_by_tag(root, "style") {
        Some(style) => decoration.plan.insert(
            spec.content_end(style),
            ASSERTION_STYLES,
            "assertion styles",
        ),
        None => {
            decoration.warn(Warning::MissingStyle);
            if let Some(head) = head {
                decoration.plan.insert(
                    spec.content_end(head),
                    format!("<style>{ASSERTION_STYLES}</style>"),
                    "assertion styles",
                );
            }
        }
    }

    for section in sections.iter().filter(|s| !s.elements.is_empty()) {
        let Some(anchor) = spec.element_by_id(&section.id) else {
            decoration.warn(Warning::SectionAnchorMissing {
                section: section.id.clone(),
                document: DocumentKind::Specification,
            });
            continue;
        };
        debug!(section = %section.id, "planning assertion block");
        decoration.plan.insert(
            anchor.end_byte(),
            render_section(section, options),
            format!("assertions {}", section.id),
        );
        decoration.sections_decorated += 1;
    }

    decoration
}

impl Decoration {
    fn warn(&mut self, warning: Warning) {
        warn!("{warning}");
        self.warnings.push(warning);
    }
}

/// Toggle paragraph and assertion `div` for one section.
#[must_use]
pub fn render_section(section: &Section, options: RenderOptions) -> String {
    let id = escape_attribute(&section.id);
    let div_id = format!("assertions{id}");
    let href_id = format!("href{id}");

    let mut html = format!(
        "<p><a id=\"{href_id}\" onclick=\"changeVisibility('{div_id}','{href_id}')\">\
         <img src=\"images/minus.png\"/></a> TCK assertions</p>\
         <div id=\"{div_id}\" class=\"assertionsDiv\">"
    );
    for element in &section.elements {
        match element {
            SectionElement::Assertion(assertion) => render_assertion(&mut html, assertion, options),
            SectionElement::Group(group) => render_group(&mut html, group, options),
        }
    }
    html.push_str("</div>");
    html
}

fn render_group(html: &mut String, group: &Group, options: RenderOptions) {
    html.push_str(&format!("<p>{}</p>", group.text));
    for assertion in group.assertions() {
        render_assertion(html, assertion, options);
    }
}

/// Appends the paragraph and test list of one assertion to `html`.
pub fn render_assertion(html: &mut String, assertion: &Assertion, options: RenderOptions) {
    let grouped = assertion.group().is_some();
    match (grouped, assertion.testable, options.well_formed_paragraphs) {
        (true, false, true) => html.push_str("<p class=\"groupAssertion notTestableAssertion\">"),
        (false, false, true) => html.push_str("<p class=\"notTestableAssertion\">"),
        (true, testable, _) => {
            html.push_str("<p class=\"groupAssertion\">");
            if !testable {
                html.push_str("<p class=\"notTestableAssertion\">");
            }
        }
        (false, testable, _) => {
            html.push_str("<p>");
            if !testable {
                html.push_str("<p class=\"notTestableAssertion\">");
            }
        }
    }

    html.push_str(&format!(
        "<strong>{}) </strong>{}",
        assertion.id,
        escape_text(&assertion.text)
    ));
    if let (false, Some(note)) = (assertion.testable, &assertion.note) {
        html.push_str(&format!("<br>Note: <i>{note}</i></br>"));
    }
    html.push_str("</p>");

    if assertion.tests.is_empty() {
        return;
    }
    let list_id = escape_attribute(&assertion.id);
    if grouped {
        html.push_str(&format!("<ul class=\"groupAssertion\" id=\"{list_id}\">"));
    } else {
        html.push_str(&format!("<ul id=\"{list_id}\">"));
    }
    for test in &assertion.tests {
        let (class_name, method) = test.split_method();
        html.push_str(&format!(
            "<li class=\"assertionTest\"><a target=\"_blank\" href=\"{}\">{class_name}</a>{method}</li>",
            escape_attribute(test.ref_url.as_str())
        ));
    }
    html.push_str("</ul>");
}

/// Replaces `<` and `>` so assertion prose cannot open tags.
#[must_use]
pub fn escape_text(text: &str) -> String {
    text.replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

#[cfg(test)]
#[path = "tests/decorator.rs"]
mod tests;
