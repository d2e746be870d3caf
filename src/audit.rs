//! Audit representation for TCK audit documents.
//!
//! A section represents a numbered division of the specification. It holds, in document order,
//! assertions that sit directly under it and groups of assertions sharing a preamble. Assertions
//! accumulate the tests that cover them once the coverage report has been resolved.

use reqwest::Url;
use serde::{Serialize, Serializer};

use crate::document::collapse_whitespace;

#[derive(Clone, Debug, Serialize)]
/// Numbered specification division with the assertions the TCK audits for it.
pub struct Section {
    /// Anchor id of the section heading in the specification document.
    pub id: String,
    /// Element id of the section in the coverage report.
    pub title: String,
    /// Nesting depth in the specification (informational).
    pub level: u32,
    /// Direct assertions and groups, in audit order.
    pub elements: Vec<SectionElement>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// Either a stand-alone assertion or a group of assertions.
pub enum SectionElement {
    /// Assertion directly under the section.
    Assertion(Assertion),
    /// Cluster of assertions under a shared preamble.
    Group(Group),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
/// Position of a group in its section's element list.
///
/// This is how an assertion refers back to the group it belongs to. It never owns the group.
pub struct GroupRef(pub usize);

#[derive(Clone, Debug, Serialize)]
/// Named cluster of related assertions.
pub struct Group {
    /// Human-readable preamble shared by the assertions.
    pub text: String,
    slot: GroupRef,
    assertions: Vec<Assertion>,
}

#[derive(Clone, Debug, Serialize)]
/// A normative claim the TCK must exercise.
pub struct Assertion {
    /// Assertion number, empty when the audit gives none.
    pub id: String,
    /// Normalised assertion body.
    pub text: String,
    /// Remark shown for untestable assertions.
    pub note: Option<String>,
    /// Whether the TCK is expected to cover the assertion.
    pub testable: bool,
    group: Option<GroupRef>,
    /// Covering tests, in coverage report order.
    pub tests: Vec<Test>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// A test method known to exercise an assertion.
pub struct Test {
    /// `ClassName.methodName`, as printed in the coverage report.
    pub method_name: String,
    /// Link to the test source, pinned to the released revision.
    #[serde(serialize_with = "serialize_url")]
    pub ref_url: Url,
    /// Package of the test class.
    pub package_name: String,
}

fn serialize_url<S: Serializer>(url: &Url, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(url.as_str())
}

impl Section {
    #[must_use]
    /// Creates an empty section.
    pub fn new(id: impl Into<String>, title: impl Into<String>, level: u32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            level,
            elements: Vec::new(),
        }
    }

    #[must_use]
    /// The reference the next group pushed onto this section will be known by.
    pub fn next_group_ref(&self) -> GroupRef {
        GroupRef(self.elements.len())
    }

    /// Appends an assertion directly under the section, clearing any group reference.
    pub fn push_assertion(&mut self, mut assertion: Assertion) {
        assertion.group = None;
        self.elements.push(SectionElement::Assertion(assertion));
    }

    /// Appends a group, re-pointing its assertions at the slot it actually lands in.
    pub fn push_group(&mut self, mut group: Group) {
        let slot = self.next_group_ref();
        if group.slot != slot {
            group.slot = slot;
            for assertion in &mut group.assertions {
                assertion.group = Some(slot);
            }
        }
        self.elements.push(SectionElement::Group(group));
    }

    /// Group stored at `group`, if that slot holds one.
    #[must_use]
    pub fn group(&self, group: GroupRef) -> Option<&Group> {
        match self.elements.get(group.0) {
            Some(SectionElement::Group(g)) => Some(g),
            _ => None,
        }
    }

    /// All assertions, direct and grouped, in document order.
    pub fn assertions(&self) -> impl Iterator<Item = &Assertion> {
        self.elements.iter().flat_map(|element| match element {
            SectionElement::Assertion(a) => std::slice::from_ref(a).iter(),
            SectionElement::Group(g) => g.assertions.iter(),
        })
    }

    /// Mutable access to all assertions, direct and grouped, in document order.
    pub fn assertions_mut(&mut self) -> impl Iterator<Item = &mut Assertion> {
        self.elements.iter_mut().flat_map(|element| match element {
            SectionElement::Assertion(a) => std::slice::from_mut(a).iter_mut(),
            SectionElement::Group(g) => g.assertions.iter_mut(),
        })
    }
}

impl Group {
    #[must_use]
    /// Creates an empty group that will occupy `slot` in its section.
    pub fn new(slot: GroupRef) -> Self {
        Self {
            text: String::new(),
            slot,
            assertions: Vec::new(),
        }
    }

    /// Appends an assertion and points it back at this group.
    pub fn push_assertion(&mut self, mut assertion: Assertion) {
        assertion.group = Some(self.slot);
        self.assertions.push(assertion);
    }

    #[must_use]
    /// Slot of this group in its section.
    pub fn slot(&self) -> GroupRef {
        self.slot
    }

    #[must_use]
    /// Assertions under the preamble, in audit order.
    pub fn assertions(&self) -> &[Assertion] {
        &self.assertions
    }
}

impl Default for Assertion {
    fn default() -> Self {
        Self {
            id: String::new(),
            text: String::new(),
            note: None,
            testable: true,
            group: None,
            tests: Vec::new(),
        }
    }
}

impl Assertion {
    #[must_use]
    /// Creates a testable assertion with no text yet.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    /// The group this assertion belongs to, if any.
    pub fn group(&self) -> Option<GroupRef> {
        self.group
    }

    #[must_use]
    /// Assertion text trimmed with whitespace runs collapsed to one space.
    pub fn normalized_text(&self) -> String {
        collapse_whitespace(&self.text)
    }
}

impl Test {
    #[must_use]
    /// Splits the method name at its first `.` into class part and the remainder (dot included).
    pub fn split_method(&self) -> (&str, &str) {
        match self.method_name.find('.') {
            Some(dot) => self.method_name.split_at(dot),
            None => (self.method_name.as_str(), ""),
        }
    }
}

#[cfg(test)]
#[path = "tests/audit.rs"]
mod tests;
