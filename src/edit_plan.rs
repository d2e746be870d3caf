//! The edit plan collects the markup to splice into a document.
//!
//! Decorating the specification never rewrites what is already there: every change is an
//! insertion at a byte offset of the original source. Offsets always refer to the unmodified
//! source; the plan is applied once at the end.

use tracing::debug;

#[derive(Clone, Debug, Default)]
/// Ordered collection of insertions against one source text.
pub struct EditPlan {
    /// Insertions in the order they were planned.
    pub edits: Vec<Edit>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Markup to insert at a byte offset of the original source.
pub struct Edit {
    /// Byte offset in the original source; must fall on a character boundary.
    pub offset: usize,
    /// Markup inserted at the offset.
    pub content: String,
    /// What the insertion is for, used in logs.
    pub item_name: String,
}

impl EditPlan {
    #[must_use]
    /// Creates an empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Plans `content` for insertion at `offset`.
    pub fn insert(&mut self, offset: usize, content: impl Into<String>, item_name: impl Into<String>) {
        self.edits.push(Edit {
            offset,
            content: content.into(),
            item_name: item_name.into(),
        });
    }

    #[must_use]
    /// Whether nothing has been planned.
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    #[must_use]
    /// Applies all insertions to `source`.
    ///
    /// Insertions sharing an offset appear in the order they were planned. Offsets past the end
    /// of the source are clamped to the end, and offsets inside a multi-byte character move back
    /// to the start of that character.
    pub fn apply(&self, source: &str) -> String {
        let mut ordered: Vec<&Edit> = self.edits.iter().collect();
        ordered.sort_by_key(|edit| edit.offset);

        let extra: usize = ordered.iter().map(|edit| edit.content.len()).sum();
        let mut output = String::with_capacity(source.len() + extra);
        let mut cursor = 0;
        for edit in ordered {
            let mut offset = edit.offset.min(source.len());
            while !source.is_char_boundary(offset) {
                offset -= 1;
            }
            debug!(item = %edit.item_name, offset, "applying insertion");
            if offset > cursor {
                output.push_str(&source[cursor..offset]);
                cursor = offset;
            }
            output.push_str(&edit.content);
        }
        output.push_str(&source[cursor..]);
        output
    }
}

#[cfg(test)]
#[path = "tests/edit_plan.rs"]
mod tests;
