//! Structural paths into a syntax tree.
//!
//! A [`Path`] is a stack of labels describing the route from the root of a
//! traversal to the current node: slot names (`X`, `Body`, ...), list
//! indices (`0`, `1`, ...), package keys and the own label of source files
//! (`main.go`). Its `Display` form, labels joined by `/`, is the node's
//! identifier.
//!
//! The walker threads one `Path` through the whole recursion and mutates it
//! in place. Every push it makes goes through [`Path::scoped`], so the
//! matching pop runs on every exit path, including unwinding.

use core::fmt;
use core::ops::{Deref, DerefMut};

use ecow::EcoString;
use smallvec::SmallVec;

/// Separator between labels in the rendered identifier.
pub const SEPARATOR: &str = "/";

/// One path component.
pub type Label = EcoString;

/// Ordered stack of labels.
///
/// Cloning produces an independent deep copy, so a clone can outlive the
/// traversal that produced it.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path {
    labels: SmallVec<[Label; 16]>,
}

impl Path {
    pub const fn new() -> Self {
        Self {
            labels: SmallVec::new_const(),
        }
    }

    /// Appends `label`.
    pub fn push(&mut self, label: impl Into<Label>) {
        self.labels.push(label.into());
    }

    /// Removes the last label.
    ///
    /// Popping an empty path means pushes and pops went out of balance.
    pub fn pop(&mut self) -> Option<Label> {
        debug_assert!(!self.labels.is_empty(), "pop on an empty path");
        self.labels.pop()
    }

    /// Returns a copy of this path with `labels` appended, leaving `self`
    /// untouched.
    pub fn pushed<I, L>(&self, labels: I) -> Path
    where
        I: IntoIterator<Item = L>,
        L: Into<Label>,
    {
        let mut copy = self.clone();
        copy.labels.extend(labels.into_iter().map(Into::into));
        copy
    }

    /// Pushes `label` and returns a guard that pops it again when dropped.
    ///
    /// The guard derefs to the path, so scopes nest:
    ///
    /// ```
    /// use idast_core::Path;
    ///
    /// let mut path = Path::new();
    /// {
    ///     let mut body = path.scoped("Body");
    ///     let item = body.scoped("0");
    ///     assert_eq!(item.to_string(), "Body/0");
    /// }
    /// assert!(path.is_empty());
    /// ```
    pub fn scoped(&mut self, label: impl Into<Label>) -> Scoped<'_> {
        self.push(label);
        Scoped { path: self }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn last(&self) -> Option<&str> {
        self.labels.last().map(EcoString::as_str)
    }

    /// True if `prefix` labels are a prefix of this path.
    pub fn starts_with(&self, prefix: &Path) -> bool {
        self.labels.starts_with(&prefix.labels)
    }
}

impl<L: Into<Label>> FromIterator<L> for Path {
    fn from_iter<I: IntoIterator<Item = L>>(iter: I) -> Self {
        Self {
            labels: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, label) in self.labels.iter().enumerate() {
            if i > 0 {
                f.write_str(SEPARATOR)?;
            }
            f.write_str(label)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path(\"{self}\")")
    }
}

impl serde::Serialize for Path {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Guard returned by [`Path::scoped`]; pops its label on drop.
pub struct Scoped<'p> {
    path: &'p mut Path,
}

impl Deref for Scoped<'_> {
    type Target = Path;

    fn deref(&self) -> &Path {
        self.path
    }
}

impl DerefMut for Scoped<'_> {
    fn deref_mut(&mut self) -> &mut Path {
        self.path
    }
}

impl Drop for Scoped<'_> {
    fn drop(&mut self) {
        self.path.pop();
    }
}

#[cfg(test)]
#[path = "path_test.rs"]
mod path_test;
