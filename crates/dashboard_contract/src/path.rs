//! Coordinate paths addressing sections and items in nested layouts.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One step of an item path: an item within a section of a single layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayoutCoordinate {
    /// Section index within the layout.
    pub section_index: usize,
    /// Item index within the section.
    pub item_index: usize,
}

impl LayoutCoordinate {
    /// Creates a coordinate.
    pub const fn new(section_index: usize, item_index: usize) -> Self {
        Self {
            section_index,
            item_index,
        }
    }
}

/// Root-to-leaf chain of coordinates addressing an item.
///
/// Every coordinate except the last must address an item whose widget is a nested layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemPath(Vec<LayoutCoordinate>);

impl ItemPath {
    /// Creates a path from a coordinate chain.
    pub fn new(coordinates: Vec<LayoutCoordinate>) -> Self {
        Self(coordinates)
    }

    /// Creates a single-step path into the root layout.
    pub fn root(section_index: usize, item_index: usize) -> Self {
        Self(vec![LayoutCoordinate::new(section_index, item_index)])
    }

    /// Returns the coordinate chain.
    pub fn coordinates(&self) -> &[LayoutCoordinate] {
        &self.0
    }

    /// Returns the nesting depth (number of coordinates).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for the empty path.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the addressed (last) coordinate.
    pub fn leaf(&self) -> Option<LayoutCoordinate> {
        self.0.last().copied()
    }

    /// Returns the path of the layout item containing this one, or `None` at the top level.
    pub fn parent(&self) -> Option<ItemPath> {
        match self.0.split_last() {
            Some((_, rest)) if !rest.is_empty() => Some(Self(rest.to_vec())),
            _ => None,
        }
    }

    /// Returns the path of the section that holds the addressed item.
    pub fn section_path(&self) -> Option<SectionPath> {
        let leaf = self.leaf()?;
        Some(SectionPath::new(self.parent(), leaf.section_index))
    }

    /// Returns a new path one level deeper.
    pub fn child(&self, section_index: usize, item_index: usize) -> ItemPath {
        let mut coordinates = self.0.clone();
        coordinates.push(LayoutCoordinate::new(section_index, item_index));
        Self(coordinates)
    }

    /// Returns a copy addressing a sibling in the same section.
    pub fn with_item_index(&self, item_index: usize) -> ItemPath {
        let mut coordinates = self.0.clone();
        if let Some(leaf) = coordinates.last_mut() {
            leaf.item_index = item_index;
        }
        Self(coordinates)
    }

    /// Returns a copy whose last coordinate is replaced, keeping the ancestor chain.
    pub fn with_leaf(&self, section_index: usize, item_index: usize) -> ItemPath {
        let mut coordinates = self.0.clone();
        coordinates.pop();
        coordinates.push(LayoutCoordinate::new(section_index, item_index));
        Self(coordinates)
    }

    /// Returns `true` when `prefix` is an ancestor chain of (or equal to) this path.
    pub fn starts_with(&self, prefix: &ItemPath) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl From<Vec<LayoutCoordinate>> for ItemPath {
    fn from(coordinates: Vec<LayoutCoordinate>) -> Self {
        Self(coordinates)
    }
}

impl fmt::Display for ItemPath {
    /// Formats as `"3_2-1_6"`; the empty path formats as `"undefined"`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("undefined");
        }
        for (position, coordinate) in self.0.iter().enumerate() {
            if position > 0 {
                f.write_str("-")?;
            }
            write!(f, "{}_{}", coordinate.section_index, coordinate.item_index)?;
        }
        Ok(())
    }
}

/// Address of a section at any nesting depth.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SectionPath {
    /// Path of the nested-layout item containing the section; `None` for the root layout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ItemPath>,
    /// Section index within the containing layout.
    pub section_index: usize,
}

impl SectionPath {
    /// Creates a section path, treating an empty parent chain as the root layout.
    pub fn new(parent: Option<ItemPath>, section_index: usize) -> Self {
        Self {
            parent: parent.filter(|path| !path.is_empty()),
            section_index,
        }
    }

    /// Creates a top-level section path.
    pub fn flat(section_index: usize) -> Self {
        Self {
            parent: None,
            section_index,
        }
    }

    /// Returns the parent chain, ignoring an empty one.
    pub fn parent(&self) -> Option<&ItemPath> {
        self.parent.as_ref().filter(|path| !path.is_empty())
    }

    /// Returns `true` for sections of the root layout.
    pub fn is_top_level(&self) -> bool {
        self.parent().is_none()
    }

    /// Returns a copy addressing a sibling section in the same layout.
    pub fn with_section_index(&self, section_index: usize) -> SectionPath {
        Self {
            parent: self.parent().cloned(),
            section_index,
        }
    }

    /// Returns the path of an item inside this section.
    pub fn item_path(&self, item_index: usize) -> ItemPath {
        match self.parent() {
            Some(parent) => parent.child(self.section_index, item_index),
            None => ItemPath::root(self.section_index, item_index),
        }
    }
}

impl fmt::Display for SectionPath {
    /// Formats as `"3_2-1_6-4"`; top-level sections format as their index.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.parent() {
            Some(parent) => write!(f, "{parent}-{}", self.section_index),
            None => write!(f, "{}", self.section_index),
        }
    }
}

/// Section address as accepted by commands: a flat root index or a full path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SectionIndex {
    /// Top-level section index.
    Flat(usize),
    /// Section at any depth.
    Path(SectionPath),
}

impl SectionIndex {
    /// Resolves either form into a [`SectionPath`].
    pub fn to_path(&self) -> SectionPath {
        match self {
            Self::Flat(index) => SectionPath::flat(*index),
            Self::Path(path) => SectionPath::new(path.parent().cloned(), path.section_index),
        }
    }

    /// Builds the canonical form: top-level paths collapse to [`SectionIndex::Flat`].
    pub fn from_path(path: SectionPath) -> Self {
        if path.is_top_level() {
            Self::Flat(path.section_index)
        } else {
            Self::Path(path)
        }
    }
}

impl From<usize> for SectionIndex {
    fn from(index: usize) -> Self {
        Self::Flat(index)
    }
}

impl From<SectionPath> for SectionIndex {
    fn from(path: SectionPath) -> Self {
        Self::from_path(path)
    }
}

impl fmt::Display for SectionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_path().fmt(f)
    }
}

/// Destination index where `-1` means "after the last element".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelativeIndex(pub i64);

impl RelativeIndex {
    /// Shorthand for appending at the end.
    pub const END: RelativeIndex = RelativeIndex(-1);

    /// Resolves against a sequence of `len` elements.
    ///
    /// Returns `None` for negative values other than `-1`. The result is not bounds checked.
    pub fn resolve(self, len: usize) -> Option<usize> {
        match self.0 {
            -1 => Some(len),
            index if index >= 0 => usize::try_from(index).ok(),
            _ => None,
        }
    }
}

impl From<i64> for RelativeIndex {
    fn from(index: i64) -> Self {
        Self(index)
    }
}

impl fmt::Display for RelativeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Destination of a section insertion or move.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SectionTarget {
    /// Nested-layout item receiving the section; `None` for the root layout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ItemPath>,
    /// Destination index in the receiving layout.
    pub index: RelativeIndex,
}

impl SectionTarget {
    /// Creates a root-layout target.
    pub fn top_level(index: i64) -> Self {
        Self {
            parent: None,
            index: RelativeIndex(index),
        }
    }

    /// Creates a target inside the nested layout at `parent`.
    pub fn nested(parent: ItemPath, index: i64) -> Self {
        Self {
            parent: Some(parent).filter(|path| !path.is_empty()),
            index: RelativeIndex(index),
        }
    }

    /// Returns the parent chain, ignoring an empty one.
    pub fn parent(&self) -> Option<&ItemPath> {
        self.parent.as_ref().filter(|path| !path.is_empty())
    }
}

impl From<i64> for SectionTarget {
    fn from(index: i64) -> Self {
        Self::top_level(index)
    }
}

impl fmt::Display for SectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.parent() {
            Some(parent) => write!(f, "{parent}-{}", self.index),
            None => write!(f, "{}", self.index),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn path(steps: &[(usize, usize)]) -> ItemPath {
        ItemPath::new(
            steps
                .iter()
                .map(|(section, item)| LayoutCoordinate::new(*section, *item))
                .collect(),
        )
    }

    #[test]
    fn item_path_serializes_to_stable_key() {
        assert_eq!(path(&[(3, 2), (1, 6), (4, 0)]).to_string(), "3_2-1_6-4_0");
        assert_eq!(ItemPath::default().to_string(), "undefined");
    }

    #[test]
    fn section_path_serializes_to_stable_key() {
        let nested = SectionPath::new(Some(path(&[(3, 2), (1, 6)])), 4);
        assert_eq!(nested.to_string(), "3_2-1_6-4");
        assert_eq!(SectionPath::flat(1).to_string(), "1");
        assert_eq!(SectionPath::new(Some(ItemPath::default()), 7).to_string(), "7");
    }

    #[test]
    fn parent_and_section_paths_follow_the_chain() {
        let item = path(&[(0, 1), (2, 3)]);
        assert_eq!(item.parent(), Some(path(&[(0, 1)])));
        assert_eq!(
            item.section_path(),
            Some(SectionPath::new(Some(path(&[(0, 1)])), 2))
        );
        assert_eq!(path(&[(0, 1)]).parent(), None);
        assert_eq!(
            SectionPath::new(Some(path(&[(0, 1)])), 2).item_path(3),
            item
        );
    }

    #[test]
    fn ancestor_chains_are_prefixes() {
        let item = path(&[(0, 1), (2, 3), (0, 0)]);

        assert!(item.starts_with(&path(&[(0, 1)])));
        assert!(item.starts_with(&item));
        assert!(!item.starts_with(&path(&[(0, 2)])));
    }

    #[test]
    fn sibling_variants_leave_the_original_untouched() {
        let item = path(&[(0, 1), (2, 3)]);

        assert_eq!(item.with_item_index(5), path(&[(0, 1), (2, 5)]));
        assert_eq!(item.with_leaf(4, 0), path(&[(0, 1), (4, 0)]));
        assert_eq!(item, path(&[(0, 1), (2, 3)]));
        assert_eq!(ItemPath::default().with_item_index(1), ItemPath::default());

        let section = SectionPath::new(Some(path(&[(0, 1)])), 2);
        assert_eq!(section.with_section_index(0).to_string(), "0_1-0");
        assert_eq!(section.section_index, 2);
    }

    #[test]
    fn flat_index_round_trips_through_path_form() {
        let flat = SectionIndex::Flat(4);
        let as_path = flat.to_path();
        assert_eq!(as_path, SectionPath { parent: None, section_index: 4 });
        assert_eq!(SectionIndex::from_path(as_path), flat);
    }

    #[test]
    fn section_index_deserializes_both_forms() {
        let flat: SectionIndex = serde_json::from_str("2").expect("flat");
        let nested: SectionIndex = serde_json::from_str(
            r#"{"parent":[{"section_index":0,"item_index":1}],"section_index":3}"#,
        )
        .expect("nested");

        assert_eq!(flat, SectionIndex::Flat(2));
        assert_eq!(
            nested,
            SectionIndex::Path(SectionPath::new(Some(path(&[(0, 1)])), 3))
        );
    }

    #[test]
    fn relative_index_resolves_end_shorthand() {
        assert_eq!(RelativeIndex::END.resolve(3), Some(3));
        assert_eq!(RelativeIndex(1).resolve(3), Some(1));
        assert_eq!(RelativeIndex(7).resolve(3), Some(7));
        assert_eq!(RelativeIndex(-2).resolve(3), None);
    }
}
