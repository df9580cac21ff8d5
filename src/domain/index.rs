//! Ordered course index: an unbalanced binary search tree keyed by course number.

use generational_arena::{Arena, Index};
use termtree::Tree;
use tracing::{instrument, trace};

use crate::domain::entities::Course;

/// Levels shown by [`CourseIndex::to_tree_string`].
pub const DEFAULT_RENDER_DEPTH: usize = 64;

/// Leaf standing in for subtrees below the render depth.
pub const TRUNCATED_MARKER: &str = "…";

/// Tree node in the arena-based search tree.
#[derive(Debug)]
pub struct IndexNode {
    /// Course owned by this node
    pub course: Course,
    /// Subtree with keys strictly less than this node's key
    pub left: Option<Index>,
    /// Subtree with keys greater than or equal to this node's key
    pub right: Option<Index>,
}

/// Arena-backed binary search tree over course records.
///
/// Keys compare lexicographically by course number. Equal keys are routed to
/// the right subtree on insert; no rebalancing happens, so a sorted insertion
/// sequence degrades the tree into a list.
#[derive(Debug)]
pub struct CourseIndex {
    /// Arena storage for all tree nodes
    arena: Arena<IndexNode>,
    /// Index of the root node, None for empty trees
    root: Option<Index>,
}

impl Default for CourseIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl CourseIndex {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Insert a course. Always succeeds; duplicates of an existing key go right.
    #[instrument(level = "trace", skip(self, course), fields(number = course.number()))]
    pub fn insert(&mut self, course: Course) {
        let parent = self.insertion_parent(course.number());
        let goes_left = parent
            .and_then(|idx| self.arena.get(idx))
            .map(|p| course.number() < p.course.number());

        let node_idx = self.arena.insert(IndexNode {
            course,
            left: None,
            right: None,
        });

        match (parent.and_then(|idx| self.arena.get_mut(idx)), goes_left) {
            (Some(parent), Some(true)) => parent.left = Some(node_idx),
            (Some(parent), _) => parent.right = Some(node_idx),
            (None, _) => self.root = Some(node_idx),
        }
    }

    /// Walk down to the node that will receive a new child for `key`.
    fn insertion_parent(&self, key: &str) -> Option<Index> {
        let mut current = self.root?;
        loop {
            let node = self.arena.get(current)?;
            let next = if key < node.course.number() {
                node.left
            } else {
                node.right
            };
            match next {
                Some(child) => current = child,
                None => return Some(current),
            }
        }
    }

    /// Exact-key lookup.
    ///
    /// Returns the first match on the search path. With duplicate keys that is
    /// the earliest inserted one; later duplicates sit in its right subtree and
    /// are never returned.
    #[instrument(level = "trace", skip(self))]
    pub fn find(&self, key: &str) -> Option<&Course> {
        let mut current = self.root;
        while let Some(node) = current.and_then(|idx| self.arena.get(idx)) {
            let node_key = node.course.number();
            if key == node_key {
                trace!("find: hit {}", key);
                return Some(&node.course);
            }
            current = if key < node_key { node.left } else { node.right };
        }
        None
    }

    pub fn contains(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn get_node(&self, idx: Index) -> Option<&IndexNode> {
        self.arena.get(idx)
    }

    /// Fresh in-order traversal: courses in ascending key order.
    pub fn iter(&self) -> InOrderIterator<'_> {
        InOrderIterator::new(self)
    }

    /// In-order traversal collected into a vector.
    #[instrument(level = "debug", skip(self))]
    pub fn in_order(&self) -> Vec<&Course> {
        self.iter().collect()
    }

    /// Number of nodes on the longest root-to-leaf path (0 when empty).
    #[instrument(level = "debug", skip(self))]
    pub fn height(&self) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(Index, usize)> = self.root.map(|r| (r, 1)).into_iter().collect();

        while let Some((idx, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let Some(node) = self.arena.get(idx) {
                stack.extend(node.left.map(|c| (c, depth + 1)));
                stack.extend(node.right.map(|c| (c, depth + 1)));
            }
        }
        max_depth
    }

    /// Render the tree shape, left child listed before right child.
    ///
    /// Shorthand for [`Self::to_tree_string_with_depth`] with
    /// [`DEFAULT_RENDER_DEPTH`].
    pub fn to_tree_string(&self) -> Tree<String> {
        self.to_tree_string_with_depth(DEFAULT_RENDER_DEPTH)
    }

    /// Render at most `max_depth` levels; deeper subtrees collapse into a
    /// single [`TRUNCATED_MARKER`] leaf.
    ///
    /// The tree is assembled bottom-up from an explicit post-order stack, so
    /// a degenerate index of any length renders without recursion.
    #[instrument(level = "debug", skip(self))]
    pub fn to_tree_string_with_depth(&self, max_depth: usize) -> Tree<String> {
        let Some(root) = self.root else {
            return Tree::new("Empty index".to_string());
        };
        let max_depth = max_depth.max(1);

        // (node, depth, children already rendered)
        let mut pending: Vec<(Index, usize, bool)> = vec![(root, 1, false)];
        let mut rendered: Vec<Tree<String>> = Vec::new();

        while let Some((idx, depth, expanded)) = pending.pop() {
            let Some(node) = self.arena.get(idx) else {
                rendered.push(Tree::new("?".to_string()));
                continue;
            };
            let children: Vec<Index> = [node.left, node.right].into_iter().flatten().collect();
            let label = node.course.number().to_string();

            if expanded {
                let leaves = rendered.split_off(rendered.len() - children.len());
                rendered.push(Tree::new(label).with_leaves(leaves));
            } else if depth >= max_depth && !children.is_empty() {
                rendered.push(Tree::new(label).with_leaves([Tree::new(TRUNCATED_MARKER.to_string())]));
            } else {
                pending.push((idx, depth, true));
                pending.extend(children.iter().rev().map(|&child| (child, depth + 1, false)));
            }
        }

        rendered
            .pop()
            .unwrap_or_else(|| Tree::new("Empty index".to_string()))
    }
}

/// Explicit-stack in-order iterator; does not recurse, so degenerate trees are safe.
pub struct InOrderIterator<'a> {
    index: &'a CourseIndex,
    stack: Vec<Index>,
}

impl<'a> InOrderIterator<'a> {
    fn new(index: &'a CourseIndex) -> Self {
        let mut iter = Self {
            index,
            stack: Vec::new(),
        };
        iter.push_left_spine(index.root);
        iter
    }

    fn push_left_spine(&mut self, mut current: Option<Index>) {
        while let Some(idx) = current {
            self.stack.push(idx);
            current = self.index.get_node(idx).and_then(|n| n.left);
        }
    }
}

impl<'a> Iterator for InOrderIterator<'a> {
    type Item = &'a Course;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.stack.pop()?;
        let node = self.index.get_node(idx)?;
        self.push_left_spine(node.right);
        Some(&node.course)
    }
}

impl<'a> IntoIterator for &'a CourseIndex {
    type Item = &'a Course;
    type IntoIter = InOrderIterator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(number: &str, title: &str) -> Course {
        Course::new(number, title, vec![])
    }

    //        M
    //       / \
    //      C   T
    //     / \
    //    A   F
    fn sample_index() -> CourseIndex {
        let mut index = CourseIndex::new();
        for key in ["M", "C", "T", "A", "F"] {
            index.insert(course(key, key));
        }
        index
    }

    #[test]
    fn given_empty_index_when_querying_then_nothing_found() {
        let index = CourseIndex::new();

        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
        assert_eq!(index.height(), 0);
        assert!(index.find("A").is_none());
        assert_eq!(index.iter().count(), 0);
    }

    #[test]
    fn given_sample_tree_when_inserting_then_links_follow_key_order() {
        let index = sample_index();
        let root = index.get_node(index.root().unwrap()).unwrap();
        let left = index.get_node(root.left.unwrap()).unwrap();

        assert_eq!(root.course.number(), "M");
        assert_eq!(left.course.number(), "C");
        assert_eq!(
            index.get_node(left.left.unwrap()).unwrap().course.number(),
            "A"
        );
        assert_eq!(
            index.get_node(left.right.unwrap()).unwrap().course.number(),
            "F"
        );
        assert_eq!(index.height(), 3);
    }

    #[test]
    fn given_sample_tree_when_iterating_twice_then_each_pass_is_sorted() {
        let index = sample_index();

        let first: Vec<_> = index.iter().map(Course::number).collect();
        let second: Vec<_> = index.iter().map(Course::number).collect();

        assert_eq!(first, vec!["A", "C", "F", "M", "T"]);
        assert_eq!(first, second);
    }

    #[test]
    fn given_duplicate_key_when_inserting_then_routes_right_and_find_returns_first() {
        let mut index = CourseIndex::new();
        index.insert(course("B", "first"));
        index.insert(course("B", "second"));

        let root = index.get_node(index.root().unwrap()).unwrap();
        assert!(root.left.is_none());
        let right = index.get_node(root.right.unwrap()).unwrap();
        assert_eq!(right.course.title(), "second");

        assert_eq!(index.find("B").unwrap().title(), "first");
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn given_sorted_inserts_when_measuring_height_then_tree_is_degenerate() {
        let mut index = CourseIndex::new();
        for key in ["A", "B", "C", "D"] {
            index.insert(course(key, key));
        }

        assert_eq!(index.height(), 4);
    }

    #[test]
    fn given_sample_tree_when_rendering_then_shows_shape() {
        let rendered = sample_index().to_tree_string().to_string();

        assert!(rendered.starts_with("M\n"));
        assert!(rendered.contains("C"));
        assert!(rendered.contains("F"));
    }

    #[test]
    fn given_depth_limit_when_rendering_then_deeper_levels_collapse() {
        let rendered = sample_index().to_tree_string_with_depth(2).to_string();

        assert!(rendered.starts_with("M\n"));
        assert!(rendered.find('C') < rendered.find('T'));
        assert!(rendered.contains(TRUNCATED_MARKER));
        assert!(!rendered.contains('A'));
        assert!(!rendered.contains('F'));
    }
}
