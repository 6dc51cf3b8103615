//! Binary search tree over tasks, keyed by deadline then priority.
//!
//! The tree is deliberately unbalanced: it is discarded and rebuilt on every
//! change to the task set, and task lists are small. Insertion, traversal and
//! teardown are iterative so a degenerate (list-shaped) tree is only slow,
//! never a stack overflow.

use std::cmp::Ordering;
use std::mem;

use chrono::{DateTime, Utc};

use crate::model::task::{Priority, Task};

/// Sort position of a due date. Declaration order makes every real instant
/// sort before `Never`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Deadline {
    At(DateTime<Utc>),
    Never,
}

impl Deadline {
    pub fn of(task: &Task) -> Self {
        task.due.map_or(Deadline::Never, Deadline::At)
    }
}

/// Composite sort key: deadline, then priority (lower number first).
pub fn sort_key(task: &Task) -> (Deadline, Priority) {
    (Deadline::of(task), task.priority)
}

/// Total order over tasks. `Equal` means the keys tie; placement then
/// depends only on insertion order.
pub fn compare_tasks(a: &Task, b: &Task) -> Ordering {
    sort_key(a).cmp(&sort_key(b))
}

#[derive(Debug)]
struct Node {
    task: Task,
    left: Option<Box<Node>>,
    right: Option<Box<Node>>,
}

impl Node {
    fn leaf(task: Task) -> Box<Node> {
        Box::new(Node {
            task,
            left: None,
            right: None,
        })
    }
}

/// Ordering index over the active task set.
///
/// Invariant: every task in a node's left subtree compares strictly before
/// the node's task; every task in its right subtree compares after or equal.
#[derive(Debug, Default)]
pub struct OrderIndex {
    root: Option<Box<Node>>,
    len: usize,
}

impl OrderIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Insert a task. Ties go right, so among equal keys the earlier
    /// insertion always traverses first.
    pub fn insert(&mut self, task: Task) {
        let mut slot = &mut self.root;
        while let Some(node) = slot {
            slot = if compare_tasks(&task, &node.task) == Ordering::Less {
                &mut node.left
            } else {
                &mut node.right
            };
        }
        *slot = Some(Node::leaf(task));
        self.len += 1;
    }

    /// In-order iterator: earliest deadline first, then ascending priority
    /// number, then insertion order.
    pub fn iter(&self) -> Iter<'_> {
        let mut iter = Iter { stack: Vec::new() };
        iter.push_left(self.root.as_deref());
        iter
    }

    /// The full sorted sequence, cloned out of the tree.
    pub fn ascending(&self) -> Vec<Task> {
        self.iter().cloned().collect()
    }

    /// Find a task by id. This walks the whole tree: the index is ordered by
    /// (deadline, priority), not by id.
    pub fn search(&self, id: &str) -> Option<&Task> {
        self.iter().find(|t| t.id == id)
    }

    /// Remove the node holding `task`, matched on sort key and id together.
    /// Returns the removed record, or `None` if no node matches.
    pub fn remove(&mut self, task: &Task) -> Option<Task> {
        let removed = remove_from(&mut self.root, task);
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack: Vec<(&Node, usize)> = self.root.as_deref().map(|n| (n, 1)).into_iter().collect();
        while let Some((node, d)) = stack.pop() {
            deepest = deepest.max(d);
            stack.extend(node.left.as_deref().map(|n| (n, d + 1)));
            stack.extend(node.right.as_deref().map(|n| (n, d + 1)));
        }
        deepest
    }

    /// Drop every node.
    pub fn clear(&mut self) {
        let mut stack: Vec<Box<Node>> = self.root.take().into_iter().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
        self.len = 0;
    }
}

impl Drop for OrderIndex {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<'a> IntoIterator for &'a OrderIndex {
    type Item = &'a Task;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

fn remove_from(slot: &mut Option<Box<Node>>, target: &Task) -> Option<Task> {
    let node = slot.as_mut()?;
    match compare_tasks(target, &node.task) {
        Ordering::Less => remove_from(&mut node.left, target),
        Ordering::Greater => remove_from(&mut node.right, target),
        // Equal keys live to the right
        Ordering::Equal if node.task.id != target.id => remove_from(&mut node.right, target),
        Ordering::Equal => detach(slot),
    }
}

/// Unlink the node in `slot`, keeping the subtree ordered.
fn detach(slot: &mut Option<Box<Node>>) -> Option<Task> {
    let node = slot.as_mut()?;
    if node.left.is_some() && node.right.is_some() {
        // The in-order successor moves up into this node. Nothing is
        // copied, so the remaining in-order sequence is unchanged.
        let successor = take_min(&mut node.right)?;
        return Some(mem::replace(&mut node.task, successor));
    }
    let mut node = slot.take()?;
    *slot = node.left.take().or_else(|| node.right.take());
    Some(node.task)
}

/// Remove and return the leftmost task of a subtree.
fn take_min(mut slot: &mut Option<Box<Node>>) -> Option<Task> {
    while slot.as_ref()?.left.is_some() {
        slot = &mut slot.as_mut()?.left;
    }
    let mut node = slot.take()?;
    *slot = node.right.take();
    Some(node.task)
}

/// In-order iterator over an [`OrderIndex`].
pub struct Iter<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iter<'a> {
    fn push_left(&mut self, mut node: Option<&'a Node>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left.as_deref();
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Task;

    fn next(&mut self) -> Option<&'a Task> {
        let node = self.stack.pop()?;
        self.push_left(node.right.as_deref());
        Some(&node.task)
    }
}
