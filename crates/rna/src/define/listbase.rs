// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Arena-backed doubly linked list.
//!
//! Nodes are addressed by stable `usize` keys (arena slots), which is what
//! list-storage collections hand out as storage keys. Removed slots are
//! recycled.

use std::fmt;

#[derive(Clone)]
struct Node<T> {
    value: T,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Doubly linked list with stable node keys.
#[derive(Clone)]
pub struct ListBase<T> {
    nodes: Vec<Option<Node<T>>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<T> Default for ListBase<T> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }
}

impl<T> ListBase<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn first_key(&self) -> Option<usize> {
        self.head
    }

    pub fn last_key(&self) -> Option<usize> {
        self.tail
    }

    pub fn next_key(&self, key: usize) -> Option<usize> {
        self.node(key)?.next
    }

    pub fn prev_key(&self, key: usize) -> Option<usize> {
        self.node(key)?.prev
    }

    pub fn get(&self, key: usize) -> Option<&T> {
        self.node(key).map(|n| &n.value)
    }

    pub fn get_mut(&mut self, key: usize) -> Option<&mut T> {
        self.node_mut(key).map(|n| &mut n.value)
    }

    /// Key of the node at list position `pos`.
    pub fn key_at(&self, pos: usize) -> Option<usize> {
        let mut key = self.head;
        for _ in 0..pos {
            key = self.next_key(key?);
        }
        key
    }

    pub fn push_back(&mut self, value: T) -> usize {
        let key = self.alloc(Node {
            value,
            prev: self.tail,
            next: None,
        });
        match self.tail.and_then(|t| self.node_mut(t)) {
            Some(tail) => tail.next = Some(key),
            None => self.head = Some(key),
        }
        self.tail = Some(key);
        self.len += 1;
        key
    }

    pub fn push_front(&mut self, value: T) -> usize {
        let key = self.alloc(Node {
            value,
            prev: None,
            next: self.head,
        });
        match self.head.and_then(|h| self.node_mut(h)) {
            Some(head) => head.prev = Some(key),
            None => self.tail = Some(key),
        }
        self.head = Some(key);
        self.len += 1;
        key
    }

    /// Insert after the node `anchor`; `None` if the anchor does not exist.
    pub fn insert_after(&mut self, anchor: usize, value: T) -> Option<usize> {
        let next = self.node(anchor)?.next;
        let key = self.alloc(Node {
            value,
            prev: Some(anchor),
            next,
        });
        if let Some(node) = self.node_mut(anchor) {
            node.next = Some(key);
        }
        match next.and_then(|n| self.node_mut(n)) {
            Some(node) => node.prev = Some(key),
            None => self.tail = Some(key),
        }
        self.len += 1;
        Some(key)
    }

    /// Insert before the node `anchor`; `None` if the anchor does not exist.
    pub fn insert_before(&mut self, anchor: usize, value: T) -> Option<usize> {
        match self.node(anchor)?.prev {
            Some(prev) => self.insert_after(prev, value),
            None => Some(self.push_front(value)),
        }
    }

    pub fn remove(&mut self, key: usize) -> Option<T> {
        self.unlink(key).map(|n| n.value)
    }

    /// Move the node at position `from` so it ends up at position `to`.
    ///
    /// The node keeps its key.
    pub fn move_to(&mut self, from: usize, to: usize) -> bool {
        if from >= self.len || to >= self.len {
            return false;
        }
        if from == to {
            return true;
        }
        let Some(key) = self.key_at(from) else {
            return false;
        };
        let Some(node) = self.unlink(key) else {
            return false;
        };
        let value = node.value;
        let moved = if to == 0 {
            Some(self.push_front(value))
        } else {
            match self.key_at(to - 1) {
                Some(anchor) => self.insert_after(anchor, value),
                None => Some(self.push_back(value)),
            }
        };
        moved.is_some()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    /// Keys in list order.
    pub fn keys(&self) -> Vec<usize> {
        let mut keys = Vec::with_capacity(self.len);
        let mut key = self.head;
        while let Some(k) = key {
            keys.push(k);
            key = self.next_key(k);
        }
        keys
    }

    fn node(&self, key: usize) -> Option<&Node<T>> {
        self.nodes.get(key).and_then(|n| n.as_ref())
    }

    fn node_mut(&mut self, key: usize) -> Option<&mut Node<T>> {
        self.nodes.get_mut(key).and_then(|n| n.as_mut())
    }

    fn alloc(&mut self, node: Node<T>) -> usize {
        match self.free.pop() {
            Some(key) => {
                self.nodes[key] = Some(node);
                key
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        }
    }

    fn unlink(&mut self, key: usize) -> Option<Node<T>> {
        let node = self.nodes.get_mut(key)?.take()?;
        match node.prev.and_then(|p| self.node_mut(p)) {
            Some(prev) => prev.next = node.next,
            None => self.head = node.next,
        }
        match node.next.and_then(|n| self.node_mut(n)) {
            Some(next) => next.prev = node.prev,
            None => self.tail = node.prev,
        }
        self.free.push(key);
        self.len -= 1;
        Some(node)
    }
}

impl<T> FromIterator<T> for ListBase<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        for value in iter {
            list.push_back(value);
        }
        list
    }
}

impl<T: fmt::Debug> fmt::Debug for ListBase<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

pub struct Iter<'a, T> {
    list: &'a ListBase<T>,
    cursor: Option<usize>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.cursor?;
        let node = self.list.node(key)?;
        self.cursor = node.next;
        Some(&node.value)
    }
}
