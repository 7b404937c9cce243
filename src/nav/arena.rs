use crate::models::MenuRecord;
use crate::util::console_warn;
use std::collections::BTreeMap;

/// One navigation entry, arena-resident.
///
/// Relations are stored as id references, never as embedded sub-objects, so
/// the same logical node cannot alias between derived views (raw tree vs.
/// rendered navigation vs. form state).
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct MenuNode {
    pub id: i64,
    pub title: String,
    pub url: String,

    /// Depth in the tree; roots are 0, a child is always parent.level + 1.
    pub level: u32,

    pub parent_id: Option<i64>,
    pub display_order: i64,
    pub is_active: bool,

    /// Child ids in sibling order.
    pub children: Vec<i64>,
}

/// Id-keyed arena over the whole menu forest.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct MenuArena {
    nodes: BTreeMap<i64, MenuNode>,
    roots: Vec<i64>,
}

impl MenuArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an arena from the backend's nested records.
    ///
    /// Levels are assigned from traversal depth and parent ids from the
    /// traversal itself, so the parent/level invariants hold by construction
    /// regardless of what the records claim. Duplicate ids are skipped (first
    /// occurrence wins). Sibling order is taken verbatim from the input.
    pub fn from_records(records: &[MenuRecord]) -> Self {
        let mut arena = Self::new();
        for rec in records {
            arena.insert_subtree(rec, None, 0);
        }
        arena
    }

    fn insert_subtree(&mut self, rec: &MenuRecord, parent_id: Option<i64>, level: u32) {
        if self.nodes.contains_key(&rec.id) {
            console_warn(&format!("duplicate menu id {} skipped", rec.id));
            return;
        }

        self.nodes.insert(
            rec.id,
            MenuNode {
                id: rec.id,
                title: rec.title.clone(),
                url: rec.url.clone(),
                level,
                parent_id,
                display_order: rec.display_order,
                is_active: rec.is_active,
                children: Vec::new(),
            },
        );

        match parent_id {
            Some(pid) => {
                if let Some(parent) = self.nodes.get_mut(&pid) {
                    parent.children.push(rec.id);
                }
            }
            None => self.roots.push(rec.id),
        }

        for child in &rec.children {
            self.insert_subtree(child, Some(rec.id), level + 1);
        }
    }

    pub fn get(&self, id: i64) -> Option<&MenuNode> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn roots(&self) -> &[i64] {
        &self.roots
    }

    /// Children of `id` in sibling order; empty for leaves and unknown ids.
    pub fn children_of(&self, id: i64) -> Vec<&MenuNode> {
        let Some(node) = self.nodes.get(&id) else {
            return Vec::new();
        };
        node.children
            .iter()
            .filter_map(|cid| self.nodes.get(cid))
            .collect()
    }

    /// The node plus every transitive descendant, preorder.
    pub fn subtree_ids(&self, id: i64) -> Vec<i64> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            let Some(node) = self.nodes.get(&cur) else {
                continue;
            };
            out.push(cur);
            // Push in reverse so preorder pops left-to-right.
            for cid in node.children.iter().rev() {
                stack.push(*cid);
            }
        }
        out
    }

    /// Whether `candidate` sits anywhere below `of`.
    ///
    /// Re-parenting a node under its own descendant would create a cycle;
    /// callers must reject the move when this returns true.
    pub fn is_descendant(&self, candidate: i64, of: i64) -> bool {
        if candidate == of {
            return false;
        }
        self.subtree_ids(of).iter().skip(1).any(|id| *id == candidate)
    }

    /// Hard-remove a node and its whole subtree, detaching it from its
    /// parent's child list. Removing an absent id is a no-op.
    ///
    /// Returns the removed ids (empty when the id was absent).
    pub fn remove_subtree(&mut self, id: i64) -> Vec<i64> {
        if !self.nodes.contains_key(&id) {
            return Vec::new();
        }

        let removed = self.subtree_ids(id);
        let parent_id = self.nodes.get(&id).and_then(|n| n.parent_id);

        for rid in &removed {
            self.nodes.remove(rid);
        }

        match parent_id {
            Some(pid) => {
                if let Some(parent) = self.nodes.get_mut(&pid) {
                    parent.children.retain(|cid| *cid != id);
                }
            }
            None => self.roots.retain(|rid| *rid != id),
        }

        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, title: &str, children: Vec<MenuRecord>) -> MenuRecord {
        MenuRecord {
            id,
            parent_id: None,
            title: title.to_string(),
            url: format!("/{}", title.to_lowercase()),
            display_order: 0,
            is_active: true,
            children,
        }
    }

    fn sample() -> Vec<MenuRecord> {
        vec![
            record(1, "Home", vec![]),
            record(
                2,
                "Specialties",
                vec![
                    record(21, "Cardiology", vec![record(211, "Team", vec![])]),
                    record(22, "Oncology", vec![]),
                ],
            ),
            record(3, "Contact", vec![]),
        ]
    }

    #[test]
    fn test_from_records_preserves_count_parenthood_and_order() {
        let arena = MenuArena::from_records(&sample());
        assert_eq!(arena.node_count(), 6);
        assert_eq!(arena.roots(), &[1, 2, 3]);

        let kids = arena.children_of(2);
        assert_eq!(
            kids.iter().map(|n| n.id).collect::<Vec<_>>(),
            vec![21, 22],
            "sibling order must follow input order"
        );
        for kid in kids {
            assert_eq!(kid.parent_id, Some(2));
            assert_eq!(kid.level, 1);
        }
        assert_eq!(arena.get(211).map(|n| n.level), Some(2));
        assert_eq!(arena.get(211).and_then(|n| n.parent_id), Some(21));
    }

    #[test]
    fn test_levels_assigned_from_depth() {
        let arena = MenuArena::from_records(&sample());
        for id in arena.subtree_ids(2) {
            let node = arena.get(id).expect("node exists");
            match node.parent_id {
                Some(pid) => {
                    let parent = arena.get(pid).expect("parent exists");
                    assert_eq!(node.level, parent.level + 1);
                }
                None => assert_eq!(node.level, 0),
            }
        }
    }

    #[test]
    fn test_is_descendant() {
        let arena = MenuArena::from_records(&sample());
        assert!(arena.is_descendant(211, 2));
        assert!(arena.is_descendant(21, 2));
        assert!(!arena.is_descendant(2, 21));
        assert!(!arena.is_descendant(3, 2));
        // A node is not its own descendant.
        assert!(!arena.is_descendant(2, 2));
    }

    #[test]
    fn test_remove_subtree_drops_descendants_and_detaches() {
        let mut arena = MenuArena::from_records(&sample());
        let removed = arena.remove_subtree(21);
        assert_eq!(removed, vec![21, 211]);
        assert!(!arena.contains(21));
        assert!(!arena.contains(211));
        assert_eq!(
            arena.children_of(2).iter().map(|n| n.id).collect::<Vec<_>>(),
            vec![22]
        );
        assert_eq!(arena.node_count(), 4);
    }

    #[test]
    fn test_remove_absent_id_is_noop() {
        // Deleting menu id 42 that is already gone must not throw.
        let mut arena = MenuArena::from_records(&sample());
        let removed = arena.remove_subtree(42);
        assert!(removed.is_empty());
        assert_eq!(arena.node_count(), 6);
    }

    #[test]
    fn test_duplicate_ids_first_occurrence_wins() {
        let records = vec![
            record(1, "Home", vec![]),
            record(1, "Shadow", vec![record(5, "Orphan", vec![])]),
        ];
        let arena = MenuArena::from_records(&records);
        assert_eq!(arena.node_count(), 1);
        assert_eq!(arena.get(1).map(|n| n.title.as_str()), Some("Home"));
    }

    #[test]
    fn test_remove_root_updates_roots() {
        let mut arena = MenuArena::from_records(&sample());
        arena.remove_subtree(2);
        assert_eq!(arena.roots(), &[1, 3]);
        assert_eq!(arena.node_count(), 2);
    }
}
