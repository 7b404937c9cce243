/// Anything with a stable menu id; lets the controller reorder both raw
/// records and arena projections.
pub(crate) trait HasMenuId {
    fn menu_id(&self) -> i64;
    fn set_display_order(&mut self, order: i64);
}

impl HasMenuId for crate::models::MenuRecord {
    fn menu_id(&self) -> i64 {
        self.id
    }

    fn set_display_order(&mut self, order: i64) {
        self.display_order = order;
    }
}

impl HasMenuId for crate::nav::MenuNode {
    fn menu_id(&self) -> i64 {
        self.id
    }

    fn set_display_order(&mut self, order: i64) {
        self.display_order = order;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum DragState {
    #[default]
    Idle,
    Dragging {
        source_id: i64,
    },
}

/// Pointer-drag reordering over one array of sibling nodes.
///
/// Purely synchronous client state; nothing is persisted until the
/// surrounding form is explicitly saved. Dropping onto self, onto an
/// unknown target, or ending the drag without a drop all leave the array
/// untouched.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct DragReorder {
    state: DragState,
}

impl DragReorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn drag_start(&mut self, source_id: i64) {
        self.state = DragState::Dragging { source_id };
    }

    /// Hover signal only; no mutation.
    pub fn drag_over(&self, _target_id: i64) {}

    /// Drop over `target_id`: splice the dragged element out of its current
    /// index and re-insert it at the target's current index (a single array
    /// move, not a swap). Returns whether the order changed.
    pub fn drop_on<T: HasMenuId>(&mut self, target_id: i64, siblings: &mut Vec<T>) -> bool {
        let DragState::Dragging { source_id } = self.state else {
            return false;
        };
        self.state = DragState::Idle;

        if source_id == target_id {
            return false;
        }

        let Some(from) = siblings.iter().position(|s| s.menu_id() == source_id) else {
            return false;
        };
        let Some(to) = siblings.iter().position(|s| s.menu_id() == target_id) else {
            return false;
        };

        let moved = siblings.remove(from);
        siblings.insert(to, moved);
        true
    }

    /// Drag ended without a drop; no mutation.
    pub fn drag_end(&mut self) {
        self.state = DragState::Idle;
    }
}

/// Rewrite `display_order` from array index. The index-based order is the
/// authoritative sequence submitted on save.
pub(crate) fn assign_display_order<T: HasMenuId>(siblings: &mut [T]) {
    for (idx, item) in siblings.iter_mut().enumerate() {
        item.set_display_order(idx as i64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MenuRecord;

    fn row(id: i64) -> MenuRecord {
        MenuRecord {
            id,
            parent_id: None,
            title: format!("Item {id}"),
            url: String::new(),
            display_order: 0,
            is_active: true,
            children: vec![],
        }
    }

    fn ids(rows: &[MenuRecord]) -> Vec<i64> {
        rows.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_move_is_single_element_rotation() {
        let mut rows = vec![row(1), row(2), row(3), row(4)];
        let mut drag = DragReorder::new();

        drag.drag_start(1);
        drag.drag_over(3); // hover only
        assert_eq!(ids(&rows), vec![1, 2, 3, 4]);

        assert!(drag.drop_on(3, &mut rows));
        // No element duplicated or dropped.
        assert_eq!(ids(&rows), vec![2, 3, 1, 4]);
        assert_eq!(drag.state(), DragState::Idle);
    }

    #[test]
    fn test_move_backwards() {
        let mut rows = vec![row(1), row(2), row(3), row(4)];
        let mut drag = DragReorder::new();
        drag.drag_start(4);
        assert!(drag.drop_on(2, &mut rows));
        assert_eq!(ids(&rows), vec![1, 4, 2, 3]);
    }

    #[test]
    fn test_drop_on_self_is_noop() {
        let mut rows = vec![row(1), row(2)];
        let mut drag = DragReorder::new();
        drag.drag_start(2);
        assert!(!drag.drop_on(2, &mut rows));
        assert_eq!(ids(&rows), vec![1, 2]);
        assert_eq!(drag.state(), DragState::Idle);
    }

    #[test]
    fn test_drop_with_unknown_ids_is_noop() {
        let mut rows = vec![row(1), row(2)];
        let mut drag = DragReorder::new();

        drag.drag_start(42); // source no longer in the list
        assert!(!drag.drop_on(2, &mut rows));
        assert_eq!(ids(&rows), vec![1, 2]);

        drag.drag_start(1);
        assert!(!drag.drop_on(42, &mut rows)); // target vanished
        assert_eq!(ids(&rows), vec![1, 2]);
    }

    #[test]
    fn test_drag_end_without_drop_is_noop() {
        let mut rows = vec![row(1), row(2)];
        let mut drag = DragReorder::new();
        drag.drag_start(1);
        drag.drag_end();
        assert_eq!(drag.state(), DragState::Idle);
        assert!(!drag.drop_on(2, &mut rows), "no drag in flight after end");
        assert_eq!(ids(&rows), vec![1, 2]);
    }

    #[test]
    fn test_assign_display_order_is_index_based() {
        let mut rows = vec![row(7), row(3), row(9)];
        rows[0].display_order = 99;
        assign_display_order(&mut rows);
        let orders: Vec<i64> = rows.iter().map(|r| r.display_order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }
}
