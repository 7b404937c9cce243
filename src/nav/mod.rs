pub(crate) mod arena;
pub(crate) mod path;
pub(crate) mod reorder;
pub(crate) mod tree;

pub(crate) use arena::{MenuArena, MenuNode};
pub(crate) use path::MenuPathStack;
pub(crate) use reorder::DragReorder;
pub(crate) use tree::{navigation_tree, NavItem, NavItemKind};
