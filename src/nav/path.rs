/// One visited node on the drill-down trail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Breadcrumb {
    pub id: i64,
    pub title: String,
    pub level: u32,
}

/// Ordered trail of visited menu nodes for breadcrumb back-navigation.
///
/// `ids` and `crumbs` move in lockstep; the two always have equal length.
/// The visible trail equals the sequence of `push` calls since the last
/// `set_path`/`reset`, in call order.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct MenuPathStack {
    ids: Vec<i64>,
    crumbs: Vec<Breadcrumb>,
}

impl MenuPathStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: i64, title: &str, level: u32) {
        self.ids.push(id);
        self.crumbs.push(Breadcrumb {
            id,
            title: title.to_string(),
            level,
        });
    }

    /// Pop the most recent entry from both sequences.
    pub fn pop(&mut self) -> Option<Breadcrumb> {
        let crumb = self.crumbs.pop()?;
        self.ids.pop();
        Some(crumb)
    }

    /// Wholesale replacement, used when the user jumps via breadcrumb click
    /// rather than linear drill-down.
    pub fn set_path(&mut self, crumbs: Vec<Breadcrumb>) {
        self.ids = crumbs.iter().map(|c| c.id).collect();
        self.crumbs = crumbs;
    }

    /// Jump back to a crumb already on the trail, dropping everything after
    /// it. Unknown ids leave the trail untouched.
    pub fn truncate_to(&mut self, id: i64) {
        if let Some(pos) = self.ids.iter().position(|x| *x == id) {
            self.ids.truncate(pos + 1);
            self.crumbs.truncate(pos + 1);
        }
    }

    pub fn reset(&mut self) {
        self.ids.clear();
        self.crumbs.clear();
    }

    /// Deepest visited node, if any.
    pub fn current(&self) -> Option<&Breadcrumb> {
        self.crumbs.last()
    }

    pub fn depth(&self) -> usize {
        debug_assert_eq!(self.ids.len(), self.crumbs.len());
        self.crumbs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crumbs.is_empty()
    }

    pub fn trail(&self) -> &[Breadcrumb] {
        &self.crumbs
    }

    pub fn ids(&self) -> &[i64] {
        &self.ids
    }
}
