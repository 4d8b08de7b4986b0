use super::grid::{DayCell, MonthGrid, WEEKDAY_NAMES};
use std::fmt;

/// Structural role of a node, as an accessibility tool would see it
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum Role {
    Region,
    Heading,
    Row,
    ColumnHeader,
    Grid,
    GridCell,
}

impl Role {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Role::Region => "region",
            Role::Heading => "heading",
            Role::Row => "row",
            Role::ColumnHeader => "columnheader",
            Role::Grid => "grid",
            Role::GridCell => "gridcell",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State exposed by every grid cell
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub(crate) struct CellState {
    pub(crate) current_month: bool,
    pub(crate) highlighted: bool,
    pub(crate) aria_selected: bool,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Node {
    pub(crate) role: Role,
    pub(crate) label: Option<String>,
    pub(crate) text: String,
    pub(crate) cell: Option<CellState>,
    pub(crate) children: Vec<Node>,
}

impl Node {
    fn new(role: Role) -> Node {
        Node {
            role,
            label: None,
            text: String::new(),
            cell: None,
            children: Vec::new(),
        }
    }

    fn label<S: Into<String>>(mut self, label: S) -> Node {
        self.label = Some(label.into());
        self
    }

    fn text<S: Into<String>>(mut self, text: S) -> Node {
        self.text = text.into();
        self
    }

    fn children<I: IntoIterator<Item = Node>>(mut self, children: I) -> Node {
        self.children.extend(children);
        self
    }

    /// All nodes in the subtree rooted here (including this one) with the
    /// given role, in document order
    pub(crate) fn find_all(&self, role: Role) -> Vec<&Node> {
        let mut found = Vec::new();
        self.collect(role, &mut found);
        found
    }

    pub(crate) fn find(&self, role: Role) -> Option<&Node> {
        if self.role == role {
            Some(self)
        } else {
            self.children.iter().find_map(|c| c.find(role))
        }
    }

    fn collect<'a>(&'a self, role: Role, found: &mut Vec<&'a Node>) {
        if self.role == role {
            found.push(self);
        }
        for c in &self.children {
            c.collect(role, found);
        }
    }

    /// The node's own text followed by that of all of its descendants
    pub(crate) fn text_content(&self) -> String {
        let mut s = self.text.clone();
        for c in &self.children {
            s.push_str(&c.text_content());
        }
        s
    }

    pub(crate) fn is_selected(&self) -> bool {
        self.cell.is_some_and(|c| c.aria_selected)
    }

    pub(crate) fn in_current_month(&self) -> bool {
        self.cell.is_some_and(|c| c.current_month)
    }

    fn write_outline(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(f, "{:indent$}{}", "", self.role, indent = depth * 2)?;
        if let Some(ref label) = self.label {
            write!(f, " [{label}]")?;
        }
        if !self.text.is_empty() {
            write!(f, " {:?}", self.text)?;
        }
        if let Some(cell) = self.cell {
            write!(
                f,
                " current-month={} highlighted={} aria-selected={}",
                cell.current_month, cell.highlighted, cell.aria_selected
            )?;
        }
        writeln!(f)?;
        for c in &self.children {
            c.write_outline(f, depth + 1)?;
        }
        Ok(())
    }
}

/// Prints the tree as an indented outline, one node per line
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_outline(f, 0)
    }
}

/// Lay out a month grid as a labeled region containing the month heading, a
/// row of weekday column headers, and a grid with one cell per day cell
pub(crate) fn render_tree(grid: &MonthGrid) -> Node {
    let heading = Node::new(Role::Heading).text(grid.title());
    let header_row = Node::new(Role::Row).children(
        WEEKDAY_NAMES
            .iter()
            .map(|&name| Node::new(Role::ColumnHeader).label(name).text(name)),
    );
    let cells = Node::new(Role::Grid).children(grid.cells().iter().map(grid_cell));
    Node::new(Role::Region)
        .label("Calendar")
        .children([heading, header_row, cells])
}

fn grid_cell(cell: &DayCell) -> Node {
    let mut node = Node::new(Role::GridCell).label(cell.label());
    if let Some(day) = cell.day() {
        node = node.text(day.to_string());
    }
    node.cell = Some(CellState {
        current_month: cell.in_month(),
        highlighted: cell.is_selected(),
        aria_selected: cell.is_selected(),
    });
    node
}
