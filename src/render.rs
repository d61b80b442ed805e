//! Plain-text rendering of a tree view.
//!
//! ```text
//! └─Anna
//!    Parents: Paul
//!    Children: Roni
//!    └─Roni
//!       Parents: Anna
//! ```

use std::io::Write;

use crate::Result;
use crate::model::FamilyTreeView;

const INDENT: &str = "   ";

/// Write `view` and every child projection below it.
pub fn render_tree(view: &FamilyTreeView, writer: &mut dyn Write) -> Result<()> {
    // (node, indent, last sibling), popped in display order
    let mut stack = vec![(view, String::new(), true)];

    while let Some((node, indent, last)) = stack.pop() {
        let branch = if last { "└─" } else { "├─" };
        writeln!(writer, "{indent}{branch}{}", node.name)?;

        write_list(writer, &indent, "Parents", node.parents.iter().map(String::as_str))?;
        write_list(writer, &indent, "Siblings", node.siblings.iter().map(String::as_str))?;
        write_list(writer, &indent, "Children", node.children.iter().map(|c| c.name.as_str()))?;
        write_list(writer, &indent, "Grandchildren", node.grandchildren.iter().map(|g| g.name.as_str()))?;

        let deeper = format!("{indent}{INDENT}");
        let count = node.children.len();
        for (i, child) in node.children.iter().enumerate().rev() {
            stack.push((child, deeper.clone(), i + 1 == count));
        }
    }
    Ok(())
}

/// `render_tree` into a `String`.
pub fn render_tree_to_string(view: &FamilyTreeView) -> Result<String> {
    let mut buf = Vec::new();
    render_tree(view, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn write_list<'a>(
    writer: &mut dyn Write,
    indent: &str,
    label: &str,
    names: impl Iterator<Item = &'a str>,
) -> Result<()> {
    let names: Vec<&str> = names.collect();
    if !names.is_empty() {
        writeln!(writer, "{indent}{INDENT}{label}: {}", names.join(", "))?;
    }
    Ok(())
}
