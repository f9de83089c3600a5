// src/output.rs
// =============================================================================
// Prints a finished crawl, either as JSON or as an indented tree.
//
// Text output looks like:
//   Home                                    https://example.com/
//     About                                 https://example.com/about
//     (untitled)                            https://example.com/blog
//
//   📊 Summary:
//      📄 Pages: 3
//      🍃 Leaves: 2
//      🌳 Deepest level: 1
// =============================================================================

use std::fmt::Write as _;

use anyhow::Result;

use crate::crawl::PageNode;

// Prints the tree either as pretty JSON or as human-readable text
pub fn print_tree(root: &PageNode, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(root)?);
    } else {
        print!("{}", render_text(root));
    }
    Ok(())
}

/// Renders the tree as indented lines followed by a summary
pub fn render_text(root: &PageNode) -> String {
    let mut out = String::new();

    for node in root.iter() {
        let indent = "  ".repeat(node.depth - root.depth);
        let title = if node.title.is_empty() {
            "(untitled)"
        } else {
            node.title.as_str()
        };
        let label = truncate(&format!("{indent}{title}"), 60);
        let _ = writeln!(out, "{label:<60} {}", node.url);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "📊 Summary:");
    let _ = writeln!(out, "   📄 Pages: {}", root.node_count());
    let _ = writeln!(out, "   🍃 Leaves: {}", root.iter().filter(|n| n.is_leaf()).count());
    let _ = writeln!(out, "   🌳 Deepest level: {}", root.max_depth());

    out
}

// Shortens long labels so the URL column stays aligned
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width - 3).collect();
    format!("{kept}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_text_indents_by_depth() {
        let mut root = PageNode::new("https://example.com/", "Home", 0);
        root.children
            .push(PageNode::new("https://example.com/blog", "", 1));

        let text = render_text(&root);
        let lines: Vec<_> = text.lines().collect();

        assert!(lines[0].starts_with("Home "));
        assert!(lines[0].ends_with("https://example.com/"));
        assert!(lines[1].starts_with("  (untitled) "));
        assert!(text.contains("Pages: 2"));
        assert!(text.contains("Leaves: 1"));
        assert!(text.contains("Deepest level: 1"));
    }

    #[test]
    fn test_truncate_long_titles() {
        let long = "x".repeat(100);
        let short = truncate(&long, 60);
        assert_eq!(short.chars().count(), 60);
        assert!(short.ends_with("..."));
        assert_eq!(truncate("short", 60), "short");
    }
}
