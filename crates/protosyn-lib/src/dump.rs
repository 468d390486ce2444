//! Indented text form of a tree, one concrete node per line.
//!
//! ```text
//! File
//!   Syntax
//!     Keyword "syntax"
//!     Rune "="
//!     StringLiteral "\"proto3\""
//!     Rune ";"
//! ```

use std::convert::Infallible;
use std::fmt::Write;

use protosyn_core::FileInfo;

use crate::ast::{AstNode, FileNode, Node, NodeRef, RuneNode};
use crate::walk::{Flow, NodePath, Visitor, WalkOptions, walk};

pub fn dump_ast(file: &FileNode) -> String {
    dump_node(file.info(), file.as_node_ref())
}

pub fn dump_node(info: &FileInfo, node: NodeRef<'_>) -> String {
    let mut dumper = Dumper {
        info,
        out: String::new(),
    };
    let options = WalkOptions {
        depth_limit: usize::MAX,
        ..WalkOptions::default()
    };
    let _ = walk(node, &mut dumper, &options);
    dumper.out
}

struct Dumper<'i> {
    info: &'i FileInfo,
    out: String,
}

impl<'a> Visitor<'a> for Dumper<'_> {
    type Error = Infallible;

    fn before(&mut self, node: NodeRef<'a>, path: &NodePath<'a>) -> Result<Flow, Infallible> {
        let indent = "  ".repeat(path.depth() - 1);
        let _ = write!(self.out, "{indent}{:?}", node.kind());
        match node.cast::<RuneNode>() {
            Some(rune) if rune.is_virtual => {
                let _ = write!(self.out, " (inferred {:?})", rune.rune);
            }
            _ if node.is_terminal() => {
                let text = self.info.node_info(node.start(), node.end()).raw_text();
                if !text.is_empty() {
                    let _ = write!(self.out, " {text:?}");
                }
            }
            _ => {}
        }
        self.out.push('\n');
        Ok(Flow::Continue)
    }
}
