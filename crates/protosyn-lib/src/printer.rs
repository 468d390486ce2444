//! Reproduces source text from a tree.
//!
//! Printing only looks at terminals and the store: each token contributes its
//! leading comments, leading whitespace, own text and trailing comments.
//! Printing the file root is byte-for-byte the parsed input.

use protosyn_core::{Comments, FileInfo, Sequence, Token};

use crate::ast::{AstNode, FileNode, Node, NodeRef};
use crate::walk::inspect;

/// The file's source text, trailing whitespace and comments included.
pub fn print_file(file: &FileNode) -> String {
    print_node(file.info(), file.as_node_ref())
}

/// Source text of `node`, with the whitespace and comments around its
/// tokens.
pub fn print_node(info: &FileInfo, node: NodeRef<'_>) -> String {
    let mut out = String::with_capacity(info.len());
    let tokens = info.tokens();
    inspect(node, |node| {
        if !node.is_terminal() {
            return true;
        }
        let mut token = Some(node.start());
        while let Some(current) = token.filter(|t| *t <= node.end()) {
            print_token(&mut out, info, current);
            token = tokens.next(current);
        }
        false
    });
    out
}

fn print_token(out: &mut String, info: &FileInfo, token: Token) {
    let node = info.token_info(token);
    print_comments(out, node.leading_comments());
    out.push_str(node.leading_whitespace());
    out.push_str(info.text(token));
    print_comments(out, node.trailing_comments());
}

/// Virtual comments are skipped: they also appear, and are printed, among
/// the comments of the real token they sit next to.
fn print_comments(out: &mut String, comments: Comments<'_>) {
    for comment in comments.iter().filter(|c| !c.is_virtual()) {
        out.push_str(comment.leading_whitespace());
        out.push_str(comment.raw_text());
    }
}
