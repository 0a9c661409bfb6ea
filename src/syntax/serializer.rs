//! Tree to source text.
//!
//! Serialization dispatches on each node's data through the same role tables
//! the parser folds with, so any tree the parser can produce (or that macro
//! expansion can construct) renders back to executable source. Whitespace
//! is normalized; round-tripping through `parse` is stable after the first
//! pass.

use crate::syntax::tables::{
    BINARY, CONTINUATIONS, OPTIONAL_RIGHT, POSTFIX, PREFIX, UNARY_RENDER, UNTIL_BLOCK,
};
use crate::syntax::Syntax;

/// Serializes a tree to source text.
pub fn to_source(node: &Syntax) -> String {
    let mut out = String::new();
    write_node(node, &mut out);
    out
}

fn write_node(node: &Syntax, out: &mut String) {
    let data = node.data.as_str();
    match data {
        // invisible statement join
        "i;" => {
            for (i, child) in node.children.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                write_node(child, out);
            }
        }
        "()" | "[]" => {
            let (open, close) = if data == "()" { ("(", ")") } else { ("[", "]") };
            if let Some(callee) = node.children.first() {
                write_node(callee, out);
            }
            out.push_str(open);
            if let Some(argument) = node.children.get(1) {
                write_node(argument, out);
            }
            out.push_str(close);
        }
        "?" => write_ternary(node, out),
        "(" | "[" | "{" => {
            let close = match data {
                "(" => ")",
                "[" => "]",
                _ => "}",
            };
            out.push_str(data);
            for (i, child) in node.children.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                write_node(child, out);
            }
            out.push_str(close);
        }
        _ if UNTIL_BLOCK.contains_key(data) => write_block_construct(node, out),
        _ if OPTIONAL_RIGHT.contains(data) => {
            out.push_str(data);
            if let Some(child) = node.children.first() {
                out.push(' ');
                write_node(child, out);
            }
        }
        _ if BINARY.contains(data) => {
            if node.children.is_empty() {
                out.push_str(data);
                return;
            }
            for (i, child) in node.children.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                    out.push_str(data);
                    out.push(' ');
                }
                write_node(child, out);
            }
        }
        _ if PREFIX.contains(data) => {
            let op = UNARY_RENDER.get(data).copied().unwrap_or(data);
            out.push_str(op);
            if op.as_bytes().first().is_some_and(u8::is_ascii_alphabetic) {
                out.push(' ');
            }
            if let Some(child) = node.children.first() {
                write_node(child, out);
            }
        }
        _ if POSTFIX.contains(data) => {
            if let Some(child) = node.children.first() {
                write_node(child, out);
            }
            out.push_str(data);
        }
        _ => {
            out.push_str(data);
            for child in &node.children {
                out.push(' ');
                write_node(child, out);
            }
        }
    }
}

fn write_ternary(node: &Syntax, out: &mut String) {
    if let Some(condition) = node.children.first() {
        write_node(condition, out);
    }
    out.push_str(" ? ");
    if let Some(consequent) = node.children.get(1) {
        write_node(consequent, out);
    }
    out.push_str(" : ");
    if let Some(alternative) = node.children.get(2) {
        write_node(alternative, out);
    }
}

/// Block constructs render as keyword followed by their pieces. When a
/// non-block body is directly followed by the construct's continuation, an
/// explicit `;` restores the statement boundary that the fold consumed.
fn write_block_construct(node: &Syntax, out: &mut String) {
    let continuation = CONTINUATIONS.get(node.data.as_str()).copied();
    out.push_str(&node.data);
    let last = node.children.len().saturating_sub(1);
    for (i, child) in node.children.iter().enumerate() {
        if i == last
            && i > 0
            && continuation == Some(child.data.as_str())
            && node.children[i - 1].data != "{"
        {
            out.push(';');
        }
        out.push(' ');
        write_node(child, out);
    }
}
