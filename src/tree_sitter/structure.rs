//! Structural shapes located in a parsed Rust buffer
//!
//! Extracts record declarations (`struct` items with a braced body) and
//! default-constructor blocks (the struct literal returned by
//! `impl Default for T { fn default() -> Self { .. } }`). All offsets are byte
//! offsets into the buffer that was parsed.

use tree_sitter::{Node, Tree};

/// One `name: Type` entry of a record body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    pub type_text: String,
    pub start: usize,
    pub end: usize,
    /// Whether a `,` follows the declaration (comments skipped)
    pub has_trailing_comma: bool,
}

/// A `struct` item with a braced field list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDecl {
    pub name: String,
    /// Offset of the opening `{`
    pub body_start: usize,
    /// Offset just past the closing `}`
    pub body_end: usize,
    pub fields: Vec<FieldDecl>,
}

impl RecordDecl {
    pub fn field(&self, name: &str) -> Option<&FieldDecl> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// One `name: value` entry of a struct literal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInit {
    pub name: String,
    pub value: String,
    pub start: usize,
    pub end: usize,
}

/// The struct literal produced by a `Default` impl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultBlock {
    /// The type the impl is for, without generics or path prefix
    pub type_name: String,
    pub body_start: usize,
    pub body_end: usize,
    pub initializers: Vec<FieldInit>,
}

/// All records whose name ends with `suffix`, in source order
pub fn records(tree: &Tree, source: &str, suffix: &str) -> Vec<RecordDecl> {
    struct_items(tree)
        .into_iter()
        .filter_map(|node| record_from_node(&node, source))
        .filter(|r| r.name.ends_with(suffix))
        .collect()
}

pub fn record_named(tree: &Tree, source: &str, name: &str) -> Option<RecordDecl> {
    struct_items(tree)
        .into_iter()
        .filter_map(|node| record_from_node(&node, source))
        .find(|r| r.name == name)
}

/// Whether any struct item in the buffer declares `field`
pub fn declares_field(tree: &Tree, source: &str, field: &str) -> bool {
    struct_items(tree)
        .into_iter()
        .filter_map(|node| record_from_node(&node, source))
        .any(|r| r.field(field).is_some())
}

/// Every default-constructor block in source order
pub fn default_blocks(tree: &Tree, source: &str) -> Vec<DefaultBlock> {
    let mut impls = Vec::new();
    collect_kind(tree.root_node(), "impl_item", &mut impls);

    impls
        .iter()
        .filter_map(|node| default_block_from_impl(node, source))
        .collect()
}

/// Leading whitespace of the line containing `offset`
pub fn line_indent(source: &str, offset: usize) -> &str {
    let line_start = source[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let line = &source[line_start..];
    let width = line.len() - line.trim_start_matches([' ', '\t']).len();
    &line[..width]
}

fn struct_items(tree: &Tree) -> Vec<Node<'_>> {
    let mut out = Vec::new();
    collect_kind(tree.root_node(), "struct_item", &mut out);
    out
}

fn collect_kind<'a>(node: Node<'a>, kind: &str, out: &mut Vec<Node<'a>>) {
    if node.kind() == kind {
        out.push(node);
    }
    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            collect_kind(child, kind, out);
        }
    }
}

fn node_text<'s>(node: &Node, source: &'s str) -> Option<&'s str> {
    node.utf8_text(source.as_bytes()).ok()
}

fn child_text(node: &Node, field: &str, source: &str) -> Option<String> {
    let child = node.child_by_field_name(field)?;
    node_text(&child, source).map(str::to_string)
}

fn record_from_node(node: &Node, source: &str) -> Option<RecordDecl> {
    let name = child_text(node, "name", source)?;
    let body = node.child_by_field_name("body")?;
    if body.kind() != "field_declaration_list" {
        return None;
    }

    let mut fields = Vec::new();
    for i in 0..body.child_count() {
        let Some(child) = body.child(i) else {
            continue;
        };
        if child.kind() != "field_declaration" {
            continue;
        }
        let (Some(field_name), Some(type_text)) = (
            child_text(&child, "name", source),
            child_text(&child, "type", source),
        ) else {
            continue;
        };
        fields.push(FieldDecl {
            name: field_name,
            type_text,
            start: child.start_byte(),
            end: child.end_byte(),
            has_trailing_comma: followed_by_comma(&child),
        });
    }

    Some(RecordDecl {
        name,
        body_start: body.start_byte(),
        body_end: body.end_byte(),
        fields,
    })
}

fn followed_by_comma(node: &Node) -> bool {
    let mut next = node.next_sibling();
    while let Some(sibling) = next {
        match sibling.kind() {
            "line_comment" | "block_comment" => next = sibling.next_sibling(),
            kind => return kind == ",",
        }
    }
    false
}

/// `Foo`, `a::Foo`, `Foo<T>` and `Foo::<T>` all name `Foo`
fn base_type_name(node: &Node, source: &str) -> Option<String> {
    let target = match node.kind() {
        "generic_type" | "generic_type_with_turbofish" => node.child_by_field_name("type")?,
        _ => *node,
    };
    let text = node_text(&target, source)?;
    Some(text.rsplit("::").next().unwrap_or(text).trim().to_string())
}

fn default_block_from_impl(node: &Node, source: &str) -> Option<DefaultBlock> {
    let trait_node = node.child_by_field_name("trait")?;
    if base_type_name(&trait_node, source)? != "Default" {
        return None;
    }
    let type_name = base_type_name(&node.child_by_field_name("type")?, source)?;
    let body = node.child_by_field_name("body")?;

    let default_fn = (0..body.child_count())
        .filter_map(|i| body.child(i))
        .find(|child| {
            child.kind() == "function_item"
                && child_text(child, "name", source).as_deref() == Some("default")
        })?;
    let literal = constructor_literal(default_fn.child_by_field_name("body")?, &type_name, source)?;
    let list = literal.child_by_field_name("body")?;

    let mut initializers = Vec::new();
    for i in 0..list.child_count() {
        let Some(child) = list.child(i) else {
            continue;
        };
        let entry = match child.kind() {
            "field_initializer" => (
                child_text(&child, "field", source),
                child_text(&child, "value", source),
            ),
            "shorthand_field_initializer" => {
                let name = node_text(&child, source).map(str::to_string);
                (name.clone(), name)
            }
            _ => continue,
        };
        let (Some(name), Some(value)) = entry else {
            continue;
        };
        initializers.push(FieldInit {
            name,
            value,
            start: child.start_byte(),
            end: child.end_byte(),
        });
    }

    Some(DefaultBlock {
        type_name,
        body_start: list.start_byte(),
        body_end: list.end_byte(),
        initializers,
    })
}

/// The struct literal a `fn default()` body builds for its own type: the
/// block's tail expression when that is `Self { .. }` or `<type_name> { .. }`,
/// otherwise the first such literal anywhere in the body (`return Self { .. }`).
/// Literals of other types are never picked.
fn constructor_literal<'t>(fn_body: Node<'t>, type_name: &str, source: &str) -> Option<Node<'t>> {
    let builds_own_type = |node: &Node| {
        node.kind() == "struct_expression"
            && node
                .child_by_field_name("name")
                .and_then(|name| base_type_name(&name, source))
                .is_some_and(|name| name == "Self" || name == type_name)
    };

    let tail = (0..fn_body.named_child_count())
        .rev()
        .filter_map(|i| fn_body.named_child(i))
        .find(|child| !matches!(child.kind(), "line_comment" | "block_comment"));
    if let Some(tail) = tail.filter(|t| builds_own_type(t)) {
        return Some(tail);
    }

    let mut literals = Vec::new();
    collect_kind(fn_body, "struct_expression", &mut literals);
    literals.into_iter().find(|node| builds_own_type(node))
}
