//! Stylesheet rule tree.
//!
//! A parsed stylesheet is a flat sequence of top-level nodes: style rules,
//! comments and at-rules. At-rules are kept verbatim and never inspected.
//!
//! Rules and declarations carry stable identifiers assigned when they are
//! created. Code that finds a declaration in one pass and rewrites it in a
//! later pass holds the identifier, not a reference, and looks the node up
//! again through [`Stylesheet::rule_mut`].
//!
//! # Example
//!
//! ```ignore
//! use csssprite::stylesheet::parse_stylesheet;
//!
//! let sheet = parse_stylesheet(".a { color: red; }")?;
//! for rule in sheet.rules() {
//!     println!("{}", rule.selectors.join(", "));
//! }
//! ```

mod parse;

use std::fmt;

pub use parse::parse_stylesheet;

/// Identifier of a style rule, unique within one stylesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(u32);

/// Identifier of a declaration, unique within one stylesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclarationId(u32);

/// A `property: value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    id: DeclarationId,
    pub property: String,
    pub value: String,
}

impl Declaration {
    pub fn id(&self) -> DeclarationId {
        self.id
    }

    /// Whether this declaration sets `property` (ASCII case-insensitive).
    pub fn is(&self, property: &str) -> bool {
        self.property.eq_ignore_ascii_case(property)
    }
}

/// An entry inside a rule's `{ ... }` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockItem {
    Declaration(Declaration),
    Comment(String),
}

/// A style rule: selector list plus declaration block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    id: RuleId,
    pub selectors: Vec<String>,
    pub items: Vec<BlockItem>,
}

impl Rule {
    pub fn id(&self) -> RuleId {
        self.id
    }

    /// Declarations in source order, skipping comments.
    pub fn declarations(&self) -> impl DoubleEndedIterator<Item = &Declaration> {
        self.items.iter().filter_map(|item| match item {
            BlockItem::Declaration(d) => Some(d),
            BlockItem::Comment(_) => None,
        })
    }

    /// Look up a declaration of this rule by id.
    pub fn declaration_mut(&mut self, id: DeclarationId) -> Option<&mut Declaration> {
        self.items.iter_mut().find_map(|item| match item {
            BlockItem::Declaration(d) if d.id == id => Some(d),
            _ => None,
        })
    }

    /// Whether any declaration sets `property`.
    pub fn has_property(&self, property: &str) -> bool {
        self.declarations().any(|d| d.is(property))
    }

    /// Append a declaration at the end of the block.
    pub fn push_declaration(&mut self, declaration: Declaration) {
        self.items.push(BlockItem::Declaration(declaration));
    }
}

/// A top-level stylesheet node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Rule(Rule),
    Comment(String),
    /// An at-rule kept as raw source text (`@media ... { ... }`, `@import ...;`).
    AtRule(String),
}

/// A parsed stylesheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stylesheet {
    nodes: Vec<Node>,
    next_rule: u32,
    next_declaration: u32,
}

impl Stylesheet {
    /// Create an empty stylesheet.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Append a node at the end of the stylesheet.
    pub fn push(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Insert nodes before all existing nodes, keeping their given order.
    pub fn prepend(&mut self, nodes: Vec<Node>) {
        self.nodes.splice(0..0, nodes);
    }

    /// Create a rule with a fresh id. The rule is not added to the sheet.
    pub fn create_rule(&mut self, selectors: Vec<String>) -> Rule {
        let id = RuleId(self.next_rule);
        self.next_rule += 1;
        Rule {
            id,
            selectors,
            items: Vec::new(),
        }
    }

    /// Create a declaration with a fresh id.
    pub fn create_declaration(
        &mut self,
        property: impl Into<String>,
        value: impl Into<String>,
    ) -> Declaration {
        let id = DeclarationId(self.next_declaration);
        self.next_declaration += 1;
        Declaration {
            id,
            property: property.into(),
            value: value.into(),
        }
    }

    /// Style rules in source order.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Rule(rule) => Some(rule),
            _ => None,
        })
    }

    /// Top-level comment texts in source order.
    pub fn comments(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Comment(text) => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn rule(&self, id: RuleId) -> Option<&Rule> {
        self.rules().find(|rule| rule.id == id)
    }

    pub fn rule_mut(&mut self, id: RuleId) -> Option<&mut Rule> {
        self.nodes.iter_mut().find_map(|node| match node {
            Node::Rule(rule) if rule.id == id => Some(rule),
            _ => None,
        })
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {{", self.selectors.join(",\n"))?;
        for item in &self.items {
            match item {
                BlockItem::Declaration(d) => writeln!(f, "  {}: {};", d.property, d.value)?,
                BlockItem::Comment(text) => writeln!(f, "  /*{}*/", text)?,
            }
        }
        write!(f, "}}")
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Rule(rule) => rule.fmt(f),
            Node::Comment(text) => write!(f, "/*{}*/", text),
            Node::AtRule(raw) => f.write_str(raw),
        }
    }
}

impl fmt::Display for Stylesheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                f.write_str("\n\n")?;
            }
            node.fmt(f)?;
        }
        Ok(())
    }
}
