//! Debug renderings of an operator tree.
//!
//! Both renderings only reflect the shape of the tree; they do not try to
//! reproduce the TeX the tree was parsed from.

use std::fmt;

use crate::tree::{BinaryOp, Node, UnaryOp};

impl UnaryOp {
    pub fn name(self) -> &'static str {
        match self {
            UnaryOp::Neg => "neg",
            UnaryOp::Pos => "pos",
            UnaryOp::PlusMinus => "pm",
            UnaryOp::Abs => "abs",
        }
    }
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::PlusMinus => "pm",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Pow => "^",
            BinaryOp::Eq => "=",
        }
    }
}

/// Label of a single node, without its children.
pub fn label(node: &Node) -> String {
    match node {
        Node::Number(value) => value.to_string(),
        Node::Symbol(name) => name.to_string(),
        Node::Wildcard(index) => format!("*{{{index}}}"),
        Node::Unary(op, _) => op.name().to_string(),
        Node::Binary(op, _, _) => op.symbol().to_string(),
        Node::Fraction(_, _) => "frac".to_string(),
        Node::Root(None, _) => "sqrt".to_string(),
        Node::Root(Some(_), _) => "root".to_string(),
    }
}

enum Step<'a> {
    Open(&'a Node),
    Close,
}

/// One-line s-expression, e.g. `(- (+ 1 2) 3)`.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = vec![Step::Open(self)];
        let mut first = true;
        while let Some(step) = stack.pop() {
            let node = match step {
                Step::Open(node) => node,
                Step::Close => {
                    f.write_str(")")?;
                    continue;
                }
            };
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            if node.is_leaf() {
                f.write_str(&label(node))?;
                continue;
            }
            write!(f, "({}", label(node))?;
            stack.push(Step::Close);
            stack.extend(node.children().into_iter().rev().map(Step::Open));
        }
        Ok(())
    }
}

/// Multi-line rendering with one node per line.
///
/// ```text
/// -
/// ├── +
/// │   ├── 1
/// │   └── 2
/// └── 3
/// ```
pub fn pretty(node: &Node) -> String {
    let mut out = String::new();
    // (node, prefix of its own line, prefix of its children's lines)
    let mut stack = vec![(node, String::new(), String::new())];
    while let Some((node, lead, indent)) = stack.pop() {
        out.push_str(&lead);
        out.push_str(&label(node));
        out.push('\n');

        let children = node.children();
        let last = children.len().saturating_sub(1);
        for (i, child) in children.into_iter().enumerate().rev() {
            let (branch, rest) = if i == last {
                ("└── ", "    ")
            } else {
                ("├── ", "│   ")
            };
            stack.push((child, format!("{indent}{branch}"), format!("{indent}{rest}")));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;
    use expect_test::expect;

    #[test]
    fn test_pretty_additive_chain() {
        let tree = parse("1 + 2 - 3").unwrap();
        expect![[r#"
            -
            ├── +
            │   ├── 1
            │   └── 2
            └── 3
        "#]]
        .assert_eq(&pretty(&tree));
    }

    #[test]
    fn test_pretty_macro_forms() {
        let tree = parse(r"\sqrt[3]{x} - \left| \frac 12 a \right|").unwrap();
        expect![[r#"
            -
            ├── root
            │   ├── 3
            │   └── x
            └── abs
                └── *
                    ├── frac
                    │   ├── 1
                    │   └── 2
                    └── a
        "#]]
        .assert_eq(&pretty(&tree));
    }

    #[test]
    fn test_display_sexpr() {
        let tree = parse(r"-(-2(-3)) 5").unwrap();
        expect!["(* (neg (* (neg 2) (neg 3))) 5)"].assert_eq(&tree.to_string());

        let tree = parse(r"2 \cdot (-3 \frac{1}{2})").unwrap();
        expect!["(* 2 (* (neg 3) (frac 1 2)))"].assert_eq(&tree.to_string());
    }

    #[test]
    fn test_labels() {
        assert_eq!(label(&Node::number(3.14)), "3.14");
        assert_eq!(label(&Node::wildcard(2)), "*{2}");
        assert_eq!(label(&Node::root(None, Node::symbol('x'))), "sqrt");
    }

    fn chain(links: usize) -> Node {
        let mut tree = Node::number(1.0);
        for _ in 0..links {
            tree = Node::binary(BinaryOp::Sub, tree, Node::symbol('x'));
        }
        tree
    }

    #[test]
    fn test_long_chain_renders_without_recursion() {
        let links = 100_000;
        let sexpr = chain(links).to_string();
        assert!(sexpr.starts_with("(- (- (- "));
        assert!(sexpr.ends_with(" 1 x) x) x)"));
        assert_eq!(sexpr.matches('(').count(), links);

        // Indentation grows with depth, so keep this one smaller.
        let tree = pretty(&chain(2_000));
        assert_eq!(tree.lines().count(), 4_001);
        assert_eq!(tree.lines().last(), Some("└── x"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let input = r"a[c \div 2b] = -(-5 + 1 - 3.14) + A \times x - 2ax";
        let first = parse(input).unwrap();
        let second = parse(input).unwrap();
        assert_eq!(pretty(&first), pretty(&second));
        assert_eq!(first.to_string(), second.to_string());
    }
}
