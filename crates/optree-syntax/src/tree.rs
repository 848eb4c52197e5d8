//! The operator tree.
//!
//! Every parent owns its children through a `Box`, so a tree can never share
//! a subtree between two parents and dropping the root releases the whole
//! tree exactly once. Nodes have no mutation API; transformations build new
//! trees.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    Neg,
    Pos,
    /// `\pm` in prefix position.
    PlusMinus,
    /// `\left| .. \right|`
    Abs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Add,
    Sub,
    /// `a \pm b`
    PlusMinus,
    Mul,
    Div,
    Pow,
    Eq,
}

/// A node of the operator tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Node {
    Number(f64),
    Symbol(char),
    /// Pattern placeholder written `*{n}`.
    Wildcard(u32),
    Unary(UnaryOp, Box<Node>),
    /// Operands are ordered: `left` comes first in the source.
    Binary(BinaryOp, Box<Node>, Box<Node>),
    /// `\frac{numerator}{denominator}`, kept apart from [`BinaryOp::Div`].
    Fraction(Box<Node>, Box<Node>),
    /// `\sqrt[index]{radicand}`; no index means a square root.
    Root(Option<Box<Node>>, Box<Node>),
}

impl Node {
    pub fn number(value: f64) -> Self {
        Node::Number(value)
    }

    pub fn symbol(name: char) -> Self {
        Node::Symbol(name)
    }

    pub fn wildcard(index: u32) -> Self {
        Node::Wildcard(index)
    }

    pub fn unary(op: UnaryOp, operand: Node) -> Self {
        Node::Unary(op, Box::new(operand))
    }

    pub fn binary(op: BinaryOp, left: Node, right: Node) -> Self {
        Node::Binary(op, Box::new(left), Box::new(right))
    }

    pub fn fraction(numerator: Node, denominator: Node) -> Self {
        Node::Fraction(Box::new(numerator), Box::new(denominator))
    }

    pub fn root(index: Option<Node>, radicand: Node) -> Self {
        Node::Root(index.map(Box::new), Box::new(radicand))
    }

    pub fn neg(operand: Node) -> Self {
        Node::unary(UnaryOp::Neg, operand)
    }

    pub fn abs(operand: Node) -> Self {
        Node::unary(UnaryOp::Abs, operand)
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Number(_) | Node::Symbol(_) | Node::Wildcard(_))
    }

    /// Direct children in source order.
    pub fn children(&self) -> Vec<&Node> {
        match self {
            Node::Number(_) | Node::Symbol(_) | Node::Wildcard(_) => Vec::new(),
            Node::Unary(_, operand) => vec![operand.as_ref()],
            Node::Binary(_, left, right) | Node::Fraction(left, right) => {
                vec![left.as_ref(), right.as_ref()]
            }
            Node::Root(Some(index), radicand) => vec![index.as_ref(), radicand.as_ref()],
            Node::Root(None, radicand) => vec![radicand.as_ref()],
        }
    }

    /// Number of nodes in this subtree, itself included.
    pub fn size(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children());
        }
        count
    }

    /// Length of the longest root-to-leaf path; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1)];
        while let Some((node, level)) = stack.pop() {
            deepest = deepest.max(level);
            stack.extend(node.children().into_iter().map(|child| (child, level + 1)));
        }
        deepest
    }

    /// Moves every non-leaf child onto `stack`, leaving a leaf in its place.
    fn detach_children(&mut self, stack: &mut Vec<Node>) {
        let mut detach = |child: &mut Box<Node>| {
            if !child.is_leaf() {
                stack.push(std::mem::replace(&mut **child, Node::Number(0.0)));
            }
        };
        match self {
            Node::Number(_) | Node::Symbol(_) | Node::Wildcard(_) => {}
            Node::Unary(_, operand) => detach(operand),
            Node::Binary(_, left, right) | Node::Fraction(left, right) => {
                detach(left);
                detach(right);
            }
            Node::Root(index, radicand) => {
                if let Some(index) = index {
                    detach(index);
                }
                detach(radicand);
            }
        }
    }
}

/// Operator chains such as `1 + 1 + ... + 1` nest one level per operator, so
/// the tree is taken apart with an explicit stack instead of the call stack.
impl Drop for Node {
    fn drop(&mut self) {
        let mut stack = Vec::new();
        self.detach_children(&mut stack);
        while let Some(mut node) = stack.pop() {
            node.detach_children(&mut stack);
        }
    }
}
