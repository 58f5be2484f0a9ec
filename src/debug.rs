//! Parse traces.
//!
//! Every successful parse returns a [`DebugNode`] tree next to its executor.
//! The tree records which tokens were consumed and under which type tag,
//! and it exists independently of execution: a program can be traced and
//! never run.

use serde::Serialize;

use crate::syntax::Token;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "node", rename_all = "lowercase")]
pub enum DebugNode {
    /// A consumed token, tagged with the type that consumed it.
    Leaf { tag: String, token: Token },
    /// An ordered group of child traces produced under one type tag.
    Branch { tag: String, children: Vec<DebugNode> },
}

impl DebugNode {
    pub fn leaf(tag: impl Into<String>, token: Token) -> Self {
        DebugNode::Leaf {
            tag: tag.into(),
            token,
        }
    }

    pub fn branch(tag: impl Into<String>, children: Vec<DebugNode>) -> Self {
        DebugNode::Branch {
            tag: tag.into(),
            children,
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            DebugNode::Leaf { tag, .. } | DebugNode::Branch { tag, .. } => tag,
        }
    }

    /// Splices `node` in as the first child and re-tags the result.
    ///
    /// A branch keeps its children after the new one; a leaf becomes the
    /// second child of a two-child branch.
    pub fn prepend(self, tag: impl Into<String>, node: DebugNode) -> DebugNode {
        match self {
            DebugNode::Branch { mut children, .. } => {
                children.insert(0, node);
                DebugNode::branch(tag, children)
            }
            leaf @ DebugNode::Leaf { .. } => DebugNode::branch(tag, vec![node, leaf]),
        }
    }

    /// Token values only: `[add 1 [mul 2 3]]`.
    pub fn show_tokens(&self) -> String {
        match self {
            DebugNode::Leaf { token, .. } => token.to_string(),
            DebugNode::Branch { children, .. } => {
                let inner: Vec<String> = children.iter().map(DebugNode::show_tokens).collect();
                format!("[{}]", inner.join(" "))
            }
        }
    }

    /// Token values with their tags: `value:[fn:add number:1]`.
    pub fn typed_tokens(&self) -> String {
        match self {
            DebugNode::Leaf { tag, token } => format!("{tag}:{token}"),
            DebugNode::Branch { tag, children } => {
                let inner: Vec<String> = children.iter().map(DebugNode::typed_tokens).collect();
                format!("{tag}:[{}]", inner.join(" "))
            }
        }
    }

    /// Every consumed token, left to right.
    pub fn tokens(&self) -> Vec<&Token> {
        let mut out = Vec::new();
        self.collect_tokens(&mut out);
        out
    }

    fn collect_tokens<'a>(&'a self, out: &mut Vec<&'a Token>) {
        match self {
            DebugNode::Leaf { token, .. } => out.push(token),
            DebugNode::Branch { children, .. } => {
                for child in children {
                    child.collect_tokens(out);
                }
            }
        }
    }
}
