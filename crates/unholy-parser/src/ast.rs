//! The Unholy AST: an owned tree of [`Node`]s addressed by [`NodeId`], with
//! non-owning `parent` back-references.
//!
//! A classic `Rc<RefCell<Node>>` tree can't express a child-to-parent
//! back-pointer without a reference cycle. Instead every node lives in one
//! flat arena owned by [`Ast`], and a node's children and parent are plain
//! `NodeId` indices into that arena -- `Copy`, no `Rc`, no interior
//! mutability, and no cycle for the borrow checker to worry about.

use unholy_common::SyntaxKind;

/// An index into an [`Ast`]'s node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

/// Per-node error-flag bitset.
///
/// Not currently set by any `grammar.rs` production: every production
/// propagates a `LexicalError`/`ParseError` with `?` the instant one occurs,
/// which unwinds straight out of `parse_file` before the enclosing node's
/// `finish` call ever runs. There is no point in this parser's control flow
/// where a node is finished *and* known to have an error underneath it --
/// the first error always aborts before any ancestor gets to `finish`. The
/// type and `set_flags`/`flags_of` are kept as the hook a recovering parser
/// (one that swallows an error, finishes the node anyway, and keeps going)
/// would use; see `DESIGN.md` for why this build doesn't attempt that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeFlags(u8);

impl NodeFlags {
    pub const NONE: NodeFlags = NodeFlags(0);
    pub const HAS_ERROR: NodeFlags = NodeFlags(1 << 0);
    pub const CHILD_HAS_ERROR: NodeFlags = NodeFlags(1 << 1);

    pub fn union(self, other: NodeFlags) -> NodeFlags {
        NodeFlags(self.0 | other.0)
    }

    pub fn contains(self, other: NodeFlags) -> bool {
        (self.0 & other.0) == other.0
    }
}

/// Header fields shared by every node in the tree.
#[derive(Debug, Clone)]
pub struct NodeMeta {
    pub kind: SyntaxKind,
    pub line: u32,
    pub column: u32,
    pub pos: u32,
    pub length: u32,
    pub flags: NodeFlags,
    pub parent: Option<NodeId>,
}

/// An ordered list of child nodes, carrying its own position captured when
/// the list was opened (so an empty parameter list still has a meaningful
/// span: the `(` `)` pair that produced it).
#[derive(Debug, Clone)]
pub struct NodeArray {
    pub items: Vec<NodeId>,
    pub pos: u32,
    pub length: u32,
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone)]
pub enum NodeData {
    SourceFile { file_name: String, statements: NodeArray },
    Identifier { name: String },
    IntegerLiteral { text: String },
    /// `kind` is the underlying keyword token kind: `TrueKeyword` or `FalseKeyword`.
    BoolLiteral { kind: SyntaxKind },
    BinaryExpression { left: NodeId, operator_token: NodeId, right: NodeId },
    CallExpression { callee: NodeId, args: NodeArray },
    /// `kind` is one of `BoolKeyword`, `IntKeyword`, `VoidKeyword`.
    KeywordTypeNode { kind: SyntaxKind },
    VarDeclaration { name: NodeId, ty: Option<NodeId>, initializer: Option<NodeId> },
    ParameterDeclaration { name: NodeId, ty: NodeId },
    FuncDeclaration { name: NodeId, params: NodeArray, ty: NodeId, body: NodeId },
    BlockStatement { statements: NodeArray },
    VarDeclarationStatement { declaration: NodeId },
    FuncDeclarationStatement { declaration: NodeId },
    ExpressionStatement { expression: NodeId },
    IfStatement { condition: NodeId, then_statement: NodeId, else_statement: Option<NodeId> },
    ReturnStatement { expression: Option<NodeId> },
    /// A leaf node wrapping a single token (e.g. a binary operator) that has
    /// no semantic payload of its own beyond its kind.
    TokenNode { kind: SyntaxKind },
}

#[derive(Debug, Clone)]
pub struct Node {
    pub meta: NodeMeta,
    pub data: NodeData,
}

/// The tree produced by `parse_file`. Immutable and freely shareable once
/// built: nothing borrows from the scanner or the parser that built it.
#[derive(Debug)]
pub struct Ast {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Ast {
    pub(crate) fn new(nodes: Vec<Node>, root: NodeId) -> Self {
        Self { nodes, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Builder used only while parsing; consumed into an [`Ast`] by `parse_file`.
#[derive(Debug, Default)]
pub(crate) struct AstBuilder {
    nodes: Vec<Node>,
}

impl AstBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Reserve a node slot, recording its starting position. `finalize` fills
    /// in `data`, `parent`, and `length` once the production completes.
    pub fn begin(&mut self, kind: SyntaxKind, line: u32, column: u32, pos: u32) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            meta: NodeMeta { kind, line, column, pos, length: 0, flags: NodeFlags::NONE, parent: None },
            data: NodeData::TokenNode { kind: SyntaxKind::Unknown },
        });
        id
    }

    /// Like `begin`, but the new node's start position is taken from an
    /// already-opened child rather than from whatever token is current --
    /// used to retroactively wrap a parsed left operand in a
    /// `BinaryExpression` once an operator is found after it.
    pub fn begin_before(&mut self, child: NodeId, kind: SyntaxKind) -> NodeId {
        let meta = self.nodes[child.0 as usize].meta.clone();
        self.begin(kind, meta.line, meta.column, meta.pos)
    }

    pub fn finalize(&mut self, id: NodeId, data: NodeData, parent: Option<NodeId>, end_pos: u32) {
        let node = &mut self.nodes[id.0 as usize];
        node.data = data;
        node.meta.parent = parent;
        node.meta.length = end_pos - node.meta.pos;
    }

    /// Overwrite a node's parent after the fact. Used once a node built
    /// speculatively (e.g. a binary expression's left operand, finished
    /// before its enclosing `BinaryExpression` existed) needs to point at
    /// the node that turned out to wrap it.
    pub fn reparent(&mut self, id: NodeId, parent: NodeId) {
        self.nodes[id.0 as usize].meta.parent = Some(parent);
    }

    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        self.nodes[id.0 as usize].meta.flags = self.nodes[id.0 as usize].meta.flags.union(flags);
    }

    pub fn flags_of(&self, id: NodeId) -> NodeFlags {
        self.nodes[id.0 as usize].meta.flags
    }

    pub fn into_ast(self, root: NodeId) -> Ast {
        Ast::new(self.nodes, root)
    }
}
