//! The ESTree-compatible syntax tree produced by a successful parse.
//!
//! Every node embeds its `span`; `#[serde(tag = "type")]` on each enum makes
//! the serialized JSON carry the familiar ESTree `type` discriminant
//! (`"BinaryExpression"`, `"Identifier"`, …) without a separate mapping
//! table.

use esparse_span::{Span, Symbol};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Program {
    pub span: Span,
    pub source_type: SourceType,
    pub body: Vec<ModuleItem>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceType {
    Script,
    Module,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ModuleItem {
    #[serde(rename = "ImportDeclaration")]
    Import(ImportDeclaration),
    #[serde(rename = "ExportNamedDeclaration")]
    ExportNamed(ExportNamedDeclaration),
    #[serde(rename = "ExportDefaultDeclaration")]
    ExportDefault(ExportDefaultDeclaration),
    #[serde(rename = "ExportAllDeclaration")]
    ExportAll(ExportAllDeclaration),
    Stmt(Stmt),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ImportDeclaration {
    pub span: Span,
    pub specifiers: Vec<ImportSpecifier>,
    pub source: Literal,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ImportSpecifier {
    #[serde(rename = "ImportSpecifier")]
    Named { span: Span, imported: Ident, local: Ident },
    #[serde(rename = "ImportDefaultSpecifier")]
    Default { span: Span, local: Ident },
    #[serde(rename = "ImportNamespaceSpecifier")]
    Namespace { span: Span, local: Ident },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportNamedDeclaration {
    pub span: Span,
    pub declaration: Option<Box<Decl>>,
    pub specifiers: Vec<ExportSpecifier>,
    pub source: Option<Literal>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportSpecifier {
    pub span: Span,
    pub local: Ident,
    pub exported: Ident,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportDefaultDeclaration {
    pub span: Span,
    pub declaration: ExportDefaultKind,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ExportDefaultKind {
    Decl(Decl),
    Expr(Box<Expr>),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportAllDeclaration {
    pub span: Span,
    pub exported: Option<Ident>,
    pub source: Literal,
}

// --- Statements -------------------------------------------------------

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Stmt {
    ExpressionStatement { span: Span, expression: Expr },
    BlockStatement { span: Span, body: Vec<Stmt> },
    EmptyStatement { span: Span },
    DebuggerStatement { span: Span },
    WithStatement { span: Span, object: Expr, body: Box<Stmt> },
    ReturnStatement { span: Span, argument: Option<Expr> },
    LabeledStatement { span: Span, label: Ident, body: Box<Stmt> },
    BreakStatement { span: Span, label: Option<Ident> },
    ContinueStatement { span: Span, label: Option<Ident> },
    IfStatement { span: Span, test: Expr, consequent: Box<Stmt>, alternate: Option<Box<Stmt>> },
    SwitchStatement { span: Span, discriminant: Expr, cases: Vec<SwitchCase> },
    ThrowStatement { span: Span, argument: Expr },
    TryStatement { span: Span, block: Box<Stmt>, handler: Option<CatchClause>, finalizer: Option<Box<Stmt>> },
    WhileStatement { span: Span, test: Expr, body: Box<Stmt> },
    DoWhileStatement { span: Span, body: Box<Stmt>, test: Expr },
    ForStatement {
        span: Span,
        init: Option<Box<ForInit>>,
        test: Option<Expr>,
        update: Option<Expr>,
        body: Box<Stmt>,
    },
    ForInStatement { span: Span, left: Box<ForInit>, right: Expr, body: Box<Stmt> },
    ForOfStatement { span: Span, left: Box<ForInit>, right: Expr, body: Box<Stmt>, is_await: bool },
    Declaration(Decl),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::ExpressionStatement { span, .. }
            | Stmt::BlockStatement { span, .. }
            | Stmt::EmptyStatement { span }
            | Stmt::DebuggerStatement { span }
            | Stmt::WithStatement { span, .. }
            | Stmt::ReturnStatement { span, .. }
            | Stmt::LabeledStatement { span, .. }
            | Stmt::BreakStatement { span, .. }
            | Stmt::ContinueStatement { span, .. }
            | Stmt::IfStatement { span, .. }
            | Stmt::SwitchStatement { span, .. }
            | Stmt::ThrowStatement { span, .. }
            | Stmt::TryStatement { span, .. }
            | Stmt::WhileStatement { span, .. }
            | Stmt::DoWhileStatement { span, .. }
            | Stmt::ForStatement { span, .. }
            | Stmt::ForInStatement { span, .. }
            | Stmt::ForOfStatement { span, .. } => *span,
            Stmt::Declaration(d) => d.span(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ForInit {
    VarDecl(VarDeclaration),
    Pattern(Pattern),
    Expr(Expr),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SwitchCase {
    pub span: Span,
    pub test: Option<Expr>,
    pub consequent: Vec<Stmt>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CatchClause {
    pub span: Span,
    pub param: Option<Pattern>,
    pub body: Box<Stmt>,
}

// --- Declarations -------------------------------------------------------

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Decl {
    VariableDeclaration(VarDeclaration),
    FunctionDeclaration(Function),
    ClassDeclaration(Class),
}

impl Decl {
    pub fn span(&self) -> Span {
        match self {
            Decl::VariableDeclaration(d) => d.span,
            Decl::FunctionDeclaration(f) => f.span,
            Decl::ClassDeclaration(c) => c.span,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VarKind {
    Var,
    Let,
    Const,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VarDeclaration {
    pub span: Span,
    pub kind: VarKind,
    pub declarations: Vec<VarDeclarator>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VarDeclarator {
    pub span: Span,
    pub id: Pattern,
    pub init: Option<Expr>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Function {
    pub span: Span,
    pub id: Option<Ident>,
    pub params: Vec<Pattern>,
    pub body: FunctionBody,
    pub generator: bool,
    pub is_async: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FunctionBody {
    Block { span: Span, body: Vec<Stmt> },
    /// Arrow functions with a bare expression body (`x => x + 1`).
    Expression(Box<Expr>),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Class {
    pub span: Span,
    pub id: Option<Ident>,
    pub super_class: Option<Box<Expr>>,
    pub body: Vec<ClassMember>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClassMember {
    MethodDefinition {
        span: Span,
        key: PropertyKey,
        computed: bool,
        kind: MethodKind,
        is_static: bool,
        function: Function,
    },
    PropertyDefinition {
        span: Span,
        key: PropertyKey,
        computed: bool,
        is_static: bool,
        value: Option<Expr>,
    },
    StaticBlock {
        span: Span,
        body: Vec<Stmt>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MethodKind {
    Method,
    Get,
    Set,
    Constructor,
}

// --- Patterns -------------------------------------------------------

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Pattern {
    Identifier(Ident),
    ObjectPattern { span: Span, properties: Vec<ObjectPatternProp> },
    ArrayPattern { span: Span, elements: Vec<Option<Pattern>> },
    AssignmentPattern { span: Span, left: Box<Pattern>, right: Box<Expr> },
    RestElement { span: Span, argument: Box<Pattern> },
}

impl Pattern {
    pub fn span(&self) -> Span {
        match self {
            Pattern::Identifier(id) => id.span,
            Pattern::ObjectPattern { span, .. }
            | Pattern::ArrayPattern { span, .. }
            | Pattern::AssignmentPattern { span, .. }
            | Pattern::RestElement { span, .. } => *span,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ObjectPatternProp {
    Property { span: Span, key: PropertyKey, computed: bool, shorthand: bool, value: Box<Pattern> },
    RestElement { span: Span, argument: Box<Pattern> },
}

// --- Expressions -------------------------------------------------------

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Expr {
    Identifier(Ident),
    Literal(Literal),
    ThisExpression { span: Span },
    Super { span: Span },
    ArrayExpression { span: Span, elements: Vec<Option<Expr>> },
    ObjectExpression { span: Span, properties: Vec<ObjectProp> },
    FunctionExpression(Function),
    ArrowFunctionExpression(Function),
    ClassExpression(Class),
    TaggedTemplateExpression { span: Span, tag: Box<Expr>, quasi: TemplateLiteral },
    TemplateLiteral(TemplateLiteral),
    RegExpLiteral {
        span: Span,
        pattern: String,
        flags: String,
        /// The compiled pattern, if the `regex` crate can represent it --
        /// `None` for patterns valid in ECMAScript but outside what `regex`
        /// supports (backreferences, lookaround), not for a parse failure
        /// (an invalid pattern is rejected earlier, during tokenizing).
        #[serde(skip)]
        value: Option<regex::Regex>,
    },
    UnaryExpression { span: Span, operator: UnaryOp, prefix: bool, argument: Box<Expr> },
    UpdateExpression { span: Span, operator: UpdateOp, prefix: bool, argument: Box<Expr> },
    BinaryExpression { span: Span, operator: BinaryOp, left: Box<Expr>, right: Box<Expr> },
    LogicalExpression { span: Span, operator: LogicalOp, left: Box<Expr>, right: Box<Expr> },
    AssignmentExpression { span: Span, operator: AssignOp, left: Box<PatternOrExpr>, right: Box<Expr> },
    ConditionalExpression { span: Span, test: Box<Expr>, consequent: Box<Expr>, alternate: Box<Expr> },
    CallExpression { span: Span, callee: Box<Expr>, arguments: Vec<Expr>, optional: bool },
    NewExpression { span: Span, callee: Box<Expr>, arguments: Vec<Expr> },
    SequenceExpression { span: Span, expressions: Vec<Expr> },
    MemberExpression {
        span: Span,
        object: Box<Expr>,
        property: Box<Expr>,
        computed: bool,
        optional: bool,
    },
    ChainExpression { span: Span, expression: Box<Expr> },
    SpreadElement { span: Span, argument: Box<Expr> },
    YieldExpression { span: Span, argument: Option<Box<Expr>>, delegate: bool },
    AwaitExpression { span: Span, argument: Box<Expr> },
    ParenthesizedExpression { span: Span, expression: Box<Expr> },
    MetaProperty { span: Span, meta: Ident, property: Ident },
    ImportExpression { span: Span, source: Box<Expr> },
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Identifier(id) => id.span,
            Expr::Literal(l) => l.span,
            Expr::ThisExpression { span }
            | Expr::Super { span }
            | Expr::ArrayExpression { span, .. }
            | Expr::ObjectExpression { span, .. }
            | Expr::TaggedTemplateExpression { span, .. }
            | Expr::RegExpLiteral { span, .. }
            | Expr::UnaryExpression { span, .. }
            | Expr::UpdateExpression { span, .. }
            | Expr::BinaryExpression { span, .. }
            | Expr::LogicalExpression { span, .. }
            | Expr::AssignmentExpression { span, .. }
            | Expr::ConditionalExpression { span, .. }
            | Expr::CallExpression { span, .. }
            | Expr::NewExpression { span, .. }
            | Expr::SequenceExpression { span, .. }
            | Expr::MemberExpression { span, .. }
            | Expr::ChainExpression { span, .. }
            | Expr::SpreadElement { span, .. }
            | Expr::YieldExpression { span, .. }
            | Expr::AwaitExpression { span, .. }
            | Expr::ParenthesizedExpression { span, .. }
            | Expr::MetaProperty { span, .. }
            | Expr::ImportExpression { span, .. } => *span,
            Expr::FunctionExpression(f) | Expr::ArrowFunctionExpression(f) => f.span,
            Expr::ClassExpression(c) => c.span,
            Expr::TemplateLiteral(t) => t.span,
        }
    }
}

/// The left-hand side of an assignment may be a full pattern (after
/// `to_assignable` rewrites a cover grammar) or, for the simple `Identifier =
/// …` / `member.expr = …` cases, stays a plain expression. Both share this
/// enum rather than forcing every assignment target through pattern
/// construction.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PatternOrExpr {
    Pattern(Pattern),
    Expr(Expr),
}

impl PatternOrExpr {
    pub fn span(&self) -> Span {
        match self {
            PatternOrExpr::Pattern(p) => p.span(),
            PatternOrExpr::Expr(e) => e.span(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ObjectProp {
    Property {
        span: Span,
        key: PropertyKey,
        computed: bool,
        shorthand: bool,
        kind: MethodKind,
        value: Box<Expr>,
    },
    SpreadElement {
        span: Span,
        argument: Box<Expr>,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PropertyKey {
    Identifier(Ident),
    Literal(Literal),
    Computed(Box<Expr>),
    PrivateName(Ident),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Ident {
    pub span: Span,
    pub name: Symbol,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Literal {
    pub span: Span,
    pub value: LiteralValue,
    pub raw: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum LiteralValue {
    Null,
    Bool(bool),
    Number(f64),
    BigInt(String),
    String(String),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TemplateLiteral {
    pub span: Span,
    pub quasis: Vec<TemplateElement>,
    pub expressions: Vec<Expr>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TemplateElement {
    pub span: Span,
    pub tail: bool,
    pub cooked: Option<String>,
    pub raw: String,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Minus,
    Plus,
    Not,
    BitwiseNot,
    Typeof,
    Void,
    Delete,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateOp {
    Increment,
    Decrement,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Equal,
    NotEqual,
    StrictEqual,
    StrictNotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    ShiftLeft,
    ShiftRight,
    UnsignedShiftRight,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    In,
    InstanceOf,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicalOp {
    And,
    Or,
    Nullish,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    PowAssign,
    ShiftLeftAssign,
    ShiftRightAssign,
    UnsignedShiftRightAssign,
    BitwiseAndAssign,
    BitwiseOrAssign,
    BitwiseXorAssign,
    LogicalAndAssign,
    LogicalOrAssign,
    NullishAssign,
}
