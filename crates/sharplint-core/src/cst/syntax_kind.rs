//! Syntax kind enumeration for the sharplint CST
//!
//! This module defines all possible node and token types in the syntax tree.

use std::fmt;

/// Syntax kind for language elements
///
/// This enum represents all possible types of nodes and tokens in the CST.
/// It includes:
/// - Trivia (whitespace, comments, preprocessor directives)
/// - Keywords (class, if, as, ...)
/// - Punctuation and operators
/// - Literals and identifiers
/// - Structural nodes (declarations, statements, expressions)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    // ==================
    // Trivia (0-9)
    // ==================
    /// Spaces and tabs
    Whitespace = 0,
    /// `\n` or `\r\n`
    Newline = 1,
    /// Line comment starting with //
    LineComment = 2,
    /// Block comment /* ... */
    BlockComment = 3,
    /// A whole preprocessor line such as `#if DEBUG` or `#endregion`
    Directive = 4,

    // ==================
    // Keywords (10-99)
    // ==================
    ClassKw = 10,
    StructKw = 11,
    InterfaceKw = 12,
    NamespaceKw = 13,
    UsingKw = 14,

    // Modifiers
    PublicKw = 20,
    PrivateKw = 21,
    ProtectedKw = 22,
    InternalKw = 23,
    StaticKw = 24,
    ReadonlyKw = 25,
    ConstKw = 26,
    AbstractKw = 27,
    VirtualKw = 28,
    OverrideKw = 29,
    SealedKw = 30,
    AsyncKw = 31,
    PartialKw = 32,
    NewKw = 33,
    ExternKw = 34,
    UnsafeKw = 35,
    VolatileKw = 36,

    // Statements
    IfKw = 40,
    ElseKw = 41,
    WhileKw = 42,
    DoKw = 43,
    ForKw = 44,
    ForeachKw = 45,
    InKw = 46,
    SwitchKw = 47,
    CaseKw = 48,
    DefaultKw = 49,
    BreakKw = 50,
    ContinueKw = 51,
    ReturnKw = 52,
    ThrowKw = 53,
    TryKw = 54,
    CatchKw = 55,
    FinallyKw = 56,

    // Expressions
    AsKw = 60,
    IsKw = 61,
    NullKw = 62,
    TrueKw = 63,
    FalseKw = 64,
    ThisKw = 65,
    BaseKw = 66,
    TypeofKw = 67,
    VoidKw = 68,

    // Contextual keywords (lexed as identifiers, remapped by the parser)
    NotKw = 80,
    WhereKw = 81,
    GetKw = 82,
    SetKw = 83,

    // ==================
    // Punctuation (100-149)
    // ==================
    LParen = 100,
    RParen = 101,
    LBrace = 102,
    RBrace = 103,
    LBracket = 104,
    RBracket = 105,
    Semicolon = 106,
    Comma = 107,
    Dot = 108,
    QuestionDot = 109,
    Colon = 110,
    Question = 111,
    QuestionQuestion = 112,
    QuestionQuestionEq = 113,
    Eq = 114,
    EqEq = 115,
    BangEq = 116,
    Bang = 117,
    Lt = 118,
    Gt = 119,
    LtEq = 120,
    GtEq = 121,
    Plus = 122,
    Minus = 123,
    Star = 124,
    Slash = 125,
    Percent = 126,
    Amp = 127,
    AmpAmp = 128,
    Pipe = 129,
    PipePipe = 130,
    Caret = 131,
    Tilde = 132,
    PlusPlus = 133,
    MinusMinus = 134,
    PlusEq = 135,
    MinusEq = 136,
    StarEq = 137,
    SlashEq = 138,
    FatArrow = 139,

    // ==================
    // Literals and names (150-169)
    // ==================
    Ident = 150,
    IntLiteral = 151,
    RealLiteral = 152,
    StringLiteral = 153,
    CharLiteral = 154,

    // ==================
    // Special (190-199)
    // ==================
    /// Missing or unexpected input
    Error = 190,
    /// End of input (never stored in the tree)
    Eof = 199,

    // ==================
    // Declarations (200-249)
    // ==================
    CompilationUnit = 200,
    UsingDirective = 201,
    NamespaceDecl = 202,
    ClassDecl = 203,
    StructDecl = 204,
    InterfaceDecl = 205,
    MethodDecl = 206,
    ConstructorDecl = 207,
    PropertyDecl = 208,
    FieldDecl = 209,
    ModifierList = 210,
    ParameterList = 211,
    Parameter = 212,
    TypeParameterList = 213,
    TypeParameter = 214,
    ConstraintClause = 215,
    TypeConstraint = 216,
    BaseList = 217,
    AccessorList = 218,
    Accessor = 219,
    VariableDeclarator = 220,
    EqualsValue = 221,
    ArrowClause = 222,

    // ==================
    // Types (230-249)
    // ==================
    NamedType = 230,
    TypeArgList = 231,
    ArrayType = 232,
    NullableType = 233,

    // ==================
    // Statements (250-299)
    // ==================
    Block = 250,
    LocalDeclStmt = 251,
    VariableDecl = 252,
    ExprStmt = 253,
    IfStmt = 254,
    ElseClause = 255,
    WhileStmt = 256,
    DoStmt = 257,
    ForStmt = 258,
    ForeachStmt = 259,
    SwitchStmt = 260,
    SwitchSection = 261,
    CaseLabel = 262,
    DefaultLabel = 263,
    BreakStmt = 264,
    ContinueStmt = 265,
    ReturnStmt = 266,
    ThrowStmt = 267,
    TryStmt = 268,
    CatchClause = 269,
    FinallyClause = 270,
    EmptyStmt = 271,

    // ==================
    // Expressions (300-399)
    // ==================
    Literal = 300,
    NameRef = 301,
    ThisExpr = 302,
    BaseExpr = 303,
    ParenExpr = 304,
    BinaryExpr = 305,
    PrefixExpr = 306,
    PostfixExpr = 307,
    AssignmentExpr = 308,
    ConditionalExpr = 309,
    CastExpr = 310,
    AsExpr = 311,
    IsExpr = 312,
    IsPatternExpr = 313,
    ConstantPattern = 314,
    NotPattern = 315,
    DeclarationPattern = 316,
    MemberAccessExpr = 317,
    InvocationExpr = 318,
    ArgList = 319,
    Argument = 320,
    ElementAccessExpr = 321,
    ObjectCreationExpr = 322,
    InitializerExpr = 323,
    LambdaExpr = 324,
    TypeofExpr = 325,
}

impl SyntaxKind {
    /// Every kind, ordered by discriminant
    const ALL: &'static [SyntaxKind] = &[
        Self::Whitespace,
        Self::Newline,
        Self::LineComment,
        Self::BlockComment,
        Self::Directive,
        Self::ClassKw,
        Self::StructKw,
        Self::InterfaceKw,
        Self::NamespaceKw,
        Self::UsingKw,
        Self::PublicKw,
        Self::PrivateKw,
        Self::ProtectedKw,
        Self::InternalKw,
        Self::StaticKw,
        Self::ReadonlyKw,
        Self::ConstKw,
        Self::AbstractKw,
        Self::VirtualKw,
        Self::OverrideKw,
        Self::SealedKw,
        Self::AsyncKw,
        Self::PartialKw,
        Self::NewKw,
        Self::ExternKw,
        Self::UnsafeKw,
        Self::VolatileKw,
        Self::IfKw,
        Self::ElseKw,
        Self::WhileKw,
        Self::DoKw,
        Self::ForKw,
        Self::ForeachKw,
        Self::InKw,
        Self::SwitchKw,
        Self::CaseKw,
        Self::DefaultKw,
        Self::BreakKw,
        Self::ContinueKw,
        Self::ReturnKw,
        Self::ThrowKw,
        Self::TryKw,
        Self::CatchKw,
        Self::FinallyKw,
        Self::AsKw,
        Self::IsKw,
        Self::NullKw,
        Self::TrueKw,
        Self::FalseKw,
        Self::ThisKw,
        Self::BaseKw,
        Self::TypeofKw,
        Self::VoidKw,
        Self::NotKw,
        Self::WhereKw,
        Self::GetKw,
        Self::SetKw,
        Self::LParen,
        Self::RParen,
        Self::LBrace,
        Self::RBrace,
        Self::LBracket,
        Self::RBracket,
        Self::Semicolon,
        Self::Comma,
        Self::Dot,
        Self::QuestionDot,
        Self::Colon,
        Self::Question,
        Self::QuestionQuestion,
        Self::QuestionQuestionEq,
        Self::Eq,
        Self::EqEq,
        Self::BangEq,
        Self::Bang,
        Self::Lt,
        Self::Gt,
        Self::LtEq,
        Self::GtEq,
        Self::Plus,
        Self::Minus,
        Self::Star,
        Self::Slash,
        Self::Percent,
        Self::Amp,
        Self::AmpAmp,
        Self::Pipe,
        Self::PipePipe,
        Self::Caret,
        Self::Tilde,
        Self::PlusPlus,
        Self::MinusMinus,
        Self::PlusEq,
        Self::MinusEq,
        Self::StarEq,
        Self::SlashEq,
        Self::FatArrow,
        Self::Ident,
        Self::IntLiteral,
        Self::RealLiteral,
        Self::StringLiteral,
        Self::CharLiteral,
        Self::Error,
        Self::Eof,
        Self::CompilationUnit,
        Self::UsingDirective,
        Self::NamespaceDecl,
        Self::ClassDecl,
        Self::StructDecl,
        Self::InterfaceDecl,
        Self::MethodDecl,
        Self::ConstructorDecl,
        Self::PropertyDecl,
        Self::FieldDecl,
        Self::ModifierList,
        Self::ParameterList,
        Self::Parameter,
        Self::TypeParameterList,
        Self::TypeParameter,
        Self::ConstraintClause,
        Self::TypeConstraint,
        Self::BaseList,
        Self::AccessorList,
        Self::Accessor,
        Self::VariableDeclarator,
        Self::EqualsValue,
        Self::ArrowClause,
        Self::NamedType,
        Self::TypeArgList,
        Self::ArrayType,
        Self::NullableType,
        Self::Block,
        Self::LocalDeclStmt,
        Self::VariableDecl,
        Self::ExprStmt,
        Self::IfStmt,
        Self::ElseClause,
        Self::WhileStmt,
        Self::DoStmt,
        Self::ForStmt,
        Self::ForeachStmt,
        Self::SwitchStmt,
        Self::SwitchSection,
        Self::CaseLabel,
        Self::DefaultLabel,
        Self::BreakStmt,
        Self::ContinueStmt,
        Self::ReturnStmt,
        Self::ThrowStmt,
        Self::TryStmt,
        Self::CatchClause,
        Self::FinallyClause,
        Self::EmptyStmt,
        Self::Literal,
        Self::NameRef,
        Self::ThisExpr,
        Self::BaseExpr,
        Self::ParenExpr,
        Self::BinaryExpr,
        Self::PrefixExpr,
        Self::PostfixExpr,
        Self::AssignmentExpr,
        Self::ConditionalExpr,
        Self::CastExpr,
        Self::AsExpr,
        Self::IsExpr,
        Self::IsPatternExpr,
        Self::ConstantPattern,
        Self::NotPattern,
        Self::DeclarationPattern,
        Self::MemberAccessExpr,
        Self::InvocationExpr,
        Self::ArgList,
        Self::Argument,
        Self::ElementAccessExpr,
        Self::ObjectCreationExpr,
        Self::InitializerExpr,
        Self::LambdaExpr,
        Self::TypeofExpr,
    ];

    /// Look up a kind by its raw discriminant
    pub fn from_raw(raw: u16) -> Option<Self> {
        Self::ALL
            .binary_search_by_key(&raw, |kind| *kind as u16)
            .ok()
            .map(|idx| Self::ALL[idx])
    }

    /// Check if this is a trivia kind (whitespace, comments, newlines, directives)
    pub const fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::Whitespace
                | Self::Newline
                | Self::LineComment
                | Self::BlockComment
                | Self::Directive
        )
    }

    /// Comments and directives; trivia that carries meaning
    pub const fn is_comment_like(self) -> bool {
        matches!(
            self,
            Self::LineComment | Self::BlockComment | Self::Directive
        )
    }

    /// Check if this is a keyword
    pub const fn is_keyword(self) -> bool {
        (self as u16) >= 10 && (self as u16) < 100
    }

    /// Check if this keyword can appear in a modifier list
    pub const fn is_modifier(self) -> bool {
        (self as u16) >= 20 && (self as u16) <= 36
    }

    /// Check if this is punctuation
    pub const fn is_punct(self) -> bool {
        (self as u16) >= 100 && (self as u16) < 150
    }

    /// Check if this is a literal token
    pub const fn is_literal(self) -> bool {
        matches!(
            self,
            Self::IntLiteral
                | Self::RealLiteral
                | Self::StringLiteral
                | Self::CharLiteral
                | Self::NullKw
                | Self::TrueKw
                | Self::FalseKw
        )
    }

    /// Check if this is a structural node
    pub const fn is_node(self) -> bool {
        (self as u16) >= 200
    }

    /// Statement node kinds
    pub const fn is_statement(self) -> bool {
        (self as u16) >= 250 && (self as u16) < 300 && !matches!(
            self,
            Self::ElseClause
                | Self::VariableDecl
                | Self::SwitchSection
                | Self::CaseLabel
                | Self::DefaultLabel
                | Self::CatchClause
                | Self::FinallyClause
        )
    }

    /// Expression node kinds
    pub const fn is_expression(self) -> bool {
        (self as u16) >= 300
            && !matches!(
                self,
                Self::ConstantPattern
                    | Self::NotPattern
                    | Self::DeclarationPattern
                    | Self::ArgList
                    | Self::Argument
                    | Self::InitializerExpr
            )
    }

    /// Type node kinds
    pub const fn is_type(self) -> bool {
        matches!(self, Self::NamedType | Self::ArrayType | Self::NullableType)
    }

    /// Member declaration node kinds
    pub const fn is_member_declaration(self) -> bool {
        matches!(
            self,
            Self::ClassDecl
                | Self::StructDecl
                | Self::InterfaceDecl
                | Self::MethodDecl
                | Self::ConstructorDecl
                | Self::PropertyDecl
                | Self::FieldDecl
        )
    }

    /// Get the text representation of keyword tokens
    pub const fn keyword_text(self) -> Option<&'static str> {
        match self {
            Self::ClassKw => Some("class"),
            Self::StructKw => Some("struct"),
            Self::InterfaceKw => Some("interface"),
            Self::NamespaceKw => Some("namespace"),
            Self::UsingKw => Some("using"),
            Self::PublicKw => Some("public"),
            Self::PrivateKw => Some("private"),
            Self::ProtectedKw => Some("protected"),
            Self::InternalKw => Some("internal"),
            Self::StaticKw => Some("static"),
            Self::ReadonlyKw => Some("readonly"),
            Self::ConstKw => Some("const"),
            Self::AbstractKw => Some("abstract"),
            Self::VirtualKw => Some("virtual"),
            Self::OverrideKw => Some("override"),
            Self::SealedKw => Some("sealed"),
            Self::AsyncKw => Some("async"),
            Self::PartialKw => Some("partial"),
            Self::NewKw => Some("new"),
            Self::ExternKw => Some("extern"),
            Self::UnsafeKw => Some("unsafe"),
            Self::VolatileKw => Some("volatile"),
            Self::IfKw => Some("if"),
            Self::ElseKw => Some("else"),
            Self::WhileKw => Some("while"),
            Self::DoKw => Some("do"),
            Self::ForKw => Some("for"),
            Self::ForeachKw => Some("foreach"),
            Self::InKw => Some("in"),
            Self::SwitchKw => Some("switch"),
            Self::CaseKw => Some("case"),
            Self::DefaultKw => Some("default"),
            Self::BreakKw => Some("break"),
            Self::ContinueKw => Some("continue"),
            Self::ReturnKw => Some("return"),
            Self::ThrowKw => Some("throw"),
            Self::TryKw => Some("try"),
            Self::CatchKw => Some("catch"),
            Self::FinallyKw => Some("finally"),
            Self::AsKw => Some("as"),
            Self::IsKw => Some("is"),
            Self::NullKw => Some("null"),
            Self::TrueKw => Some("true"),
            Self::FalseKw => Some("false"),
            Self::ThisKw => Some("this"),
            Self::BaseKw => Some("base"),
            Self::TypeofKw => Some("typeof"),
            Self::VoidKw => Some("void"),
            Self::NotKw => Some("not"),
            Self::WhereKw => Some("where"),
            Self::GetKw => Some("get"),
            Self::SetKw => Some("set"),
            _ => None,
        }
    }

    /// Reserved keyword for an identifier-shaped word, if any
    ///
    /// Contextual keywords (`not`, `where`, `get`, `set`) are not returned here;
    /// the parser remaps them where they are meaningful.
    pub fn from_keyword(text: &str) -> Option<Self> {
        let kind = match text {
            "class" => Self::ClassKw,
            "struct" => Self::StructKw,
            "interface" => Self::InterfaceKw,
            "namespace" => Self::NamespaceKw,
            "using" => Self::UsingKw,
            "public" => Self::PublicKw,
            "private" => Self::PrivateKw,
            "protected" => Self::ProtectedKw,
            "internal" => Self::InternalKw,
            "static" => Self::StaticKw,
            "readonly" => Self::ReadonlyKw,
            "const" => Self::ConstKw,
            "abstract" => Self::AbstractKw,
            "virtual" => Self::VirtualKw,
            "override" => Self::OverrideKw,
            "sealed" => Self::SealedKw,
            "async" => Self::AsyncKw,
            "partial" => Self::PartialKw,
            "new" => Self::NewKw,
            "extern" => Self::ExternKw,
            "unsafe" => Self::UnsafeKw,
            "volatile" => Self::VolatileKw,
            "if" => Self::IfKw,
            "else" => Self::ElseKw,
            "while" => Self::WhileKw,
            "do" => Self::DoKw,
            "for" => Self::ForKw,
            "foreach" => Self::ForeachKw,
            "in" => Self::InKw,
            "switch" => Self::SwitchKw,
            "case" => Self::CaseKw,
            "default" => Self::DefaultKw,
            "break" => Self::BreakKw,
            "continue" => Self::ContinueKw,
            "return" => Self::ReturnKw,
            "throw" => Self::ThrowKw,
            "try" => Self::TryKw,
            "catch" => Self::CatchKw,
            "finally" => Self::FinallyKw,
            "as" => Self::AsKw,
            "is" => Self::IsKw,
            "null" => Self::NullKw,
            "true" => Self::TrueKw,
            "false" => Self::FalseKw,
            "this" => Self::ThisKw,
            "base" => Self::BaseKw,
            "typeof" => Self::TypeofKw,
            "void" => Self::VoidKw,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}
