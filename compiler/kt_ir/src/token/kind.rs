//! The closed set of lexical categories.

use std::fmt;

macro_rules! token_kinds {
    ($( $(#[$meta:meta])* $variant:ident = $name:literal $(, $spelling:literal)? ; )*) => {
        /// Lexical category of one token.
        ///
        /// Discriminants are dense and start at zero, which lets
        /// [`TokenSet`](super::TokenSet) index a bitset by `kind as u8`.
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum TokenKind {
            $( $(#[$meta])* $variant, )*
        }

        impl TokenKind {
            /// Every kind, indexed by discriminant.
            pub const ALL: &'static [TokenKind] = &[ $( TokenKind::$variant, )* ];

            /// Upper-case name used in tree dumps, e.g. `LPAR`.
            pub const fn debug_name(self) -> &'static str {
                match self {
                    $( TokenKind::$variant => $name, )*
                }
            }

            /// Canonical source text for kinds that have exactly one spelling.
            pub const fn spelling(self) -> Option<&'static str> {
                match self {
                    $( TokenKind::$variant => token_kinds!(@spelling $($spelling)?), )*
                }
            }
        }
    };
    (@spelling) => { None };
    (@spelling $s:literal) => { Some($s) };
}

token_kinds! {
    Eof = "EOF";
    BadCharacter = "BAD_CHARACTER";
    Reserved = "RESERVED";

    // Trivia
    WhiteSpace = "WHITE_SPACE";
    EolComment = "EOL_COMMENT";
    BlockComment = "BLOCK_COMMENT";
    ShebangComment = "SHEBANG_COMMENT";
    /// `/** ... */`, kept opaque until its structure is requested.
    DocComment = "KDoc";

    // Literals
    IntegerLiteral = "INTEGER_LITERAL";
    FloatLiteral = "FLOAT_CONSTANT";
    CharacterLiteral = "CHARACTER_LITERAL";
    OpenQuote = "OPEN_QUOTE", "\"";
    ClosingQuote = "CLOSING_QUOTE", "\"";
    RegularStringPart = "REGULAR_STRING_PART";
    EscapeSequence = "ESCAPE_SEQUENCE";
    ShortTemplateEntryStart = "SHORT_TEMPLATE_ENTRY_START", "$";
    LongTemplateEntryStart = "LONG_TEMPLATE_ENTRY_START", "${";
    LongTemplateEntryEnd = "LONG_TEMPLATE_ENTRY_END", "}";

    Identifier = "IDENTIFIER";

    // Fixed keywords
    PackageKeyword = "package", "package";
    AsKeyword = "as", "as";
    TypeAliasKeyword = "typealias", "typealias";
    ClassKeyword = "class", "class";
    InterfaceKeyword = "interface", "interface";
    ThisKeyword = "this", "this";
    SuperKeyword = "super", "super";
    ValKeyword = "val", "val";
    VarKeyword = "var", "var";
    FunKeyword = "fun", "fun";
    ForKeyword = "for", "for";
    NullKeyword = "null", "null";
    TrueKeyword = "true", "true";
    FalseKeyword = "false", "false";
    IsKeyword = "is", "is";
    InKeyword = "in", "in";
    ThrowKeyword = "throw", "throw";
    ReturnKeyword = "return", "return";
    BreakKeyword = "break", "break";
    ContinueKeyword = "continue", "continue";
    ObjectKeyword = "object", "object";
    IfKeyword = "if", "if";
    ElseKeyword = "else", "else";
    WhileKeyword = "while", "while";
    DoKeyword = "do", "do";
    TryKeyword = "try", "try";
    WhenKeyword = "when", "when";
    TypeofKeyword = "typeof", "typeof";
    AsSafe = "AS_SAFE", "as?";
    NotIn = "NOT_IN", "!in";
    NotIs = "NOT_IS", "!is";

    // Punctuation and operators
    LBracket = "LBRACKET", "[";
    RBracket = "RBRACKET", "]";
    LBrace = "LBRACE", "{";
    RBrace = "RBRACE", "}";
    LPar = "LPAR", "(";
    RPar = "RPAR", ")";
    Dot = "DOT", ".";
    PlusPlus = "PLUSPLUS", "++";
    MinusMinus = "MINUSMINUS", "--";
    Mul = "MUL", "*";
    Plus = "PLUS", "+";
    Minus = "MINUS", "-";
    Excl = "EXCL", "!";
    Div = "DIV", "/";
    Perc = "PERC", "%";
    Lt = "LT", "<";
    Gt = "GT", ">";
    LtEq = "LTEQ", "<=";
    GtEq = "GTEQ", ">=";
    EqEqEq = "EQEQEQ", "===";
    ExclEqEqEq = "EXCLEQEQEQ", "!==";
    EqEq = "EQEQ", "==";
    ExclEq = "EXCLEQ", "!=";
    ExclExcl = "EXCLEXCL", "!!";
    AndAnd = "ANDAND", "&&";
    And = "AND", "&";
    OrOr = "OROR", "||";
    SafeAccess = "SAFE_ACCESS", "?.";
    Elvis = "ELVIS", "?:";
    Quest = "QUEST", "?";
    ColonColon = "COLONCOLON", "::";
    Colon = "COLON", ":";
    Semicolon = "SEMICOLON", ";";
    DoubleSemicolon = "DOUBLE_SEMICOLON", ";;";
    Range = "RANGE", "..";
    RangeUntil = "RANGE_UNTIL", "..<";
    Eq = "EQ", "=";
    MultEq = "MULTEQ", "*=";
    DivEq = "DIVEQ", "/=";
    PercEq = "PERCEQ", "%=";
    PlusEq = "PLUSEQ", "+=";
    MinusEq = "MINUSEQ", "-=";
    Arrow = "ARROW", "->";
    DoubleArrow = "DOUBLE_ARROW", "=>";
    Comma = "COMMA", ",";
    Hash = "HASH", "#";
    At = "AT", "@";

    /// Only meaningful inside token sets: a statement end (newline, `;` or end of input).
    EolOrSemicolon = "EOL_OR_SEMICOLON";

    // Soft keywords
    FileKeyword = "file", "file";
    ImportKeyword = "import", "import";
    WhereKeyword = "where", "where";
    ByKeyword = "by", "by";
    GetKeyword = "get", "get";
    SetKeyword = "set", "set";
    ConstructorKeyword = "constructor", "constructor";
    InitKeyword = "init", "init";
    ContextKeyword = "context", "context";
    AbstractKeyword = "abstract", "abstract";
    EnumKeyword = "enum", "enum";
    ContractKeyword = "contract", "contract";
    OpenKeyword = "open", "open";
    InnerKeyword = "inner", "inner";
    OverrideKeyword = "override", "override";
    PrivateKeyword = "private", "private";
    PublicKeyword = "public", "public";
    InternalKeyword = "internal", "internal";
    ProtectedKeyword = "protected", "protected";
    CatchKeyword = "catch", "catch";
    OutKeyword = "out", "out";
    VarargKeyword = "vararg", "vararg";
    ReifiedKeyword = "reified", "reified";
    DynamicKeyword = "dynamic", "dynamic";
    CompanionKeyword = "companion", "companion";
    SealedKeyword = "sealed", "sealed";
    FinallyKeyword = "finally", "finally";
    FinalKeyword = "final", "final";
    FieldKeyword = "field", "field";
    PropertyKeyword = "property", "property";
    ReceiverKeyword = "receiver", "receiver";
    ParamKeyword = "param", "param";
    SetparamKeyword = "setparam", "setparam";
    DelegateKeyword = "delegate", "delegate";
    LateinitKeyword = "lateinit", "lateinit";
    DataKeyword = "data", "data";
    InlineKeyword = "inline", "inline";
    NoinlineKeyword = "noinline", "noinline";
    TailrecKeyword = "tailrec", "tailrec";
    ExternalKeyword = "external", "external";
    AnnotationKeyword = "annotation", "annotation";
    CrossinlineKeyword = "crossinline", "crossinline";
    OperatorKeyword = "operator", "operator";
    InfixKeyword = "infix", "infix";
    ConstKeyword = "const", "const";
    SuspendKeyword = "suspend", "suspend";
    ExpectKeyword = "expect", "expect";
    ActualKeyword = "actual", "actual";
    ValueKeyword = "value", "value";

    // Documentation comment sublanguage
    KdocStart = "KDOC_START", "/**";
    KdocEnd = "KDOC_END", "*/";
    KdocLeadingAsterisk = "KDOC_LEADING_ASTERISK", "*";
    KdocText = "KDOC_TEXT";
    KdocCodeBlockText = "KDOC_CODE_BLOCK_TEXT";
    KdocTagName = "KDOC_TAG_NAME";
    /// `[name]` inside a doc comment, itself a deferred region.
    KdocMarkdownLink = "KDOC_MARKDOWN_LINK";
    KdocMarkdownEscapedChar = "KDOC_MARKDOWN_ESCAPED_CHAR";
    KdocMarkdownInlineLink = "KDOC_MARKDOWN_INLINE_LINK";
}

impl TokenKind {
    /// Highest discriminant in use.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "token kinds are repr(u8); asserted below"
    )]
    pub const MAX_DISCRIMINANT: u8 = (Self::ALL.len() - 1) as u8;

    /// Kind for a discriminant index, if one exists.
    #[inline]
    pub fn from_index(index: u8) -> Option<TokenKind> {
        Self::ALL.get(index as usize).copied()
    }

    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Human-readable form for diagnostics: the spelling when there is one.
    pub fn display_name(self) -> &'static str {
        match self {
            TokenKind::Identifier => "identifier",
            TokenKind::Eof => "end of file",
            TokenKind::EolOrSemicolon => "newline or ';'",
            _ => self.spelling().unwrap_or_else(|| self.debug_name()),
        }
    }

    /// Trivia never influences grammar decisions except newline rules.
    #[inline]
    pub fn is_trivia(self) -> bool {
        super::set::WHITE_SPACE_OR_COMMENT.contains(self)
    }

    /// Kinds whose internal structure is parsed on demand.
    #[inline]
    pub fn is_deferred(self) -> bool {
        matches!(self, TokenKind::DocComment | TokenKind::KdocMarkdownLink)
    }
}

const _: () = assert!(
    TokenKind::ALL.len() <= 256,
    "token kinds must fit a u8 discriminant"
);

impl fmt::Debug for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.debug_name())
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
