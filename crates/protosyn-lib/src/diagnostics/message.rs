use rowan::TextRange;

/// Syntax problems a lenient (editor) parse tolerates.
///
/// Tooling uses the category to decide whether a formatter can repair the
/// source on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExtendedSyntaxCategory {
    EmptyDecl,
    IncompleteDecl,
    ExtraTokens,
    WrongToken,
    MissingToken,
    DeclNotAllowed,
}

impl ExtendedSyntaxCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmptyDecl => "empty-decl",
            Self::IncompleteDecl => "incomplete-decl",
            Self::ExtraTokens => "extra-tokens",
            Self::WrongToken => "wrong-token",
            Self::MissingToken => "missing-token",
            Self::DeclNotAllowed => "decl-not-allowed",
        }
    }

    /// A formatter can repair this without guessing the author's intent.
    pub fn is_auto_fixable(&self) -> bool {
        matches!(self, Self::EmptyDecl | Self::MissingToken)
    }
}

impl std::fmt::Display for ExtendedSyntaxCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diagnostic kinds ordered by priority (highest priority first).
///
/// When two diagnostics overlap, the higher-priority one suppresses the
/// lower-priority one in the filtered view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    // Unclosed delimiters swallow the rest of the file
    UnclosedBody,
    UnclosedList,
    UnclosedParen,
    UnclosedLiteral,

    // Lexical errors
    InvalidControlCharacter,
    InvalidCharacter,
    UnterminatedString,
    UnterminatedBlockComment,
    InvalidEscape,
    TooManyEscapeErrors,
    InvalidNumber,
    IntegerOverflow,
    TooManyLexerErrors,

    // User omitted something required
    ExpectedIdent,
    ExpectedString,
    ExpectedInt,
    ExpectedValue,
    ExpectedType,
    ExpectedOptionName,
    ExpectedDeclaration,
    ExpectedToken,

    // User wrote something that doesn't belong
    UnexpectedToken,
    SpacedQualifiedName,
    UnknownSyntax,

    // Tolerated in editor mode
    ExtendedSyntax(ExtendedSyntaxCategory),
}

impl DiagnosticKind {
    /// Severity outside editor mode.
    pub fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Whether this kind suppresses `other` when spans overlap.
    pub fn suppresses(&self, other: &DiagnosticKind) -> bool {
        self < other
    }

    pub fn is_structural_error(&self) -> bool {
        matches!(
            self,
            Self::UnclosedBody | Self::UnclosedList | Self::UnclosedParen | Self::UnclosedLiteral
        )
    }

    pub fn is_root_cause_error(&self) -> bool {
        matches!(
            self,
            Self::ExpectedIdent
                | Self::ExpectedString
                | Self::ExpectedInt
                | Self::ExpectedValue
                | Self::ExpectedType
                | Self::ExpectedOptionName
                | Self::ExpectedDeclaration
                | Self::ExpectedToken
        )
    }

    pub fn is_lexical_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidControlCharacter
                | Self::InvalidCharacter
                | Self::UnterminatedString
                | Self::UnterminatedBlockComment
                | Self::InvalidEscape
                | Self::TooManyEscapeErrors
                | Self::InvalidNumber
                | Self::IntegerOverflow
                | Self::TooManyLexerErrors
        )
    }

    pub fn category(&self) -> Option<ExtendedSyntaxCategory> {
        match self {
            Self::ExtendedSyntax(category) => Some(*category),
            _ => None,
        }
    }

    /// Base message for this diagnostic kind, used when no custom message is provided.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::UnclosedBody => "missing closing `}`",
            Self::UnclosedList => "missing closing `]`",
            Self::UnclosedParen => "missing closing `)`",
            Self::UnclosedLiteral => "unclosed message literal",

            Self::InvalidControlCharacter => "invalid control character",
            Self::InvalidCharacter => "invalid character",
            Self::UnterminatedString => "unterminated string literal",
            Self::UnterminatedBlockComment => "unterminated block comment",
            Self::InvalidEscape => "invalid escape sequence",
            Self::TooManyEscapeErrors => "too many invalid escapes in string literal",
            Self::InvalidNumber => "invalid numeric literal",
            Self::IntegerOverflow => "integer literal out of range",
            Self::TooManyLexerErrors => "too many errors, giving up",

            Self::ExpectedIdent => "expected identifier",
            Self::ExpectedString => "expected string literal",
            Self::ExpectedInt => "expected integer",
            Self::ExpectedValue => "expected a value",
            Self::ExpectedType => "expected type name",
            Self::ExpectedOptionName => "expected option name",
            Self::ExpectedDeclaration => "expected a declaration",
            Self::ExpectedToken => "expected token",

            Self::UnexpectedToken => "unexpected token",
            Self::SpacedQualifiedName => "qualified names cannot contain whitespace",
            Self::UnknownSyntax => "unrecognized syntax",

            Self::ExtendedSyntax(category) => match category {
                ExtendedSyntaxCategory::EmptyDecl => "empty declaration",
                ExtendedSyntaxCategory::IncompleteDecl => "incomplete declaration",
                ExtendedSyntaxCategory::ExtraTokens => "unexpected tokens",
                ExtendedSyntaxCategory::WrongToken => "wrong token",
                ExtendedSyntaxCategory::MissingToken => "missing token",
                ExtendedSyntaxCategory::DeclNotAllowed => "declaration not allowed here",
            },
        }
    }

    /// Template for custom messages. Contains `{}` placeholder for caller-provided detail.
    pub fn custom_message(&self) -> String {
        match self {
            Self::ExpectedToken => "expected {}".to_string(),
            Self::UnknownSyntax => "unrecognized syntax {}".to_string(),
            Self::TooManyEscapeErrors | Self::TooManyLexerErrors => "{}".to_string(),

            Self::UnclosedBody
            | Self::UnclosedList
            | Self::UnclosedParen
            | Self::UnclosedLiteral => {
                format!("{}; {{}}", self.fallback_message())
            }

            Self::ExtendedSyntax(category) => match category {
                ExtendedSyntaxCategory::MissingToken => "missing {}".to_string(),
                ExtendedSyntaxCategory::ExtraTokens => "unexpected {}".to_string(),
                ExtendedSyntaxCategory::DeclNotAllowed => "{} is not allowed here".to_string(),
                ExtendedSyntaxCategory::IncompleteDecl => "incomplete {}".to_string(),
                ExtendedSyntaxCategory::WrongToken => "{}".to_string(),
                ExtendedSyntaxCategory::EmptyDecl => self.fallback_message().to_string(),
            },

            _ => format!("{}: {{}}", self.fallback_message()),
        }
    }

    /// Render the final message.
    ///
    /// - `None` → returns `fallback_message()`
    /// - `Some(detail)` → returns `custom_message()` with `{}` replaced by detail
    pub fn message(&self, msg: Option<&str>) -> String {
        match msg {
            None => self.fallback_message().to_string(),
            Some(detail) => self.custom_message().replace("{}", detail),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fix {
    pub(crate) replacement: String,
    pub(crate) description: String,
}

impl Fix {
    pub fn new(replacement: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            replacement: replacement.into(),
            description: description.into(),
        }
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub(crate) range: TextRange,
    pub(crate) message: String,
}

impl RelatedInfo {
    pub fn new(range: TextRange, message: impl Into<String>) -> Self {
        Self {
            range,
            message: message.into(),
        }
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// One positioned problem in a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub(crate) kind: DiagnosticKind,
    pub(crate) severity: Severity,
    pub(crate) range: TextRange,
    pub(crate) message: String,
    pub(crate) fix: Option<Fix>,
    pub(crate) related: Vec<RelatedInfo>,
}

impl Diagnostic {
    pub(crate) fn new(kind: DiagnosticKind, range: TextRange, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.default_severity(),
            range,
            message: message.into(),
            fix: None,
            related: Vec::new(),
        }
    }

    pub(crate) fn with_default_message(kind: DiagnosticKind, range: TextRange) -> Self {
        Self::new(kind, range, kind.fallback_message())
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn fix(&self) -> Option<&Fix> {
        self.fix.as_ref()
    }

    pub fn related(&self) -> &[RelatedInfo] {
        &self.related
    }

    pub fn category(&self) -> Option<ExtendedSyntaxCategory> {
        self.kind.category()
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}..{}: {}",
            self.severity,
            u32::from(self.range.start()),
            u32::from(self.range.end()),
            self.message
        )?;
        if let Some(fix) = &self.fix {
            write!(f, " (fix: {})", fix.description)?;
        }
        for related in &self.related {
            write!(
                f,
                " (related: {} at {}..{})",
                related.message,
                u32::from(related.range.start()),
                u32::from(related.range.end())
            )?;
        }
        Ok(())
    }
}
