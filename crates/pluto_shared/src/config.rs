/// What the parser is expected to produce from the given input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Context {
    /// A complete stylesheet (rule list)
    #[default]
    Stylesheet,
    /// A single declaration list (inline `style` attributes)
    DeclarationList,
}

/// Configuration handed to the parser entry points.
#[derive(Clone, Debug, Default)]
pub struct ParserConfig {
    /// Context of the source that is being parsed
    pub context: Context,
    /// Source name (filename, url) used in logs and diagnostics
    pub source: Option<String>,
    /// When true, parse errors are logged and skipped instead of collected
    pub ignore_errors: bool,
}
