use std::fmt::Display;

/// Media type named in a media query.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MediaType {
    #[default]
    All,
    Print,
    Screen,
}

impl MediaType {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "all" => Some(MediaType::All),
            "print" => Some(MediaType::Print),
            "screen" => Some(MediaType::Screen),
            _ => None,
        }
    }
}

impl Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaType::All => write!(f, "all"),
            MediaType::Print => write!(f, "print"),
            MediaType::Screen => write!(f, "screen"),
        }
    }
}

/// A single `(name: value)` or boolean `(name)` feature term.
#[derive(Clone, Debug, PartialEq)]
pub struct MediaFeature {
    pub name: String,
    /// Raw feature value text; `None` for boolean features
    pub value: Option<String>,
}

/// One comma-separated branch of a media query list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MediaQuery {
    /// `not` qualifier; `only` is parsed and dropped (it has no effect)
    pub negated: bool,
    pub media_type: MediaType,
    pub features: Vec<MediaFeature>,
}

/// The full comma-separated list. An empty list imposes no restriction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MediaQueryList {
    pub queries: Vec<MediaQuery>,
}

impl MediaQueryList {
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}
