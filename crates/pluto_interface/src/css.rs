use std::fmt::Display;

/// Provenance of a declaration. The discriminant order is the normal cascade
/// order: a later origin beats an earlier one at equal importance.
/// `!important` flips the sense (see the cascade in `pluto_css`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CssOrigin {
    /// Built-in user agent stylesheet
    #[default]
    UserAgent,
    /// Declarations derived from markup attributes (`width="40"` on `td`)
    PresentationAttribute,
    /// User-provided stylesheet
    User,
    /// Author stylesheets of the document
    Author,
    /// `style="..."` attribute on the element itself
    Inline,
}

impl Display for CssOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CssOrigin::UserAgent => write!(f, "user-agent"),
            CssOrigin::PresentationAttribute => write!(f, "presentation-attribute"),
            CssOrigin::User => write!(f, "user"),
            CssOrigin::Author => write!(f, "author"),
            CssOrigin::Inline => write!(f, "inline"),
        }
    }
}

impl CssOrigin {
    /// Rank used by the cascade at equal importance.
    pub fn rank(&self) -> u8 {
        *self as u8
    }

    /// Rank when the declaration is `!important`: user-agent and user rules
    /// outrank author rules, reversing the normal sense.
    pub fn important_rank(&self) -> u8 {
        match self {
            CssOrigin::Inline => 0,
            CssOrigin::Author => 1,
            CssOrigin::User => 2,
            CssOrigin::PresentationAttribute => 3,
            CssOrigin::UserAgent => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_rank_order() {
        assert!(CssOrigin::UserAgent.rank() < CssOrigin::PresentationAttribute.rank());
        assert!(CssOrigin::PresentationAttribute.rank() < CssOrigin::User.rank());
        assert!(CssOrigin::User.rank() < CssOrigin::Author.rank());
        assert!(CssOrigin::Author.rank() < CssOrigin::Inline.rank());
    }

    #[test]
    fn important_flips_origin_sense() {
        assert!(CssOrigin::UserAgent.important_rank() > CssOrigin::Author.important_rank());
        assert!(CssOrigin::User.important_rank() > CssOrigin::Author.important_rank());
    }
}
