//! Indentation configuration for code generation.

use classforge_manifest::IndentStyle;

/// Indentation style for generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indent {
    /// Spaces with the specified width.
    Spaces(u8),
    /// Tab character.
    Tab,
}

impl Indent {
    /// 4-space indentation, the default for generated classes.
    pub const FOUR: Self = Self::Spaces(4);

    /// Write one indentation level into `buf`.
    pub fn write_level(&self, buf: &mut String) {
        match self {
            Self::Spaces(n) => buf.extend(std::iter::repeat_n(' ', usize::from(*n))),
            Self::Tab => buf.push('\t'),
        }
    }
}

impl Default for Indent {
    fn default() -> Self {
        Self::FOUR
    }
}

impl From<IndentStyle> for Indent {
    fn from(style: IndentStyle) -> Self {
        match style {
            IndentStyle::Spaces(n) => Self::Spaces(n),
            IndentStyle::Tab => Self::Tab,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(indent: Indent) -> String {
        let mut buf = String::new();
        indent.write_level(&mut buf);
        buf
    }

    #[test]
    fn test_write_level() {
        assert_eq!(level(Indent::Spaces(2)), "  ");
        assert_eq!(level(Indent::Spaces(4)), "    ");
        assert_eq!(level(Indent::Spaces(3)), "   ");
        assert_eq!(level(Indent::Tab), "\t");
    }

    #[test]
    fn test_from_config() {
        assert_eq!(Indent::from(IndentStyle::Tab), Indent::Tab);
        assert_eq!(Indent::from(IndentStyle::Spaces(2)), Indent::Spaces(2));
        assert_eq!(Indent::from(IndentStyle::default()), Indent::default());
    }
}
