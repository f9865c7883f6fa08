//! Shared CLI options.

use clap::Args;
use herrs::RenderOptions;

/// Options controlling how errors are rendered.
#[derive(Args, Debug, Clone, Default)]
pub struct RenderArgs {
    /// Separator before nested errors and between stack frames.
    /// Accepts `\n` and `\t` escapes, e.g. `":: "` or `":\n\t"`.
    #[arg(long, value_name = "SEP")]
    pub separator: Option<String>,

    /// Print full frame names instead of abbreviating shared prefixes.
    #[arg(long = "no-abbreviate")]
    pub no_abbreviate: bool,
}

impl RenderArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    pub fn with_no_abbreviate(mut self, no_abbreviate: bool) -> Self {
        self.no_abbreviate = no_abbreviate;
        self
    }

    pub fn to_render_options(&self) -> RenderOptions {
        let mut opts = RenderOptions::new().with_abbreviate(!self.no_abbreviate);
        if let Some(separator) = &self.separator {
            opts = opts.with_separator(unescape(separator));
        }
        opts
    }
}

/// Expand the `\n`, `\t` and `\\` escapes a shell leaves untouched.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r":\n\t"), ":\n\t");
        assert_eq!(unescape(":: "), ":: ");
        assert_eq!(unescape(r"a\\b\q\"), "a\\b\\q\\");
    }

    #[test]
    fn test_render_options() {
        let opts = RenderArgs::new().to_render_options();
        assert_eq!(opts.separator, herrs::DEFAULT_SEPARATOR);
        assert!(opts.abbreviate);

        let opts = RenderArgs::new()
            .with_separator(":: ")
            .with_no_abbreviate(true)
            .to_render_options();
        assert_eq!(opts.separator, ":: ");
        assert!(!opts.abbreviate);
    }
}
