use crate::constant::*;

/// One classified raw argument.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Token<'t> {
    /// `--name` or `--name=value`.
    Long {
        name: &'t str,
        value: Option<&'t str>,
    },
    /// `-abc`: each character is a candidate short flag.
    /// The leading `-` is stripped; the cluster may carry an attached value.
    Short { cluster: &'t str },
    /// `--` on its own: everything afterwards is positional.
    Terminator,
    Positional { text: &'t str },
}

/// Lazily classifies the raw argument sequence, left to right.
///
/// Never rewinds; the only irregular access is [`TokenStream::next_raw`],
/// which yields the following token unclassified so a flag can take it
/// verbatim as its value.
pub(crate) struct TokenStream<'t> {
    tokens: &'t [&'t str],
    cursor: usize,
    literal: bool,
}

impl<'t> TokenStream<'t> {
    pub(crate) fn new(tokens: &'t [&'t str]) -> Self {
        Self {
            tokens,
            cursor: 0,
            literal: false,
        }
    }

    pub(crate) fn next(&mut self) -> Option<Token<'t>> {
        let raw = *self.tokens.get(self.cursor)?;
        self.cursor += 1;

        if self.literal {
            return Some(Token::Positional { text: raw });
        }

        if raw == TERMINATOR {
            self.literal = true;
            return Some(Token::Terminator);
        }

        if let Some(body) = raw.strip_prefix(LONG_PREFIX) {
            let (name, value) = match body.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (body, None),
            };
            return Some(Token::Long { name, value });
        }

        // A lone '-' stays positional (conventionally stdin).
        if raw.len() > 1 && raw.starts_with(SHORT_PREFIX) {
            return Some(Token::Short { cluster: &raw[1..] });
        }

        Some(Token::Positional { text: raw })
    }

    /// The next token, unclassified.
    pub(crate) fn next_raw(&mut self) -> Option<&'t str> {
        let raw = *self.tokens.get(self.cursor)?;
        self.cursor += 1;
        Some(raw)
    }
}
