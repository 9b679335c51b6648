use crate::constant::NEGATION_PREFIX;
use crate::model::{Command, FlagNode};
use crate::resolver::ParseError;
use crate::tokens::{Token, TokenStream};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// Consume the token stream against the model in a single pass.
///
/// Returns the matched scope chain (root first) and the matched command names.
/// Flags, positionals and command names may interleave freely; each token is
/// consumed by exactly one matching step.
pub(crate) fn consume<'c>(
    root: &'c Command,
    tokens: &[&str],
) -> Result<(Vec<&'c Command>, Vec<String>), ParseError> {
    let mut stream = TokenStream::new(tokens);
    let mut engine = Engine {
        scopes: vec![root],
        cursor: 0,
    };
    let mut path = Vec::default();

    while let Some(token) = stream.next() {
        match token {
            Token::Terminator => {
                // The stream literalizes everything afterwards itself.
            }
            Token::Long { name, value } => {
                engine.match_long(name, value, &mut stream)?;
            }
            Token::Short { cluster } => {
                engine.match_cluster(cluster, &mut stream)?;
            }
            Token::Positional { text } => {
                // Commands win on an exact name/alias match, even while a
                // variadic positional remains open.
                if let Some(child) = engine.scope().find_command(text) {
                    #[cfg(feature = "tracing_debug")]
                    {
                        debug!("dispatching into command '{}'.", child.name);
                    }

                    path.push(child.name.clone());
                    engine.scopes.push(child);
                    engine.cursor = 0;
                } else {
                    engine.match_positional(text)?;
                }
            }
        }
    }

    Ok((engine.scopes, path))
}

struct Engine<'c> {
    // Root..current; ancestor flags stay visible from child scopes.
    scopes: Vec<&'c Command>,
    // Index of the next open positional in the current scope.
    cursor: usize,
}

impl<'c> Engine<'c> {
    fn scope(&self) -> &'c Command {
        self.scopes
            .last()
            .expect("internal error - the scope chain is never empty")
    }

    fn find_flag(&self, name: &str) -> Option<&'c FlagNode> {
        self.scopes
            .iter()
            .rev()
            .flat_map(|scope| scope.flags.iter())
            .find(|flag| flag.core.name == name)
    }

    fn find_short(&self, short: char) -> Option<&'c FlagNode> {
        self.scopes
            .iter()
            .rev()
            .flat_map(|scope| scope.flags.iter())
            .find(|flag| flag.short == Some(short))
    }

    fn match_long(
        &mut self,
        name: &str,
        value: Option<&str>,
        stream: &mut TokenStream<'_>,
    ) -> Result<(), ParseError> {
        if let Some(flag) = self.find_flag(name) {
            if flag.core.is_bool() {
                // A bool flag never consumes the next token; an explicit
                // '=value' is honored.
                return apply(flag, value.unwrap_or("true"));
            }

            let value = match value {
                Some(value) => value,
                None => stream.next_raw().ok_or_else(|| ParseError::ExpectedValue {
                    name: name.to_string(),
                })?,
            };
            return apply(flag, value);
        }

        // '--no-<name>' negates a declared bool flag.
        if let Some(positive) = name.strip_prefix(NEGATION_PREFIX) {
            if let Some(flag) = self.find_flag(positive) {
                if flag.core.is_bool() {
                    if let Some(value) = value {
                        return Err(ParseError::UnexpectedValue {
                            name: name.to_string(),
                            value: value.to_string(),
                        });
                    }

                    return apply(flag, "false");
                }
            }
        }

        Err(ParseError::UnknownFlag {
            name: name.to_string(),
        })
    }

    fn match_cluster(
        &mut self,
        cluster: &str,
        stream: &mut TokenStream<'_>,
    ) -> Result<(), ParseError> {
        let mut chars = cluster.char_indices();

        while let Some((index, single)) = chars.next() {
            let flag = self
                .find_short(single)
                .ok_or(ParseError::UnknownShort { short: single })?;
            let rest = &cluster[index + single.len_utf8()..];

            // An '=value' suffix binds to the flag just matched, bool or not.
            if let Some(value) = rest.strip_prefix('=') {
                return apply(flag, value);
            }

            if flag.core.is_bool() {
                apply(flag, "true")?;
                continue;
            }

            // Clustering stops at the first value-taking flag: the remaining
            // cluster text is its value, else the next raw token is.
            if !rest.is_empty() {
                return apply(flag, rest);
            }

            let value = stream.next_raw().ok_or_else(|| ParseError::ExpectedValue {
                name: flag.core.name.clone(),
            })?;
            return apply(flag, value);
        }

        Ok(())
    }

    fn match_positional(&mut self, text: &str) -> Result<(), ParseError> {
        let scope = self.scope();

        match scope.positionals.get(self.cursor) {
            Some(positional) => {
                positional
                    .core
                    .set(text)
                    .map_err(|source| ParseError::Conversion {
                        name: positional.core.name.clone(),
                        source,
                    })?;

                // A variadic positional stays open for the rest of the scope.
                if !positional.variadic {
                    self.cursor += 1;
                }

                Ok(())
            }
            None => Err(ParseError::UnexpectedToken {
                token: text.to_string(),
            }),
        }
    }
}

fn apply(flag: &FlagNode, token: &str) -> Result<(), ParseError> {
    #[cfg(feature = "tracing_debug")]
    {
        debug!("setting flag '{}' from token '{token}'.", flag.core.name);
    }

    flag.core
        .set(token)
        .map_err(|source| ParseError::Conversion {
            name: flag.core.name.clone(),
            source,
        })
}
