//! Tokeniser splitting a step pattern into literals, placeholders and braces.

use crate::errors::PatternError;

use super::placeholder::parse_placeholder;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    Literal(String),
    Placeholder { name: String, hint: Option<String> },
    OpenBrace { index: usize },
    CloseBrace { index: usize },
}

fn flush(literal: &mut String, tokens: &mut Vec<Token>) {
    if !literal.is_empty() {
        tokens.push(Token::Literal(std::mem::take(literal)));
    }
}

/// Split `pattern` into tokens.
///
/// `\x` yields a literal `x`, `{{` and `}}` yield literal braces, and a `{`
/// followed by a letter or underscore opens a placeholder. Any other brace is
/// reported as a stray token so the compiler can check that they balance.
pub(crate) fn lex_pattern(pattern: &str) -> Result<Vec<Token>, PatternError> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut chars = pattern.char_indices().peekable();

    while let Some((index, ch)) = chars.next() {
        match ch {
            '\\' => literal.push(chars.next().map_or('\\', |(_, escaped)| escaped)),
            '{' if chars.next_if(|&(_, c)| c == '{').is_some() => literal.push('{'),
            '}' if chars.next_if(|&(_, c)| c == '}').is_some() => literal.push('}'),
            '{' if chars
                .peek()
                .is_some_and(|&(_, c)| c.is_alphabetic() || c == '_') =>
            {
                flush(&mut literal, &mut tokens);
                let (end, spec) = parse_placeholder(pattern, index)?;
                tokens.push(Token::Placeholder {
                    name: spec.name,
                    hint: spec.hint,
                });
                while chars.next_if(|&(i, _)| i < end).is_some() {}
            }
            '{' => {
                flush(&mut literal, &mut tokens);
                tokens.push(Token::OpenBrace { index });
            }
            '}' => {
                flush(&mut literal, &mut tokens);
                tokens.push(Token::CloseBrace { index });
            }
            other => literal.push(other),
        }
    }

    flush(&mut literal, &mut tokens);
    Ok(tokens)
}
