// Copyright (c) Chris Gunn.
// Licensed under the MIT license.


use std::ops::Range;

use chumsky::prelude::*;

/// One segment of a tokenized text value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Token {
    Static(String),
    Expression(String),
}

impl Token {
    pub fn is_expression(&self) -> bool {
        matches!(self, Token::Expression(_))
    }
}

/// Splits text into static runs and `{dotted.path}` placeholders.
///
/// Anything that is not a well-formed placeholder is kept as static text, so
/// scanning never fails.
pub struct PlaceholderScanner {
    parser: Box<dyn Parser<char, (String, Range<usize>), Error = Simple<char>>>,
}

impl Default for PlaceholderScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaceholderScanner {
    pub fn new() -> PlaceholderScanner {
        let parser = gen_placeholder_parser();
        PlaceholderScanner {
            parser: Box::new(parser),
        }
    }

    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut literal_start = 0;
        let mut search_from = 0;
        loop {
            // Find next candidate placeholder.
            let Some(brace_index) = text[search_from..].find('{') else {
                break;
            };
            let brace_index = search_from + brace_index;

            let rest = &text[brace_index..];
            let Ok((expression, span)) = self.parser.parse(rest) else {
                // Not a placeholder; the brace stays literal.
                search_from = brace_index + 1;
                continue;
            };

            // Add static text before the placeholder.
            if brace_index > literal_start {
                tokens.push(Token::Static(text[literal_start..brace_index].to_string()));
            }
            tokens.push(Token::Expression(expression));

            // Spans count chars, not bytes.
            let end = brace_index + byte_offset(rest, span.end);
            literal_start = end;
            search_from = end;
        }

        // Add static text after the last placeholder.
        if text.len() > literal_start {
            tokens.push(Token::Static(text[literal_start..].to_string()));
        }
        tokens
    }
}

/// Tokenizes with a throwaway scanner.
pub fn tokenize_text(text: &str) -> Vec<Token> {
    PlaceholderScanner::new().tokenize(text)
}

fn byte_offset(text: &str, char_index: usize) -> usize {
    text.char_indices().nth(char_index).map_or(text.len(), |(i, _)| i)
}

fn gen_placeholder_parser() -> impl Parser<char, (String, Range<usize>), Error = Simple<char>> {
    let ident = filter(|c: &char| c.is_ascii_alphabetic() || *c == '_' || *c == '$')
        .chain::<char, Vec<char>, _>(filter(|c: &char| c.is_ascii_alphanumeric() || *c == '_' || *c == '$').repeated())
        .collect::<String>()
        .labelled("identifier");

    let path = ident
        .separated_by(just('.'))
        .at_least(1)
        .map(|segments| segments.join("."))
        .labelled("expression");

    just('{')
        .ignore_then(path.padded())
        .then_ignore(just('}'))
        .map_with_span(|expression, span| (expression, span))
}
