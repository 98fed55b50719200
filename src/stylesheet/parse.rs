//! Stylesheet parsing using cssparser.
//!
//! Only the shape of the sheet is recovered: selector lists, raw declaration
//! values, comments and verbatim at-rules. Values are not interpreted.

use cssparser::{BasicParseErrorKind, ParseError, ParseErrorKind, Parser, ParserInput, Token};
use thiserror::Error;

use crate::error::{Result, SpriteError};

use super::{BlockItem, Declaration, Node, Stylesheet};

#[derive(Debug, Clone, Error)]
enum SyntaxError {
    #[error("rule is missing a selector")]
    MissingSelector,
    #[error("selector is not followed by a declaration block")]
    MissingBlock,
    #[error("block is not closed before end of input")]
    UnclosedBlock,
    #[error("expected ':' after property '{0}'")]
    MissingColon(String),
    #[error("unexpected {0} in declaration block")]
    UnexpectedToken(String),
}

type CssParseError<'i> = ParseError<'i, SyntaxError>;

/// Parse stylesheet source into a rule tree.
pub fn parse_stylesheet(source: &str) -> Result<Stylesheet> {
    let mut input = ParserInput::new(source);
    let mut parser = Parser::new(&mut input);
    let mut sheet = Stylesheet::new();

    parse_top_level(&mut parser, &mut sheet).map_err(into_sprite_error)?;

    Ok(sheet)
}

fn parse_top_level<'i>(
    parser: &mut Parser<'i, '_>,
    sheet: &mut Stylesheet,
) -> std::result::Result<(), CssParseError<'i>> {
    loop {
        let start = parser.position();
        let token = match parser.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => return Ok(()),
        };

        match token {
            Token::WhiteSpace(_) | Token::CDO | Token::CDC => {}
            Token::Comment(text) => sheet.push(Node::Comment(text.to_string())),
            Token::AtKeyword(_) => {
                consume_at_rule(parser)?;
                let raw = parser.slice_from(start).trim().to_string();
                sheet.push(Node::AtRule(raw));
            }
            first => parse_rule(parser, sheet, start, first)?,
        }
    }
}

/// Parse a qualified rule whose first prelude token has already been read.
fn parse_rule<'i>(
    parser: &mut Parser<'i, '_>,
    sheet: &mut Stylesheet,
    start: cssparser::SourcePosition,
    first: Token<'i>,
) -> std::result::Result<(), CssParseError<'i>> {
    let mut selectors: Vec<String> = Vec::new();
    let mut segment_start = start;
    let mut before = start;
    let mut current = first;

    // Commas inside functions like :not(a, b) are hidden by the tokenizer.
    loop {
        match current {
            Token::Comma => {
                selectors.push(parser.slice(segment_start..before).trim().to_string());
                segment_start = parser.position();
            }
            Token::CurlyBracketBlock => {
                selectors.push(parser.slice(segment_start..before).trim().to_string());
                break;
            }
            Token::Semicolon => return Err(parser.new_custom_error(SyntaxError::MissingBlock)),
            _ => {}
        }

        before = parser.position();
        current = match parser.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => return Err(parser.new_custom_error(SyntaxError::MissingBlock)),
        };
    }

    if selectors.iter().all(|s| s.is_empty()) {
        return Err(parser.new_custom_error(SyntaxError::MissingSelector));
    }

    let block_start = parser.position();
    let items = parser.parse_nested_block(|p| parse_block(p, sheet))?;
    if !parser.slice_from(block_start).ends_with('}') {
        return Err(parser.new_custom_error(SyntaxError::UnclosedBlock));
    }

    let mut rule = sheet.create_rule(selectors);
    rule.items = items;
    sheet.push(Node::Rule(rule));

    Ok(())
}

/// Parse the contents of a `{ ... }` declaration block.
fn parse_block<'i>(
    p: &mut Parser<'i, '_>,
    sheet: &mut Stylesheet,
) -> std::result::Result<Vec<BlockItem>, CssParseError<'i>> {
    let mut items = Vec::new();

    loop {
        let token = match p.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => return Ok(items),
        };

        match token {
            Token::WhiteSpace(_) | Token::Semicolon => {}
            Token::Comment(text) => items.push(BlockItem::Comment(text.to_string())),
            Token::Ident(name) => {
                let declaration = parse_declaration(p, sheet, name.to_string())?;
                items.push(BlockItem::Declaration(declaration));
            }
            // Star hack (`*zoom: 1`) targeting old IE.
            Token::Delim('*') => {
                let name = match p.next_including_whitespace_and_comments() {
                    Ok(Token::Ident(name)) => Some(format!("*{}", name)),
                    _ => None,
                };
                let Some(name) = name else {
                    return Err(p.new_custom_error(SyntaxError::UnexpectedToken("'*'".into())));
                };
                let declaration = parse_declaration(p, sheet, name)?;
                items.push(BlockItem::Declaration(declaration));
            }
            other => {
                return Err(p.new_custom_error(SyntaxError::UnexpectedToken(describe(&other))));
            }
        }
    }
}

/// Parse `: value` up to the next `;` or the end of the block.
fn parse_declaration<'i>(
    p: &mut Parser<'i, '_>,
    sheet: &mut Stylesheet,
    name: String,
) -> std::result::Result<Declaration, CssParseError<'i>> {
    if !matches!(p.next(), Ok(Token::Colon)) {
        return Err(p.new_custom_error(SyntaxError::MissingColon(name)));
    }

    let value_start = p.position();
    let value_end = loop {
        let before = p.position();
        match p
            .next_including_whitespace_and_comments()
            .map(|t| matches!(t, Token::Semicolon))
        {
            Ok(true) => break before,
            Ok(false) => {}
            Err(_) => break p.position(),
        }
    };

    let value = p.slice(value_start..value_end).trim().to_string();
    Ok(sheet.create_declaration(name, value))
}

/// Skip the remainder of an at-rule: up to `;` or through its block.
fn consume_at_rule<'i>(parser: &mut Parser<'i, '_>) -> std::result::Result<(), CssParseError<'i>> {
    loop {
        let token = match parser.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => return Ok(()),
        };

        match token {
            Token::Semicolon => return Ok(()),
            Token::CurlyBracketBlock => {
                let block_start = parser.position();
                parser.parse_nested_block(|p| {
                    while p.next_including_whitespace_and_comments().is_ok() {}
                    Ok::<_, CssParseError<'i>>(())
                })?;
                if !parser.slice_from(block_start).ends_with('}') {
                    return Err(parser.new_custom_error(SyntaxError::UnclosedBlock));
                }
                return Ok(());
            }
            _ => {}
        }
    }
}

fn describe(token: &Token) -> String {
    match token {
        Token::CurlyBracketBlock => "'{'".to_string(),
        Token::Delim(c) => format!("'{}'", c),
        Token::Colon => "':'".to_string(),
        Token::Hash(s) | Token::IDHash(s) => format!("'#{}'", s),
        other => format!("{:?}", other),
    }
}

fn into_sprite_error(err: CssParseError<'_>) -> SpriteError {
    let message = match err.kind {
        ParseErrorKind::Custom(e) => e.to_string(),
        ParseErrorKind::Basic(BasicParseErrorKind::EndOfInput) => {
            "unexpected end of input".to_string()
        }
        ParseErrorKind::Basic(BasicParseErrorKind::UnexpectedToken(t)) => {
            format!("unexpected {}", describe(&t))
        }
        ParseErrorKind::Basic(other) => format!("{:?}", other),
    };

    SpriteError::Parse {
        message: format!(
            "{} at {}:{}",
            message,
            err.location.line + 1,
            err.location.column
        ),
        help: Some("Check the stylesheet syntax near this location".to_string()),
    }
}
