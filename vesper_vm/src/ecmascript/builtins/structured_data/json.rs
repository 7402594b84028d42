// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Hand-written JSON scanner and recursive-descent parser producing engine
//! values.
//!
//! The grammar is ECMA-404: double-quoted strings with the `\" \\ \/ \b
//! \f \n \r \t \uXXXX` escapes only, no leading zeroes, no trailing
//! commas. Errors carry the byte position they were detected at.

use crate::ecmascript::builtins::array::create_array_from_list;
use crate::ecmascript::builtins::ordinary::ordinary_object_create;
use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::{HeapString, PropertyKey, Value};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    NullLiteral,
    BooleanLiteral(bool),
    String(Vec<u16>),
    Number(f64),
    Punctuator(u8),
    Eof,
}

pub(crate) struct JsonLexer<'source> {
    source: &'source [u8],
    pub(crate) position: usize,
    /// One-token lookahead.
    peeked: Option<(Token, usize)>,
}

#[derive(Debug, Clone)]
pub(crate) struct JsonError {
    pub(crate) message: String,
    pub(crate) position: usize,
}

impl JsonError {
    fn new(message: impl Into<String>, position: usize) -> Self {
        JsonError {
            message: message.into(),
            position,
        }
    }
}

type LexResult<T> = Result<T, JsonError>;

impl<'source> JsonLexer<'source> {
    pub(crate) fn new(source: &'source str) -> Self {
        JsonLexer {
            source: source.as_bytes(),
            position: 0,
            peeked: None,
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(byte) = self.source.get(self.position) {
            match byte {
                b' ' | b'\t' | b'\n' | b'\r' => self.position += 1,
                _ => break,
            }
        }
    }

    pub(crate) fn peek(&mut self) -> LexResult<Token> {
        if let Some((token, _)) = &self.peeked {
            return Ok(token.clone());
        }
        let start_position = self.position;
        let token = self.scan_token()?;
        self.peeked = Some((token.clone(), start_position));
        Ok(token)
    }

    pub(crate) fn next(&mut self) -> LexResult<Token> {
        if let Some((token, _)) = self.peeked.take() {
            return Ok(token);
        }
        self.scan_token()
    }

    /// Byte position of the most recently peeked token.
    pub(crate) fn token_position(&self) -> usize {
        self.peeked
            .as_ref()
            .map(|(_, position)| *position)
            .unwrap_or(self.position)
    }

    fn scan_token(&mut self) -> LexResult<Token> {
        self.skip_whitespace();
        let Some(&byte) = self.source.get(self.position) else {
            return Ok(Token::Eof);
        };
        match byte {
            b'{' | b'}' | b'[' | b']' | b':' | b',' => {
                self.position += 1;
                Ok(Token::Punctuator(byte))
            }
            b'"' => self.scan_string(),
            b'-' | b'0'..=b'9' => self.scan_number(),
            b'n' => self.scan_keyword("null", Token::NullLiteral),
            b't' => self.scan_keyword("true", Token::BooleanLiteral(true)),
            b'f' => self.scan_keyword("false", Token::BooleanLiteral(false)),
            _ => Err(JsonError::new("Invalid character in JSON", self.position)),
        }
    }

    /// Keyword acceptance is by full-literal equality, never by a
    /// per-character filter.
    fn scan_keyword(&mut self, keyword: &str, token: Token) -> LexResult<Token> {
        let end = self.position + keyword.len();
        if self.source.get(self.position..end) == Some(keyword.as_bytes()) {
            self.position = end;
            Ok(token)
        } else {
            Err(JsonError::new("Invalid character in JSON", self.position))
        }
    }

    fn scan_string(&mut self) -> LexResult<Token> {
        debug_assert_eq!(self.source[self.position], b'"');
        self.position += 1;
        let mut units: Vec<u16> = Vec::new();
        loop {
            let Some(&byte) = self.source.get(self.position) else {
                return Err(JsonError::new("Unexpected end of JSON input", self.position));
            };
            match byte {
                b'"' => {
                    self.position += 1;
                    return Ok(Token::String(units));
                }
                b'\\' => {
                    self.position += 1;
                    let Some(&escape) = self.source.get(self.position) else {
                        return Err(JsonError::new(
                            "Unexpected end of JSON input",
                            self.position,
                        ));
                    };
                    self.position += 1;
                    match escape {
                        b'"' => units.push(b'"' as u16),
                        b'\\' => units.push(b'\\' as u16),
                        b'/' => units.push(b'/' as u16),
                        b'b' => units.push(0x08),
                        b'f' => units.push(0x0C),
                        b'n' => units.push(b'\n' as u16),
                        b'r' => units.push(b'\r' as u16),
                        b't' => units.push(b'\t' as u16),
                        b'u' => {
                            let mut unit = 0u16;
                            for _ in 0..4 {
                                let Some(&hex) = self.source.get(self.position) else {
                                    return Err(JsonError::new(
                                        "Unexpected end of JSON input",
                                        self.position,
                                    ));
                                };
                                let digit = match hex {
                                    b'0'..=b'9' => hex - b'0',
                                    b'a'..=b'f' => hex - b'a' + 10,
                                    b'A'..=b'F' => hex - b'A' + 10,
                                    _ => {
                                        return Err(JsonError::new(
                                            "Expected hexadecimal digit in JSON",
                                            self.position,
                                        ))
                                    }
                                };
                                unit = unit * 16 + digit as u16;
                                self.position += 1;
                            }
                            units.push(unit);
                        }
                        // The ECMA-404 grammar admits no \v, \xXX or octal
                        // escapes.
                        _ => {
                            return Err(JsonError::new(
                                "Invalid character in JSON",
                                self.position - 1,
                            ))
                        }
                    }
                }
                // Control characters below U+0020 are rejected, tab
                // included since it must be escaped.
                0x00..=0x1F => {
                    return Err(JsonError::new("Invalid character in JSON", self.position));
                }
                _ => {
                    // Multi-byte UTF-8 sequences pass through as code
                    // units.
                    let remainder = &self.source[self.position..];
                    let text = core::str::from_utf8(remainder)
                        .map_err(|_| JsonError::new("Invalid character in JSON", self.position))?;
                    let c = text.chars().next().unwrap();
                    let mut buffer = [0u16; 2];
                    units.extend_from_slice(c.encode_utf16(&mut buffer));
                    self.position += c.len_utf8();
                }
            }
        }
    }

    fn scan_number(&mut self) -> LexResult<Token> {
        let start = self.position;
        if self.source.get(self.position) == Some(&b'-') {
            self.position += 1;
        }
        // The integer part disallows leading zeroes except a bare 0.
        match self.source.get(self.position) {
            Some(b'0') => {
                self.position += 1;
                if matches!(self.source.get(self.position), Some(b'0'..=b'9')) {
                    return Err(JsonError::new("Invalid character in JSON", self.position));
                }
            }
            Some(b'1'..=b'9') => {
                while matches!(self.source.get(self.position), Some(b'0'..=b'9')) {
                    self.position += 1;
                }
            }
            _ => {
                return Err(JsonError::new("Invalid character in JSON", self.position));
            }
        }
        // Optional fraction.
        if self.source.get(self.position) == Some(&b'.') {
            self.position += 1;
            if !matches!(self.source.get(self.position), Some(b'0'..=b'9')) {
                return Err(JsonError::new("Invalid character in JSON", self.position));
            }
            while matches!(self.source.get(self.position), Some(b'0'..=b'9')) {
                self.position += 1;
            }
        }
        // Optional exponent.
        if matches!(self.source.get(self.position), Some(b'e') | Some(b'E')) {
            self.position += 1;
            if matches!(self.source.get(self.position), Some(b'+') | Some(b'-')) {
                self.position += 1;
            }
            if !matches!(self.source.get(self.position), Some(b'0'..=b'9')) {
                return Err(JsonError::new("Invalid character in JSON", self.position));
            }
            while matches!(self.source.get(self.position), Some(b'0'..=b'9')) {
                self.position += 1;
            }
        }
        let text = core::str::from_utf8(&self.source[start..self.position]).unwrap();
        let value = text
            .parse::<f64>()
            .map_err(|_| JsonError::new("Invalid character in JSON", start))?;
        Ok(Token::Number(value))
    }
}

fn token_display(token: &Token) -> String {
    match token {
        Token::NullLiteral => "null".to_string(),
        Token::BooleanLiteral(true) => "true".to_string(),
        Token::BooleanLiteral(false) => "false".to_string(),
        Token::String(_) => "string".to_string(),
        Token::Number(n) => crate::ecmascript::types::language::number::f64_to_js_string(*n),
        Token::Punctuator(byte) => (*byte as char).to_string(),
        Token::Eof => "end of input".to_string(),
    }
}

pub(crate) struct JsonParser<'source> {
    lexer: JsonLexer<'source>,
}

impl<'source> JsonParser<'source> {
    pub(crate) fn new(source: &'source str) -> Self {
        JsonParser {
            lexer: JsonLexer::new(source),
        }
    }

    /// Parse a complete JSON text; EOF must follow the value.
    pub(crate) fn parse(&mut self, agent: &mut Agent) -> Result<Value, JsonError> {
        let value = self.parse_value(agent)?;
        match self.lexer.next()? {
            Token::Eof => Ok(value),
            token => Err(JsonError::new(
                format!("Unexpected token '{}' in JSON", token_display(&token)),
                self.lexer.token_position(),
            )),
        }
    }

    fn parse_value(&mut self, agent: &mut Agent) -> Result<Value, JsonError> {
        let token = self.lexer.next()?;
        match token {
            Token::NullLiteral => Ok(Value::Null),
            Token::BooleanLiteral(b) => Ok(Value::Boolean(b)),
            Token::Number(n) => Ok(Value::from_f64(n)),
            Token::String(units) => {
                Ok(Value::String(HeapString::from_code_units(agent, &units)))
            }
            Token::Punctuator(b'{') => self.parse_object(agent),
            Token::Punctuator(b'[') => self.parse_array(agent),
            Token::Eof => Err(JsonError::new(
                "Unexpected end of JSON input",
                self.lexer.position,
            )),
            token => Err(JsonError::new(
                format!("Unexpected token '{}' in JSON", token_display(&token)),
                self.lexer.token_position(),
            )),
        }
    }

    fn parse_object(&mut self, agent: &mut Agent) -> Result<Value, JsonError> {
        let object_prototype = agent.current_realm().intrinsics().object_prototype();
        let object = ordinary_object_create(agent, Some(object_prototype.into()));
        if self.lexer.peek()? == Token::Punctuator(b'}') {
            self.lexer.next()?;
            return Ok(object.into());
        }
        loop {
            // Object keys must be strings.
            let key = match self.lexer.next()? {
                Token::String(units) => {
                    let key = HeapString::from_code_units(agent, &units);
                    PropertyKey::from_heap_string(agent, key)
                }
                Token::Eof => {
                    return Err(JsonError::new(
                        "Unexpected end of JSON input",
                        self.lexer.position,
                    ))
                }
                token => {
                    return Err(JsonError::new(
                        format!("Unexpected token '{}' in JSON", token_display(&token)),
                        self.lexer.token_position(),
                    ))
                }
            };
            match self.lexer.next()? {
                Token::Punctuator(b':') => {}
                token => {
                    return Err(JsonError::new(
                        format!("Unexpected token '{}' in JSON", token_display(&token)),
                        self.lexer.token_position(),
                    ))
                }
            }
            let value = self.parse_value(agent)?;
            use crate::ecmascript::types::InternalMethods;
            use crate::ecmascript::types::PropertyDescriptor;
            object
                .internal_define_own_property(
                    agent,
                    key,
                    PropertyDescriptor::new_data_descriptor(value),
                )
                .map_err(|_| JsonError::new("Invalid character in JSON", self.lexer.position))?;
            match self.lexer.next()? {
                Token::Punctuator(b',') => {
                    // Trailing commas are rejected by requiring a string
                    // key next.
                    continue;
                }
                Token::Punctuator(b'}') => return Ok(object.into()),
                Token::Eof => {
                    return Err(JsonError::new(
                        "Unexpected end of JSON input",
                        self.lexer.position,
                    ))
                }
                token => {
                    return Err(JsonError::new(
                        format!("Unexpected token '{}' in JSON", token_display(&token)),
                        self.lexer.token_position(),
                    ))
                }
            }
        }
    }

    fn parse_array(&mut self, agent: &mut Agent) -> Result<Value, JsonError> {
        let mut elements: Vec<Value> = Vec::new();
        if self.lexer.peek()? == Token::Punctuator(b']') {
            self.lexer.next()?;
            return Ok(create_array_from_list(agent, &elements).into());
        }
        loop {
            elements.push(self.parse_value(agent)?);
            match self.lexer.next()? {
                Token::Punctuator(b',') => continue,
                Token::Punctuator(b']') => {
                    return Ok(create_array_from_list(agent, &elements).into())
                }
                Token::Eof => {
                    return Err(JsonError::new(
                        "Unexpected end of JSON input",
                        self.lexer.position,
                    ))
                }
                token => {
                    return Err(JsonError::new(
                        format!("Unexpected token '{}' in JSON", token_display(&token)),
                        self.lexer.token_position(),
                    ))
                }
            }
        }
    }
}

/// Parse JSON source into an engine value, reporting errors as
/// SyntaxError with the byte position appended.
pub(crate) fn parse_json(agent: &mut Agent, source: &str) -> JsResult<Value> {
    let mut parser = JsonParser::new(source);
    match parser.parse(agent) {
        Ok(value) => Ok(value),
        Err(error) => {
            let message = format!("{} at position {}", error.message, error.position);
            Err(agent.throw_exception(ExceptionType::SyntaxError, &message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecmascript::execution::agent::Options;
    use crate::ecmascript::execution::Realm;
    use crate::ecmascript::execution::ExecutionContext;

    fn test_agent() -> Agent {
        let mut agent = Agent::new(Options::default());
        let realm = Realm::create(&mut agent);
        agent.execution_context_stack.push(ExecutionContext {
            function: None,
            realm,
            script_or_module: None,
            ecmascript_code: None,
            current_span: oxc_span::Span::default(),
        });
        agent
    }

    #[test]
    fn scalars() {
        let mut agent = test_agent();
        assert_eq!(parse_json(&mut agent, "null").unwrap(), Value::Null);
        assert_eq!(
            parse_json(&mut agent, "true").unwrap(),
            Value::Boolean(true)
        );
        assert_eq!(parse_json(&mut agent, " 42 ").unwrap(), Value::Integer(42));
        assert_eq!(
            parse_json(&mut agent, "-1.5e2").unwrap(),
            Value::Number(-150.0)
        );
    }

    #[test]
    fn keyword_prefix_is_not_enough() {
        let mut agent = test_agent();
        // The literal must equal "null" in full; "unln"-style letter soups
        // are invalid.
        assert!(parse_json(&mut agent, "nul").is_err());
        assert!(parse_json(&mut agent, "nulll").is_err());
    }

    #[test]
    fn rejects_non_json_escapes() {
        let mut agent = test_agent();
        assert!(parse_json(&mut agent, r#""\v""#).is_err());
        assert!(parse_json(&mut agent, r#""\x41""#).is_err());
        assert!(parse_json(&mut agent, r#""\0""#).is_err());
        assert!(parse_json(&mut agent, r#""A""#).is_ok());
    }

    #[test]
    fn rejects_trailing_commas_and_leading_zeroes() {
        let mut agent = test_agent();
        assert!(parse_json(&mut agent, "[1,2,]").is_err());
        assert!(parse_json(&mut agent, "{\"a\":1,}").is_err());
        assert!(parse_json(&mut agent, "01").is_err());
        assert!(parse_json(&mut agent, "[1,2]").is_ok());
    }

    #[test]
    fn error_positions_are_bytes() {
        let mut agent = test_agent();
        let error = JsonParser::new("[1,@]").parse(&mut agent).unwrap_err();
        assert_eq!(error.position, 3);
        assert_eq!(error.message, "Invalid character in JSON");
    }

    #[test]
    fn eof_inside_value() {
        let mut agent = test_agent();
        let error = JsonParser::new("{\"a\":").parse(&mut agent).unwrap_err();
        assert_eq!(error.message, "Unexpected end of JSON input");
    }
}
