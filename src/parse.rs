//! Document parser.
//!
//! Builds a [`Tree`] from YAML text. JSON is accepted as a subset of the
//! flow syntax. The supported YAML covers what configuration files and
//! message dumps use in practice:
//!
//! - **Flow collections**: `[a, b]` and `{k: v}`, nested arbitrarily and
//!   spanning lines
//! - **Block collections**: `key: value` maps and `- item` sequences by
//!   indentation, including compact `- key: value` items
//! - **Scalars**: double-quoted (with escapes), single-quoted (`''` for a
//!   quote), plain, and literal blocks (`|`, `|-`, `|+`)
//! - **Comments**: `#` to end of line
//!
//! Quoted scalars and literal blocks are marked quoted; plain scalars are
//! not, so `'9001'` stays a string while `9001` is a number.
//!
//! Anchors, aliases, tags, folded blocks and multi-document streams are
//! rejected with [`Error::Syntax`].
//!
//! ## Examples
//!
//! ```rust
//! use yaml_tree::{parse_in_place, Text};
//!
//! let src = String::from("name: base\nsize: [1, 2]\n");
//! let tree = parse_in_place(&src).unwrap();
//! let name = tree.get("name").unwrap();
//! assert_eq!(name.val(), Some("base"));
//! assert!(!name.is_val_quoted());
//! assert_eq!(tree.get("size").unwrap().num_children(), 2);
//! ```

use crate::arena::Text;
use crate::flags::NodeKind;
use crate::options::ParseOptions;
use crate::store::NodeId;
use crate::tree::Tree;
use crate::{Error, Result};
use log::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Chomp {
    Clip,
    Strip,
    Keep,
}

/// Character scanner over the input, tracking line and column for errors.
struct Parser<'s> {
    input: &'s str,
    position: usize,
    line: usize,
    /// Zero-based; equals the indentation while at the first character of a
    /// line's content.
    column: usize,
    max_depth: usize,
}

impl<'s> Parser<'s> {
    fn new(input: &'s str, options: &ParseOptions) -> Self {
        let input = input.strip_prefix('\u{feff}').unwrap_or(input);
        Parser {
            input,
            position: 0,
            line: 1,
            column: 0,
            max_depth: options.max_depth,
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.input[self.position..].chars().nth(n)
    }

    fn rest(&self) -> &'s str {
        &self.input[self.position..]
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.position += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    /// Advances to byte offset `target`, which must lie ahead on a char
    /// boundary.
    fn advance_to(&mut self, target: usize) {
        while self.position < target && self.next_char().is_some() {}
    }

    fn at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn at_line_end(&self) -> bool {
        matches!(self.peek_char(), None | Some('\n') | Some('\r'))
    }

    fn error(&self, msg: &str) -> Error {
        Error::syntax(self.line, self.column + 1, msg)
    }

    fn enter(&self, depth: usize) -> Result<()> {
        if depth >= self.max_depth {
            return Err(Error::depth_exceeded(self.max_depth));
        }
        Ok(())
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek_char(), Some(' ') | Some('\t')) {
            self.next_char();
        }
    }

    fn skip_comment(&mut self) {
        if self.peek_char() == Some('#') {
            while !self.at_line_end() {
                self.next_char();
            }
        }
    }

    fn skip_line_break(&mut self) {
        if self.peek_char() == Some('\r') {
            self.next_char();
        }
        if self.peek_char() == Some('\n') {
            self.next_char();
        }
    }

    /// Skips blank and comment-only lines, stopping at the first content
    /// character. `column` is then that line's indentation.
    fn skip_blank_lines(&mut self) {
        loop {
            self.skip_whitespace();
            self.skip_comment();
            if matches!(self.peek_char(), Some('\n') | Some('\r')) {
                self.skip_line_break();
            } else {
                break;
            }
        }
    }

    /// Requires the rest of the line to be blank or a comment, and consumes
    /// the line break.
    fn end_of_line(&mut self) -> Result<()> {
        self.skip_whitespace();
        self.skip_comment();
        if !self.at_line_end() {
            return Err(self.error("unexpected content after value"));
        }
        self.skip_line_break();
        Ok(())
    }

    fn skip_flow_whitespace(&mut self) {
        loop {
            match self.peek_char() {
                Some(' ') | Some('\t') | Some('\n') | Some('\r') => {
                    self.next_char();
                }
                Some('#') => self.skip_comment(),
                _ => break,
            }
        }
    }

    /// `-` followed by whitespace or a line end.
    fn at_dash_indicator(&self) -> bool {
        self.peek_char() == Some('-')
            && matches!(
                self.peek_nth(1),
                None | Some(' ') | Some('\t') | Some('\n') | Some('\r')
            )
    }

    fn at_document_marker(&self) -> bool {
        self.column == 0
            && (self.rest().starts_with("---") || self.rest().starts_with("..."))
            && matches!(
                self.peek_nth(3),
                None | Some(' ') | Some('\t') | Some('\n') | Some('\r')
            )
    }

    /// `:` ending a mapping key. After a quoted key the colon may be
    /// directly followed by the value, as in JSON.
    fn at_key_indicator(&self, quoted: bool) -> bool {
        self.peek_char() == Some(':')
            && (quoted
                || matches!(
                    self.peek_nth(1),
                    None | Some(' ') | Some('\t') | Some('\n') | Some('\r')
                ))
    }

    fn unsupported(&self) -> Option<Error> {
        let msg = match self.peek_char()? {
            '&' | '*' | '!' => "anchors, aliases and tags are not supported",
            '>' => "folded block scalars are not supported",
            '%' => "directives are not supported",
            '?' if matches!(self.peek_nth(1), None | Some(' ') | Some('\n')) => {
                "complex mapping keys are not supported"
            }
            _ => return None,
        };
        Some(self.error(msg))
    }

    fn document(&mut self, tree: &mut Tree<'s>) -> Result<()> {
        self.skip_blank_lines();
        if self.at_document_marker() && self.rest().starts_with("---") {
            self.advance_to(self.position + 3);
            self.skip_blank_lines();
        }
        if !self.at_end() && !self.at_document_marker() {
            let root = tree.root_id();
            self.block_node(tree, root, 0, 0, true)?;
            self.skip_blank_lines();
        }
        if self.at_document_marker() && self.rest().starts_with("...") {
            self.advance_to(self.position + 3);
            self.skip_blank_lines();
        }
        if self.at_end() {
            Ok(())
        } else if self.at_document_marker() {
            Err(self.error("multiple documents are not supported"))
        } else {
            Err(self.error("unexpected content"))
        }
    }

    /// Parses the node starting at the current position into `id`.
    ///
    /// `compact` allows a block collection to start on this line, as at the
    /// start of a document or after `- `; after `key: ` only a scalar or a
    /// flow collection may follow on the same line.
    fn block_node(
        &mut self,
        tree: &mut Tree<'s>,
        id: NodeId,
        min_indent: usize,
        depth: usize,
        compact: bool,
    ) -> Result<()> {
        let column = self.column;
        if let Some(err) = self.unsupported() {
            return Err(err);
        }
        match self.peek_char() {
            Some('-') if self.at_dash_indicator() => {
                if !compact {
                    return Err(self.error("block sequence must start on its own line"));
                }
                return self.block_seq(tree, id, column, depth);
            }
            Some('[') | Some('{') => {
                self.flow_node(tree, id, depth)?;
                return self.end_of_line();
            }
            Some('|') => return self.literal(tree, id, min_indent),
            _ => {}
        }
        let (text, quoted) = self.scalar_token(tree, false)?;
        self.skip_whitespace();
        if self.at_key_indicator(quoted) {
            if !compact {
                return Err(self.error("block mapping must start on its own line"));
            }
            return self.block_map(tree, id, column, depth, text, quoted);
        }
        tree.set_val_text(id, text, quoted)?;
        self.end_of_line()
    }

    fn block_map(
        &mut self,
        tree: &mut Tree<'s>,
        id: NodeId,
        column: usize,
        depth: usize,
        first_key: Text<'s>,
        first_quoted: bool,
    ) -> Result<()> {
        self.enter(depth)?;
        trace!("block map at line {} column {}", self.line, column);
        tree.set_kind(id, NodeKind::Map)?;
        let (mut key, mut quoted) = (first_key, first_quoted);
        loop {
            self.next_char(); // ':'
            let child = tree.append_child(id)?;
            tree.set_key_text(child, key, quoted)?;
            self.value_after_indicator(tree, child, column, depth + 1, true)?;

            self.skip_blank_lines();
            if self.at_end() || self.at_document_marker() || self.column < column {
                return Ok(());
            }
            if self.column > column {
                return Err(self.error("unexpected indentation"));
            }
            if self.at_dash_indicator() {
                return Ok(());
            }
            if matches!(self.peek_char(), Some('[') | Some('{') | Some('|')) {
                return Err(self.error("expected a mapping key"));
            }
            if let Some(err) = self.unsupported() {
                return Err(err);
            }
            let (text, q) = self.scalar_token(tree, false)?;
            self.skip_whitespace();
            if !self.at_key_indicator(q) {
                return Err(self.error("expected ':' after mapping key"));
            }
            key = text;
            quoted = q;
        }
    }

    fn block_seq(
        &mut self,
        tree: &mut Tree<'s>,
        id: NodeId,
        column: usize,
        depth: usize,
    ) -> Result<()> {
        self.enter(depth)?;
        trace!("block sequence at line {} column {}", self.line, column);
        tree.set_kind(id, NodeKind::Seq)?;
        loop {
            self.next_char(); // '-'
            let child = tree.append_child(id)?;
            self.value_after_indicator(tree, child, column, depth + 1, false)?;

            self.skip_blank_lines();
            if self.at_end() || self.at_document_marker() || self.column < column {
                return Ok(());
            }
            if self.column > column {
                return Err(self.error("unexpected indentation"));
            }
            if !self.at_dash_indicator() {
                return Ok(());
            }
        }
    }

    /// Parses the value following a `:` or `-` indicator found at
    /// `column`, either on the same line or on the lines below.
    fn value_after_indicator(
        &mut self,
        tree: &mut Tree<'s>,
        node: NodeId,
        column: usize,
        depth: usize,
        in_map: bool,
    ) -> Result<()> {
        self.skip_whitespace();
        self.skip_comment();
        if !self.at_line_end() {
            return self.block_node(tree, node, column + 1, depth, !in_map);
        }
        self.skip_blank_lines();
        if !self.at_end() && !self.at_document_marker() {
            if self.column > column {
                return self.block_node(tree, node, column + 1, depth, true);
            }
            // `key:` followed by `- item` lines at the key's own indentation
            if in_map && self.column == column && self.at_dash_indicator() {
                return self.block_seq(tree, node, column, depth);
            }
        }
        tree.set_kind(node, NodeKind::Scalar)
    }

    /// A quoted or plain scalar, with whether it was quoted.
    fn scalar_token(&mut self, tree: &mut Tree<'s>, flow: bool) -> Result<(Text<'s>, bool)> {
        match self.peek_char() {
            Some('"') => Ok((self.double_quoted(tree)?, true)),
            Some('\'') => Ok((self.single_quoted(tree)?, true)),
            _ => Ok((Text::Borrowed(self.plain(flow)?), false)),
        }
    }

    fn plain(&mut self, flow: bool) -> Result<&'s str> {
        let start = self.position;
        let mut end = start;
        let mut prev_space = false;
        while let Some(ch) = self.peek_char() {
            let stop = match ch {
                '\n' | '\r' => true,
                ':' => match self.peek_nth(1) {
                    None | Some(' ') | Some('\t') | Some('\n') | Some('\r') => true,
                    Some(',') | Some('[') | Some(']') | Some('{') | Some('}') => flow,
                    _ => false,
                },
                '#' => prev_space,
                ',' | '[' | ']' | '{' | '}' => flow,
                _ => false,
            };
            if stop {
                break;
            }
            self.next_char();
            prev_space = ch == ' ' || ch == '\t';
            if !prev_space {
                end = self.position;
            }
        }
        if end == start {
            return Err(self.error("expected a scalar"));
        }
        Ok(&self.input[start..end])
    }

    fn double_quoted(&mut self, tree: &mut Tree<'s>) -> Result<Text<'s>> {
        let (line, column) = (self.line, self.column + 1);
        self.next_char();
        let rest = self.rest();
        if let Some(end) = rest.find(['"', '\\', '\n', '\r']) {
            if rest[end..].starts_with('"') {
                self.advance_to(self.position + end + 1);
                return Ok(Text::Borrowed(&rest[..end]));
            }
        }
        let mut buf = String::new();
        loop {
            match self.next_char() {
                None => return Err(Error::syntax(line, column, "unterminated double-quoted scalar")),
                Some('"') => break,
                Some('\\') => self.escape(&mut buf)?,
                Some('\r') | Some('\n') => self.fold(&mut buf),
                Some(ch) => buf.push(ch),
            }
        }
        Ok(tree.copy_to_arena(&buf))
    }

    fn single_quoted(&mut self, tree: &mut Tree<'s>) -> Result<Text<'s>> {
        let (line, column) = (self.line, self.column + 1);
        self.next_char();
        let rest = self.rest();
        if let Some(end) = rest.find(['\'', '\n', '\r']) {
            if rest[end..].starts_with('\'') && !rest[end + 1..].starts_with('\'') {
                self.advance_to(self.position + end + 1);
                return Ok(Text::Borrowed(&rest[..end]));
            }
        }
        let mut buf = String::new();
        loop {
            match self.next_char() {
                None => return Err(Error::syntax(line, column, "unterminated single-quoted scalar")),
                Some('\'') if self.peek_char() == Some('\'') => {
                    self.next_char();
                    buf.push('\'');
                }
                Some('\'') => break,
                Some('\r') | Some('\n') => self.fold(&mut buf),
                Some(ch) => buf.push(ch),
            }
        }
        Ok(tree.copy_to_arena(&buf))
    }

    /// Folds a line break inside a quoted scalar: one break becomes a
    /// space, each further blank line a newline.
    fn fold(&mut self, buf: &mut String) {
        if self.peek_char() == Some('\n') {
            self.next_char();
        }
        while buf.ends_with([' ', '\t']) {
            buf.pop();
        }
        let mut breaks = 0;
        loop {
            self.skip_whitespace();
            if matches!(self.peek_char(), Some('\n') | Some('\r')) {
                self.skip_line_break();
                breaks += 1;
            } else {
                break;
            }
        }
        if breaks == 0 {
            buf.push(' ');
        } else {
            buf.extend(std::iter::repeat('\n').take(breaks));
        }
    }

    fn escape(&mut self, buf: &mut String) -> Result<()> {
        let ch = self
            .next_char()
            .ok_or_else(|| self.error("unterminated escape sequence"))?;
        let unescaped = match ch {
            '"' => '"',
            '\\' => '\\',
            '/' => '/',
            ' ' => ' ',
            '\t' | 't' => '\t',
            'n' => '\n',
            'r' => '\r',
            'b' => '\u{0008}',
            'f' => '\u{000C}',
            'v' => '\u{000B}',
            '0' => '\0',
            'a' => '\u{0007}',
            'e' => '\u{001B}',
            'N' => '\u{0085}',
            '_' => '\u{00A0}',
            'L' => '\u{2028}',
            'P' => '\u{2029}',
            'x' => self.hex_char(2)?,
            'u' => self.unicode_escape()?,
            'U' => self.hex_char(8)?,
            '\r' | '\n' => {
                // escaped line break: joins lines without a space
                if ch == '\r' && self.peek_char() == Some('\n') {
                    self.next_char();
                }
                self.skip_whitespace();
                return Ok(());
            }
            _ => return Err(self.error("invalid escape sequence")),
        };
        buf.push(unescaped);
        Ok(())
    }

    fn hex_code(&mut self, digits: usize) -> Result<u32> {
        let hex = self
            .rest()
            .get(..digits)
            .filter(|h| h.chars().all(|c| c.is_ascii_hexdigit()))
            .ok_or_else(|| self.error("invalid hexadecimal escape"))?;
        let code = u32::from_str_radix(hex, 16).map_err(|_| self.error("invalid hexadecimal escape"))?;
        self.advance_to(self.position + digits);
        Ok(code)
    }

    fn hex_char(&mut self, digits: usize) -> Result<char> {
        let code = self.hex_code(digits)?;
        char::from_u32(code).ok_or_else(|| self.error("invalid unicode scalar"))
    }

    /// `\uXXXX`, combining a UTF-16 surrogate pair when one follows.
    fn unicode_escape(&mut self) -> Result<char> {
        let high = self.hex_code(4)?;
        if (0xD800..0xDC00).contains(&high) {
            if !self.rest().starts_with("\\u") {
                return Err(self.error("unpaired surrogate in unicode escape"));
            }
            self.advance_to(self.position + 2);
            let low = self.hex_code(4)?;
            if !(0xDC00..0xE000).contains(&low) {
                return Err(self.error("unpaired surrogate in unicode escape"));
            }
            let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
            return char::from_u32(code).ok_or_else(|| self.error("invalid unicode scalar"));
        }
        char::from_u32(high).ok_or_else(|| self.error("invalid unicode scalar"))
    }

    /// Literal block scalar. Content lines must be indented at least
    /// `min_indent`; the first one fixes the block's indentation.
    fn literal(&mut self, tree: &mut Tree<'s>, id: NodeId, min_indent: usize) -> Result<()> {
        self.next_char(); // '|'
        let chomp = match self.peek_char() {
            Some('-') => Chomp::Strip,
            Some('+') => Chomp::Keep,
            _ => Chomp::Clip,
        };
        if chomp != Chomp::Clip {
            self.next_char();
        }
        if matches!(self.peek_char(), Some('1'..='9')) {
            return Err(self.error("indentation indicators are not supported"));
        }
        self.end_of_line()?;

        let mut lines: Vec<&'s str> = Vec::new();
        let mut indent: Option<usize> = None;
        while !self.at_end() {
            let rest = self.rest();
            let line_len = rest.find('\n').map_or(rest.len(), |i| i + 1);
            let raw = rest[..line_len].trim_end_matches(['\n', '\r']);
            let content = raw.trim_start_matches(' ');
            let spaces = raw.len() - content.len();
            if content.is_empty() {
                lines.push("");
            } else {
                let block_indent = match indent {
                    Some(n) => n,
                    None if spaces >= min_indent => {
                        indent = Some(spaces);
                        spaces
                    }
                    None => break,
                };
                if spaces < block_indent {
                    break;
                }
                lines.push(&raw[block_indent..]);
            }
            self.advance_to(self.position + line_len);
        }

        let trailing = lines.iter().rev().take_while(|l| l.is_empty()).count();
        let body = &lines[..lines.len() - trailing];
        let mut text = body.join("\n");
        match chomp {
            Chomp::Strip => {}
            Chomp::Clip => {
                if !body.is_empty() {
                    text.push('\n');
                }
            }
            Chomp::Keep => {
                if !body.is_empty() {
                    text.push('\n');
                }
                text.extend(std::iter::repeat('\n').take(trailing));
            }
        }
        let text = tree.copy_to_arena(&text);
        tree.set_val_text(id, text, true)
    }

    fn flow_node(&mut self, tree: &mut Tree<'s>, id: NodeId, depth: usize) -> Result<()> {
        if let Some(err) = self.unsupported() {
            return Err(err);
        }
        match self.peek_char() {
            Some('[') => self.flow_seq(tree, id, depth),
            Some('{') => self.flow_map(tree, id, depth),
            _ => {
                let (text, quoted) = self.scalar_token(tree, true)?;
                tree.set_val_text(id, text, quoted)
            }
        }
    }

    fn flow_seq(&mut self, tree: &mut Tree<'s>, id: NodeId, depth: usize) -> Result<()> {
        self.enter(depth)?;
        tree.set_kind(id, NodeKind::Seq)?;
        self.next_char(); // '['
        loop {
            self.skip_flow_whitespace();
            match self.peek_char() {
                Some(']') => {
                    self.next_char();
                    return Ok(());
                }
                None => return Err(self.error("unterminated flow sequence")),
                _ => {}
            }
            let child = tree.append_child(id)?;
            self.flow_node(tree, child, depth + 1)?;
            self.skip_flow_whitespace();
            match self.peek_char() {
                Some(',') => {
                    self.next_char();
                }
                Some(']') => {
                    self.next_char();
                    return Ok(());
                }
                _ => return Err(self.error("expected ',' or ']' in flow sequence")),
            }
        }
    }

    fn flow_map(&mut self, tree: &mut Tree<'s>, id: NodeId, depth: usize) -> Result<()> {
        self.enter(depth)?;
        tree.set_kind(id, NodeKind::Map)?;
        self.next_char(); // '{'
        loop {
            self.skip_flow_whitespace();
            match self.peek_char() {
                Some('}') => {
                    self.next_char();
                    return Ok(());
                }
                Some('[') | Some('{') => return Err(self.error("complex mapping keys are not supported")),
                None => return Err(self.error("unterminated flow mapping")),
                _ => {}
            }
            if let Some(err) = self.unsupported() {
                return Err(err);
            }
            let (key, quoted) = self.scalar_token(tree, true)?;
            let child = tree.append_child(id)?;
            tree.set_key_text(child, key, quoted)?;
            self.skip_flow_whitespace();
            if self.peek_char() == Some(':') {
                self.next_char();
                self.skip_flow_whitespace();
                if matches!(self.peek_char(), Some(',') | Some('}')) {
                    tree.set_kind(child, NodeKind::Scalar)?;
                } else {
                    self.flow_node(tree, child, depth + 1)?;
                }
            } else if matches!(self.peek_char(), Some(',') | Some('}')) {
                tree.set_kind(child, NodeKind::Scalar)?;
            } else {
                return Err(self.error("expected ':' in flow mapping"));
            }
            self.skip_flow_whitespace();
            match self.peek_char() {
                Some(',') => {
                    self.next_char();
                }
                Some('}') => {
                    self.next_char();
                    return Ok(());
                }
                _ => return Err(self.error("expected ',' or '}' in flow mapping")),
            }
        }
    }
}

/// Parses `input` into a tree that borrows unescaped scalars directly from
/// it. Scalars that need unescaping are written to the tree's arena.
pub fn parse_in_place_with_options<'s>(input: &'s str, options: &ParseOptions) -> Result<Tree<'s>> {
    debug!("parse: {} bytes, max depth {}", input.len(), options.max_depth);
    let mut tree = Tree::with_capacity(16, 0);
    let mut parser = Parser::new(input, options);
    parser.document(&mut tree)?;
    Ok(tree)
}

/// Parses `input` into a tree that borrows from it.
///
/// # Examples
///
/// ```rust
/// use yaml_tree::parse_in_place;
///
/// let src = String::from(r#"{"foo": 1, "bar": "2"}"#);
/// let tree = parse_in_place(&src).unwrap();
/// assert_eq!(tree.get("foo").unwrap().val(), Some("1"));
/// assert!(tree.get("bar").unwrap().is_val_quoted());
/// ```
pub fn parse_in_place(input: &str) -> Result<Tree<'_>> {
    parse_in_place_with_options(input, &ParseOptions::default())
}

/// Parses `input` into a self-contained tree: every scalar is copied into
/// the tree's arena.
pub fn parse_in_arena(input: &str) -> Result<Tree<'static>> {
    parse_with_options(input, &ParseOptions::default())
}

/// [`parse_in_arena`] with explicit options.
pub fn parse_with_options(input: &str, options: &ParseOptions) -> Result<Tree<'static>> {
    let mut tree = Tree::with_capacity(16, input.len());
    let mut parser = Parser::new(input, options);
    debug!("parse: {} bytes into arena", input.len());
    parser.document(&mut tree)?;
    Ok(tree.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json(src: &str) -> String {
        parse_in_arena(src).unwrap().as_json().to_string()
    }

    #[test]
    fn test_flow_json() {
        assert_eq!(json(r#"{"a":"b","c":42,"d":null}"#), r#"{"a": "b","c": 42,"d": null}"#);
        assert_eq!(json("{}"), "{}");
        assert_eq!(json("{    }"), "{}");
        assert_eq!(json("[]"), "[]");
        assert_eq!(json("[1, [2, [3]], {a: [] }]"), r#"[1,[2,[3]],{"a": []}]"#);
    }

    #[test]
    fn test_flow_spans_lines() {
        assert_eq!(json("{\n  a: 1,  # one\n  b: [x,\n      y],\n}"), r#"{"a": 1,"b": ["x","y"]}"#);
    }

    #[test]
    fn test_flow_null_values() {
        assert_eq!(json("{a, b: , c: 1}"), r#"{"a": null,"b": null,"c": 1}"#);
    }

    #[test]
    fn test_block_map_and_seq() {
        let src = "\
# config
name: base   # trailing
size: 3
list:
  - 1
  - two
nested:
  inner:
    deep: true
same_indent:
- a
- b
last: ~
";
        assert_eq!(
            json(src),
            r#"{"name": "base","size": 3,"list": [1,"two"],"nested": {"inner": {"deep": true}},"same_indent": ["a","b"],"last": null}"#
        );
    }

    #[test]
    fn test_compact_items() {
        let src = "- a: 1\n  b: 2\n- - x\n  - y\n-\n  c: 3\n- \n";
        assert_eq!(json(src), r#"[{"a": 1,"b": 2},["x","y"],{"c": 3},null]"#);
    }

    #[test]
    fn test_quoted_keys_without_space() {
        assert_eq!(json(r#""a":"b""#), r#"{"a": "b"}"#);
        assert_eq!(json("'a':'b'"), r#"{"a": "b"}"#);
    }

    #[test]
    fn test_plain_scalar_edges() {
        assert_eq!(json("url: http://x.y/z"), r#"{"url": "http://x.y/z"}"#);
        assert_eq!(json("a: b#c"), r#"{"a": "b#c"}"#);
        assert_eq!(json("a: b, c [d]"), r#"{"a": "b, c [d]"}"#);
    }

    #[test]
    fn test_double_quoted_escapes() {
        let tree = parse_in_arena(r#"["a\"b\\c\/d\n\t\u00e9\ud83d\ude00", "x\
  y", "fold
  ed"]"#)
        .unwrap();
        let vals: Vec<_> = tree.root().children().unwrap().map(|n| n.val().unwrap().to_string()).collect();
        assert_eq!(vals[0], "a\"b\\c/d\n\té😀");
        assert_eq!(vals[1], "xy");
        assert_eq!(vals[2], "fold ed");
    }

    #[test]
    fn test_single_quoted() {
        let tree = parse_in_arena("['it''s', '''[D]''']").unwrap();
        let vals: Vec<_> = tree.root().children().unwrap().map(|n| n.val().unwrap().to_string()).collect();
        assert_eq!(vals, vec!["it's", "'[D]'"]);
    }

    #[test]
    fn test_literal_block_chomping() {
        assert_eq!(json("a: |\n  x\n   y\n\nb: 1"), r#"{"a": "x\n y\n","b": 1}"#);
        assert_eq!(json("a: |-\n  x\n  y\n"), r#"{"a": "x\ny"}"#);
        assert_eq!(json("a: |+\n  x\n\n\nb: 1"), r#"{"a": "x\n\n\n","b": 1}"#);
        assert_eq!(json("- |\n  item\n- next"), r#"["item\n","next"]"#);
    }

    #[test]
    fn test_in_place_borrows() {
        let src = String::from("{plain: v, \"quoted\": \"q\", \"esc\": \"a\\nb\"}");
        let tree = parse_in_place(&src).unwrap();
        let store = tree.store();
        let plain = tree.get("plain").unwrap();
        let esc = tree.get("esc").unwrap();
        assert!(store.data(plain.id()).unwrap().val.unwrap().is_borrowed());
        assert!(store.data(esc.id()).unwrap().val.unwrap().is_arena());
        assert_eq!(esc.val(), Some("a\nb"));
    }

    #[test]
    fn test_in_arena_owns_everything() {
        let tree = {
            let src = String::from("{k: v}");
            parse_in_arena(&src).unwrap()
        };
        assert_eq!(tree.get("k").unwrap().val(), Some("v"));
    }

    #[test]
    fn test_document_markers() {
        assert_eq!(json("---\na: 1\n...\n"), r#"{"a": 1}"#);
        assert_eq!(json(""), "");
        assert_eq!(json("# only a comment\n"), "");
        assert!(matches!(parse_in_arena("a: 1\n---\nb: 2\n"), Err(Error::Syntax { .. })));
    }

    #[test]
    fn test_syntax_errors_have_positions() {
        match parse_in_arena("a: 1\nb: [1, 2") {
            Err(Error::Syntax { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected {:?}", other),
        }
        assert!(parse_in_arena("a: 1\n  b: 2").is_err());
        assert!(parse_in_arena("a: b: c").is_err());
        assert!(parse_in_arena("a: - b").is_err());
        assert!(parse_in_arena("\"open").is_err());
        assert!(parse_in_arena("a: &x 1").is_err());
        assert!(parse_in_arena("a: >\n  folded").is_err());
    }

    #[test]
    fn test_depth_limit() {
        let opts = ParseOptions::new().with_max_depth(2);
        assert!(parse_with_options("[[1]]", &opts).is_ok());
        assert!(matches!(
            parse_with_options("[[[1]]]", &opts),
            Err(Error::DepthExceeded { max: 2 })
        ));
        assert!(parse_with_options("a:\n  b:\n    c: 1", &opts).is_err());
    }
}
