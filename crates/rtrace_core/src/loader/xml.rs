//! Minimal XML reader for scene files.
//!
//! Scene files only use elements, attributes, text and comments, so this
//! reader builds a plain element tree and skips everything else (prolog,
//! doctype, processing instructions).
//!
//! # Supported Syntax
//!
//! - `<name attr="value">text and children</name>`
//! - `<name/>` self-closing elements
//! - `<!-- comments -->`, `<?xml ... ?>`, `<!DOCTYPE ...>`
//! - `<![CDATA[ ... ]]>` text
//! - the five predefined entities (`&lt;` `&gt;` `&amp;` `&quot;` `&apos;`)

use crate::error::{SceneError, SceneResult};

/// One parsed element.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    /// Character data of this element with surrounding whitespace trimmed
    pub text: String,
    pub children: Vec<XmlElement>,
    /// Line of the opening tag
    pub line: usize,
}

impl XmlElement {
    fn new(name: String, line: usize) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            text: String::new(),
            children: Vec::new(),
            line,
        }
    }

    /// First child element called `name`.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All child elements called `name`, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.name == name)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Parse a document and return its root element.
pub fn parse_xml(content: &str) -> SceneResult<XmlElement> {
    let mut parser = XmlParser::new(content);

    parser.skip_misc()?;
    if parser.at_end() {
        return Err(parser.error("document has no root element"));
    }
    let root = parser.parse_element()?;

    parser.skip_misc()?;
    if !parser.at_end() {
        return Err(parser.error("unexpected content after the root element"));
    }

    Ok(root)
}

struct XmlParser<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> XmlParser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    /// Consume `n` bytes, keeping the line counter in sync.
    fn advance(&mut self, n: usize) {
        let consumed = &self.src[self.pos..self.pos + n];
        self.line += consumed.matches('\n').count();
        self.pos += n;
    }

    fn error(&self, message: impl Into<String>) -> SceneError {
        SceneError::Syntax {
            line: self.line,
            message: message.into(),
        }
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.advance(rest.len() - rest.trim_start().len());
    }

    /// Consume everything up to and including `terminator`.
    fn skip_past(&mut self, terminator: &str, what: &str) -> SceneResult<()> {
        self.take_until(terminator, what).map(|_| ())
    }

    /// Consume up to and including `terminator`, returning the text before it.
    fn take_until(&mut self, terminator: &str, what: &str) -> SceneResult<&'a str> {
        let rest = self.rest();
        match rest.find(terminator) {
            Some(i) => {
                self.advance(i + terminator.len());
                Ok(&rest[..i])
            }
            None => Err(self.error(format!("unterminated {}", what))),
        }
    }

    fn expect(&mut self, token: &str) -> SceneResult<()> {
        if self.rest().starts_with(token) {
            self.advance(token.len());
            Ok(())
        } else {
            Err(self.error(format!("expected {:?}", token)))
        }
    }

    /// Skip whitespace, comments, the prolog and other declarations.
    fn skip_misc(&mut self) -> SceneResult<()> {
        loop {
            self.skip_whitespace();
            let rest = self.rest();
            if rest.starts_with("<?") {
                self.skip_past("?>", "processing instruction")?;
            } else if rest.starts_with("<!--") {
                self.skip_past("-->", "comment")?;
            } else if rest.starts_with("<!") {
                self.skip_past(">", "declaration")?;
            } else {
                return Ok(());
            }
        }
    }

    fn read_name(&mut self) -> SceneResult<&'a str> {
        let rest = self.rest();
        let len = rest
            .find(|c: char| !(c.is_alphanumeric() || matches!(c, '_' | '-' | ':' | '.')))
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(self.error("expected a name"));
        }
        self.advance(len);
        Ok(&rest[..len])
    }

    fn parse_element(&mut self) -> SceneResult<XmlElement> {
        let line = self.line;
        self.expect("<")?;
        let name = self.read_name()?.to_string();
        let mut element = XmlElement::new(name, line);

        // Attributes
        loop {
            self.skip_whitespace();
            let rest = self.rest();
            if rest.starts_with("/>") {
                self.advance(2);
                return Ok(element);
            }
            if rest.starts_with('>') {
                self.advance(1);
                break;
            }
            if rest.is_empty() {
                return Err(self.error(format!("unterminated tag <{}>", element.name)));
            }

            let key = self.read_name()?.to_string();
            self.skip_whitespace();
            self.expect("=")?;
            self.skip_whitespace();
            let terminator = match self.rest().chars().next() {
                Some('"') => "\"",
                Some('\'') => "'",
                _ => return Err(self.error(format!("value of attribute {} must be quoted", key))),
            };
            self.advance(1);
            let value = self.take_until(terminator, "attribute value")?;
            element.attributes.push((key, decode_entities(value)));
        }

        // Content
        let mut text = String::new();
        loop {
            let rest = self.rest();
            if rest.is_empty() {
                return Err(self.error(format!(
                    "element <{}> opened at line {} is never closed",
                    element.name, element.line
                )));
            }

            if rest.starts_with("</") {
                self.advance(2);
                let close = self.read_name()?;
                if close != element.name {
                    return Err(self.error(format!(
                        "expected </{}>, found </{}>",
                        element.name, close
                    )));
                }
                self.skip_whitespace();
                self.expect(">")?;
                element.text = text.trim().to_string();
                return Ok(element);
            } else if rest.starts_with("<!--") {
                self.skip_past("-->", "comment")?;
            } else if rest.starts_with("<![CDATA[") {
                self.advance("<![CDATA[".len());
                text.push_str(self.take_until("]]>", "CDATA section")?);
            } else if rest.starts_with("<?") {
                self.skip_past("?>", "processing instruction")?;
            } else if rest.starts_with('<') {
                let child = self.parse_element()?;
                element.children.push(child);
            } else {
                let len = rest.find('<').unwrap_or(rest.len());
                text.push_str(&decode_entities(&rest[..len]));
                self.advance(len);
            }
        }
    }
}

fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    raw.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
