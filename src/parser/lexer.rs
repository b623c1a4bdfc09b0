//! Lexer for Shell Input Lines
//!
//! Splits one line into words using POSIX shell quoting rules:
//! - whitespace separates words
//! - single quotes preserve everything literally
//! - double quotes preserve everything except `\"` and `\\`
//! - an unquoted backslash escapes the next character
//!
//! Adjacent quoted and unquoted pieces join into a single word.

/// Error returned when the lexer encounters invalid input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerError {
    pub message: String,
    pub column: usize,
}

impl std::fmt::Display for LexerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "column {}: {}", self.column, self.message)
    }
}

impl std::error::Error for LexerError {}

impl LexerError {
    pub fn new(message: impl Into<String>, column: usize) -> Self {
        Self {
            message: message.into(),
            column,
        }
    }
}

fn is_blank(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\r' | '\n')
}

/// Word splitter over a single input line.
pub struct Lexer {
    input: Vec<char>,
    pos: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            pos: 0,
        }
    }

    /// Split the whole line into words.
    pub fn tokenize(mut self) -> Result<Vec<String>, LexerError> {
        let mut words = Vec::new();
        loop {
            while self.peek().is_some_and(is_blank) {
                self.pos += 1;
            }
            if self.peek().is_none() {
                break;
            }
            words.push(self.read_word()?);
        }
        Ok(words)
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        Some(ch)
    }

    fn read_word(&mut self) -> Result<String, LexerError> {
        let mut value = String::new();
        while let Some(ch) = self.peek() {
            if is_blank(ch) {
                break;
            }
            let column = self.pos + 1;
            self.pos += 1;
            match ch {
                '\'' => self.read_single_quoted(&mut value, column)?,
                '"' => self.read_double_quoted(&mut value, column)?,
                '\\' => match self.advance() {
                    Some(escaped) => value.push(escaped),
                    None => {
                        return Err(LexerError::new(
                            "unexpected EOF after escape character",
                            column,
                        ))
                    }
                },
                _ => value.push(ch),
            }
        }
        Ok(value)
    }

    fn read_single_quoted(&mut self, value: &mut String, column: usize) -> Result<(), LexerError> {
        loop {
            match self.advance() {
                Some('\'') => return Ok(()),
                Some(ch) => value.push(ch),
                None => return Err(unterminated('\'', column)),
            }
        }
    }

    fn read_double_quoted(&mut self, value: &mut String, column: usize) -> Result<(), LexerError> {
        loop {
            match self.advance() {
                Some('"') => return Ok(()),
                Some('\\') => match self.advance() {
                    Some(next @ ('"' | '\\')) => value.push(next),
                    Some(next) => {
                        value.push('\\');
                        value.push(next);
                    }
                    None => return Err(unterminated('"', column)),
                },
                Some(ch) => value.push(ch),
                None => return Err(unterminated('"', column)),
            }
        }
    }
}

fn unterminated(quote: char, column: usize) -> LexerError {
    LexerError::new(
        format!("unexpected EOF while looking for matching `{}'", quote),
        column,
    )
}

/// Split `input` into shell words.
pub fn split_words(input: &str) -> Result<Vec<String>, LexerError> {
    Lexer::new(input).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(input: &str) -> Vec<String> {
        split_words(input).unwrap()
    }

    #[test]
    fn test_simple_command() {
        assert_eq!(words("chown newuser file2.txt"), vec!["chown", "newuser", "file2.txt"]);
    }

    #[test]
    fn test_blank_input() {
        assert!(words("").is_empty());
        assert!(words("   \t  ").is_empty());
    }

    #[test]
    fn test_extra_whitespace() {
        assert_eq!(words("  cd\t  dir1  "), vec!["cd", "dir1"]);
    }

    #[test]
    fn test_double_quotes() {
        assert_eq!(words("cd \"my dir\""), vec!["cd", "my dir"]);
    }

    #[test]
    fn test_single_quotes_are_literal() {
        assert_eq!(words(r#"echo 'a \"b\" $c'"#), vec!["echo", r#"a \"b\" $c"#]);
    }

    #[test]
    fn test_adjacent_pieces_join() {
        assert_eq!(words(r#"pre"mid dle"'post'"#), vec!["premid dlepost"]);
    }

    #[test]
    fn test_empty_quotes_make_empty_word() {
        assert_eq!(words("cd ''"), vec!["cd", ""]);
        assert_eq!(words(r#""""#), vec![""]);
    }

    #[test]
    fn test_backslash_escapes() {
        assert_eq!(words(r"cd my\ dir"), vec!["cd", "my dir"]);
        assert_eq!(words(r"a\\b"), vec![r"a\b"]);
        assert_eq!(words(r#"a\'b"#), vec!["a'b"]);
    }

    #[test]
    fn test_backslash_inside_double_quotes() {
        assert_eq!(words(r#""say \"hi\"""#), vec![r#"say "hi""#]);
        assert_eq!(words(r#""back\\slash""#), vec![r"back\slash"]);
        assert_eq!(words(r#""keep\n""#), vec![r"keep\n"]);
    }

    #[test]
    fn test_unterminated_single_quote() {
        let err = split_words("cd 'dir1").unwrap_err();
        assert_eq!(err.column, 4);
        assert_eq!(err.message, "unexpected EOF while looking for matching `''");
    }

    #[test]
    fn test_unterminated_double_quote() {
        let err = split_words("ls \"abc\\\"").unwrap_err();
        assert_eq!(err.message, "unexpected EOF while looking for matching `\"'");
        assert_eq!(err.to_string(), "column 4: unexpected EOF while looking for matching `\"'");
    }

    #[test]
    fn test_trailing_backslash() {
        let err = split_words("ls \\").unwrap_err();
        assert_eq!(err.message, "unexpected EOF after escape character");
    }

    #[test]
    fn test_unicode_words() {
        assert_eq!(words("cd 'папка 1'"), vec!["cd", "папка 1"]);
    }
}
