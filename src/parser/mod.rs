//! Parser module for shell input
//!
//! This module contains the lexer that splits an input line into words.

pub mod lexer;

pub use lexer::{split_words, Lexer, LexerError};
