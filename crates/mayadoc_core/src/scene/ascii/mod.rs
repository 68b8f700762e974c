mod command;
mod token;

pub use command::CommandInterpreter;
pub use token::{Token, TokenKind, Tokenizer};
