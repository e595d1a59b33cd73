//! The standard command set.

mod collect;
mod lookup;
mod text;

pub use collect::CollectCommand;
pub use lookup::{
    EXCERPT_LIMIT, GoogleCommand, TempCommand, WikipediaCommand, asciilize, extract_excerpt,
    extract_search_answer,
};
pub use text::{EchoCommand, EncodingCommand, HelloCommand, INSULTS, InsultCommand, RawCommand};
