//! Session infrastructure: token generation and storage

mod in_memory;
mod token;

pub use in_memory::InMemorySessionStore;
pub use token::SessionTokenGenerator;
