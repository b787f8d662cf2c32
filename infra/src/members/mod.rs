//! Member storage with bcrypt password hashing

pub mod memory;


pub use memory::InMemoryMemberRepository;
