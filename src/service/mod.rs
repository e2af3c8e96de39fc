//! StudentService: the five student operations over an injected store.

mod students;
pub use students::StudentService;
