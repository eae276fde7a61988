pub mod cat;
pub mod chain;
pub mod dir;
pub mod info;
