pub mod checkpoint;
pub mod dataset;
pub mod encoding;
pub mod prompter;
pub mod session;
