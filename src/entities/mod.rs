pub mod file;
pub mod timeline;
