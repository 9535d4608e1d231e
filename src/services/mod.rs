pub mod s3;
pub mod storage;
pub mod timelines;
