pub mod password;
pub mod result_extractor;
