pub mod assembler;
pub mod export;
pub mod extractor;
pub mod m3u_parser;
pub mod normalizer;
pub mod output;
pub mod poster;
