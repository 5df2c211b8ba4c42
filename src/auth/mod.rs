pub mod extractor;

pub use extractor::AdminAuth;
