pub mod http_classifier;

pub use http_classifier::HttpSpamClassifier;
