pub mod opensearch;
pub mod postgres;

#[cfg(test)]
pub mod mock;
