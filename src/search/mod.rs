pub mod comparator;
pub mod partitioner;
