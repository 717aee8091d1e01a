pub mod logs;
pub mod pg;

#[cfg(test)]
pub(crate) mod testing;
