pub mod health;
pub mod injections;
pub mod medications;
pub mod dashboard;

// Tests module
#[cfg(test)]
mod tests;
