pub mod assets;
pub mod clock;
pub mod display;

#[cfg(test)]
pub mod testing;
