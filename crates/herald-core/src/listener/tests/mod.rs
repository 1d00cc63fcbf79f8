#[cfg(test)]
mod resolve_tests;
