#[cfg(test)]
mod integration;
