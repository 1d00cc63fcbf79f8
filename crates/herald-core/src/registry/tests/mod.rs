#[cfg(test)]
mod priority_tests;
#[cfg(test)]
mod registry_tests;
