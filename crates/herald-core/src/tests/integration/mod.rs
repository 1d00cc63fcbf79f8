#![cfg(test)]

pub mod dispatch_flow_tests;
