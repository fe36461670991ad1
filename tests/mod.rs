//! Workspace integration tests for the coordination primitives.

#[cfg(test)]
mod backends;
