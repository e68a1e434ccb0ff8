//! Unit-level tests for the public API, one module per component.

mod unit;
