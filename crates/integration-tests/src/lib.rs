//! Integration tests for Heartwood.
//!
//! The tests live in `tests/` and exercise the listing pipeline and the
//! cart/checkout flows end-to-end over in-memory state - no server or
//! network is required.

#![cfg_attr(not(test), forbid(unsafe_code))]
