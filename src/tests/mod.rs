//! End-to-end event-stream scenarios, run through a full checker chain
//! rather than any single adapter in isolation.
mod scenarios;
