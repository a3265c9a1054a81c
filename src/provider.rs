//! API descriptors: where tokens are minted and where signed requests are sent.
//!
//! `descriptor` exposes validated endpoint metadata ([`ApiDescriptor`]) so flows never
//! hard-code URLs and tests can point a session at a local mock server.

pub mod descriptor;

pub use descriptor::*;
