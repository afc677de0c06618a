//! # YEP Testkit
//!
//! Testing utilities for YEP.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: Principals, a verifying service, and a ready `Yep` instance
//! - **Generators**: Proptest strategies for keys, names, and whole scenarios
//! - **Scenarios**: Cross-crate protocol tests under `tests/`
//!
//! ## Test Fixtures
//!
//! ```rust
//! use yep_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! let view = fixture.permission("VIEW");
//! let proof = fixture.proof(&fixture.owner, &view.permission, &view.grant);
//! assert!(fixture.verify(&fixture.owner, &view.permission, &proof));
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use yep_testkit::generators::ScenarioParams;
//!
//! proptest! {
//!     #[test]
//!     fn owner_can_always_prove(params: ScenarioParams) {
//!         // ...
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{init_tracing, multi_party_principals, Principal, TestFixture};
pub use generators::ScenarioParams;
