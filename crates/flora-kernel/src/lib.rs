//! Flora kernel — the service-integration contract of the Faces of Plants
//! platform.
//!
//! This crate defines the *types and trait interfaces* of the service layer.
//! No concrete implementations live here — the dispatch runtime belongs in
//! `flora-services` and the network backends in `flora-providers`.

// service module
pub mod service;
pub use service::*;
