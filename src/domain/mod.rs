//! Domain Layer
//!
//! The core of Edgesite: site model and provisioning rules without I/O.
//!
//! ## Structure
//!
//! - `entities/` - Site spec, cloud resources, persisted state
//! - `value_objects/` - Immutable value types (DomainName, Region, LogicalId)
//! - `services/` - Pure services (ResourceGraph, Planner, Backoff)
//! - `ports/` - Interface definitions for providers and infrastructure
//!
//! ## Design Principles
//!
//! 1. **No I/O** - This layer never touches the network or file system directly
//! 2. **Explicit context** - Account and region travel with every provider call
//! 3. **Ports & Adapters** - All I/O goes through trait-defined ports

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
