// Error kinds shared by registries and snapshot stores
pub mod error;

// Ordered in-memory record store
pub mod registry;

// Mission and NPC record types
pub mod state;

// File-backed snapshots with bootstrap
pub mod snapshot;

// Join sync and mutation broadcast
pub mod sync;

// Per-tick NPC revival
pub mod reconcile;

// Chat command parsing
pub mod command;

// Host collaborator interface and client membership
pub mod host;

// Core facade driven by host events
pub mod world;

// Configuration
pub mod config;

// WebSocket host and event dispatcher
pub mod server;
