// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module
//!
//! Properties of the identity codecs that must hold for every input, not
//! just the vendor samples in the unit tables.

mod mac_properties;
mod message_id_properties;
mod natural_order;
