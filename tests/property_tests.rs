// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Entry Point
//!
//! This test suite uses proptest to verify algebraic properties of the
//! hardware address, resource ordering, and message-id codecs.

mod property;
