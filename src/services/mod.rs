// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod format;
pub mod locations;
pub mod parse;
pub mod sessions;
