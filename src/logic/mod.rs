// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Side-effectful logic kept out of the UI: the REST client for student records.

pub mod api;
#[cfg(test)]
pub mod memory;
