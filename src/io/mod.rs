// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations for tour files, media and sharing.

pub mod media;
pub mod serialization;
pub mod share;
pub mod video;
