// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data models for the tour and the story scene.

pub mod navigation;
pub mod playback;
pub mod scene;
pub mod timeline;
pub mod tour;
