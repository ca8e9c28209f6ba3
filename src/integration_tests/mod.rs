// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! End-to-end prompt scenarios, driven through a scripted event stream and a
//! byte-capturing output device. These exercise the whole stack — key translation,
//! engine updates, rendering, the completion race — deterministically, with no
//! terminal involved.
//!
//! Unit tests for individual transitions live next to the code they test; this
//! module is for whole-session behavior.
