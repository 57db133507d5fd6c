// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CLI subcommands.

mod convert;
mod diff;
mod formats;
mod peek;

pub use convert::ConvertCmd;
pub use diff::DiffCmd;
pub use formats::FormatsCmd;
pub use peek::PeekCmd;
