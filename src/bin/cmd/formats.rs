// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Formats command - list registered codecs.

use clap::Args;

use crate::common::Result;
use omnidata::formats::CodecCapabilities;
use omnidata::FormatRegistry;

/// List registered formats.
#[derive(Args, Clone, Debug)]
pub struct FormatsCmd {
    /// Show only formats that can be used
    #[arg(long)]
    available: bool,
}

fn streaming(caps: &CodecCapabilities) -> &'static str {
    match (caps.stream_read, caps.stream_write) {
        (true, true) => "read+write",
        (true, false) => "read",
        (false, true) => "write",
        (false, false) => "-",
    }
}

impl FormatsCmd {
    pub fn run(self) -> Result<()> {
        let registry = FormatRegistry::with_builtin_formats();

        println!("{:<10} {:<10} {:<8} Streaming", "Format", "Available", "Binary");
        for name in registry.names() {
            let Some(codec) = registry.get(&name) else {
                continue;
            };
            let caps = codec.capabilities();
            if self.available && !caps.available {
                continue;
            }
            println!(
                "{:<10} {:<10} {:<8} {}",
                name,
                if caps.available { "yes" } else { "no" },
                if caps.binary { "yes" } else { "no" },
                streaming(&caps)
            );
        }
        Ok(())
    }
}
