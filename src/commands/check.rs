//! Check command implementation.
//!
//! Validates system requirements and configuration.

use nix::unistd::geteuid;

use procpair::config::{validate_effective_config, Config};
use procpair::process::{collect_pids, read_process, ParseOutcome, ProcFs, UserResolver};
use procpair::system::{clock_ticks_per_second, read_boot_epoch};
use procpair::SystemContext;

/// Validates system requirements and configuration.
pub fn command_check(config: &Config) -> anyhow::Result<()> {
    println!("🔍 procpair - System Check");
    println!("==========================");

    let mut all_ok = true;
    let root = config.proc_root();

    // Privileges
    println!("\n👤 Checking privileges...");
    if geteuid().is_root() {
        println!("   ✅ Running as root (uid=0)");
    } else {
        println!("   ⚠️  Not running as root - other users' processes may be unreadable");
    }

    // procfs
    println!("\n📁 Checking {} ...", root.display());
    let pids = collect_pids(&root);
    if pids.is_empty() {
        println!("   ❌ Cannot read any process entries from {}", root.display());
        all_ok = false;
    } else {
        println!("   ✅ Found {} process entries", pids.len());
    }

    // Host constants
    println!("\n⏱️  Checking host constants...");
    println!("   ✅ Clock ticks per second: {}", clock_ticks_per_second());
    let boot_epoch = match read_boot_epoch(&root) {
        Ok(epoch) => {
            println!("   ✅ Boot epoch: {}", epoch);
            Some(epoch)
        }
        Err(e) => {
            println!("   ❌ {}", e);
            all_ok = false;
            None
        }
    };

    // Parse our own record end to end
    if let Some(boot_epoch) = boot_epoch {
        println!("\n🧪 Parsing own process record...");
        let ctx = SystemContext::new(clock_ticks_per_second(), boot_epoch);
        let source = ProcFs::new(&root);
        match read_process(&source, std::process::id(), &ctx, &UserResolver::system()) {
            ParseOutcome::Parsed(record) => println!("   ✅ {}", record.summary()),
            ParseOutcome::Vanished => {
                println!("   ❌ Own process not visible under {}", root.display());
                all_ok = false;
            }
            ParseOutcome::Unreadable(e) => {
                println!("   ❌ Failed to read own process: {}", e);
                all_ok = false;
            }
        }
    }

    // Configuration
    println!("\n⚙️  Checking configuration...");
    match validate_effective_config(config) {
        Ok(()) => println!("   ✅ Configuration is valid"),
        Err(e) => {
            println!("   ❌ {}", e);
            all_ok = false;
        }
    }

    println!("\n📋 Summary:");
    if all_ok {
        println!("   ✅ All checks passed - system is ready");
        Ok(())
    } else {
        println!("   ❌ Some checks failed - please review warnings");
        std::process::exit(1);
    }
}
