use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result, anyhow};
use glshare_core::backend::WglBackend;
use glshare_core::{ContextRole, ShareConfig, SharedContexts};
use windows::Win32::Foundation::HWND;

use crate::host::HostContext;

/// Initializes shared contexts against a fresh host context on `window`,
/// binds every role on its own thread, then tears down.
pub fn run(window: HWND) -> Result<()> {
    let host = HostContext::create(window)?;
    let contexts = Arc::new(SharedContexts::new(WglBackend::new(), ShareConfig::default()));

    let bundle = contexts
        .initialize(host.primary()?)
        .context("shared context initialization failed")?;
    for (role, record) in bundle.records().iter() {
        log::info!(
            "{role}: context {:?} on {:?} drawable {:?} (format {}, {:?} tier, link {:?})",
            record.context,
            if record.surface.dedicated { "dedicated" } else { "primary" },
            record.surface.surface,
            record.surface.pixel_format,
            record.tier,
            record.link_order,
        );
    }

    let mut workers = Vec::with_capacity(ContextRole::COUNT);
    for role in ContextRole::ALL {
        let contexts = Arc::clone(&contexts);
        let worker = thread::Builder::new()
            .name(format!("glshare-{role}"))
            .spawn(move || -> Result<()> {
                let bound = contexts
                    .make_current(role)
                    .with_context(|| format!("cannot bind the {role} context"))?;
                log::info!("{role} context bound on its worker (was {:?})", bound.previous());
                Ok(())
            })
            .with_context(|| format!("failed to spawn the {role} worker"))?;
        workers.push((role, worker));
    }

    for (role, worker) in workers {
        worker
            .join()
            .map_err(|_| anyhow!("{role} worker panicked"))??;
    }

    contexts.teardown();
    drop(host);
    log::info!("probe finished");
    Ok(())
}
